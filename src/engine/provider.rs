use async_trait::async_trait;

use super::types::{EngineOptions, EngineRunReport};
use crate::errors::ReachError;
use crate::models::{StaticPath, VulnerabilityTarget};

/// The search engine that synthesizes call chains towards a sink.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Warm-up run that builds the engine's static call-path index for
    /// `target`. Its test output is transient.
    async fn prime(
        &self,
        target: &VulnerabilityTarget,
        seed_class: &str,
        opts: &EngineOptions,
    ) -> Result<(), ReachError>;

    /// One budgeted search from `entry_class` towards the target's sink.
    async fn run_attempt(
        &self,
        target: &VulnerabilityTarget,
        entry_class: &str,
        opts: &EngineOptions,
    ) -> Result<EngineRunReport, ReachError>;

    /// Static call paths ending at the sink, as recorded by the last priming.
    async fn paths_for_target(&self, sink_class: &str, sink_method: &str) -> Vec<StaticPath>;

    /// Engine name for logging
    fn engine_name(&self) -> &str;
}
