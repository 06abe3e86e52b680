use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::audit::utils::atomic_write;
use crate::errors::ReachError;
use crate::models::CampaignResult;

/// Destination for campaign results, written after every attempt.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn export(&self, result: &CampaignResult) -> Result<(), ReachError>;

    /// Human-readable destination for logging
    fn location(&self) -> String;
}

/// Writes the full campaign result as pretty JSON, replacing the file atomically.
pub struct JsonFileExporter {
    path: PathBuf,
}

impl JsonFileExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<results_dir>/<project name>.json`
    pub fn for_project(results_dir: &Path, project_name: &str) -> Self {
        Self::new(results_dir.join(format!("{}.json", project_name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultSink for JsonFileExporter {
    async fn export(&self, result: &CampaignResult) -> Result<(), ReachError> {
        let json = to_json(result)?;
        atomic_write(&self.path, &json)
            .await
            .map_err(|e| ReachError::Export(format!("{}: {}", self.path.display(), e)))?;
        debug!(path = %self.path.display(), attempts = result.total_attempts(), "Exported campaign result");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

pub fn to_json(result: &CampaignResult) -> Result<String, ReachError> {
    serde_json::to_string_pretty(result)
        .map_err(|e| ReachError::Export(format!("Failed to serialize campaign result: {}", e)))
}

/// Fallback when the sink fails: the JSON goes to stdout so nothing is lost.
pub fn print_to_stdout(result: &CampaignResult) {
    match to_json(result) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("{}", e),
    }
}
