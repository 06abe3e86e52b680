pub mod artifacts;
pub mod command;
pub mod provider;
pub mod types;

pub use command::{CommandEngine, CommandEngineConfig};
pub use provider::SearchEngine;
pub use types::{EngineOptions, EngineRunReport, Individual, StoppingCondition};
