pub mod events;
pub mod executor;
pub mod launcher;
pub mod orchestrator;
pub mod state;

pub use events::CampaignEvent;
pub use executor::{classify_report, AttemptExecutor};
pub use launcher::{LaunchReport, Launcher, RunDirectories};
pub use orchestrator::{run_campaign, CampaignOrchestrator};
pub use state::{CampaignConfig, CampaignState, CampaignStatus, TargetPhase};
