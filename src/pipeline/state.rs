use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ProjectConfiguration, SearchParameters};
use crate::models::ConfigurationSnapshot;
use crate::ranking::RankingPolicy;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Initialized,
    Running,
    Completed,
    Cancelled,
}

/// Where a single vulnerability target stands within the campaign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TargetPhase {
    Pending,
    Primed,
    SkippedUnreachable,
    Attempting,
    Exhausted,
}

impl std::fmt::Display for TargetPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Primed => write!(f, "primed"),
            Self::SkippedUnreachable => write!(f, "skipped-unreachable"),
            Self::Attempting => write!(f, "attempting"),
            Self::Exhausted => write!(f, "exhausted"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignState {
    pub status: CampaignStatus,
    pub current_target: Option<String>,
    pub target_phase: Option<TargetPhase>,
    pub current_entry_class: Option<String>,
}

impl CampaignState {
    pub fn new() -> Self {
        Self {
            status: CampaignStatus::Initialized,
            current_target: None,
            target_phase: None,
            current_entry_class: None,
        }
    }
}

impl Default for CampaignState {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings of one campaign over one project.
#[derive(Debug, Clone)]
pub struct CampaignConfig {
    pub project_path: PathBuf,
    pub budget_secs: u64,
    pub population_size: u32,
    pub ranking: RankingPolicy,
    pub stop_on_first_success: bool,
    pub keep_empty_tests: bool,
    pub search: SearchParameters,
    /// Where the engine writes generated tests.
    pub tests_dir: PathBuf,
    /// Root of the per-attempt generation logs; no logs when unset.
    pub logs_dir: Option<PathBuf>,
}

impl CampaignConfig {
    pub fn from_project(project: &ProjectConfiguration, tests_dir: PathBuf, logs_dir: Option<PathBuf>, keep_empty_tests: bool) -> Self {
        Self {
            project_path: project.project_path.clone(),
            budget_secs: project.budget_secs,
            population_size: project.population_size,
            ranking: project.ranking,
            stop_on_first_success: project.stop_on_first_success,
            keep_empty_tests,
            search: project.search.clone(),
            tests_dir,
            logs_dir,
        }
    }

    /// Transient directory for the priming run's throwaway tests.
    pub fn priming_dir(&self) -> PathBuf {
        self.tests_dir.join(".priming")
    }

    pub fn snapshot(&self) -> ConfigurationSnapshot {
        ConfigurationSnapshot {
            budget_secs: self.budget_secs,
            population_size: self.population_size,
            ranking: self.ranking,
            stop_on_first_success: self.stop_on_first_success,
            keep_empty_tests: self.keep_empty_tests,
            search: self.search.clone(),
        }
    }
}
