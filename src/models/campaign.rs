use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::attempt::AttemptResult;
use super::target::VulnerabilityTarget;
use crate::config::SearchParameters;
use crate::ranking::RankingPolicy;

/// Everything recorded for one vulnerability target during a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityResult {
    pub target: VulnerabilityTarget,
    pub attempts: Vec<AttemptResult>,
    /// True iff no attempt was ever made for this target.
    pub unreachable: bool,
    /// Set when the static path index could not be primed for this target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priming_error: Option<String>,
}

impl VulnerabilityResult {
    pub fn attempting(target: VulnerabilityTarget) -> Self {
        Self {
            target,
            attempts: Vec::new(),
            unreachable: false,
            priming_error: None,
        }
    }

    pub fn unreachable(target: VulnerabilityTarget) -> Self {
        Self {
            target,
            attempts: Vec::new(),
            unreachable: true,
            priming_error: None,
        }
    }

    pub fn priming_failed(target: VulnerabilityTarget, error: String) -> Self {
        Self {
            priming_error: Some(error),
            ..Self::unreachable(target)
        }
    }

    pub fn success_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.is_success()).count()
    }

    pub fn is_reached(&self) -> bool {
        self.success_count() > 0
    }

    /// Lowest fitness observed across all attempts with fitness data.
    pub fn best_fitness(&self) -> Option<f64> {
        self.attempts
            .iter()
            .filter_map(|a| a.best_fitness)
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Configuration values a campaign ran with, exported alongside the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationSnapshot {
    pub budget_secs: u64,
    pub population_size: u32,
    pub ranking: RankingPolicy,
    pub stop_on_first_success: bool,
    pub keep_empty_tests: bool,
    pub search: SearchParameters,
}

/// Accumulated outcome of one campaign over one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignResult {
    pub run_id: Uuid,
    pub project_path: PathBuf,
    pub vulnerabilities: Vec<VulnerabilityTarget>,
    pub configuration: ConfigurationSnapshot,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub vulnerability_results: Vec<VulnerabilityResult>,
}

impl CampaignResult {
    pub fn new(
        project_path: PathBuf,
        vulnerabilities: Vec<VulnerabilityTarget>,
        configuration: ConfigurationSnapshot,
    ) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            project_path,
            vulnerabilities,
            configuration,
            start_time: now,
            end_time: now,
            vulnerability_results: Vec::new(),
        }
    }

    /// Move `end_time` to now. Never moves it backwards, even if the wall
    /// clock does.
    pub fn touch(&mut self) {
        let now = Utc::now();
        if now > self.end_time {
            self.end_time = now;
        }
    }

    pub fn total_attempts(&self) -> usize {
        self.vulnerability_results.iter().map(|v| v.attempts.len()).sum()
    }

    pub fn total_successes(&self) -> usize {
        self.vulnerability_results.iter().map(|v| v.success_count()).sum()
    }

    pub fn reached_targets(&self) -> usize {
        self.vulnerability_results.iter().filter(|v| v.is_reached()).count()
    }

    pub fn unreachable_targets(&self) -> usize {
        self.vulnerability_results.iter().filter(|v| v.unreachable).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attempt::AttemptOutcome;

    fn snapshot() -> ConfigurationSnapshot {
        ConfigurationSnapshot {
            budget_secs: 60,
            population_size: 100,
            ranking: RankingPolicy::TargetDistance,
            stop_on_first_success: false,
            keep_empty_tests: false,
            search: SearchParameters::default(),
        }
    }

    fn attempt(entry: &str, outcome: AttemptOutcome, fitness: Option<f64>) -> AttemptResult {
        AttemptResult {
            target_id: "CVE-1".to_string(),
            entry_class: entry.to_string(),
            total_budget_secs: 60,
            spent_budget_secs: Some(10),
            population_size: 100,
            reachability_goal_count: 1,
            exploited_goal_count: 1,
            best_fitness: fitness,
            iterations: Some(4),
            outcome,
        }
    }

    #[test]
    fn test_touch_is_monotonic() {
        let mut result = CampaignResult::new(PathBuf::from("/p"), Vec::new(), snapshot());
        let before = result.end_time;
        result.touch();
        assert!(result.end_time >= before);
        assert!(result.end_time >= result.start_time);
    }

    #[test]
    fn test_vulnerability_result_counts() {
        let target = VulnerabilityTarget::new("CVE-1", "org.lib.A", "m");
        let mut vr = VulnerabilityResult::attempting(target);
        vr.attempts.push(attempt("A", AttemptOutcome::Failed, Some(0.4)));
        vr.attempts.push(attempt("B", AttemptOutcome::Success, Some(0.0)));
        vr.attempts.push(attempt("C", AttemptOutcome::Failed, None));
        assert_eq!(vr.success_count(), 1);
        assert!(vr.is_reached());
        assert_eq!(vr.best_fitness(), Some(0.0));
    }

    #[test]
    fn test_unreachable_has_no_attempts() {
        let vr = VulnerabilityResult::unreachable(VulnerabilityTarget::new("CVE-2", "X", "y"));
        assert!(vr.unreachable);
        assert!(vr.attempts.is_empty());
        assert_eq!(vr.best_fitness(), None);
    }

    #[test]
    fn test_priming_error_is_omitted_when_absent() {
        let vr = VulnerabilityResult::unreachable(VulnerabilityTarget::new("CVE-2", "X", "y"));
        let json = serde_json::to_value(&vr).unwrap();
        assert!(json.get("priming_error").is_none());
        let failed = VulnerabilityResult::priming_failed(VulnerabilityTarget::new("CVE-3", "X", "y"), "boom".into());
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["priming_error"], "boom");
        assert_eq!(json["unreachable"], true);
    }
}
