use serde::{Deserialize, Serialize};

/// Terminal classification of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptOutcome {
    /// A test covering the sink was produced within the budget.
    Success,
    Failed,
}

impl AttemptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of one bounded search from one entry class towards one sink.
///
/// `None` in `spent_budget_secs`, `best_fitness` and `iterations` means the
/// engine left no data for this attempt, which is different from zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptResult {
    pub target_id: String,
    pub entry_class: String,
    pub total_budget_secs: u64,
    pub spent_budget_secs: Option<u64>,
    pub population_size: u32,
    /// Number of reachability goals the engine derived for this entry class.
    pub reachability_goal_count: usize,
    /// Number of distinct test cases the engine retained.
    pub exploited_goal_count: usize,
    pub best_fitness: Option<f64>,
    /// Generations evaluated.
    pub iterations: Option<u64>,
    pub outcome: AttemptOutcome,
}

impl AttemptResult {
    pub fn is_success(&self) -> bool {
        self.outcome == AttemptOutcome::Success
    }
}
