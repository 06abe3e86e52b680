use crate::models::AttemptOutcome;

/// Messages sent from a running campaign to a progress display.
#[derive(Debug, Clone)]
pub enum CampaignEvent {
    CampaignStarted {
        project: String,
        target_count: usize,
    },
    TargetStarted {
        target_id: String,
        sink: String,
    },
    /// No attempt will be made for this target
    TargetUnreachable {
        target_id: String,
        reason: String,
    },
    CandidatesRanked {
        target_id: String,
        candidate_count: usize,
    },
    AttemptStarted {
        target_id: String,
        entry_class: String,
        index: usize,
        total: usize,
    },
    AttemptFinished {
        target_id: String,
        entry_class: String,
        outcome: AttemptOutcome,
        best_fitness: Option<f64>,
    },
    /// The engine failed; the candidate was skipped
    AttemptErrored {
        target_id: String,
        entry_class: String,
        error: String,
    },
    TargetFinished {
        target_id: String,
        attempts: usize,
        successes: usize,
    },
    ExportFailed {
        error: String,
    },
    CampaignCompleted {
        attempts: usize,
        successes: usize,
        reached_targets: usize,
        unreachable_targets: usize,
    },
    CampaignCancelled {
        attempts: usize,
    },
}
