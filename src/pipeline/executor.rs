use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::engine::{EngineOptions, EngineRunReport, SearchEngine};
use crate::errors::ReachError;
use crate::models::{AttemptOutcome, AttemptResult, VulnerabilityTarget};

/// Runs single budgeted attempts and turns engine reports into results.
pub struct AttemptExecutor {
    engine: Arc<dyn SearchEngine>,
    base_options: EngineOptions,
}

impl AttemptExecutor {
    pub fn new(engine: Arc<dyn SearchEngine>, base_options: EngineOptions) -> Self {
        Self { engine, base_options }
    }

    pub async fn attempt(
        &self,
        target: &VulnerabilityTarget,
        entry_class: &str,
        budget_secs: u64,
        population_size: u32,
        generation_log_file: Option<PathBuf>,
    ) -> Result<AttemptResult, ReachError> {
        let opts = self.base_options.for_attempt(target, budget_secs, population_size, generation_log_file);
        debug!(target_id = %target.id, entry_class, budget_secs, population_size, "Starting attempt");

        let report = self.engine.run_attempt(target, entry_class, &opts).await?;
        let result = classify_report(target, entry_class, budget_secs, population_size, &report);

        info!(
            target_id = %target.id,
            entry_class,
            outcome = %result.outcome,
            spent_secs = ?result.spent_budget_secs,
            best_fitness = ?result.best_fitness,
            "Attempt finished"
        );
        Ok(result)
    }
}

/// Build the attempt result for one engine report.
pub fn classify_report(
    target: &VulnerabilityTarget,
    entry_class: &str,
    budget_secs: u64,
    population_size: u32,
    report: &EngineRunReport,
) -> AttemptResult {
    let mut result = AttemptResult {
        target_id: target.id.clone(),
        entry_class: entry_class.to_string(),
        total_budget_secs: budget_secs,
        spent_budget_secs: None,
        population_size,
        reachability_goal_count: report.goal_count,
        exploited_goal_count: 0,
        best_fitness: None,
        iterations: None,
        outcome: AttemptOutcome::Failed,
    };
    if report.generated_test_count == 0 {
        return result;
    }

    let spent = report.spent_budget_secs().unwrap_or(0);
    let best_fitness = best_fitness(report);

    result.spent_budget_secs = Some(spent);
    result.best_fitness = best_fitness;
    result.iterations = Some(report.age + 1);
    result.exploited_goal_count = report.generated_test_count;
    if spent < budget_secs && best_fitness == Some(0.0) {
        result.outcome = AttemptOutcome::Success;
    }
    result
}

/// Fitness of the best individual: the shortest one covering a goal if any
/// does, otherwise the one with the lowest fitness on any goal.
fn best_fitness(report: &EngineRunReport) -> Option<f64> {
    let shortest_covering = report
        .population
        .iter()
        .filter(|i| i.covers_a_goal())
        .min_by_key(|i| i.statement_count);
    if let Some(individual) = shortest_covering {
        return individual.min_fitness();
    }
    report
        .population
        .iter()
        .filter_map(|i| i.min_fitness())
        .min_by(f64::total_cmp)
}
