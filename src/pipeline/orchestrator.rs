use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::events::CampaignEvent;
use super::executor::AttemptExecutor;
use super::state::*;
use crate::audit::generation_log::prepare_generation_log;
use crate::engine::artifacts::{clear_dir, delete_empty_test_files};
use crate::engine::{EngineOptions, SearchEngine};
use crate::errors::ReachError;
use crate::models::{CampaignResult, VulnerabilityResult, VulnerabilityTarget};
use crate::reporting::exporter::{print_to_stdout, ResultSink};

/// Drives one campaign: every target in order, every ranked entry class in
/// order, one engine call at a time.
pub struct CampaignOrchestrator {
    config: CampaignConfig,
    engine: Arc<dyn SearchEngine>,
    sink: Arc<dyn ResultSink>,
    state: Arc<RwLock<CampaignState>>,
    cancel_token: CancellationToken,
    event_tx: Option<mpsc::UnboundedSender<CampaignEvent>>,
}

impl CampaignOrchestrator {
    pub fn new(config: CampaignConfig, engine: Arc<dyn SearchEngine>, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            config,
            engine,
            sink,
            state: Arc::new(RwLock::new(CampaignState::new())),
            cancel_token: CancellationToken::new(),
            event_tx: None,
        }
    }

    /// Share a cancel token with the caller (e.g. a Ctrl-C handler).
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Attach an event channel for streaming campaign events to a progress display.
    pub fn with_event_channel(mut self, tx: mpsc::UnboundedSender<CampaignEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn emit(&self, event: CampaignEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }

    pub fn state(&self) -> Arc<RwLock<CampaignState>> {
        self.state.clone()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Run the campaign over `targets`, using `classes` as the allowed entry
    /// classes. The returned result is complete unless the campaign was
    /// cancelled, in which case it holds everything finished so far.
    pub async fn run(
        &self,
        targets: &[VulnerabilityTarget],
        classes: &[String],
        classpath: &str,
    ) -> Result<CampaignResult, ReachError> {
        let mut result = CampaignResult::new(
            self.config.project_path.clone(),
            targets.to_vec(),
            self.config.snapshot(),
        );
        self.update_status(CampaignStatus::Running).await;
        info!(
            run_id = %result.run_id,
            project = %self.config.project_path.display(),
            targets = targets.len(),
            classes = classes.len(),
            engine = self.engine.engine_name(),
            "Campaign started"
        );
        self.emit(CampaignEvent::CampaignStarted {
            project: self.config.project_path.display().to_string(),
            target_count: targets.len(),
        });

        let base_options = EngineOptions {
            budget_secs: self.config.budget_secs,
            population_size: self.config.population_size,
            ..EngineOptions::new(classpath, &self.config.tests_dir, self.config.search.clone())
        };
        let executor = AttemptExecutor::new(self.engine.clone(), base_options.clone());

        let mut cancelled = false;
        for target in targets {
            if self.is_cancelled() {
                cancelled = true;
                break;
            }
            cancelled = self.run_target(target, classes, &base_options, &executor, &mut result).await?;
            if cancelled {
                break;
            }
        }

        result.touch();
        self.export(&result).await;

        if cancelled {
            self.update_status(CampaignStatus::Cancelled).await;
            info!(attempts = result.total_attempts(), "Campaign cancelled by user");
            self.emit(CampaignEvent::CampaignCancelled { attempts: result.total_attempts() });
        } else {
            self.update_status(CampaignStatus::Completed).await;
            info!(
                attempts = result.total_attempts(),
                successes = result.total_successes(),
                reached = result.reached_targets(),
                unreachable = result.unreachable_targets(),
                "Campaign completed"
            );
            self.emit(CampaignEvent::CampaignCompleted {
                attempts: result.total_attempts(),
                successes: result.total_successes(),
                reached_targets: result.reached_targets(),
                unreachable_targets: result.unreachable_targets(),
            });
        }
        Ok(result)
    }

    /// Process one target. Returns true when cancellation stopped it early.
    async fn run_target(
        &self,
        target: &VulnerabilityTarget,
        classes: &[String],
        base_options: &EngineOptions,
        executor: &AttemptExecutor,
        result: &mut CampaignResult,
    ) -> Result<bool, ReachError> {
        {
            let mut state = self.state.write().await;
            state.current_target = Some(target.id.clone());
            state.current_entry_class = None;
        }
        self.set_phase(TargetPhase::Pending).await;
        info!(target_id = %target.id, sink = %target, "Analyzing vulnerability");
        self.emit(CampaignEvent::TargetStarted {
            target_id: target.id.clone(),
            sink: target.to_string(),
        });

        let Some(seed_class) = classes.first() else {
            self.record_unreachable(target, result, VulnerabilityResult::unreachable(target.clone()), "no client classes").await;
            return Ok(false);
        };

        let priming_dir = self.config.priming_dir();
        let priming_options = EngineOptions {
            tests_dir: priming_dir.clone(),
            ..base_options.for_attempt(target, self.config.budget_secs, self.config.population_size, None)
        };
        let primed = self.engine.prime(target, seed_class, &priming_options).await;
        clear_dir(&priming_dir).await;
        if let Err(e) = primed {
            if e.is_fatal() {
                return Err(e);
            }
            warn!(target_id = %target.id, error = %e, "Priming failed, skipping vulnerability");
            let reason = e.to_string();
            self.record_unreachable(target, result, VulnerabilityResult::priming_failed(target.clone(), reason.clone()), &reason).await;
            return Ok(false);
        }
        self.set_phase(TargetPhase::Primed).await;

        let paths = self.engine.paths_for_target(&target.sink_class, &target.sink_method).await;
        if paths.is_empty() {
            info!(target_id = %target.id, "Target unreachable, no static path found");
            self.record_unreachable(target, result, VulnerabilityResult::unreachable(target.clone()), "no static path to the sink").await;
            return Ok(false);
        }

        let candidates = self.config.ranking.rank(classes, &paths);
        if candidates.is_empty() {
            info!(target_id = %target.id, paths = paths.len(), "Target unreachable, no client class on any static path");
            self.record_unreachable(target, result, VulnerabilityResult::unreachable(target.clone()), "no client class on any static path").await;
            return Ok(false);
        }
        info!(target_id = %target.id, candidates = candidates.len(), ranking = %self.config.ranking, "Ranked entry points");
        debug!(target_id = %target.id, ?candidates, "Entry point order");
        self.emit(CampaignEvent::CandidatesRanked {
            target_id: target.id.clone(),
            candidate_count: candidates.len(),
        });

        self.set_phase(TargetPhase::Attempting).await;
        result.vulnerability_results.push(VulnerabilityResult::attempting(target.clone()));
        let slot = result.vulnerability_results.len() - 1;
        let mut cancelled = false;

        for (index, entry_class) in candidates.iter().enumerate() {
            if self.is_cancelled() {
                cancelled = true;
                break;
            }
            self.state.write().await.current_entry_class = Some(entry_class.clone());
            self.emit(CampaignEvent::AttemptStarted {
                target_id: target.id.clone(),
                entry_class: entry_class.clone(),
                index,
                total: candidates.len(),
            });

            let log_file = match &self.config.logs_dir {
                Some(dir) => prepare_generation_log(dir, &target.id, entry_class).await,
                None => None,
            };
            let outcome = executor
                .attempt(target, entry_class, self.config.budget_secs, self.config.population_size, log_file)
                .await;

            if !self.config.keep_empty_tests {
                let removed = delete_empty_test_files(&self.config.tests_dir).await;
                if removed > 0 {
                    debug!(removed, "Deleted empty generated tests");
                }
            }

            let attempt = match outcome {
                Ok(attempt) => attempt,
                Err(e) if !e.is_fatal() => {
                    warn!(target_id = %target.id, entry_class, error = %e, "Attempt failed to run, skipping entry point");
                    self.emit(CampaignEvent::AttemptErrored {
                        target_id: target.id.clone(),
                        entry_class: entry_class.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            let success = attempt.is_success();
            self.emit(CampaignEvent::AttemptFinished {
                target_id: target.id.clone(),
                entry_class: entry_class.clone(),
                outcome: attempt.outcome,
                best_fitness: attempt.best_fitness,
            });
            result.vulnerability_results[slot].attempts.push(attempt);
            result.touch();
            self.export(result).await;

            if success && self.config.stop_on_first_success {
                info!(target_id = %target.id, entry_class, "Sink reached, skipping remaining entry points");
                break;
            }
        }

        self.set_phase(TargetPhase::Exhausted).await;
        let finished = &result.vulnerability_results[slot];
        self.emit(CampaignEvent::TargetFinished {
            target_id: target.id.clone(),
            attempts: finished.attempts.len(),
            successes: finished.success_count(),
        });
        Ok(cancelled)
    }

    async fn record_unreachable(
        &self,
        target: &VulnerabilityTarget,
        result: &mut CampaignResult,
        entry: VulnerabilityResult,
        reason: &str,
    ) {
        self.set_phase(TargetPhase::SkippedUnreachable).await;
        result.vulnerability_results.push(entry);
        result.touch();
        self.export(result).await;
        self.emit(CampaignEvent::TargetUnreachable {
            target_id: target.id.clone(),
            reason: reason.to_string(),
        });
    }

    /// Export the current result; on failure the JSON goes to stdout instead.
    async fn export(&self, result: &CampaignResult) {
        if let Err(e) = self.sink.export(result).await {
            warn!(location = %self.sink.location(), error = %e, "Could not export results, printing them to stdout");
            self.emit(CampaignEvent::ExportFailed { error: e.to_string() });
            print_to_stdout(result);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    async fn update_status(&self, status: CampaignStatus) {
        self.state.write().await.status = status;
    }

    async fn set_phase(&self, phase: TargetPhase) {
        debug!(%phase, "Target phase");
        self.state.write().await.target_phase = Some(phase);
    }
}

/// Run one campaign with default wiring: no events, no external cancellation.
pub async fn run_campaign(
    config: CampaignConfig,
    targets: &[VulnerabilityTarget],
    classes: &[String],
    classpath: &str,
    engine: Arc<dyn SearchEngine>,
    sink: Arc<dyn ResultSink>,
) -> Result<CampaignResult, ReachError> {
    CampaignOrchestrator::new(config, engine, sink)
        .run(targets, classes, classpath)
        .await
}
