use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::models::AttemptOutcome;
use crate::pipeline::CampaignEvent;

/// Renders campaign events as indicatif progress bars.
pub struct CampaignProgress {
    multi: MultiProgress,
    target_bar: Option<ProgressBar>,
    attempt_bar: Option<ProgressBar>,
    status_bar: ProgressBar,
    attempts: usize,
    successes: usize,
    start_time: std::time::Instant,
}

impl CampaignProgress {
    pub fn new() -> Self {
        let multi = MultiProgress::new();
        let status_bar = multi.add(ProgressBar::new_spinner());
        status_bar.set_style(spinner_style("  {spinner:.cyan} {msg}"));
        status_bar.set_message("Preparing campaign...");
        status_bar.enable_steady_tick(std::time::Duration::from_millis(120));

        Self {
            multi,
            target_bar: None,
            attempt_bar: None,
            status_bar,
            attempts: 0,
            successes: 0,
            start_time: std::time::Instant::now(),
        }
    }

    pub fn handle_event(&mut self, event: &CampaignEvent) {
        match event {
            CampaignEvent::CampaignStarted { project, target_count } => {
                if let Some(bar) = self.target_bar.take() {
                    bar.finish_and_clear();
                }
                let bar = self.multi.insert_before(&self.status_bar, ProgressBar::new(*target_count as u64));
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("  {bar:30.cyan/dark_gray} {pos}/{len} vulnerabilities | {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("█▓░"),
                );
                bar.set_message(project.clone());
                self.target_bar = Some(bar);
                self.update_status();
            }
            CampaignEvent::TargetStarted { target_id, sink } => {
                if let Some(bar) = &self.target_bar {
                    bar.set_message(format!("{} ({})", target_id, sink));
                }
            }
            CampaignEvent::TargetUnreachable { target_id, reason } => {
                self.println(&format!(
                    "  {} {} unreachable: {}",
                    style("∅").dim(), style(target_id).bold(), style(reason).dim()
                ));
                self.advance_target();
            }
            CampaignEvent::AttemptStarted { entry_class, index, total, .. } => {
                self.clear_attempt();
                let bar = self.multi.insert_before(&self.status_bar, ProgressBar::new_spinner());
                bar.set_style(spinner_style("    {spinner:.yellow} {msg}"));
                bar.set_message(format!("[{}/{}] {}", index + 1, total, entry_class));
                bar.enable_steady_tick(std::time::Duration::from_millis(100));
                self.attempt_bar = Some(bar);
            }
            CampaignEvent::AttemptFinished { target_id, entry_class, outcome, best_fitness } => {
                self.clear_attempt();
                self.attempts += 1;
                if *outcome == AttemptOutcome::Success {
                    self.successes += 1;
                    self.println(&format!(
                        "  {} {} reached from {}",
                        style("✓").green(), style(target_id).green().bold(), entry_class
                    ));
                } else {
                    let fitness = best_fitness.map(|f| format!("{:.3}", f)).unwrap_or_else(|| "n/a".into());
                    self.println(&format!(
                        "  {} {} from {} (best fitness {})",
                        style("✗").red(), target_id, entry_class, style(fitness).dim()
                    ));
                }
                self.update_status();
            }
            CampaignEvent::AttemptErrored { entry_class, error, .. } => {
                self.clear_attempt();
                self.println(&format!(
                    "  {} {} skipped: {}",
                    style("⚠").yellow(), entry_class, style(error).dim()
                ));
            }
            CampaignEvent::TargetFinished { .. } => self.advance_target(),
            CampaignEvent::ExportFailed { error } => {
                self.println(&format!("  {} Export failed: {}", style("⚠").yellow().bold(), error));
            }
            CampaignEvent::CampaignCompleted { attempts, successes, reached_targets, unreachable_targets } => {
                self.clear_attempt();
                if let Some(bar) = self.target_bar.take() {
                    bar.finish_with_message("All vulnerabilities analyzed");
                }
                self.status_bar.set_message(format!(
                    "Campaign complete: {} attempts | {} successes | {} reached | {} unreachable | {}",
                    attempts, successes, reached_targets, unreachable_targets,
                    format_elapsed(self.start_time.elapsed().as_millis() as u64),
                ));
            }
            CampaignEvent::CampaignCancelled { attempts } => {
                self.clear_attempt();
                if let Some(bar) = self.target_bar.take() {
                    bar.abandon_with_message("Cancelled");
                }
                self.status_bar.set_message(format!("Campaign cancelled after {} attempts", attempts));
            }
            CampaignEvent::CandidatesRanked { .. } => {}
        }
    }

    /// Stop all bars; call once the event stream is closed.
    pub fn finish(&mut self) {
        self.clear_attempt();
        if let Some(bar) = self.target_bar.take() {
            bar.finish_and_clear();
        }
        self.status_bar.finish();
    }

    pub fn println(&self, msg: &str) {
        let _ = self.multi.println(msg);
    }

    fn advance_target(&self) {
        if let Some(bar) = &self.target_bar {
            bar.inc(1);
        }
    }

    fn clear_attempt(&mut self) {
        if let Some(bar) = self.attempt_bar.take() {
            bar.finish_and_clear();
        }
    }

    fn update_status(&self) {
        self.status_bar.set_message(format!(
            "{} | {} attempts | {} successes",
            format_elapsed(self.start_time.elapsed().as_millis() as u64),
            self.attempts,
            self.successes,
        ));
    }
}

impl Default for CampaignProgress {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn format_elapsed(ms: u64) -> String {
    let secs = ms / 1000;
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    if mins > 0 {
        format!("{}m{}s", mins, remaining_secs)
    } else {
        format!("{}s", secs)
    }
}
