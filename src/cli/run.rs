use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::commands::RunArgs;
use crate::config::{load_configuration, RunSettings};
use crate::engine::{CommandEngine, CommandEngineConfig, SearchEngine};
use crate::errors::ReachError;
use crate::pipeline::{CampaignEvent, Launcher};
use crate::ranking::RankingPolicy;
use crate::reporting::{format_campaign_summary, CampaignProgress};

pub async fn handle_run(args: RunArgs, quiet: bool) -> Result<(), ReachError> {
    let settings = build_run_settings(&args)?;
    let loaded = load_configuration(settings).await?;

    let engine_config = match &loaded.settings.engine_command {
        Some(command) => CommandEngineConfig::from_command_line(
            command,
            &loaded.settings.engine_args,
            loaded.settings.engine_grace_secs,
        )?,
        None => CommandEngineConfig {
            args: CommandEngineConfig::default().args.into_iter()
                .chain(loaded.settings.engine_args.iter().cloned())
                .collect(),
            grace: std::time::Duration::from_secs(loaded.settings.engine_grace_secs),
            ..CommandEngineConfig::default()
        },
    };
    let engine: Arc<dyn SearchEngine> = Arc::new(CommandEngine::new(engine_config));

    let cancel_token = CancellationToken::new();
    let signal_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the running attempt");
            signal_token.cancel();
        }
    });

    let mut launcher = Launcher::new(loaded, engine).with_cancel_token(cancel_token);
    let progress_task = if quiet {
        None
    } else {
        let (tx, mut rx) = mpsc::unbounded_channel::<CampaignEvent>();
        launcher = launcher.with_event_channel(tx);
        Some(tokio::spawn(async move {
            let mut progress = CampaignProgress::new();
            while let Some(event) = rx.recv().await {
                progress.handle_event(&event);
            }
            progress.finish();
        }))
    };

    let report = launcher.run().await;
    drop(launcher);
    if let Some(task) = progress_task {
        let _ = task.await;
    }
    let report = report?;

    if !quiet {
        for outcome in &report.completed {
            println!("{}", format_campaign_summary(&outcome.result));
        }
    }
    info!(
        completed = report.completed.len(),
        failed = report.failed.len(),
        cancelled = report.cancelled,
        "Run finished"
    );

    if report.has_failures() {
        let projects: Vec<&str> = report.failed.iter().map(|f| f.project.as_str()).collect();
        if report.failed.iter().all(|f| f.is_classpath_failure()) {
            return Err(ReachError::ClasspathResolution(format!(
                "Could not resolve the classpath of: {}",
                projects.join(", ")
            )));
        }
        return Err(ReachError::Io(std::io::Error::other(format!(
            "Projects failed: {}",
            projects.join(", ")
        ))));
    }
    Ok(())
}

/// Translate command-line arguments into run-wide settings.
pub fn build_run_settings(args: &RunArgs) -> Result<RunSettings, ReachError> {
    let mut settings = RunSettings {
        config_file: args.config.clone(),
        project: args.project.clone(),
        vulnerabilities: args.vulnerabilities.clone(),
        keep_empty_tests: args.keep_empty_tests,
        stop_on_first_success: args.stop_on_first_success,
        engine_command: args.engine_command.clone(),
        engine_args: args.engine_args.clone(),
        ..RunSettings::default()
    };
    if let Some(name) = &args.classpath_file_name { settings.classpath_file_name = name.clone(); }
    if let Some(budget) = args.budget { settings.budget_secs = budget; }
    if let Some(size) = args.population_size { settings.population_size = size; }
    if let Some(dir) = &args.tests_dir { settings.tests_dir = dir.clone(); }
    if let Some(dir) = &args.out_dir { settings.results_dir = dir.clone(); }
    if let Some(dir) = &args.log_dir { settings.logs_dir = dir.clone(); }
    if let Some(ranking) = &args.ranking {
        settings.ranking = ranking.parse::<RankingPolicy>()?;
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_without_flags() {
        let settings = build_run_settings(&RunArgs::default()).unwrap();
        assert_eq!(settings.budget_secs, 60);
        assert_eq!(settings.population_size, 100);
        assert_eq!(settings.classpath_file_name, "cp.txt");
        assert_eq!(settings.results_dir, PathBuf::from("./siege_results"));
        assert_eq!(settings.ranking, RankingPolicy::TargetDistance);
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = RunArgs {
            budget: Some(30),
            out_dir: Some(PathBuf::from("out")),
            ranking: Some("root-proximity".to_string()),
            stop_on_first_success: true,
            ..Default::default()
        };
        let settings = build_run_settings(&args).unwrap();
        assert_eq!(settings.budget_secs, 30);
        assert_eq!(settings.results_dir, PathBuf::from("out"));
        assert_eq!(settings.ranking, RankingPolicy::RootProximity);
        assert!(settings.stop_on_first_success);
    }

    #[test]
    fn test_unknown_ranking_is_config_error() {
        let args = RunArgs { ranking: Some("random".to_string()), ..Default::default() };
        assert!(matches!(build_run_settings(&args), Err(ReachError::Config(_))));
    }
}
