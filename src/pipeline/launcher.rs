use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::events::CampaignEvent;
use super::orchestrator::CampaignOrchestrator;
use super::state::CampaignConfig;
use crate::config::{LoadedConfiguration, ProjectConfiguration};
use crate::engine::SearchEngine;
use crate::errors::ReachError;
use crate::models::CampaignResult;
use crate::project::ProjectBuilder;
use crate::reporting::exporter::JsonFileExporter;

const DIR_TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// Output locations shared by every project of one run.
#[derive(Debug, Clone)]
pub struct RunDirectories {
    pub tests_dir: PathBuf,
    pub results_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl RunDirectories {
    /// Stamp `<dir>/<yyyy_MM_dd_HH_mm_ss>` under each configured directory.
    pub fn stamped(tests_dir: &Path, results_dir: &Path, logs_dir: &Path, started: DateTime<Local>) -> Self {
        let stamp = started.format(DIR_TIMESTAMP_FORMAT).to_string();
        Self {
            tests_dir: tests_dir.join(&stamp),
            results_dir: results_dir.join(&stamp),
            logs_dir: logs_dir.join(&stamp),
        }
    }

    pub fn project_tests_dir(&self, project: &str) -> PathBuf {
        self.tests_dir.join(project)
    }

    pub fn project_logs_dir(&self, project: &str) -> PathBuf {
        self.logs_dir.join(project)
    }
}

#[derive(Debug, Clone)]
pub struct ProjectOutcome {
    pub project: String,
    pub result_file: PathBuf,
    pub result: CampaignResult,
}

#[derive(Debug, Clone)]
pub struct ProjectFailure {
    pub project: String,
    pub error_type: &'static str,
    pub error: String,
}

impl ProjectFailure {
    pub fn is_classpath_failure(&self) -> bool {
        self.error_type == "ClasspathResolutionError"
    }
}

/// What happened to every project of a run.
#[derive(Debug, Clone, Default)]
pub struct LaunchReport {
    pub completed: Vec<ProjectOutcome>,
    pub failed: Vec<ProjectFailure>,
    pub cancelled: bool,
}

impl LaunchReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Runs one campaign per configured project, one project at a time.
pub struct Launcher {
    loaded: LoadedConfiguration,
    engine: Arc<dyn SearchEngine>,
    builder: ProjectBuilder,
    directories: RunDirectories,
    cancel_token: CancellationToken,
    event_tx: Option<mpsc::UnboundedSender<CampaignEvent>>,
}

impl Launcher {
    pub fn new(loaded: LoadedConfiguration, engine: Arc<dyn SearchEngine>) -> Self {
        let directories = RunDirectories::stamped(
            &loaded.settings.tests_dir,
            &loaded.settings.results_dir,
            &loaded.settings.logs_dir,
            Local::now(),
        );
        Self {
            loaded,
            engine,
            builder: ProjectBuilder::new(),
            directories,
            cancel_token: CancellationToken::new(),
            event_tx: None,
        }
    }

    pub fn with_builder(mut self, builder: ProjectBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_directories(mut self, directories: RunDirectories) -> Self {
        self.directories = directories;
        self
    }

    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    pub fn with_event_channel(mut self, tx: mpsc::UnboundedSender<CampaignEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn directories(&self) -> &RunDirectories {
        &self.directories
    }

    /// Run every project. A project that fails for any reason other than
    /// invalid configuration is reported and the next project runs.
    pub async fn run(&self) -> Result<LaunchReport, ReachError> {
        info!(
            projects = self.loaded.projects.len(),
            tests_dir = %self.directories.tests_dir.display(),
            results_dir = %self.directories.results_dir.display(),
            logs_dir = %self.directories.logs_dir.display(),
            "Starting run"
        );
        let mut report = LaunchReport::default();

        for (index, project) in self.loaded.projects.iter().enumerate() {
            if self.cancel_token.is_cancelled() {
                report.cancelled = true;
                break;
            }
            let name = project.project_name();
            info!(project = %name, index = index + 1, total = self.loaded.projects.len(), "Analyzing project");

            match self.run_project(project, &name).await {
                Ok(outcome) => {
                    info!(project = %name, results = %outcome.result_file.display(), "Project analyzed");
                    report.completed.push(outcome);
                }
                Err(e @ ReachError::Config(_)) => return Err(e),
                Err(e) => {
                    let error_type = e.classify().error_type;
                    error!(project = %name, error_type, error = %e, "Project failed, skipping to the next one");
                    report.failed.push(ProjectFailure {
                        project: name,
                        error_type,
                        error: e.to_string(),
                    });
                }
            }
        }

        if self.cancel_token.is_cancelled() {
            report.cancelled = true;
        }
        Ok(report)
    }

    async fn run_project(&self, project: &ProjectConfiguration, name: &str) -> Result<ProjectOutcome, ReachError> {
        let resolved = self.builder.resolve(&project.project_path, &project.classpath_file_name).await?;

        let tests_dir = self.directories.project_tests_dir(name);
        tokio::fs::create_dir_all(&tests_dir).await?;
        tokio::fs::create_dir_all(&self.directories.results_dir).await?;

        let exporter = JsonFileExporter::for_project(&self.directories.results_dir, name);
        let result_file = exporter.path().to_path_buf();
        let config = CampaignConfig::from_project(
            project,
            tests_dir,
            Some(self.directories.project_logs_dir(name)),
            self.loaded.settings.keep_empty_tests,
        );

        let mut orchestrator = CampaignOrchestrator::new(config, self.engine.clone(), Arc::new(exporter))
            .with_cancel_token(self.cancel_token.clone());
        if let Some(ref tx) = self.event_tx {
            orchestrator = orchestrator.with_event_channel(tx.clone());
        }

        let result = orchestrator
            .run(&project.vulnerabilities, &resolved.classes, &resolved.classpath)
            .await?;

        Ok(ProjectOutcome {
            project: name.to_string(),
            result_file,
            result,
        })
    }
}
