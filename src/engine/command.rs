//! Search engine driven as an external process.
//!
//! The engine receives its settings as `-D` properties and writes two JSON
//! files back: the run report after every search, and the static call-path
//! index after priming.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use super::provider::SearchEngine;
use super::types::{EngineOptions, EngineRunReport};
use crate::config::defaults::ENGINE_GRACE_SECS;
use crate::errors::ReachError;
use crate::models::{StaticPath, VulnerabilityTarget};

/// Scratch directory, under the tests directory, for the engine's JSON output.
const SCRATCH_DIR: &str = ".sinkreach";

/// One sink in the static-path index written while priming.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticPathIndexEntry {
    pub sink_class: String,
    pub sink_method: String,
    #[serde(default)]
    pub paths: Vec<StaticPath>,
}

#[derive(Debug, Clone)]
pub struct CommandEngineConfig {
    /// Executable, e.g. `java`.
    pub program: String,
    /// Arguments placed before the generated ones, e.g. `-jar engine.jar`.
    pub args: Vec<String>,
    /// Wall-clock allowance on top of the search budget.
    pub grace: Duration,
}

impl CommandEngineConfig {
    /// Split a command line on whitespace into program and leading arguments.
    pub fn from_command_line(command: &str, extra_args: &[String], grace_secs: u64) -> Result<Self, ReachError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| ReachError::Config("Engine command is empty".into()))?;
        let mut args: Vec<String> = parts.collect();
        args.extend(extra_args.iter().cloned());
        Ok(Self {
            program,
            args,
            grace: Duration::from_secs(grace_secs),
        })
    }
}

impl Default for CommandEngineConfig {
    fn default() -> Self {
        Self {
            program: "java".to_string(),
            args: vec!["-jar".to_string(), "evosuite.jar".to_string()],
            grace: Duration::from_secs(ENGINE_GRACE_SECS),
        }
    }
}

pub struct CommandEngine {
    config: CommandEngineConfig,
    static_paths: Mutex<HashMap<(String, String), Vec<StaticPath>>>,
}

impl CommandEngine {
    pub fn new(config: CommandEngineConfig) -> Self {
        Self {
            config,
            static_paths: Mutex::new(HashMap::new()),
        }
    }

    async fn invoke(&self, args: Vec<String>, budget_secs: u64) -> Result<(), ReachError> {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args).args(&args).kill_on_drop(true);

        debug!(program = %self.config.program, arg_count = args.len(), "Invoking search engine");

        let limit = Duration::from_secs(budget_secs) + self.config.grace;
        let output = tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| ReachError::EngineInvocation(format!(
                "Engine did not finish within {}s", limit.as_secs()
            )))?
            .map_err(|e| ReachError::EngineInvocation(format!(
                "Failed to start {}: {}", self.config.program, e
            )))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut tail: Vec<&str> = stderr.lines().rev().take(20).collect();
            tail.reverse();
            let tail = tail.join("\n");
            error!(exit_code = output.status.code(), stderr = %tail, "Search engine failed");
            return Err(ReachError::EngineInvocation(format!(
                "Engine exited with status {}", output.status
            )));
        }
        Ok(())
    }

    async fn load_static_paths(&self, index_file: &Path) -> Result<usize, ReachError> {
        let content = tokio::fs::read_to_string(index_file)
            .await
            .map_err(|e| ReachError::EngineInvocation(format!(
                "Static path index not written to {}: {}", index_file.display(), e
            )))?;
        let entries: Vec<StaticPathIndexEntry> = serde_json::from_str(&content)
            .map_err(|e| ReachError::EngineInvocation(format!("Malformed static path index: {}", e)))?;

        let mut index = self.static_paths.lock().await;
        index.clear();
        let count = entries.len();
        for entry in entries {
            index.insert((entry.sink_class, entry.sink_method), entry.paths);
        }
        Ok(count)
    }
}

#[async_trait]
impl SearchEngine for CommandEngine {
    async fn prime(
        &self,
        target: &VulnerabilityTarget,
        seed_class: &str,
        opts: &EngineOptions,
    ) -> Result<(), ReachError> {
        let index_file = scratch_file(&opts.tests_dir, "static-paths")?;
        let mut args = engine_arguments(target, seed_class, opts);
        args.push(format!("-Dreachability_paths_file={}", index_file.display()));

        let result = match self.invoke(args, opts.budget_secs).await {
            Ok(()) => self.load_static_paths(&index_file).await.map(|sinks| {
                debug!(target_id = %target.id, sinks, "Loaded static path index");
            }),
            Err(e) => Err(e),
        };
        remove_scratch(&index_file).await;
        result
    }

    async fn run_attempt(
        &self,
        target: &VulnerabilityTarget,
        entry_class: &str,
        opts: &EngineOptions,
    ) -> Result<EngineRunReport, ReachError> {
        let report_file = scratch_file(&opts.tests_dir, "report")?;
        let mut args = engine_arguments(target, entry_class, opts);
        args.push(format!("-Dreachability_report_file={}", report_file.display()));

        let result = match self.invoke(args, opts.budget_secs).await {
            Ok(()) => read_report(&report_file).await,
            Err(e) => Err(e),
        };
        remove_scratch(&report_file).await;
        result
    }

    async fn paths_for_target(&self, sink_class: &str, sink_method: &str) -> Vec<StaticPath> {
        let index = self.static_paths.lock().await;
        index
            .get(&(sink_class.to_string(), sink_method.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn engine_name(&self) -> &str {
        &self.config.program
    }
}

/// Arguments for one engine run from `entry_class` towards the target's sink.
pub fn engine_arguments(target: &VulnerabilityTarget, entry_class: &str, opts: &EngineOptions) -> Vec<String> {
    let search = &opts.search;
    let mut args: Vec<String> = [
        "-criterion", "REACHABILITY",
        "-generateTests",
        "-Dassertions=false",
        "-Dminimize=true",
        "-Dserialize_ga=true",
        "-Dserialize_result=true",
        "-Dcoverage=false",
        "-Dprint_covered_goals=true",
        "-Dprint_missed_goals=true",
        "-Dinstrument_parent=false",
        "-Dinstrument_context=true",
        "-Dinstrument_method_calls=true",
        "-Dinstrument_libraries=true",
        "-Dinstrument_target_callers=false",
        "-Dchop_max_length=false",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    args.push(format!("-Dtest_dir={}", opts.tests_dir.display()));
    args.push("-projectCP".to_string());
    args.push(opts.classpath.clone());

    args.extend([
        format!("-Dchromosome_length={}", search.chromosome_length),
        format!("-Dreachability_branch_awareness={}", search.branch_awareness),
        format!("-Dtest_factory={}", search.initial_population_algorithm),
        format!("-Dp_add_calls_before_entry_method={}", search.probability_add_calls_before_entry_method),
        format!("-Dprimitive_reuse_probability={}", search.probability_primitive_reuse),
        format!("-Dobject_reuse_probability={}", search.probability_object_reuse),
        format!("-Dstring_length={}", search.max_string_length),
        format!("-Dmax_string={}", search.max_string_length),
        format!("-Dprimitive_pool={}", search.probability_primitive_pool),
        format!("-Ddynamic_pool={}", search.probability_dynamic_pool),
        format!("-Dreachability_seed_from_methods_in_goals={}", search.seed_from_methods_in_goals),
        format!("-Dreachability_seed_from_branches_in_goals={}", search.seed_from_branches_in_goals),
        format!("-Dalgorithm={}", search.metaheuristic),
        format!("-Dcrossover_function={}", search.crossover),
        format!("-Dreachability_entry_method_mutation={}", search.entry_method_mutation),
        format!("-Dexception_point_sampling={}", search.exception_point_sampling),
        format!("-Dp_change_parameter={}", search.probability_change_parameter),
    ]);

    args.push(format!("-Dsearch_budget={}", opts.budget_secs));
    args.push(format!("-Dpopulation={}", opts.population_size));
    args.push(format!("-Dgeneration_log_verbose={}", search.verbose_log));
    if !opts.junit_suffix.is_empty() {
        args.push(format!("-Djunit_suffix={}", opts.junit_suffix));
    }
    args.push(format!("-Dreachability_target_class={}", target.sink_class));
    args.push(format!("-Dreachability_target_method={}", target.sink_method));
    if let Some(log) = &opts.generation_log_file {
        args.push(format!("-Dgeneration_log_file={}", log.display()));
    }
    args.push("-class".to_string());
    args.push(entry_class.to_string());
    args
}

fn scratch_file(tests_dir: &Path, kind: &str) -> Result<PathBuf, ReachError> {
    let dir = tests_dir.join(SCRATCH_DIR);
    std::fs::create_dir_all(&dir)
        .map_err(|e| ReachError::EngineInvocation(format!(
            "Cannot create scratch directory {}: {}", dir.display(), e
        )))?;
    Ok(dir.join(format!("{}-{}.json", kind, uuid::Uuid::new_v4())))
}

async fn remove_scratch(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove engine scratch file");
        }
    }
}

async fn read_report(path: &Path) -> Result<EngineRunReport, ReachError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ReachError::EngineInvocation(format!(
            "Engine report not written to {}: {}", path.display(), e
        )))?;
    serde_json::from_str(&content)
        .map_err(|e| ReachError::EngineInvocation(format!("Malformed engine report: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchParameters;

    fn options() -> EngineOptions {
        let target = VulnerabilityTarget::new("CVE-1", "org.lib.A", "run");
        EngineOptions::new("app.jar:lib.jar", "/tmp/tests", SearchParameters::default())
            .for_attempt(&target, 45, 20, Some(PathBuf::from("/tmp/logs/Main.log")))
    }

    #[test]
    fn test_arguments_name_target_and_entry() {
        let target = VulnerabilityTarget::new("CVE-1", "org.lib.A", "run");
        let args = engine_arguments(&target, "com.app.Main", &options());

        assert_eq!(&args[..2], &["-criterion".to_string(), "REACHABILITY".to_string()]);
        assert!(args.contains(&"-Dreachability_target_class=org.lib.A".to_string()));
        assert!(args.contains(&"-Dreachability_target_method=run".to_string()));
        assert!(args.contains(&"-Dsearch_budget=45".to_string()));
        assert!(args.contains(&"-Dpopulation=20".to_string()));
        assert!(args.contains(&"-Djunit_suffix=_CVE_1_SiegeTest".to_string()));
        assert!(args.contains(&"-Dgeneration_log_file=/tmp/logs/Main.log".to_string()));
        assert!(args.contains(&"-Dalgorithm=STEADY_STATE_GA".to_string()));

        let search = SearchParameters::default();
        for expected in [
            format!("-Dchromosome_length={}", search.chromosome_length),
            format!("-Dreachability_branch_awareness={}", search.branch_awareness),
            format!("-Dtest_factory={}", search.initial_population_algorithm),
            format!("-Dp_add_calls_before_entry_method={}", search.probability_add_calls_before_entry_method),
            format!("-Dprimitive_reuse_probability={}", search.probability_primitive_reuse),
            format!("-Dobject_reuse_probability={}", search.probability_object_reuse),
            format!("-Dstring_length={}", search.max_string_length),
            format!("-Dmax_string={}", search.max_string_length),
            format!("-Dprimitive_pool={}", search.probability_primitive_pool),
            format!("-Ddynamic_pool={}", search.probability_dynamic_pool),
            format!("-Dreachability_seed_from_methods_in_goals={}", search.seed_from_methods_in_goals),
            format!("-Dreachability_seed_from_branches_in_goals={}", search.seed_from_branches_in_goals),
            format!("-Dcrossover_function={}", search.crossover),
            format!("-Dreachability_entry_method_mutation={}", search.entry_method_mutation),
            format!("-Dexception_point_sampling={}", search.exception_point_sampling),
            format!("-Dp_change_parameter={}", search.probability_change_parameter),
            "-Dgeneration_log_verbose=false".to_string(),
        ] {
            assert!(args.contains(&expected), "missing {expected}");
        }
        for renamed in ["-Dbranch_awareness", "-Dreachability_initial_population", "-Dseed_from_"] {
            assert!(!args.iter().any(|a| a.starts_with(renamed)), "unexpected {renamed}");
        }
        assert_eq!(&args[args.len() - 2..], &["-class".to_string(), "com.app.Main".to_string()]);

        let cp = args.iter().position(|a| a == "-projectCP").unwrap();
        assert_eq!(args[cp + 1], "app.jar:lib.jar");
    }

    #[test]
    fn test_command_line_split() {
        let config = CommandEngineConfig::from_command_line(
            "java -Xmx4g -jar evosuite.jar",
            &["-Dshow_progress=false".to_string()],
            30,
        ).unwrap();
        assert_eq!(config.program, "java");
        assert_eq!(config.args, vec!["-Xmx4g", "-jar", "evosuite.jar", "-Dshow_progress=false"]);
        assert_eq!(config.grace, Duration::from_secs(30));

        assert!(CommandEngineConfig::from_command_line("   ", &[], 30).is_err());
    }

    #[tokio::test]
    async fn test_static_path_index_loading() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.json");
        std::fs::write(&file, r#"[
            {"sink_class": "org.lib.A", "sink_method": "run",
             "paths": [[{"class_name": "com.app.Main"}, {"class_name": "org.lib.A", "method_name": "run"}]]}
        ]"#).unwrap();

        let engine = CommandEngine::new(CommandEngineConfig::default());
        assert_eq!(engine.load_static_paths(&file).await.unwrap(), 1);

        let paths = engine.paths_for_target("org.lib.A", "run").await;
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].called_classes(), vec!["com.app.Main", "org.lib.A"]);
        assert!(engine.paths_for_target("org.lib.A", "other").await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_report_is_engine_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_report(&dir.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, ReachError::EngineInvocation(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_process_is_engine_error() {
        let engine = CommandEngine::new(CommandEngineConfig {
            program: "false".to_string(),
            args: vec![],
            grace: Duration::from_secs(5),
        });
        let err = engine.invoke(vec![], 1).await.unwrap_err();
        assert!(matches!(err, ReachError::EngineInvocation(_)));
    }
}
