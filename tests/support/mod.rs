#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use sinkreach::engine::{EngineOptions, EngineRunReport, Individual, SearchEngine, StoppingCondition};
use sinkreach::errors::ReachError;
use sinkreach::models::{CampaignResult, StaticPath, VulnerabilityTarget};
use sinkreach::reporting::ResultSink;

/// In-memory engine scripted per sink and per entry class.
#[derive(Default)]
pub struct FakeEngine {
    pub paths: HashMap<String, Vec<StaticPath>>,
    pub reports: HashMap<String, EngineRunReport>,
    pub failing_entries: HashSet<String>,
    pub failing_primes: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
    pub attempt_options: Mutex<Vec<EngineOptions>>,
}

impl FakeEngine {
    pub fn with_paths(mut self, sink_class: &str, paths: Vec<StaticPath>) -> Self {
        self.paths.insert(sink_class.to_string(), paths);
        self
    }

    pub fn with_report(mut self, entry_class: &str, report: EngineRunReport) -> Self {
        self.reports.insert(entry_class.to_string(), report);
        self
    }

    pub fn failing_entry(mut self, entry_class: &str) -> Self {
        self.failing_entries.insert(entry_class.to_string());
        self
    }

    pub fn failing_prime(mut self, target_id: &str) -> Self {
        self.failing_primes.insert(target_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn attempted_entries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("attempt:").map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl SearchEngine for FakeEngine {
    async fn prime(&self, target: &VulnerabilityTarget, seed_class: &str, _opts: &EngineOptions) -> Result<(), ReachError> {
        self.calls.lock().unwrap().push(format!("prime:{}:{}", target.id, seed_class));
        if self.failing_primes.contains(&target.id) {
            return Err(ReachError::EngineInvocation("priming crashed".into()));
        }
        Ok(())
    }

    async fn run_attempt(&self, _target: &VulnerabilityTarget, entry_class: &str, opts: &EngineOptions) -> Result<EngineRunReport, ReachError> {
        self.calls.lock().unwrap().push(format!("attempt:{}", entry_class));
        self.attempt_options.lock().unwrap().push(opts.clone());
        if self.failing_entries.contains(entry_class) {
            return Err(ReachError::EngineInvocation(format!("engine crashed on {}", entry_class)));
        }
        Ok(self.reports.get(entry_class).cloned().unwrap_or_else(|| failing_report(opts.budget_secs)))
    }

    async fn paths_for_target(&self, sink_class: &str, _sink_method: &str) -> Vec<StaticPath> {
        self.paths.get(sink_class).cloned().unwrap_or_default()
    }

    fn engine_name(&self) -> &str {
        "fake"
    }
}

pub fn covering_report(spent_secs: u64) -> EngineRunReport {
    EngineRunReport {
        goal_count: 3,
        population: vec![Individual {
            statement_count: 4,
            fitness: [("sink".to_string(), 0.0)].into_iter().collect(),
        }],
        stopping_conditions: vec![StoppingCondition::MaxTime { spent_secs }],
        generated_test_count: 1,
        age: 5,
    }
}

pub fn failing_report(spent_secs: u64) -> EngineRunReport {
    EngineRunReport {
        goal_count: 3,
        population: vec![Individual {
            statement_count: 4,
            fitness: [("sink".to_string(), 0.4)].into_iter().collect(),
        }],
        stopping_conditions: vec![StoppingCondition::MaxTime { spent_secs }],
        generated_test_count: 1,
        age: 20,
    }
}

/// Sink that keeps a copy of every exported result.
#[derive(Default)]
pub struct RecordingSink {
    pub exports: Mutex<Vec<CampaignResult>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn exports(&self) -> Vec<CampaignResult> {
        self.exports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultSink for RecordingSink {
    async fn export(&self, result: &CampaignResult) -> Result<(), ReachError> {
        self.exports.lock().unwrap().push(result.clone());
        if self.fail {
            return Err(ReachError::Export("disk full".into()));
        }
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

pub fn classes(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn scratch_dir() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_path_buf();
    (dir, path)
}
