use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::SearchParameters;
use crate::models::VulnerabilityTarget;

/// What the engine reports back after one search run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EngineRunReport {
    /// Number of reachability goals the engine derived for the target.
    pub goal_count: usize,
    #[serde(default)]
    pub population: Vec<Individual>,
    #[serde(default)]
    pub stopping_conditions: Vec<StoppingCondition>,
    /// Distinct test cases retained after minimization.
    pub generated_test_count: usize,
    /// Generation index of the final population, starting at 0.
    #[serde(default)]
    pub age: u64,
}

impl EngineRunReport {
    /// Seconds consumed according to the time-based stopping condition.
    pub fn spent_budget_secs(&self) -> Option<u64> {
        self.stopping_conditions.iter().find_map(|c| match c {
            StoppingCondition::MaxTime { spent_secs } => Some(*spent_secs),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Individual {
    pub statement_count: usize,
    /// Fitness per goal; 0 means the goal is covered.
    #[serde(default)]
    pub fitness: BTreeMap<String, f64>,
}

impl Individual {
    pub fn covers_a_goal(&self) -> bool {
        self.fitness.values().any(|f| *f == 0.0)
    }

    pub fn min_fitness(&self) -> Option<f64> {
        self.fitness.values().copied().min_by(f64::total_cmp)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoppingCondition {
    MaxTime { spent_secs: u64 },
    MaxGenerations { generations: u64 },
    MaxFitnessEvaluations { evaluations: u64 },
    ZeroFitness,
}

/// Per-invocation settings handed to the engine.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub classpath: String,
    pub tests_dir: PathBuf,
    pub generation_log_file: Option<PathBuf>,
    pub budget_secs: u64,
    pub population_size: u32,
    pub junit_suffix: String,
    pub search: SearchParameters,
}

impl EngineOptions {
    pub fn new(classpath: impl Into<String>, tests_dir: impl Into<PathBuf>, search: SearchParameters) -> Self {
        Self {
            classpath: classpath.into(),
            tests_dir: tests_dir.into(),
            generation_log_file: None,
            budget_secs: crate::config::defaults::SEARCH_BUDGET_SECS,
            population_size: crate::config::defaults::POPULATION_SIZE,
            junit_suffix: String::new(),
            search,
        }
    }

    /// Options for one attempt against `target`.
    pub fn for_attempt(
        &self,
        target: &VulnerabilityTarget,
        budget_secs: u64,
        population_size: u32,
        generation_log_file: Option<PathBuf>,
    ) -> Self {
        Self {
            generation_log_file,
            budget_secs,
            population_size,
            junit_suffix: target.junit_suffix(),
            ..self.clone()
        }
    }
}
