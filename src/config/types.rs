use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::VulnerabilityTarget;
use crate::ranking::RankingPolicy;

/// Top-level YAML configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    pub output: Option<OutputConfig>,
    pub engine: Option<EngineConfig>,
}

/// One `projects:` entry. Missing values fall back to the command line.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProjectEntry {
    pub path: Option<String>,
    pub vulnerabilities: Option<String>,
    pub classpath_file_name: Option<String>,
    pub search_budget: Option<u64>,
    pub population_size: Option<u32>,
    pub ranking: Option<RankingPolicy>,
    pub stop_on_first_success: Option<bool>,
    #[serde(flatten)]
    pub search: SearchOverrides,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SearchOverrides {
    pub chromosome_length: Option<u32>,
    pub branch_awareness: Option<bool>,
    pub max_string_length: Option<u32>,
    pub probability_add_calls_before_entry_method: Option<f64>,
    pub probability_primitive_reuse: Option<f64>,
    pub probability_primitive_pool: Option<f64>,
    pub probability_object_reuse: Option<f64>,
    pub probability_dynamic_pool: Option<f64>,
    pub probability_change_parameter: Option<f64>,
    pub seed_from_methods_in_goals: Option<bool>,
    pub seed_from_branches_in_goals: Option<bool>,
    pub metaheuristic: Option<String>,
    pub initial_population_algorithm: Option<String>,
    pub crossover: Option<String>,
    pub entry_method_mutation: Option<bool>,
    pub exception_point_sampling: Option<bool>,
    pub verbose_log: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OutputConfig {
    pub tests_dir: Option<String>,
    pub results_dir: Option<String>,
    pub logs_dir: Option<String>,
    pub keep_empty_tests: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct EngineConfig {
    pub command: Option<String>,
    pub args: Option<Vec<String>>,
    pub grace_secs: Option<u64>,
}

/// Search-engine tuning forwarded verbatim to every attempt.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchParameters {
    pub chromosome_length: u32,
    pub branch_awareness: bool,
    pub max_string_length: u32,
    pub probability_add_calls_before_entry_method: f64,
    pub probability_primitive_reuse: f64,
    pub probability_primitive_pool: f64,
    pub probability_object_reuse: f64,
    pub probability_dynamic_pool: f64,
    pub probability_change_parameter: f64,
    pub seed_from_methods_in_goals: bool,
    pub seed_from_branches_in_goals: bool,
    pub metaheuristic: String,
    pub initial_population_algorithm: String,
    pub crossover: String,
    pub entry_method_mutation: bool,
    pub exception_point_sampling: bool,
    /// Ask the engine for a per-generation log with fitness details.
    pub verbose_log: bool,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            chromosome_length: defaults::CHROMOSOME_LENGTH,
            branch_awareness: defaults::BRANCH_AWARENESS,
            max_string_length: defaults::MAX_STRING_LENGTH,
            probability_add_calls_before_entry_method: defaults::PROBABILITY_ADD_CALLS_BEFORE_ENTRY_METHOD,
            probability_primitive_reuse: defaults::PROBABILITY_PRIMITIVE_REUSE,
            probability_primitive_pool: defaults::PROBABILITY_PRIMITIVE_POOL,
            probability_object_reuse: defaults::PROBABILITY_OBJECT_REUSE,
            probability_dynamic_pool: defaults::PROBABILITY_DYNAMIC_POOL,
            probability_change_parameter: defaults::PROBABILITY_CHANGE_PARAMETER,
            seed_from_methods_in_goals: defaults::SEED_FROM_METHODS_IN_GOALS,
            seed_from_branches_in_goals: defaults::SEED_FROM_BRANCHES_IN_GOALS,
            metaheuristic: defaults::METAHEURISTIC.to_string(),
            initial_population_algorithm: defaults::INITIAL_POPULATION_ALGORITHM.to_string(),
            crossover: defaults::CROSSOVER.to_string(),
            entry_method_mutation: defaults::ENTRY_METHOD_MUTATION,
            exception_point_sampling: defaults::EXCEPTION_POINT_SAMPLING,
            verbose_log: false,
        }
    }
}

impl SearchParameters {
    /// Overlay the values present in `overrides`.
    pub fn with_overrides(mut self, overrides: &SearchOverrides) -> Self {
        if let Some(v) = overrides.chromosome_length { self.chromosome_length = v; }
        if let Some(v) = overrides.branch_awareness { self.branch_awareness = v; }
        if let Some(v) = overrides.max_string_length { self.max_string_length = v; }
        if let Some(v) = overrides.probability_add_calls_before_entry_method {
            self.probability_add_calls_before_entry_method = v;
        }
        if let Some(v) = overrides.probability_primitive_reuse { self.probability_primitive_reuse = v; }
        if let Some(v) = overrides.probability_primitive_pool { self.probability_primitive_pool = v; }
        if let Some(v) = overrides.probability_object_reuse { self.probability_object_reuse = v; }
        if let Some(v) = overrides.probability_dynamic_pool { self.probability_dynamic_pool = v; }
        if let Some(v) = overrides.probability_change_parameter { self.probability_change_parameter = v; }
        if let Some(v) = overrides.seed_from_methods_in_goals { self.seed_from_methods_in_goals = v; }
        if let Some(v) = overrides.seed_from_branches_in_goals { self.seed_from_branches_in_goals = v; }
        if let Some(v) = &overrides.metaheuristic { self.metaheuristic = v.clone(); }
        if let Some(v) = &overrides.initial_population_algorithm { self.initial_population_algorithm = v.clone(); }
        if let Some(v) = &overrides.crossover { self.crossover = v.clone(); }
        if let Some(v) = overrides.entry_method_mutation { self.entry_method_mutation = v; }
        if let Some(v) = overrides.exception_point_sampling { self.exception_point_sampling = v; }
        if let Some(v) = overrides.verbose_log { self.verbose_log = v; }
        self
    }
}

/// Run-wide settings taken from the command line, acting as defaults for
/// every project entry of a configuration file.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub config_file: Option<PathBuf>,
    pub project: Option<PathBuf>,
    pub vulnerabilities: Option<PathBuf>,
    pub classpath_file_name: String,
    pub budget_secs: u64,
    pub population_size: u32,
    pub tests_dir: PathBuf,
    pub results_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub keep_empty_tests: bool,
    pub ranking: RankingPolicy,
    pub stop_on_first_success: bool,
    pub engine_command: Option<String>,
    pub engine_args: Vec<String>,
    pub engine_grace_secs: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            config_file: None,
            project: None,
            vulnerabilities: None,
            classpath_file_name: defaults::CLASSPATH_FILE_NAME.to_string(),
            budget_secs: defaults::SEARCH_BUDGET_SECS,
            population_size: defaults::POPULATION_SIZE,
            tests_dir: PathBuf::from(defaults::TESTS_DIR),
            results_dir: PathBuf::from(defaults::RESULTS_DIR),
            logs_dir: PathBuf::from(defaults::LOGS_DIR),
            keep_empty_tests: false,
            ranking: RankingPolicy::default(),
            stop_on_first_success: false,
            engine_command: None,
            engine_args: Vec::new(),
            engine_grace_secs: defaults::ENGINE_GRACE_SECS,
        }
    }
}

impl RunSettings {
    /// Apply the `output:` and `engine:` blocks of a configuration file.
    pub fn merge_file(&mut self, file: &FileConfig) {
        if let Some(output) = &file.output {
            if let Some(d) = &output.tests_dir { self.tests_dir = PathBuf::from(d); }
            if let Some(d) = &output.results_dir { self.results_dir = PathBuf::from(d); }
            if let Some(d) = &output.logs_dir { self.logs_dir = PathBuf::from(d); }
            if let Some(k) = output.keep_empty_tests { self.keep_empty_tests = k; }
        }
        if let Some(engine) = &file.engine {
            if let Some(c) = &engine.command { self.engine_command = Some(c.clone()); }
            if let Some(a) = &engine.args { self.engine_args = a.clone(); }
            if let Some(g) = engine.grace_secs { self.engine_grace_secs = g; }
        }
    }
}

/// A validated project ready to run a campaign on.
#[derive(Debug, Clone)]
pub struct ProjectConfiguration {
    pub project_path: PathBuf,
    pub vulnerabilities: Vec<VulnerabilityTarget>,
    pub classpath_file_name: String,
    pub budget_secs: u64,
    pub population_size: u32,
    pub ranking: RankingPolicy,
    pub stop_on_first_success: bool,
    pub search: SearchParameters,
}

impl ProjectConfiguration {
    /// Directory name of the project, used to name its output files.
    pub fn project_name(&self) -> String {
        self.project_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("project")
            .to_string()
    }
}
