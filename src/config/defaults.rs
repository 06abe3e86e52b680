//! Default values and validation bounds for campaign configuration.

pub const CLASSPATH_FILE_NAME: &str = "cp.txt";
pub const TESTS_DIR: &str = "./siege_tests";
pub const RESULTS_DIR: &str = "./siege_results";
pub const LOGS_DIR: &str = "./siege_logs";

pub const SEARCH_BUDGET_SECS: u64 = 60;
pub const POPULATION_SIZE: u32 = 100;
pub const CHROMOSOME_LENGTH: u32 = 50;
pub const BRANCH_AWARENESS: bool = true;
pub const MAX_STRING_LENGTH: u32 = 32767;
pub const PROBABILITY_ADD_CALLS_BEFORE_ENTRY_METHOD: f64 = 0.5;
pub const PROBABILITY_PRIMITIVE_REUSE: f64 = 0.95;
pub const PROBABILITY_PRIMITIVE_POOL: f64 = 0.95;
pub const PROBABILITY_OBJECT_REUSE: f64 = 0.95;
pub const PROBABILITY_DYNAMIC_POOL: f64 = 0.0;
pub const PROBABILITY_CHANGE_PARAMETER: f64 = 0.5;
pub const SEED_FROM_METHODS_IN_GOALS: bool = true;
pub const SEED_FROM_BRANCHES_IN_GOALS: bool = true;
pub const METAHEURISTIC: &str = "STEADY_STATE_GA";
pub const INITIAL_POPULATION_ALGORITHM: &str = "REACHABILITY_ENTRY_METHOD";
pub const CROSSOVER: &str = "REACHABILITY_ENTRY_METHOD";
pub const ENTRY_METHOD_MUTATION: bool = true;
pub const EXCEPTION_POINT_SAMPLING: bool = true;

/// Extra wall-clock seconds granted to the engine process past the search budget.
pub const ENGINE_GRACE_SECS: u64 = 120;

pub const SEARCH_BUDGET_MIN: u64 = 2;
pub const POPULATION_SIZE_MIN: u32 = 2;
pub const CHROMOSOME_LENGTH_MIN: u32 = 2;
pub const MAX_STRING_LENGTH_MIN: u32 = 2;
pub const MAX_STRING_LENGTH_MAX: u32 = 32767;

/// Config files larger than this are rejected before parsing.
pub const CONFIG_FILE_MAX_BYTES: u64 = 1_048_576;
