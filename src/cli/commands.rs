use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sinkreach", version, about = "Search-based reachability campaigns for vulnerable dependency sinks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress bars and the summary table
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run reachability campaigns
    Run(RunArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone, Debug, Default)]
pub struct RunArgs {
    /// YAML configuration file listing the projects to analyze
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Project directory (ignored when --config is given)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Name of the classpath files written by the project's build
    #[arg(long)]
    pub classpath_file_name: Option<String>,

    /// CSV file of vulnerabilities: id, library, sink class, sink method
    #[arg(long)]
    pub vulnerabilities: Option<PathBuf>,

    /// Search budget per attempt, in seconds
    #[arg(short, long)]
    pub budget: Option<u64>,

    /// Population size of each search
    #[arg(long)]
    pub population_size: Option<u32>,

    /// Directory for generated tests
    #[arg(long)]
    pub tests_dir: Option<PathBuf>,

    /// Directory for result files
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Directory for generation logs
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Keep generated test classes that contain no test
    #[arg(long)]
    pub keep_empty_tests: bool,

    /// Entry point ranking: target-distance or root-proximity
    #[arg(long)]
    pub ranking: Option<String>,

    /// Stop attempting a vulnerability once one entry point reaches it
    #[arg(long)]
    pub stop_on_first_success: bool,

    /// Command line that starts the search engine
    #[arg(long)]
    pub engine_command: Option<String>,

    /// Extra argument passed to the search engine (repeatable)
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,
}

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    pub config: PathBuf,
}
