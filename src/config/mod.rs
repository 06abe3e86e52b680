pub mod defaults;
pub mod loader;
pub mod parser;
pub mod schema;
pub mod types;
pub mod vulnerabilities;

pub use types::*;
pub use loader::{load_configuration, LoadedConfiguration};
pub use parser::parse_config;
pub use vulnerabilities::read_vulnerabilities;
