pub mod types;
pub mod classification;

pub use types::ReachError;
pub use classification::ErrorClassification;
