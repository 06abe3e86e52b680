pub mod builder;

pub use builder::{ProjectBuilder, ProjectClasspath};
