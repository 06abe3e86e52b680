pub mod audit;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod project;
pub mod ranking;
pub mod reporting;
