pub mod generation_log;
pub mod utils;

pub use generation_log::{generation_log_path, prepare_generation_log};
pub use utils::atomic_write;
