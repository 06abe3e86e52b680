pub mod target;
pub mod static_path;
pub mod attempt;
pub mod campaign;

pub use target::*;
pub use static_path::*;
pub use attempt::*;
pub use campaign::*;
