pub mod config;
pub mod day;
pub mod task;
pub mod todo;

pub use config::*;
pub use day::DayKey;
pub use task::*;
pub use todo::TodoFile;
