pub mod archive;
pub mod migrate;
pub mod task_ops;
