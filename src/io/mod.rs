pub mod config_io;
pub mod daily_io;
pub mod journal;
pub mod lock;
pub mod recovery;
