//! Shared helpers: environment access, logging setup and timestamps

pub mod env;
pub mod logging;
pub mod time;

pub use env::env_opt;
pub use time::current_timestamp;
