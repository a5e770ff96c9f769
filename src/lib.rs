pub mod commands;
pub mod config;
pub mod error;
pub mod providers;
pub mod router;
pub mod server;

pub use config::Config;
pub use error::{Result, SahayakError};
