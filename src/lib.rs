pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::AgentConfig;
pub use core::{
    heartbeat::{Heartbeat, TokioSleeper},
    shutdown::ShutdownFlag,
    supervisor::Supervisor,
};
pub use utils::error::{AgentError, Result};
