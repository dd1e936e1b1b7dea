use crate::config::toml_config::AgentConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "eth-agent")]
#[command(about = "Process supervisor for the ETH trading agent")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory under which logs/ and data/ are created
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Idle loop tick interval in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,

    #[arg(long)]
    pub mode: Option<String>,

    #[arg(long)]
    pub dashboard_url: Option<String>,

    #[arg(long)]
    pub api_url: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process statistics on heartbeat ticks")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Print the effective configuration and exit")]
    pub print_config: bool,
}

impl CliConfig {
    /// Loads the config file when one was given, then applies command line overrides.
    pub fn load_agent_config(&self) -> Result<AgentConfig> {
        let mut config = match &self.config {
            Some(path) => AgentConfig::from_file(path)?,
            None => AgentConfig::default(),
        };

        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut AgentConfig) {
        if let Some(root) = &self.root {
            config.workspace.root = root.clone();
        }
        if let Some(tick_ms) = self.tick_ms {
            config.supervisor.tick_interval_ms = tick_ms;
        }
        if let Some(mode) = &self.mode {
            config.agent.mode = mode.clone();
        }
        if let Some(url) = &self.dashboard_url {
            config.services.dashboard_url = url.clone();
        }
        if let Some(url) = &self.api_url {
            config.services.api_url = url.clone();
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
    }
}
