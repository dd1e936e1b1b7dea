use crate::core::workspace::DEFAULT_DIRECTORIES;
use crate::domain::model::ServiceEndpoints;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AgentError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MAX_TICK_INTERVAL_MS: u64 = 60_000;

/// Agent configuration file. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub agent: AgentSection,
    pub workspace: WorkspaceConfig,
    pub supervisor: SupervisorConfig,
    pub services: ServicesConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    pub name: String,
    pub mode: String,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            name: "eth-trading-agent".to_string(),
            mode: "development".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub root: PathBuf,
    pub directories: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            directories: DEFAULT_DIRECTORIES.iter().map(|d| d.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    pub tick_interval_ms: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub dashboard_url: String,
    pub api_url: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        let endpoints = ServiceEndpoints::default();
        Self {
            dashboard_url: endpoints.dashboard_url,
            api_url: endpoints.api_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub heartbeat_every_ticks: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            heartbeat_every_ticks: 60,
        }
    }
}

impl AgentConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| AgentError::ConfigError {
            message: format!("Cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AgentError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AgentError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AgentError::ConfigError {
            message: format!("Cannot render configuration: {}", e),
        })
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("agent.name", &self.agent.name)?;
        validation::validate_non_empty_string("agent.mode", &self.agent.mode)?;

        validation::validate_path("workspace.root", &self.workspace.root.to_string_lossy())?;
        if self.workspace.directories.is_empty() {
            return Err(AgentError::MissingConfigError {
                field: "workspace.directories".to_string(),
            });
        }
        for dir in &self.workspace.directories {
            validation::validate_relative_dir("workspace.directories", dir)?;
        }

        validation::validate_range(
            "supervisor.tick_interval_ms",
            self.supervisor.tick_interval_ms,
            1,
            MAX_TICK_INTERVAL_MS,
        )?;

        validation::validate_url("services.dashboard_url", &self.services.dashboard_url)?;
        validation::validate_url("services.api_url", &self.services.api_url)?;

        validation::validate_positive_number(
            "monitoring.heartbeat_every_ticks",
            self.monitoring.heartbeat_every_ticks,
            1,
        )?;

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl ConfigProvider for AgentConfig {
    fn workspace_root(&self) -> &Path {
        &self.workspace.root
    }

    fn directories(&self) -> &[String] {
        &self.workspace.directories
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.supervisor.tick_interval_ms)
    }

    fn endpoints(&self) -> ServiceEndpoints {
        ServiceEndpoints {
            dashboard_url: self.services.dashboard_url.clone(),
            api_url: self.services.api_url.clone(),
        }
    }

    fn run_mode(&self) -> &str {
        &self.agent.mode
    }
}

impl Validate for AgentConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
