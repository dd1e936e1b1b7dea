use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to prepare directory {}: {source}", path.display())]
    WorkspaceError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to register {signal} handler: {source}")]
    SignalRegistrationError {
        signal: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Idle loop fault: {message}")]
    IdleFault { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Filesystem,
    Signal,
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AgentError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AgentError::ConfigError { .. }
            | AgentError::ConfigValidationError { .. }
            | AgentError::InvalidConfigValueError { .. }
            | AgentError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AgentError::IoError(_) | AgentError::WorkspaceError { .. } => {
                ErrorCategory::Filesystem
            }
            AgentError::SignalRegistrationError { .. } => ErrorCategory::Signal,
            AgentError::IdleFault { .. } => ErrorCategory::Runtime,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AgentError::IdleFault { .. } => ErrorSeverity::Medium,
            AgentError::ConfigError { .. }
            | AgentError::ConfigValidationError { .. }
            | AgentError::InvalidConfigValueError { .. }
            | AgentError::MissingConfigError { .. } => ErrorSeverity::High,
            AgentError::IoError(_)
            | AgentError::WorkspaceError { .. }
            | AgentError::SignalRegistrationError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AgentError::WorkspaceError { path, .. } => format!(
                "Check that {} is writable and not occupied by a regular file",
                path.display()
            ),
            AgentError::SignalRegistrationError { .. } => {
                "Make sure the process is not running inside a restricted sandbox".to_string()
            }
            AgentError::ConfigError { .. } | AgentError::ConfigValidationError { .. } => {
                "Check that the config file exists and is valid TOML".to_string()
            }
            AgentError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the config file or on the command line", field)
            }
            AgentError::MissingConfigError { field } => {
                format!("Add '{}' to the config file", field)
            }
            AgentError::IoError(_) => "Check file permissions and free disk space".to_string(),
            AgentError::IdleFault { .. } => {
                "Inspect the logs above the fault and restart the agent".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Filesystem => format!("Could not set up the workspace: {}", self),
            ErrorCategory::Signal => format!("Could not install shutdown handlers: {}", self),
            ErrorCategory::Runtime => format!("The agent stopped unexpectedly: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
