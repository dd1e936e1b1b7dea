use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationSignal {
    /// Interactive interrupt (Ctrl+C).
    Interrupt,
    /// Termination request from a process manager.
    Terminate,
}

impl TerminationSignal {
    pub fn name(&self) -> &'static str {
        match self {
            TerminationSignal::Interrupt => "SIGINT",
            TerminationSignal::Terminate => "SIGTERM",
        }
    }
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    Signal(TerminationSignal),
    Fault(String),
}

impl ShutdownReason {
    pub fn is_user_requested(&self) -> bool {
        matches!(self, ShutdownReason::Signal(_))
    }

    /// Final status line printed to stdout before the process exits.
    pub fn acknowledgment(&self) -> String {
        match self {
            ShutdownReason::Signal(_) => "\n✅ Shutdown requested by user".to_string(),
            ShutdownReason::Fault(message) => format!("❌ Unexpected error: {}", message),
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Signal(signal) => write!(f, "received {}", signal),
            ShutdownReason::Fault(message) => write!(f, "fault: {}", message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShutdownReport {
    pub reason: ShutdownReason,
    pub ticks: u64,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
}

impl ShutdownReport {
    pub fn uptime(&self) -> chrono::Duration {
        self.stopped_at - self.started_at
    }
}

/// Addresses announced at startup. Nothing listens on them yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub dashboard_url: String,
    pub api_url: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            dashboard_url: "http://localhost:3000".to_string(),
            api_url: "http://localhost:8000".to_string(),
        }
    }
}
