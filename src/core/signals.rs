//! Termination signal listener.
//!
//! Handlers are registered up front by [`SignalListener::install`] so that a
//! signal arriving right after startup is never handled by the default
//! disposition. The spawned task only flips the [`ShutdownFlag`]; exiting the
//! process is left to the supervisor.

use crate::core::shutdown::ShutdownFlag;
use crate::domain::model::{ShutdownReason, TerminationSignal};
use crate::utils::error::{AgentError, Result};
use tokio::task::JoinHandle;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

pub struct SignalListener {
    #[cfg(unix)]
    interrupt: Signal,
    #[cfg(unix)]
    terminate: Signal,
}

impl SignalListener {
    /// Registers SIGINT and SIGTERM handlers. Must be called inside a tokio runtime.
    #[cfg(unix)]
    pub fn install() -> Result<Self> {
        let interrupt = signal(SignalKind::interrupt()).map_err(|source| {
            AgentError::SignalRegistrationError {
                signal: TerminationSignal::Interrupt.name(),
                source,
            }
        })?;
        let terminate = signal(SignalKind::terminate()).map_err(|source| {
            AgentError::SignalRegistrationError {
                signal: TerminationSignal::Terminate.name(),
                source,
            }
        })?;

        tracing::debug!("Registered SIGINT and SIGTERM handlers");
        Ok(Self {
            interrupt,
            terminate,
        })
    }

    #[cfg(not(unix))]
    pub fn install() -> Result<Self> {
        Ok(Self {})
    }

    /// Waits for the next termination signal.
    #[cfg(unix)]
    async fn recv(&mut self) -> Option<TerminationSignal> {
        tokio::select! {
            received = self.interrupt.recv() => received.map(|_| TerminationSignal::Interrupt),
            received = self.terminate.recv() => received.map(|_| TerminationSignal::Terminate),
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) -> Option<TerminationSignal> {
        tokio::signal::ctrl_c()
            .await
            .ok()
            .map(|_| TerminationSignal::Interrupt)
    }

    /// Forwards signals into `shutdown` until the returned task is aborted.
    ///
    /// Signals received after the first are logged and otherwise ignored.
    pub fn spawn(mut self, shutdown: ShutdownFlag) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(signal) = self.recv().await {
                forward_signal(&shutdown, signal);
            }
            tracing::debug!("Signal streams closed");
        })
    }
}

/// Records `signal` as a shutdown request. Returns whether it started the shutdown.
pub fn forward_signal(shutdown: &ShutdownFlag, signal: TerminationSignal) -> bool {
    if shutdown.request(ShutdownReason::Signal(signal)) {
        tracing::info!("Received signal {}, shutting down gracefully...", signal);
        true
    } else {
        tracing::warn!(
            "Received signal {} while shutdown is already in progress",
            signal
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_signal_is_a_noop() {
        let shutdown = ShutdownFlag::new();

        assert!(forward_signal(&shutdown, TerminationSignal::Terminate));
        assert!(!forward_signal(&shutdown, TerminationSignal::Terminate));
        assert!(!forward_signal(&shutdown, TerminationSignal::Interrupt));

        assert_eq!(
            shutdown.reason(),
            Some(ShutdownReason::Signal(TerminationSignal::Terminate))
        );
    }

    #[tokio::test]
    async fn test_install_inside_runtime() {
        let listener = SignalListener::install().unwrap();
        let handle = listener.spawn(ShutdownFlag::new());

        handle.abort();
        let joined = handle.await;
        assert!(joined.is_err_and(|e| e.is_cancelled()));
    }
}
