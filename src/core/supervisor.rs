use crate::core::banner;
use crate::core::shutdown::ShutdownFlag;
use crate::core::signals::SignalListener;
use crate::core::workspace::prepare_workspace;
use crate::domain::model::{ShutdownReason, ShutdownReport};
use crate::domain::ports::{ConfigProvider, IdleTask, Sleeper};
use crate::utils::error::Result;
use chrono::Utc;
use std::any::Any;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Owns the agent process lifecycle: workspace setup, signal handlers,
/// startup text, the idle loop and the final acknowledgment.
pub struct Supervisor<C: ConfigProvider, S: Sleeper, T: IdleTask> {
    config: C,
    sleeper: S,
    task: T,
    out: Box<dyn Write + Send>,
    shutdown: ShutdownFlag,
}

impl<C, S, T> Supervisor<C, S, T>
where
    C: ConfigProvider,
    S: Sleeper + 'static,
    T: IdleTask + 'static,
{
    pub fn new(config: C, sleeper: S, task: T) -> Self {
        Self {
            config,
            sleeper,
            task,
            out: Box::new(std::io::stdout()),
            shutdown: ShutdownFlag::new(),
        }
    }

    /// Redirects the operator-facing status lines away from stdout.
    pub fn with_output<W: Write + Send + 'static>(mut self, out: W) -> Self {
        self.out = Box::new(out);
        self
    }

    /// Shares an existing flag, so callers can cancel the run before it starts.
    pub fn with_shutdown_flag(mut self, shutdown: ShutdownFlag) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Handle for requesting shutdown from outside the signal listener.
    pub fn shutdown_flag(&self) -> ShutdownFlag {
        self.shutdown.clone()
    }

    /// Runs until a termination signal or an idle-loop fault.
    ///
    /// Errors are returned only for startup failures. Once the idle loop has
    /// started every outcome ends in a [`ShutdownReport`].
    pub async fn run(mut self) -> Result<ShutdownReport> {
        let started_at = Utc::now();

        let prepared =
            prepare_workspace(self.config.workspace_root(), self.config.directories())?;
        tracing::info!("📁 Workspace ready ({} directories)", prepared.len());

        let signal_task = SignalListener::install()?.spawn(self.shutdown.clone());

        banner::print_startup(
            &mut self.out,
            self.config.run_mode(),
            &self.config.endpoints(),
        )?;

        let tick_interval = self.config.tick_interval();
        tracing::info!("Idle loop started (tick interval {:?})", tick_interval);

        let task = Arc::new(self.task);
        let ticks = Arc::new(AtomicU64::new(0));
        let idle = tokio::spawn(idle_loop(
            self.sleeper,
            Arc::clone(&task),
            self.shutdown.clone(),
            tick_interval,
            Arc::clone(&ticks),
        ));

        if let Err(join_error) = idle.await {
            let message = if join_error.is_panic() {
                format!("idle loop panicked: {}", panic_message(join_error.into_panic()))
            } else {
                "idle loop was cancelled".to_string()
            };
            tracing::error!("❌ {}", message);
            self.shutdown.request(ShutdownReason::Fault(message));
        }

        signal_task.abort();
        task.on_stop();

        let reason = self
            .shutdown
            .reason()
            .unwrap_or_else(|| ShutdownReason::Fault("idle loop stopped on its own".to_string()));

        let acknowledged =
            writeln!(self.out, "{}", reason.acknowledgment()).and_then(|_| self.out.flush());
        if let Err(e) = acknowledged {
            tracing::warn!("Could not print shutdown acknowledgment: {}", e);
        }

        let report = ShutdownReport {
            reason,
            ticks: ticks.load(Ordering::SeqCst),
            started_at,
            stopped_at: Utc::now(),
        };

        tracing::info!(
            "Agent stopped after {} ticks, uptime {}s ({})",
            report.ticks,
            report.uptime().num_seconds(),
            report.reason
        );

        Ok(report)
    }
}

async fn idle_loop<S: Sleeper, T: IdleTask>(
    sleeper: S,
    task: Arc<T>,
    shutdown: ShutdownFlag,
    tick_interval: Duration,
    ticks: Arc<AtomicU64>,
) {
    // No new wait starts once shutdown has been requested.
    while !shutdown.is_requested() {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = sleeper.sleep(tick_interval) => {}
        }

        let tick = ticks.fetch_add(1, Ordering::SeqCst) + 1;

        if let Err(e) = task.on_tick(tick).await {
            tracing::error!(
                "❌ Idle loop fault on tick {}: {} (Category: {:?}, Severity: {:?})",
                tick,
                e,
                e.category(),
                e.severity()
            );
            shutdown.request(ShutdownReason::Fault(e.to_string()));
            break;
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
