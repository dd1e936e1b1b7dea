use crate::domain::ports::{IdleTask, Sleeper};
use crate::utils::error::Result;
use crate::utils::monitor::ProcessMonitor;
use async_trait::async_trait;
use std::time::Duration;

/// Wall-clock sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Default idle task: a debug log per tick and periodic process statistics.
pub struct Heartbeat {
    monitor: ProcessMonitor,
    stats_every: u64,
}

impl Heartbeat {
    pub fn new(monitor_enabled: bool, stats_every: u64) -> Self {
        Self {
            monitor: ProcessMonitor::new(monitor_enabled),
            stats_every: stats_every.max(1),
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitor.is_enabled()
    }
}

#[async_trait]
impl IdleTask for Heartbeat {
    async fn on_tick(&self, tick: u64) -> Result<()> {
        tracing::debug!("Idle tick {}", tick);

        if tick % self.stats_every == 0 {
            self.monitor.log_stats(tick);
        }

        Ok(())
    }

    fn on_stop(&self) {
        self.monitor.log_final_stats();
    }
}
