use async_trait::async_trait;
use eth_trading_agent::core::banner;
use eth_trading_agent::core::signals::forward_signal;
use eth_trading_agent::core::{
    IdleTask, ServiceEndpoints, ShutdownReason, Sleeper, TerminationSignal,
};
use eth_trading_agent::{
    AgentConfig, AgentError, Result, ShutdownFlag, Supervisor, TokioSleeper,
};
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Completes every wait after a single yield, so ticks cost no wall-clock time.
struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {
        tokio::task::yield_now().await;
    }
}

/// Delivers `signals` through the listener path once `stop_at` ticks have completed.
struct SignalAfter {
    shutdown: ShutdownFlag,
    stop_at: u64,
    signals: Vec<TerminationSignal>,
    seen: Arc<AtomicU64>,
}

#[async_trait]
impl IdleTask for SignalAfter {
    async fn on_tick(&self, tick: u64) -> Result<()> {
        self.seen.store(tick, Ordering::SeqCst);
        if tick == self.stop_at {
            for signal in &self.signals {
                forward_signal(&self.shutdown, *signal);
            }
        }
        Ok(())
    }
}

struct FailOnTick(u64);

#[async_trait]
impl IdleTask for FailOnTick {
    async fn on_tick(&self, tick: u64) -> Result<()> {
        if tick == self.0 {
            return Err(AgentError::IdleFault {
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

struct PanicOnFirstTick;

#[async_trait]
impl IdleTask for PanicOnFirstTick {
    async fn on_tick(&self, _tick: u64) -> Result<()> {
        panic!("injected panic");
    }
}

struct BannerProbe {
    out: SharedBuffer,
    shutdown: ShutdownFlag,
    snapshot: Arc<Mutex<Option<String>>>,
}

#[async_trait]
impl IdleTask for BannerProbe {
    async fn on_tick(&self, tick: u64) -> Result<()> {
        if tick == 1 {
            *self.snapshot.lock().unwrap() = Some(self.out.contents());
            forward_signal(&self.shutdown, TerminationSignal::Interrupt);
        }
        Ok(())
    }
}

struct Idle;

#[async_trait]
impl IdleTask for Idle {
    async fn on_tick(&self, _tick: u64) -> Result<()> {
        Ok(())
    }
}

fn test_config(root: &TempDir) -> AgentConfig {
    let mut config = AgentConfig::default();
    config.workspace.root = root.path().to_path_buf();
    config.supervisor.tick_interval_ms = 10;
    config
}

fn signal_after(
    shutdown: &ShutdownFlag,
    stop_at: u64,
    signals: Vec<TerminationSignal>,
) -> (SignalAfter, Arc<AtomicU64>) {
    let seen = Arc::new(AtomicU64::new(0));
    let task = SignalAfter {
        shutdown: shutdown.clone(),
        stop_at,
        signals,
        seen: Arc::clone(&seen),
    };
    (task, seen)
}

#[tokio::test]
async fn test_startup_text_precedes_first_tick() {
    let temp_dir = TempDir::new().unwrap();
    let out = SharedBuffer::default();
    let shutdown = ShutdownFlag::new();
    let snapshot = Arc::new(Mutex::new(None));

    let probe = BannerProbe {
        out: out.clone(),
        shutdown: shutdown.clone(),
        snapshot: Arc::clone(&snapshot),
    };

    let report = Supervisor::new(test_config(&temp_dir), InstantSleeper, probe)
        .with_output(out.clone())
        .with_shutdown_flag(shutdown)
        .run()
        .await
        .unwrap();

    let expected =
        banner::startup_lines("development", &ServiceEndpoints::default()).join("\n") + "\n";
    let at_first_tick = snapshot.lock().unwrap().clone().unwrap();
    assert_eq!(at_first_tick, expected);

    assert!(out.contents().starts_with(&expected));
    assert!(temp_dir.path().join("logs").is_dir());
    assert!(temp_dir.path().join("data").is_dir());
    assert_eq!(report.ticks, 1);
}

#[tokio::test]
async fn test_interrupt_prints_user_acknowledgment() {
    let temp_dir = TempDir::new().unwrap();
    let out = SharedBuffer::default();
    let shutdown = ShutdownFlag::new();
    let (task, seen) = signal_after(&shutdown, 3, vec![TerminationSignal::Interrupt]);

    let report = Supervisor::new(test_config(&temp_dir), InstantSleeper, task)
        .with_output(out.clone())
        .with_shutdown_flag(shutdown)
        .run()
        .await
        .unwrap();

    assert_eq!(
        report.reason,
        ShutdownReason::Signal(TerminationSignal::Interrupt)
    );
    assert_eq!(report.ticks, 3);
    assert_eq!(seen.load(Ordering::SeqCst), 3);
    assert!(out.contents().ends_with("\n\n✅ Shutdown requested by user\n"));
    assert!(!out.contents().contains("❌"));
}

#[tokio::test]
async fn test_terminate_matches_interrupt_outcome() {
    let temp_dir = TempDir::new().unwrap();
    let out = SharedBuffer::default();
    let shutdown = ShutdownFlag::new();
    let (task, _) = signal_after(&shutdown, 2, vec![TerminationSignal::Terminate]);

    let report = Supervisor::new(test_config(&temp_dir), InstantSleeper, task)
        .with_output(out.clone())
        .with_shutdown_flag(shutdown)
        .run()
        .await
        .unwrap();

    assert!(report.reason.is_user_requested());
    assert!(out.contents().ends_with("✅ Shutdown requested by user\n"));
}

#[tokio::test]
async fn test_double_signal_shuts_down_once() {
    let temp_dir = TempDir::new().unwrap();
    let out = SharedBuffer::default();
    let shutdown = ShutdownFlag::new();
    let (task, _) = signal_after(
        &shutdown,
        1,
        vec![TerminationSignal::Terminate, TerminationSignal::Terminate],
    );

    let report = Supervisor::new(test_config(&temp_dir), InstantSleeper, task)
        .with_output(out.clone())
        .with_shutdown_flag(shutdown.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(
        report.reason,
        ShutdownReason::Signal(TerminationSignal::Terminate)
    );
    assert_eq!(out.contents().matches("Shutdown requested by user").count(), 1);
    assert!(!forward_signal(&shutdown, TerminationSignal::Interrupt));
}

#[tokio::test]
async fn test_many_ticks_without_wall_clock() {
    let temp_dir = TempDir::new().unwrap();
    let shutdown = ShutdownFlag::new();
    let (task, seen) = signal_after(&shutdown, 1_000, vec![TerminationSignal::Interrupt]);

    let mut config = test_config(&temp_dir);
    config.supervisor.tick_interval_ms = 60_000;

    let report = tokio::time::timeout(
        Duration::from_secs(10),
        Supervisor::new(config, InstantSleeper, task)
            .with_output(SharedBuffer::default())
            .with_shutdown_flag(shutdown)
            .run(),
    )
    .await
    .expect("instant sleeper should not wait on the clock")
    .unwrap();

    assert_eq!(report.ticks, 1_000);
    assert_eq!(seen.load(Ordering::SeqCst), 1_000);
}

#[tokio::test]
async fn test_shutdown_before_start_runs_no_ticks() {
    let temp_dir = TempDir::new().unwrap();
    let out = SharedBuffer::default();
    let shutdown = ShutdownFlag::new();
    forward_signal(&shutdown, TerminationSignal::Interrupt);

    let report = Supervisor::new(test_config(&temp_dir), InstantSleeper, Idle)
        .with_output(out.clone())
        .with_shutdown_flag(shutdown)
        .run()
        .await
        .unwrap();

    assert_eq!(report.ticks, 0);
    assert!(out.contents().contains(banner::TITLE));
    assert!(out.contents().ends_with("✅ Shutdown requested by user\n"));
}

#[tokio::test]
async fn test_cancellation_cuts_a_long_wait_short() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.supervisor.tick_interval_ms = 60_000;

    let supervisor =
        Supervisor::new(config, TokioSleeper, Idle).with_output(SharedBuffer::default());
    let shutdown = supervisor.shutdown_flag();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        forward_signal(&shutdown, TerminationSignal::Terminate);
    });

    let started = std::time::Instant::now();
    let report = tokio::time::timeout(Duration::from_secs(5), supervisor.run())
        .await
        .expect("shutdown should not wait for the full tick")
        .unwrap();

    assert_eq!(report.ticks, 0);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_idle_fault_is_contained() {
    let temp_dir = TempDir::new().unwrap();
    let out = SharedBuffer::default();

    let report = Supervisor::new(test_config(&temp_dir), InstantSleeper, FailOnTick(2))
        .with_output(out.clone())
        .run()
        .await
        .unwrap();

    match &report.reason {
        ShutdownReason::Fault(message) => assert!(message.contains("injected failure")),
        other => panic!("unexpected reason: {other:?}"),
    }
    assert_eq!(report.ticks, 2);
    assert!(out
        .contents()
        .ends_with("❌ Unexpected error: Idle loop fault: injected failure\n"));
    assert!(!out.contents().contains("Shutdown requested by user"));
}

#[tokio::test]
async fn test_idle_panic_is_contained() {
    let temp_dir = TempDir::new().unwrap();
    let out = SharedBuffer::default();

    let report = Supervisor::new(test_config(&temp_dir), InstantSleeper, PanicOnFirstTick)
        .with_output(out.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(
        report.reason,
        ShutdownReason::Fault("idle loop panicked: injected panic".to_string())
    );
    assert!(out.contents().contains("❌ Unexpected error: idle loop panicked"));
}

#[tokio::test]
async fn test_workspace_failure_aborts_before_banner() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("data"), b"in the way").unwrap();
    let out = SharedBuffer::default();

    let result = Supervisor::new(test_config(&temp_dir), InstantSleeper, Idle)
        .with_output(out.clone())
        .run()
        .await;

    assert!(matches!(result, Err(AgentError::WorkspaceError { .. })));
    assert!(out.contents().is_empty());
}

#[tokio::test]
async fn test_existing_directories_are_reused() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir(temp_dir.path().join("logs")).unwrap();
    std::fs::write(temp_dir.path().join("logs").join("previous.log"), b"old run").unwrap();
    let shutdown = ShutdownFlag::new();
    forward_signal(&shutdown, TerminationSignal::Interrupt);

    Supervisor::new(test_config(&temp_dir), InstantSleeper, Idle)
        .with_output(SharedBuffer::default())
        .with_shutdown_flag(shutdown)
        .run()
        .await
        .unwrap();

    let previous = std::fs::read(temp_dir.path().join("logs").join("previous.log")).unwrap();
    assert_eq!(previous, b"old run");
    assert!(temp_dir.path().join("data").is_dir());
}
