use crate::domain::model::ServiceEndpoints;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// The wait primitive of the idle loop. Tests swap in one that does not touch the clock.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Work performed after every completed idle tick.
#[async_trait]
pub trait IdleTask: Send + Sync {
    async fn on_tick(&self, tick: u64) -> Result<()>;

    fn on_stop(&self) {}
}

pub trait ConfigProvider: Send + Sync {
    fn workspace_root(&self) -> &Path;
    fn directories(&self) -> &[String];
    fn tick_interval(&self) -> Duration;
    fn endpoints(&self) -> ServiceEndpoints;
    fn run_mode(&self) -> &str;
}
