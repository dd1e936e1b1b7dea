pub mod banner;
pub mod heartbeat;
pub mod shutdown;
pub mod signals;
pub mod supervisor;
pub mod workspace;

pub use crate::domain::model::{
    ServiceEndpoints, ShutdownReason, ShutdownReport, TerminationSignal,
};
pub use crate::domain::ports::{ConfigProvider, IdleTask, Sleeper};
pub use crate::utils::error::Result;
