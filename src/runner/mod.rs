mod board;
mod instance;
mod orchestrator;

pub use board::{RunBoard, RunEvent, RunObserver, RunSnapshot, SnapshotEntry};
pub(crate) use instance::lock;
pub use instance::{RunInstance, RunStatus, TaskResult};
pub use orchestrator::{Orchestrator, RunReport, TaskOutcome};
