mod command;
pub mod error;
mod invocation;
pub mod project;
pub mod traits;

pub use command::{CommandHandle, Continuation, GlobalCommand, ServiceAction};
pub use error::Error;
pub use invocation::{Completion, ExecutionOutcome, Invocation, PendingConfirmation};
pub use project::{CACHE_SERVICE, PRIMARY_SERVICE, ProjectConfig, ServiceMap, ServiceSpec};
pub use traits::ProcessRunner;
