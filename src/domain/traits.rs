use super::Invocation;
use std::fmt::Debug;
use std::path::Path;

/// Runs engine CLI invocations as child processes
pub trait ProcessRunner: Send + Sync + Debug {
    /// Run with the caller's terminal attached; true when the child exited 0.
    /// Failures are reported to the operator, never escalated.
    fn run_streamed(&self, invocation: &Invocation) -> bool;

    /// Run silently and return stdout, or `None` if the child could not start
    /// or exited non-zero. Only used for probes.
    fn run_captured(&self, invocation: &Invocation) -> Option<String>;

    /// Directory child processes run in
    fn working_dir(&self) -> &Path;
}
