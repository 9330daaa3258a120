use crate::config::TestFramework;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// A request to debug one test run.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub cwd: PathBuf,
    pub args: Vec<String>,
    pub framework: TestFramework,
    pub cancel: Option<CancellationToken>,
}

impl LaunchOptions {
    pub fn new(cwd: impl Into<PathBuf>, args: Vec<String>, framework: TestFramework) -> Self {
        Self {
            cwd: cwd.into(),
            args,
            framework,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// How a launch request finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Cancelled before anything was started.
    Cancelled,
    /// The debug session ran and the host reported it terminated.
    Terminated,
}
