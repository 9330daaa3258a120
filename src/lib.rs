//! Debug launching for test runs.
//!
//! Reads the workspace's `.vscode/launch.json` (comments and trailing commas
//! allowed), picks the first `"test"` entry for this debugger, merges it with
//! defaults and computed launch values, then starts the session through the host
//! and waits for it to end.

pub mod config;
pub mod dap;
pub mod debugger;
pub mod error;
pub mod host;
pub mod logging;
pub mod parser;
pub mod settings;

pub use config::{ResolvedDebugConfiguration, TestFramework};
pub use debugger::{DebugLauncher, LaunchOptions, LaunchOutcome};
pub use error::{DebugError, DebugResult};
pub use settings::LauncherSettings;
