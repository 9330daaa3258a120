mod launcher;
mod options;
mod state;

pub use launcher::DebugLauncher;
pub use options::{LaunchOptions, LaunchOutcome};
pub use state::LaunchState;
