use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Debugger type tag a `launch.json` entry must carry to be picked up.
pub const DEBUGGER_TYPE: &str = "python";

/// One user-authored entry from the `configurations` list.
pub type RawConfigEntry = Map<String, Value>;

/// Flags passed to the debug adapter, derived from the boolean settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebugOption {
    DebugStdLib,
    StopOnEntry,
    ShowReturnValue,
    RedirectOutput,
    #[serde(rename = "Multiprocess")]
    SubProcess,
    FixFilePathCase,
}

/// A path the debugger must not step into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub path: PathBuf,
    pub include: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    /// Whether the debug adapter should normalise file path case.
    pub fn fixes_path_case(self) -> bool {
        matches!(self, Platform::Windows)
    }
}

/// The fully merged configuration handed to the host's debug service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDebugConfiguration {
    pub name: String,
    #[serde(rename = "type")]
    pub debugger_type: String,
    pub request: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub workspace_folder: PathBuf,
    pub python: String,
    pub debug_adapter_python: String,
    pub debug_launcher_python: String,
    pub console: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_console_options: Option<String>,
    pub env: BTreeMap<String, String>,
    pub env_file: PathBuf,
    pub stop_on_entry: bool,
    pub show_return_value: bool,
    pub redirect_output: bool,
    pub debug_std_lib: bool,
    pub sub_process: bool,
    pub just_my_code: bool,
    pub purpose: Vec<String>,
    pub debug_options: Vec<DebugOption>,
    pub rules: Vec<ExclusionRule>,
    /// Entry fields the launcher does not interpret, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
