//! Layering of built-in defaults, the user's test entry and computed launch values.
//!
//! Lowest to highest precedence:
//! 1. built-in defaults
//! 2. fields of the selected `launch.json` entry
//! 3. computed values (`program`, `args`, `workspaceFolder`, `env`, `rules`, ...)
//! 4. derived flags (`justMyCode`, `debugOptions`)

use super::types::{
    DebugOption, ExclusionRule, Platform, RawConfigEntry, ResolvedDebugConfiguration,
    DEBUGGER_TYPE,
};
use crate::debugger::LaunchOptions;
use crate::host::WorkspaceFolder;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_NAME: &str = "Debug Unit Test";
pub const DEFAULT_CONSOLE: &str = "internalConsole";
pub const DEFAULT_INTERPRETER: &str = "python";
const LAUNCH_REQUEST: &str = "launch";

/// Values gathered from the host before merging.
#[derive(Debug, Clone)]
pub struct MergeInputs<'a> {
    pub folder: &'a WorkspaceFolder,
    /// Directory holding the launcher scripts; also excluded from stepping.
    pub launcher_root: &'a Path,
    pub env_file: PathBuf,
    /// Output of the environment resolver. Wins over the entry's own `env`.
    pub env: BTreeMap<String, String>,
    pub interpreter: Option<String>,
    pub platform: Platform,
}

/// Env file for the session: the entry's `envFile`, else the configured default,
/// else `.env` in the workspace folder.
pub fn env_file(
    selected: Option<&RawConfigEntry>,
    default: Option<&Path>,
    folder: &WorkspaceFolder,
) -> PathBuf {
    selected
        .and_then(|entry| entry.get("envFile"))
        .and_then(Value::as_str)
        .map(PathBuf::from)
        .or_else(|| default.map(Path::to_path_buf))
        .unwrap_or_else(|| folder.path.join(".env"))
}

/// Whether any interpreter field would have to come from the host.
pub fn needs_interpreter(selected: Option<&RawConfigEntry>) -> bool {
    let Some(entry) = selected else {
        return true;
    };
    let has = |key: &str| entry.get(key).and_then(Value::as_str).is_some();
    if has("pythonPath") {
        return false;
    }
    !(has("python") && has("debugAdapterPython") && has("debugLauncherPython"))
}

pub fn merge(
    selected: Option<&RawConfigEntry>,
    options: &LaunchOptions,
    inputs: MergeInputs<'_>,
) -> ResolvedDebugConfiguration {
    let mut raw = RawFields::new(selected.cloned().unwrap_or_default());

    // The entry asked for a "test" request; what gets launched is always a launch.
    raw.discard("type");
    raw.discard("request");

    let name = raw.take_string("name").unwrap_or_else(|| DEFAULT_NAME.to_string());
    let console = raw
        .take_string("console")
        .unwrap_or_else(|| DEFAULT_CONSOLE.to_string());
    let internal_console_options = raw
        .take_string("internalConsoleOptions")
        .or_else(|| (console != DEFAULT_CONSOLE).then(|| "neverOpen".to_string()));
    let stop_on_entry = raw.take_bool("stopOnEntry").unwrap_or(false);
    let show_return_value = raw.take_bool("showReturnValue").unwrap_or(true);
    let redirect_output = raw.take_bool("redirectOutput").unwrap_or(true);
    let debug_std_lib = raw.take_bool("debugStdLib").unwrap_or(false);
    let sub_process = raw.take_bool("subProcess").unwrap_or(true);
    let just_my_code = raw.take_bool("justMyCode").unwrap_or(!debug_std_lib);
    let purpose = raw.take_strings("purpose").unwrap_or_default();
    let cwd = raw
        .take_string("cwd")
        .map(PathBuf::from)
        .unwrap_or_else(|| inputs.folder.path.clone());

    let interpreter = raw
        .take_string("pythonPath")
        .or(inputs.interpreter)
        .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string());
    let python = raw.take_string("python").unwrap_or_else(|| interpreter.clone());
    let debug_adapter_python = raw
        .take_string("debugAdapterPython")
        .unwrap_or_else(|| interpreter.clone());
    let debug_launcher_python = raw
        .take_string("debugLauncherPython")
        .unwrap_or(interpreter);

    let mut env = raw.take_env("env");
    env.extend(inputs.env);

    // Computed below; whatever the entry says about these is dropped.
    for key in ["envFile", "program", "args", "workspaceFolder", "rules", "debugOptions"] {
        raw.discard(key);
    }

    let mut config = ResolvedDebugConfiguration {
        name,
        debugger_type: DEBUGGER_TYPE.to_string(),
        request: LAUNCH_REQUEST.to_string(),
        program: options.framework.launcher_script(inputs.launcher_root),
        args: options.framework.launcher_args(&options.args),
        cwd,
        workspace_folder: inputs.folder.path.clone(),
        python,
        debug_adapter_python,
        debug_launcher_python,
        console,
        internal_console_options,
        env,
        env_file: inputs.env_file,
        stop_on_entry,
        show_return_value,
        redirect_output,
        debug_std_lib,
        sub_process,
        just_my_code,
        purpose,
        debug_options: Vec::new(),
        rules: vec![ExclusionRule {
            path: inputs.launcher_root.to_path_buf(),
            include: false,
        }],
        extra: raw.into_inner(),
    };
    config.debug_options = debug_options(&config, inputs.platform);
    config
}

/// The adapter flag list, in the order the adapter expects them.
pub fn debug_options(config: &ResolvedDebugConfiguration, platform: Platform) -> Vec<DebugOption> {
    let mut options = Vec::new();
    if !config.just_my_code {
        options.push(DebugOption::DebugStdLib);
    }
    if config.stop_on_entry {
        options.push(DebugOption::StopOnEntry);
    }
    if config.show_return_value {
        options.push(DebugOption::ShowReturnValue);
    }
    if config.redirect_output {
        options.push(DebugOption::RedirectOutput);
    }
    if config.sub_process {
        options.push(DebugOption::SubProcess);
    }
    if platform.fixes_path_case() {
        options.push(DebugOption::FixFilePathCase);
    }
    options
}

/// Typed access to an entry's fields. Each field is taken out exactly once so
/// whatever remains at the end is passed through verbatim.
struct RawFields {
    map: RawConfigEntry,
}

impl RawFields {
    fn new(map: RawConfigEntry) -> Self {
        Self { map }
    }

    fn discard(&mut self, key: &str) {
        self.map.remove(key);
    }

    fn take(&mut self, key: &str) -> Option<Value> {
        match self.map.remove(key)? {
            Value::Null => None,
            value => Some(value),
        }
    }

    fn take_string(&mut self, key: &str) -> Option<String> {
        match self.take(key)? {
            Value::String(s) => Some(s),
            other => ignored(key, &other),
        }
    }

    fn take_bool(&mut self, key: &str) -> Option<bool> {
        match self.take(key)? {
            Value::Bool(b) => Some(b),
            other => ignored(key, &other),
        }
    }

    fn take_strings(&mut self, key: &str) -> Option<Vec<String>> {
        match self.take(key)? {
            Value::Array(items) if items.iter().all(Value::is_string) => Some(
                items
                    .into_iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            other => ignored(key, &other),
        }
    }

    fn take_env(&mut self, key: &str) -> BTreeMap<String, String> {
        let vars = match self.take(key) {
            Some(Value::Object(vars)) => vars,
            Some(other) => return ignored(key, &other).unwrap_or_default(),
            None => return BTreeMap::new(),
        };

        let mut env = BTreeMap::new();
        for (name, value) in vars {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => continue,
                other => {
                    warn!(variable = %name, value = %other, "ignoring non-scalar env value");
                    continue;
                }
            };
            env.insert(name, value);
        }
        env
    }

    fn into_inner(self) -> RawConfigEntry {
        self.map
    }
}

fn ignored<T>(key: &str, value: &Value) -> Option<T> {
    warn!(field = key, value = %value, "ignoring launch.json field with unexpected type");
    None
}
