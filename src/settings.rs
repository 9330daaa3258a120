use crate::error::{DebugError, DebugResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable consulted when no settings path is given explicitly.
pub const SETTINGS_ENV_VAR: &str = "TEST_DEBUG_LAUNCHER_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LauncherSettings {
    /// Directory containing the bundled test launcher scripts.
    #[serde(default = "LauncherSettings::default_launcher_root")]
    pub launcher_root: PathBuf,

    /// Env file used when a launch.json entry does not name one.
    #[serde(default)]
    pub env_file: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LauncherSettings {
    fn default_launcher_root() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pythonFiles")
    }

    pub fn from_toml_str(text: &str) -> DebugResult<Self> {
        toml::from_str(text).map_err(|err| DebugError::Settings(err.to_string()))
    }

    pub fn load_from_path(path: &Path) -> DebugResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            launcher_root: Self::default_launcher_root(),
            env_file: None,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn normalized_level(&self) -> String {
        let trimmed = self.level.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Self::default_level(),
            "warning" => "warn".to_owned(),
            "trace" | "debug" | "info" | "warn" | "error" => trimmed.to_ascii_lowercase(),
            _ => trimmed.to_owned(),
        }
    }

    /// Filter for the subscriber; `RUST_LOG`, when set, is appended to the configured level.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        use tracing_subscriber::EnvFilter;

        let configured = self.normalized_level();
        let directives = match std::env::var("RUST_LOG") {
            Ok(env) if !env.trim().is_empty() => format!("{configured},{}", env.trim()),
            _ => configured,
        };
        EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(Self::default_level()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}
