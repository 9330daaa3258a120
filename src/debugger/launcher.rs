use super::options::{LaunchOptions, LaunchOutcome};
use super::state::LaunchState;
use crate::config::{self, merge, MergeInputs, Platform, ResolvedDebugConfiguration, DEBUGGER_TYPE};
use crate::error::{DebugError, DebugResult};
use crate::host::{HostServices, WorkspaceFolder};
use crate::settings::LauncherSettings;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Resolves the debug configuration for a test run and drives the session to completion.
pub struct DebugLauncher {
    host: HostServices,
    settings: LauncherSettings,
    platform: Platform,
}

impl DebugLauncher {
    pub fn new(host: HostServices, settings: LauncherSettings) -> Self {
        Self {
            host,
            settings,
            platform: Platform::current(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Start a debug session for `options` and wait until the host reports it ended.
    ///
    /// Returns [`LaunchOutcome::Cancelled`] without touching the host when the request
    /// was cancelled before launch.
    pub async fn launch_debugger(&self, options: &LaunchOptions) -> DebugResult<LaunchOutcome> {
        let mut run = LaunchRun::default();

        if options.is_cancelled() {
            run.advance(LaunchState::Cancelled);
            return Ok(LaunchOutcome::Cancelled);
        }

        let folder = self.resolve_workspace_folder(&options.cwd)?;
        run.advance(LaunchState::Launching);

        let config = self.resolve_for_folder(options, &folder).await;
        if options.is_cancelled() {
            run.advance(LaunchState::Cancelled);
            return Ok(LaunchOutcome::Cancelled);
        }

        let terminated = self.host.debug.on_session_terminated();
        info!(
            name = %config.name,
            program = %config.program.display(),
            folder = %folder.name,
            "starting test debug session"
        );
        if let Err(err) = self.host.debug.start_debugging(&folder, &config).await {
            error!(error = %err, "failed to start debugging tests");
            return Err(err);
        }
        run.advance(LaunchState::Running);

        terminated.await.map_err(|_| DebugError::SessionLost)?;
        run.advance(LaunchState::Done);
        info!(name = %config.name, "test debug session terminated");
        Ok(LaunchOutcome::Terminated)
    }

    /// The configuration [`launch_debugger`](Self::launch_debugger) would start, without
    /// starting it.
    pub async fn resolve_configuration(
        &self,
        options: &LaunchOptions,
    ) -> DebugResult<ResolvedDebugConfiguration> {
        let folder = self.resolve_workspace_folder(&options.cwd)?;
        Ok(self.resolve_for_folder(options, &folder).await)
    }

    /// Raw entries of the folder's launch document; empty when absent or malformed.
    pub async fn read_all_debug_configs(&self, folder: &WorkspaceFolder) -> Vec<Value> {
        config::read_all(self.host.fs.as_ref(), folder).await
    }

    /// Folder containing `cwd`, else the first one. Fails when nothing is open.
    pub fn resolve_workspace_folder(&self, cwd: &Path) -> DebugResult<WorkspaceFolder> {
        let folders = self.host.workspace.workspace_folders();
        let Some(first) = folders.into_iter().next() else {
            return Err(DebugError::NoWorkspace);
        };
        if cwd.as_os_str().is_empty() {
            return Ok(first);
        }
        Ok(self.host.workspace.workspace_folder(cwd).unwrap_or(first))
    }

    async fn resolve_for_folder(
        &self,
        options: &LaunchOptions,
        folder: &WorkspaceFolder,
    ) -> ResolvedDebugConfiguration {
        let entries = self.read_all_debug_configs(folder).await;
        let selected = config::select_first(&entries, DEBUGGER_TYPE);
        match selected.and_then(|entry| entry.get("name")) {
            Some(name) => debug!(%name, "using launch.json test configuration"),
            None if selected.is_some() => debug!("using unnamed launch.json test configuration"),
            None => debug!("no launch.json test configuration; using defaults"),
        }

        let interpreter = if merge::needs_interpreter(selected) {
            let found = self.host.interpreters.active_interpreter(&folder.path).await;
            if found.is_none() {
                warn!(
                    folder = %folder.path.display(),
                    "no active interpreter; falling back to `{}`",
                    merge::DEFAULT_INTERPRETER
                );
            }
            found
        } else {
            None
        };

        let env_file = merge::env_file(selected, self.settings.env_file.as_deref(), folder);
        let env = match self.host.environment.resolve(&env_file, &folder.path).await {
            Ok(env) => env,
            Err(err) => {
                warn!(env_file = %env_file.display(), error = %err, "could not resolve environment");
                Default::default()
            }
        };

        config::merge(
            selected,
            options,
            MergeInputs {
                folder,
                launcher_root: &self.settings.launcher_root,
                env_file,
                env,
                interpreter,
                platform: self.platform,
            },
        )
    }
}

/// State bookkeeping for one `launch_debugger` call.
#[derive(Debug, Default)]
struct LaunchRun {
    state: LaunchState,
}

impl LaunchRun {
    fn advance(&mut self, next: LaunchState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "invalid launch transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(from = ?self.state, to = ?next, "launch state");
        self.state = next;
    }
}
