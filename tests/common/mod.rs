// Shared in-memory host used by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use test_debug_launcher::config::{Platform, ResolvedDebugConfiguration};
use test_debug_launcher::host::{
    DebugService, EnvironmentResolver, FileSystem, HostServices, InterpreterService,
    WorkspaceFolder, WorkspaceService,
};
use test_debug_launcher::settings::LoggingConfig;
use test_debug_launcher::{DebugError, DebugLauncher, DebugResult, LauncherSettings};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

pub const LAUNCHER_ROOT: &str = "/ext/pythonFiles";
pub const CWD: &str = "one/two/three";

pub struct FakeHost {
    pub folders: Vec<WorkspaceFolder>,
    pub files: HashMap<PathBuf, String>,
    pub interpreter: Option<String>,
    pub env: BTreeMap<String, String>,
    pub reject_start: Option<String>,
    pub terminate_on_start: bool,
    pub drop_subscribers: bool,
    /// Cancelled while the environment is being resolved.
    pub cancel_during_resolve: Option<CancellationToken>,
    pub started: Mutex<Vec<(WorkspaceFolder, ResolvedDebugConfiguration)>>,
    pub env_files: Mutex<Vec<PathBuf>>,
    pub reads: AtomicUsize,
    pub interpreter_lookups: AtomicUsize,
    subscribers: Mutex<Vec<oneshot::Sender<()>>>,
}

impl FakeHost {
    /// Two folders, the first being the test run's cwd; no launch.json.
    pub fn new() -> Self {
        Self {
            folders: vec![
                WorkspaceFolder::new(CWD),
                WorkspaceFolder::new("five/six/seven"),
            ],
            files: HashMap::new(),
            interpreter: Some("python".to_string()),
            env: BTreeMap::new(),
            reject_start: None,
            terminate_on_start: true,
            drop_subscribers: false,
            cancel_during_resolve: None,
            started: Mutex::new(Vec::new()),
            env_files: Mutex::new(Vec::new()),
            reads: AtomicUsize::new(0),
            interpreter_lookups: AtomicUsize::new(0),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn with_launch_json(mut self, text: &str) -> Self {
        let path = Path::new(CWD).join(".vscode").join("launch.json");
        self.files.insert(path, text.to_string());
        self
    }

    pub fn with_entries(self, entries: serde_json::Value) -> Self {
        let doc = serde_json::json!({ "version": "0.1.0", "configurations": entries });
        self.with_launch_json(&doc.to_string())
    }

    pub fn started(&self) -> Vec<(WorkspaceFolder, ResolvedDebugConfiguration)> {
        self.started.lock().unwrap().clone()
    }

    pub fn start_count(&self) -> usize {
        self.started.lock().unwrap().len()
    }

    /// Simulate the host ending the session.
    pub fn terminate(&self) {
        for tx in self.subscribers.lock().unwrap().drain(..) {
            let _ = tx.send(());
        }
    }
}

impl WorkspaceService for FakeHost {
    fn workspace_folders(&self) -> Vec<WorkspaceFolder> {
        self.folders.clone()
    }
}

#[async_trait]
impl FileSystem for FakeHost {
    async fn file_exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    async fn read_file(&self, path: &Path) -> io::Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

#[async_trait]
impl InterpreterService for FakeHost {
    async fn active_interpreter(&self, _resource: &Path) -> Option<String> {
        self.interpreter_lookups.fetch_add(1, Ordering::SeqCst);
        self.interpreter.clone()
    }
}

#[async_trait]
impl EnvironmentResolver for FakeHost {
    async fn resolve(
        &self,
        env_file: &Path,
        _resource: &Path,
    ) -> io::Result<BTreeMap<String, String>> {
        self.env_files.lock().unwrap().push(env_file.to_path_buf());
        if let Some(cancel) = &self.cancel_during_resolve {
            cancel.cancel();
        }
        Ok(self.env.clone())
    }
}

#[async_trait]
impl DebugService for FakeHost {
    fn on_session_terminated(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        if !self.drop_subscribers {
            self.subscribers.lock().unwrap().push(tx);
        }
        rx
    }

    async fn start_debugging(
        &self,
        folder: &WorkspaceFolder,
        config: &ResolvedDebugConfiguration,
    ) -> DebugResult<()> {
        if let Some(reason) = &self.reject_start {
            return Err(DebugError::StartRejected(reason.clone()));
        }
        self.started
            .lock()
            .unwrap()
            .push((folder.clone(), config.clone()));
        if self.terminate_on_start {
            self.terminate();
        }
        Ok(())
    }
}

pub fn settings() -> LauncherSettings {
    LauncherSettings {
        launcher_root: PathBuf::from(LAUNCHER_ROOT),
        env_file: None,
        logging: LoggingConfig::default(),
    }
}

pub fn services(host: &Arc<FakeHost>) -> HostServices {
    HostServices {
        workspace: host.clone(),
        fs: host.clone(),
        interpreters: host.clone(),
        environment: host.clone(),
        debug: host.clone(),
    }
}

pub fn launcher(host: &Arc<FakeHost>) -> DebugLauncher {
    DebugLauncher::new(services(host), settings()).with_platform(Platform::Linux)
}
