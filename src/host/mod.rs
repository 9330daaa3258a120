//! Capabilities the launcher borrows from its host application.
//!
//! Each collaborator gets its own trait so callers (and tests) can swap in whatever
//! backs it: an editor, the local filesystem, or an in-memory fake.

pub mod local;

use crate::config::ResolvedDebugConfiguration;
use crate::error::DebugResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Every capability the launcher needs, shared read-only between launches.
#[derive(Clone)]
pub struct HostServices {
    pub workspace: Arc<dyn WorkspaceService>,
    pub fs: Arc<dyn FileSystem>,
    pub interpreters: Arc<dyn InterpreterService>,
    pub environment: Arc<dyn EnvironmentResolver>,
    pub debug: Arc<dyn DebugService>,
}

/// A root folder opened in the host. Read-only from the launcher's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFolder {
    pub path: PathBuf,
    pub name: String,
}

impl WorkspaceFolder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => path.display().to_string(),
        };
        Self { path, name }
    }
}

pub trait WorkspaceService: Send + Sync {
    fn workspace_folders(&self) -> Vec<WorkspaceFolder>;

    /// The folder that contains `path`, preferring the most specific one.
    fn workspace_folder(&self, path: &Path) -> Option<WorkspaceFolder> {
        self.workspace_folders()
            .into_iter()
            .filter(|folder| path.starts_with(&folder.path))
            .max_by_key(|folder| folder.path.components().count())
    }
}

#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn file_exists(&self, path: &Path) -> bool;
    async fn read_file(&self, path: &Path) -> io::Result<String>;
}

#[async_trait]
pub trait InterpreterService: Send + Sync {
    /// Path of the interpreter selected for `resource`, if any.
    async fn active_interpreter(&self, resource: &Path) -> Option<String>;
}

#[async_trait]
pub trait EnvironmentResolver: Send + Sync {
    async fn resolve(&self, env_file: &Path, resource: &Path)
        -> io::Result<BTreeMap<String, String>>;
}

#[async_trait]
pub trait DebugService: Send + Sync {
    /// Fires once the next debug session ends. Subscribe before starting one.
    fn on_session_terminated(&self) -> oneshot::Receiver<()>;

    async fn start_debugging(
        &self,
        folder: &WorkspaceFolder,
        config: &ResolvedDebugConfiguration,
    ) -> DebugResult<()>;
}
