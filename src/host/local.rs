//! Host capabilities backed by the local machine, used by the command line binary.

use super::{EnvironmentResolver, FileSystem, InterpreterService, WorkspaceFolder, WorkspaceService};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn file_exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    async fn read_file(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

/// A fixed list of folders, in the order the host reported them.
pub struct StaticWorkspace {
    folders: Vec<WorkspaceFolder>,
}

impl StaticWorkspace {
    pub fn new(folders: Vec<WorkspaceFolder>) -> Self {
        Self { folders }
    }
}

impl WorkspaceService for StaticWorkspace {
    fn workspace_folders(&self) -> Vec<WorkspaceFolder> {
        self.folders.clone()
    }
}

pub struct FixedInterpreter(pub Option<String>);

#[async_trait]
impl InterpreterService for FixedInterpreter {
    async fn active_interpreter(&self, _resource: &Path) -> Option<String> {
        self.0.clone()
    }
}

/// Reads `KEY=VALUE` env files. A missing file resolves to no variables.
pub struct EnvFileResolver;

#[async_trait]
impl EnvironmentResolver for EnvFileResolver {
    async fn resolve(
        &self,
        env_file: &Path,
        _resource: &Path,
    ) -> io::Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(env_file).await {
            Ok(contents) => Ok(parse_env_file(&contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err),
        }
    }
}

pub fn parse_env_file(contents: &str) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        vars.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    vars
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
