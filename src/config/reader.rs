use crate::host::{FileSystem, WorkspaceFolder};
use crate::parser;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Location of the launch document relative to a workspace folder.
pub fn launch_json_path(folder: &WorkspaceFolder) -> PathBuf {
    folder.path.join(".vscode").join("launch.json")
}

/// All raw configuration entries of `folder`'s launch document.
///
/// A missing, unreadable or malformed document yields no entries.
pub async fn read_all(fs: &dyn FileSystem, folder: &WorkspaceFolder) -> Vec<Value> {
    let path = launch_json_path(folder);
    if !fs.file_exists(&path).await {
        debug!(path = %path.display(), "no launch document");
        return Vec::new();
    }

    let text = match fs.read_file(&path).await {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not read launch document");
            return Vec::new();
        }
    };

    let document = parser::parse_document(&text);
    if document.version.is_empty() {
        warn!(
            path = %path.display(),
            "launch document is malformed or missing a field; ignoring it"
        );
    }
    document.configurations
}
