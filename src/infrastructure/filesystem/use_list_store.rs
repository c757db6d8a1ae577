use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs as async_fs;
use tracing::debug;

/// Name of the list file looked up in the base directory
pub const DEFAULT_USE_LIST_FILE: &str = "use.list";

/// Use list related errors
#[derive(Debug, Error)]
pub enum UseListError {
    /// The list file does not exist. Callers treat this as "no targets".
    #[error("no file named {}", .0.file_name().map(|n| n.to_string_lossy()).unwrap_or_default())]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UseListError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Loads the flat `use.list` file enumerating target directories
#[derive(Debug, Clone)]
pub struct UseListStore {
    file_name: String,
}

impl Default for UseListStore {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_USE_LIST_FILE.to_string(),
        }
    }
}

impl UseListStore {
    /// Create a store for the default `use.list` file name
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different list file name
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full path of the list file inside `dir`
    pub fn list_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.file_name)
    }

    /// Read the list file in `dir`.
    ///
    /// Every line is whitespace-trimmed and returned in file order. Blank
    /// lines are kept as empty strings; normalization is left to the caller.
    pub async fn load(&self, dir: &Path) -> Result<Vec<String>, UseListError> {
        let path = self.list_path(dir);

        let is_file = async_fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(UseListError::NotFound(path));
        }

        let contents = async_fs::read_to_string(&path)
            .await
            .map_err(|source| UseListError::ReadFailed {
                path: path.clone(),
                source,
            })?;

        let entries: Vec<String> = contents
            .lines()
            .map(|line| line.trim().to_string())
            .collect();

        debug!("Loaded {} entries from {}", entries.len(), path.display());
        Ok(entries)
    }

    /// Same entries as [`UseListStore::load`], joined by single spaces
    pub async fn load_joined(&self, dir: &Path) -> Result<String, UseListError> {
        Ok(self.load(dir).await?.join(" "))
    }
}
