use crate::error::{Result, StatsError};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const STORE_FILE_NAME: &str = ".gitlocalstats";

/// Durable list of registered repository paths.
pub trait RepoStore {
    fn load(&self) -> Result<Vec<String>>;
    fn save(&self, repos: &[String]) -> Result<()>;
}

/// Newline-delimited list on disk, one path per line.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.gitlocalstats`
    pub fn in_home() -> Result<Self> {
        let home = dirs::home_dir().ok_or(StatsError::NoHomeDir)?;
        Ok(Self::new(home.join(STORE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RepoStore for FileStore {
    fn load(&self) -> Result<Vec<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "repository list not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let repos = merge_paths(Vec::new(), content.lines().map(str::to_string));
        debug!(path = %self.path.display(), count = repos.len(), "loaded repository list");
        Ok(repos)
    }

    fn save(&self, repos: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut content = repos.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), count = repos.len(), "saved repository list");
        Ok(())
    }
}

/// In-memory store, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    repos: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub fn new(repos: Vec<String>) -> Self {
        Self {
            repos: RefCell::new(repos),
        }
    }
}

impl RepoStore for MemoryStore {
    fn load(&self) -> Result<Vec<String>> {
        Ok(self.repos.borrow().clone())
    }

    fn save(&self, repos: &[String]) -> Result<()> {
        *self.repos.borrow_mut() = repos.to_vec();
        Ok(())
    }
}

/// Existing entries keep their order; unseen new entries are appended.
/// Blank entries are dropped and duplicates compare as exact strings.
pub fn merge_paths<I>(existing: Vec<String>, new: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(existing.len());
    for repo in existing.into_iter().chain(new) {
        if repo.trim().is_empty() {
            continue;
        }
        if seen.insert(repo.clone()) {
            merged.push(repo);
        }
    }
    merged
}
