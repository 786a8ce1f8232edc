use crate::error::{Result, StatsError};
use crate::model::CommitRecord;
use crate::stats::CommitSource;
use chrono::{DateTime, FixedOffset};
use gix::object::tree::diff::ChangeDetached;
use gix::{ObjectId, Repository};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open the repository rooted exactly at `path`; parents are not searched.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = gix::open(path.as_ref())?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every commit reachable from HEAD, each visited once. Changed files are
    /// only computed for commits whose author email equals `diff_author`, or
    /// for all commits when it is `None`.
    pub fn collect_commits(&self, diff_author: Option<&str>) -> Result<Vec<CommitRecord>> {
        let mut head = self.repo.head()?;
        let head_commit = head.peel_to_commit_in_place()?;

        let mut commits = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head_commit.id]);

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            // Author time, not committer time.
            let author = commit.author()?;
            let time = author.time()?;
            let timestamp = to_datetime(time.seconds, time.offset)?;
            let author_email = author.email.to_string();
            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();

            let wants_files = diff_author.map_or(true, |a| a == author_email);
            let changed_files = if wants_files {
                self.changed_files(commit_id, parents.first().copied())?
            } else {
                Vec::new()
            };
            trace!(commit = %commit_id, files = changed_files.len(), "commit read");

            commits.push(CommitRecord {
                author_email,
                timestamp,
                changed_files,
            });

            for pid in parents {
                stack.push_back(pid);
            }
        }

        debug!(path = %self.path.display(), commits = commits.len(), "history collected");
        Ok(commits)
    }

    /// Paths touched relative to the first parent, or everything for a root commit.
    fn changed_files(&self, commit_id: ObjectId, parent_id: Option<ObjectId>) -> Result<Vec<String>> {
        let commit_tree = self.repo.find_commit(commit_id)?.tree()?;
        let changes: Vec<ChangeDetached> = match parent_id {
            Some(parent_id) => {
                let parent_tree = self.repo.find_commit(parent_id)?.tree()?;
                self.repo
                    .diff_tree_to_tree(Some(&parent_tree), Some(&commit_tree), None)?
            }
            None => self.repo.diff_tree_to_tree(None, Some(&commit_tree), None)?,
        };

        let mut files = Vec::with_capacity(changes.len());
        for change in changes {
            if let Some(path) = file_location(&change) {
                files.push(path);
            }
        }
        Ok(files)
    }
}

fn file_location(change: &ChangeDetached) -> Option<String> {
    let (location, mode) = match change {
        ChangeDetached::Addition {
            location,
            entry_mode,
            ..
        }
        | ChangeDetached::Deletion {
            location,
            entry_mode,
            ..
        }
        | ChangeDetached::Modification {
            location,
            entry_mode,
            ..
        }
        | ChangeDetached::Rewrite {
            location,
            entry_mode,
            ..
        } => (location, entry_mode),
    };
    if mode.is_tree() {
        None
    } else {
        Some(location.to_string())
    }
}

fn to_datetime(seconds: i64, offset_seconds: i32) -> Result<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(offset_seconds)
        .ok_or_else(|| StatsError::InvalidTimestamp(format!("Invalid offset: {offset_seconds}")))?;
    DateTime::from_timestamp(seconds, 0)
        .map(|utc| utc.with_timezone(&offset))
        .ok_or_else(|| StatsError::InvalidTimestamp(format!("Invalid timestamp: {seconds}")))
}

/// History provider backed by on-disk git repositories.
#[derive(Debug, Clone, Default)]
pub struct GitHistory {
    diff_author: Option<String>,
}

impl GitHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip tree diffs for commits by anyone other than `email`.
    pub fn diff_only_for(mut self, email: impl Into<String>) -> Self {
        self.diff_author = Some(email.into());
        self
    }
}

impl CommitSource for GitHistory {
    fn commits(&self, repo_path: &Path) -> Result<Vec<CommitRecord>> {
        let repo = GitRepo::open(repo_path)?;
        debug!(path = %repo.path().display(), "opened repository");
        repo.collect_commits(self.diff_author.as_deref())
    }
}
