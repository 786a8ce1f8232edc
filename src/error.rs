use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not resolve the user home directory")]
    NoHomeDir,
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Directory walk error: {0}")]
    Walk(#[from] ignore::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Worker pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Repository {}: {source}", .path.display())]
    Repository {
        path: PathBuf,
        #[source]
        source: Box<StatsError>,
    },
    #[error("Git error: {0}")]
    Git(#[from] Box<gix::open::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
    #[error("Signature time error: {0}")]
    SignatureTime(#[from] Box<gix::date::parse::Error>),
}

impl StatsError {
    /// Tag an error with the repository it came from.
    pub fn in_repository(self, path: impl Into<PathBuf>) -> Self {
        match self {
            already @ StatsError::Repository { .. } => already,
            other => StatsError::Repository {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::open::Error> for StatsError {
    fn from(err: gix::open::Error) -> Self {
        StatsError::Git(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for StatsError {
    fn from(err: gix::object::commit::Error) -> Self {
        StatsError::Commit(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for StatsError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        StatsError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for StatsError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        StatsError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for StatsError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        StatsError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for StatsError {
    fn from(err: gix::objs::decode::Error) -> Self {
        StatsError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for StatsError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        StatsError::DiffTreeToTree(Box::new(err))
    }
}

impl From<gix::date::parse::Error> for StatsError {
    fn from(err: gix::date::parse::Error) -> Self {
        StatsError::SignatureTime(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_tag_is_not_nested() {
        let err = StatsError::NoHomeDir
            .in_repository("/tmp/a")
            .in_repository("/tmp/b");
        match err {
            StatsError::Repository { path, source } => {
                assert_eq!(path, PathBuf::from("/tmp/a"));
                assert!(matches!(*source, StatsError::NoHomeDir));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
