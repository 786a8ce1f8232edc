use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Trailing window, in days, tracked by the heatmap.
pub const DEFAULT_WINDOW_DAYS: u32 = 183;
pub const MAX_WINDOW_DAYS: u32 = 3660;

/// Number of file types shown in the ranking table.
pub const DEFAULT_TOP_FILE_TYPES: usize = 10;

pub const DEFAULT_EMAIL: &str = "your@email.com";

/// Histogram key for file names without an extension.
pub const NO_EXTENSION: &str = "no_extension";

/// One commit as reported by a history provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub author_email: String,
    pub timestamp: DateTime<FixedOffset>,
    pub changed_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedFileType {
    pub extension: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoFailure {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketCount {
    pub bucket: usize,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub email: String,
    pub window_days: u32,
    pub alignment_offset: u32,
    pub total_commits: u64,
    pub buckets: Vec<BucketCount>,
    pub file_types: Vec<RankedFileType>,
    pub failures: Vec<RepoFailure>,
}
