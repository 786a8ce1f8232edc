use super::offset::Calendar;
use crate::model::{CommitRecord, NO_EXTENSION};
use std::collections::BTreeMap;

/// Commit counts keyed by aligned day bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitHistogram {
    counts: BTreeMap<usize, u64>,
}

impl CommitHistogram {
    /// Histogram with keys `1..=window_days` present at zero, so empty days
    /// still produce cells.
    pub fn seeded(window_days: u32) -> Self {
        let counts = (1..=window_days as usize).map(|k| (k, 0)).collect();
        Self { counts }
    }

    pub fn increment(&mut self, bucket: usize) {
        *self.counts.entry(bucket).or_insert(0) += 1;
    }

    pub fn get(&self, bucket: usize) -> u64 {
        self.counts.get(&bucket).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Ascending by bucket.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn merge(&mut self, other: &CommitHistogram) {
        for (bucket, count) in other.iter() {
            *self.counts.entry(bucket).or_insert(0) += count;
        }
    }
}

/// Changed-file counts keyed by extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTypeHistogram {
    counts: BTreeMap<String, u64>,
}

impl FileTypeHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, file_name: &str) {
        *self.counts.entry(extension_of(file_name).to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, extension: &str) -> u64 {
        self.counts.get(extension).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn merge(&mut self, other: &FileTypeHistogram) {
        for (ext, count) in other.iter() {
            *self.counts.entry(ext.to_string()).or_insert(0) += count;
        }
    }
}

/// Last `.`-suffix of the final path component, dot included and case kept.
pub fn extension_of(path: &str) -> &str {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => NO_EXTENSION,
    }
}

/// Fold one repository's commits into the histograms. Only exact,
/// case-sensitive email matches count; returns how many commits were counted.
pub fn aggregate_commits<'a, I>(
    commits: I,
    email: &str,
    calendar: &Calendar,
    histogram: &mut CommitHistogram,
    file_types: &mut FileTypeHistogram,
) -> u64
where
    I: IntoIterator<Item = &'a CommitRecord>,
{
    let mut counted = 0;
    for commit in commits {
        if commit.author_email != email {
            continue;
        }
        let Some(bucket) = calendar.bucket(&commit.timestamp) else {
            continue;
        };
        histogram.increment(bucket);
        for file in &commit.changed_files {
            file_types.record(file);
        }
        counted += 1;
    }
    counted
}
