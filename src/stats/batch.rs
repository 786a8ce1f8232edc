use super::aggregate::{aggregate_commits, CommitHistogram, FileTypeHistogram};
use super::offset::Calendar;
use crate::error::{Result, StatsError};
use crate::model::{CommitRecord, RepoFailure};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Supplies the commit history of one repository.
pub trait CommitSource: Sync {
    fn commits(&self, repo_path: &Path) -> Result<Vec<CommitRecord>>;
}

/// What to do when a repository cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole run on the first failing repository.
    #[default]
    FailFast,
    /// Record the failure and carry on with the remaining repositories.
    KeepGoing,
}

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub jobs: usize,
    pub policy: FailurePolicy,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            policy: FailurePolicy::FailFast,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub commits: CommitHistogram,
    pub file_types: FileTypeHistogram,
    pub counted: u64,
    pub failures: Vec<RepoFailure>,
}

impl BatchOutcome {
    fn new(window_days: u32) -> Self {
        Self {
            commits: CommitHistogram::seeded(window_days),
            file_types: FileTypeHistogram::new(),
            counted: 0,
            failures: Vec::new(),
        }
    }

    fn absorb(&mut self, partial: RepoPartial) {
        self.commits.merge(&partial.commits);
        self.file_types.merge(&partial.file_types);
        self.counted += partial.counted;
    }

    fn fail(&mut self, repo: &str, err: StatsError, policy: FailurePolicy) -> Result<()> {
        match policy {
            FailurePolicy::FailFast => Err(err.in_repository(repo)),
            FailurePolicy::KeepGoing => {
                warn!(repo, error = %err, "skipping repository");
                self.failures.push(RepoFailure {
                    path: repo.to_string(),
                    error: err.to_string(),
                });
                Ok(())
            }
        }
    }
}

struct RepoPartial {
    commits: CommitHistogram,
    file_types: FileTypeHistogram,
    counted: u64,
}

fn aggregate_repository<S: CommitSource + ?Sized>(
    source: &S,
    repo: &str,
    email: &str,
    calendar: &Calendar,
) -> Result<RepoPartial> {
    let records = source.commits(Path::new(repo))?;
    let mut partial = RepoPartial {
        commits: CommitHistogram::default(),
        file_types: FileTypeHistogram::new(),
        counted: 0,
    };
    partial.counted = aggregate_commits(
        &records,
        email,
        calendar,
        &mut partial.commits,
        &mut partial.file_types,
    );
    debug!(repo, scanned = records.len(), counted = partial.counted, "repository aggregated");
    Ok(partial)
}

/// Aggregate every repository into one histogram pair.
///
/// With `jobs > 1` repositories are read on a worker pool, each into its own
/// partial histograms; partials are merged by a single reducer in list order.
pub fn process_repositories<S: CommitSource + ?Sized>(
    repos: &[String],
    source: &S,
    email: &str,
    calendar: &Calendar,
    options: BatchOptions,
    progress: &ProgressBar,
) -> Result<BatchOutcome> {
    let mut outcome = BatchOutcome::new(calendar.window_days());
    info!(repositories = repos.len(), jobs = options.jobs, "processing repositories");

    if options.jobs <= 1 {
        for repo in repos {
            progress.set_message(repo.clone());
            match source.commits(Path::new(repo)) {
                Ok(records) => {
                    outcome.counted += aggregate_commits(
                        &records,
                        email,
                        calendar,
                        &mut outcome.commits,
                        &mut outcome.file_types,
                    );
                }
                Err(err) => outcome.fail(repo, err, options.policy)?,
            }
            progress.inc(1);
        }
        return Ok(outcome);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs)
        .build()?;
    let partials: Vec<Result<RepoPartial>> = pool.install(|| {
        repos
            .par_iter()
            .map(|repo| {
                let partial = aggregate_repository(source, repo, email, calendar);
                progress.inc(1);
                partial
            })
            .collect()
    });

    for (repo, partial) in repos.iter().zip(partials) {
        match partial {
            Ok(partial) => outcome.absorb(partial),
            Err(err) => outcome.fail(repo, err, options.policy)?,
        }
    }
    Ok(outcome)
}
