use super::batch::{process_repositories, BatchOptions, BatchOutcome, CommitSource};
use super::grid::CalendarGrid;
use super::offset::Calendar;
use super::rank::{top_file_types, write_table};
use super::render::{HeatmapRenderer, Palette};
use crate::git::GitHistory;
use crate::model::{
    BucketCount, RankedFileType, StatsOutput, DEFAULT_EMAIL, DEFAULT_TOP_FILE_TYPES,
    DEFAULT_WINDOW_DAYS, SCHEMA_VERSION,
};
use crate::store::{FileStore, RepoStore};
use anyhow::Context;
use chrono::Utc;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::warn;

/// Resolved settings for one stats run.
#[derive(Debug, Clone)]
pub struct StatsOptions {
    pub email: String,
    pub window_days: u32,
    pub top: usize,
    pub batch: BatchOptions,
    pub json: bool,
    pub colored: bool,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL.to_string(),
            window_days: DEFAULT_WINDOW_DAYS,
            top: DEFAULT_TOP_FILE_TYPES,
            batch: BatchOptions::default(),
            json: false,
            colored: false,
        }
    }
}

pub fn exec(options: StatsOptions, store_path: Option<PathBuf>) -> anyhow::Result<()> {
    let store = match store_path {
        Some(path) => FileStore::new(path),
        None => FileStore::in_home().context("Failed to locate repository list")?,
    };
    let source = GitHistory::new().diff_only_for(options.email.clone());
    let calendar = Calendar::local(options.window_days);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_stats(&options, &store, &source, &calendar, &mut out)
}

/// Load the registered repositories, aggregate them, and write the report.
pub fn run_stats<R, S, W>(
    options: &StatsOptions,
    store: &R,
    source: &S,
    calendar: &Calendar,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: RepoStore + ?Sized,
    S: CommitSource + ?Sized,
    W: Write,
{
    let repos = store.load().context("Failed to read repository list")?;
    if repos.is_empty() {
        warn!("no repositories registered, use --add <folder> first");
    }

    let progress = progress_bar(repos.len() as u64, !options.json);
    let outcome = process_repositories(
        &repos,
        source,
        &options.email,
        calendar,
        options.batch,
        &progress,
    )
    .context("Failed to aggregate commit history")?;
    progress.finish_and_clear();

    let ranked = top_file_types(&outcome.file_types, options.top);

    if options.json {
        output_json(&outcome, &ranked, options, calendar, out)?;
    } else {
        output_terminal(&outcome, &ranked, options, calendar, repos.len(), out)?;
    }
    Ok(())
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

fn output_json<W: Write>(
    outcome: &BatchOutcome,
    ranked: &[RankedFileType],
    options: &StatsOptions,
    calendar: &Calendar,
    out: &mut W,
) -> anyhow::Result<()> {
    let output = StatsOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        email: options.email.clone(),
        window_days: calendar.window_days(),
        alignment_offset: calendar.alignment_offset(),
        total_commits: outcome.counted,
        buckets: outcome
            .commits
            .iter()
            .map(|(bucket, count)| BucketCount { bucket, count })
            .collect(),
        file_types: ranked.to_vec(),
        failures: outcome.failures.clone(),
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

fn output_terminal<W: Write>(
    outcome: &BatchOutcome,
    ranked: &[RankedFileType],
    options: &StatsOptions,
    calendar: &Calendar,
    repo_count: usize,
    out: &mut W,
) -> anyhow::Result<()> {
    let grid = CalendarGrid::build(&outcome.commits);
    HeatmapRenderer::new(calendar, Palette::new(options.colored)).render(&grid, out)?;
    writeln!(out)?;

    write_table(ranked, options.colored, out)?;
    writeln!(out)?;

    let scanned = repo_count - outcome.failures.len();
    writeln!(
        out,
        "{} commits by {} across {} repositories",
        style(outcome.counted).cyan().force_styling(options.colored),
        options.email,
        scanned
    )?;

    if !outcome.failures.is_empty() {
        writeln!(
            out,
            "{}",
            style(format!("Skipped {} repositories:", outcome.failures.len()))
                .yellow()
                .force_styling(options.colored)
        )?;
        for failure in &outcome.failures {
            writeln!(out, "  {}: {}", failure.path, failure.error)?;
        }
    }
    Ok(())
}
