use crate::error::Result;
use crate::git::discover;
use crate::store::{merge_paths, FileStore, RepoStore};
use anyhow::Context;
use console::style;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub discovered: Vec<PathBuf>,
    pub added: usize,
}

/// Discover repositories under `root` and merge them into `store`.
pub fn register<R: RepoStore + ?Sized>(root: &Path, store: &R) -> Result<Registration> {
    let discovered = discover(root)?;
    let existing = store.load()?;
    let before = existing.len();

    let merged = merge_paths(
        existing,
        discovered.iter().map(|p| p.to_string_lossy().into_owned()),
    );
    store.save(&merged)?;

    let added = merged.len() - before;
    info!(root = %root.display(), found = discovered.len(), added, "registered repositories");
    Ok(Registration { discovered, added })
}

pub fn exec(root: PathBuf, store_path: Option<PathBuf>) -> anyhow::Result<()> {
    let store = match store_path {
        Some(path) => FileStore::new(path),
        None => FileStore::in_home().context("Failed to locate repository list")?,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_register(&root, &store, &mut out)
}

pub fn run_register<R, W>(root: &Path, store: &R, out: &mut W) -> anyhow::Result<()>
where
    R: RepoStore + ?Sized,
    W: Write,
{
    let registration = register(root, store)
        .with_context(|| format!("Failed to register repositories under {}", root.display()))?;

    writeln!(out, "{}", style("Found folders:").bold())?;
    writeln!(out)?;
    for repo in &registration.discovered {
        writeln!(out, "{}", repo.display())?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Successfully added {} new repositories",
        registration.added
    )?;
    Ok(())
}
