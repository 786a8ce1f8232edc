use assert_cmd::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};
use tempfile::tempdir;

const AUTHOR: &str = "you@example.com";

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(dir: &Path, args: &[&str]) {
    assert!(Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn init_git_repo(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    git(dir, &["init"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "user.email", AUTHOR]);
    git(dir, &["config", "user.name", "Your Name"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

fn commit_file(dir: &Path, name: &str, content: &str) {
    write_and_stage(dir, name, content);
    git(dir, &["commit", "-m", &format!("add {name}")]);
}

/// Commit with an explicit author date; the committer date stays at now.
fn commit_file_dated(dir: &Path, name: &str, content: &str, author_date: &str) {
    write_and_stage(dir, name, content);
    assert!(Command::new("git")
        .args(["commit", "-m", &format!("add {name}")])
        .env("GIT_AUTHOR_DATE", author_date)
        .env_remove("GIT_COMMITTER_DATE")
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn write_and_stage(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();
    git(dir, &["add", "."]);
}

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("gitlocalstats").unwrap();
    cmd.env_remove("GITLOCALSTATS_EMAIL")
        .env_remove("GITLOCALSTATS_STORE")
        .env_remove("RUST_LOG");
    cmd
}

fn stats_json(store: &Path, email: &str, extra: &[&str]) -> serde_json::Value {
    let out = bin()
        .arg("--store")
        .arg(store)
        .args(["--email", email, "--json"])
        .args(extra)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn add_then_stats_counts_own_commits() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap().join("code");
    let repo = root.join("proj");
    init_git_repo(&repo);
    commit_file(&repo, "src/a.rs", "fn a(){}\n");
    commit_file(&repo, "notes", "todo\n");
    fs::create_dir_all(root.join("node_modules").join("dep").join(".git")).unwrap();

    let store = dir.path().join("list");
    let out = bin()
        .arg("--store")
        .arg(&store)
        .arg("--add")
        .arg(&root)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Found folders:"));
    assert!(text.contains(&repo.display().to_string()));
    assert!(!text.contains("node_modules"));

    let listed = fs::read_to_string(&store).unwrap();
    assert_eq!(listed.lines().collect::<Vec<_>>(), vec![repo.to_str().unwrap()]);

    let v = stats_json(&store, AUTHOR, &[]);
    assert_eq!(v["total_commits"].as_u64(), Some(2));
    let types = v["file_types"].as_array().unwrap();
    assert!(types.iter().any(|t| t["extension"] == ".rs" && t["count"] == 1));
    assert!(types.iter().any(|t| t["extension"] == "no_extension" && t["count"] == 1));

    let other = stats_json(&store, "someone@else.com", &[]);
    assert_eq!(other["total_commits"].as_u64(), Some(0));
    assert!(other["file_types"].as_array().unwrap().is_empty());
}

#[test]
fn commits_are_dated_by_author_time() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    let repo = dir.path().canonicalize().unwrap().join("proj");
    init_git_repo(&repo);

    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
    let authored = now - 20 * 86_400;
    commit_file_dated(&repo, "old.rs", "fn old(){}\n", &format!("@{authored} +0000"));

    let store = dir.path().join("list");
    fs::write(&store, format!("{}\n", repo.display())).unwrap();

    let v = stats_json(&store, AUTHOR, &[]);
    assert_eq!(v["total_commits"].as_u64(), Some(1));
    let offset = v["alignment_offset"].as_u64().unwrap();
    let count_at = |bucket: u64| {
        v["buckets"]
            .as_array()
            .unwrap()
            .iter()
            .find(|b| b["bucket"].as_u64() == Some(bucket))
            .and_then(|b| b["count"].as_u64())
    };
    assert_eq!(count_at(offset + 20), Some(1));
    assert_eq!(count_at(offset), Some(0));
}

#[test]
fn adding_twice_does_not_duplicate() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap().join("code");
    init_git_repo(&root.join("one"));
    let store = dir.path().join("list");

    for _ in 0..2 {
        bin()
            .arg("--store")
            .arg(&store)
            .arg("--add")
            .arg(&root)
            .assert()
            .success();
    }
    assert_eq!(fs::read_to_string(&store).unwrap().lines().count(), 1);
}

#[test]
fn unreadable_repository_aborts_unless_keep_going() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    let repo = dir.path().canonicalize().unwrap().join("proj");
    init_git_repo(&repo);
    commit_file(&repo, "main.go", "package main\n");

    let store = dir.path().join("list");
    let broken = dir.path().join("not-a-repo");
    fs::create_dir_all(&broken).unwrap();
    fs::write(
        &store,
        format!("{}\n{}\n", repo.display(), broken.display()),
    )
    .unwrap();

    bin()
        .arg("--store")
        .arg(&store)
        .args(["--email", AUTHOR, "--json"])
        .assert()
        .failure();

    for jobs in ["1", "2"] {
        let v = stats_json(&store, AUTHOR, &["--keep-going", "--jobs", jobs]);
        assert_eq!(v["total_commits"].as_u64(), Some(1));
        let failures = v["failures"].as_array().unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0]["path"], broken.to_string_lossy().as_ref());
    }
}

#[test]
fn terminal_view_renders_grid_and_ranking() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    let repo = dir.path().canonicalize().unwrap().join("proj");
    init_git_repo(&repo);
    commit_file(&repo, "lib.rs", "pub fn hi(){}\n");

    let store = dir.path().join("list");
    fs::write(&store, format!("{}\n", repo.display())).unwrap();

    let out = bin()
        .arg("--store")
        .arg(&store)
        .args(["--email", AUTHOR, "--no-color"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains('\u{1b}'));
    assert!(text.contains(" Mon "));
    assert!(text.contains(" Wed "));
    assert!(text.contains(" Fri "));
    assert!(text.contains(".rs"));
    assert!(text.contains("1 commits by you@example.com across 1 repositories"));
}

#[test]
fn empty_store_still_renders() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("list");
    let v = stats_json(&store, AUTHOR, &[]);
    assert_eq!(v["total_commits"].as_u64(), Some(0));
    assert_eq!(v["buckets"].as_array().unwrap().len(), 183);
}
