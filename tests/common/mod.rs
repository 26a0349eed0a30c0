//! 統合テスト共通のヘルパー
//!
//! 一時ディレクトリにベースディレクトリとベアリポジトリを用意し、
//! 本物の `git` を使ってチェックアウトを作る。

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;
use tempfile::TempDir;

const AUTHOR_NAME: &str = "Coho Test";
const AUTHOR_EMAIL: &str = "coho-test@example.org";

/// テスト用のベースディレクトリ、リモート、HOMEをまとめたもの
pub struct TestWorkspace {
    base: TempDir,
    remotes: TempDir,
    home: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            base: TempDir::new().expect("base dir"),
            remotes: TempDir::new().expect("remotes dir"),
            home: TempDir::new().expect("home dir"),
        }
    }

    pub fn base(&self) -> &Path {
        self.base.path()
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// `coho` run from the base directory, isolated from the user's config.
    pub fn coho(&self) -> Command {
        self.coho_in(self.base())
    }

    pub fn coho_in(&self, dir: &Path) -> Command {
        let mut cmd = Command::cargo_bin("coho").expect("coho binary");
        cmd.current_dir(dir)
            .env("HOME", self.home())
            .env("GIT_AUTHOR_NAME", AUTHOR_NAME)
            .env("GIT_AUTHOR_EMAIL", AUTHOR_EMAIL)
            .env("GIT_COMMITTER_NAME", AUTHOR_NAME)
            .env("GIT_COMMITTER_EMAIL", AUTHOR_EMAIL)
            .env_remove("COHO_CONFIG")
            .env_remove("GITHUB_TOKEN")
            .env_remove("RUST_LOG")
            .arg("--no-color");
        cmd
    }

    /// Clone of a fresh bare repository named `repo_name`, on `master`, with
    /// one pushed commit.
    pub fn checkout(&self, repo_name: &str) -> PathBuf {
        let bare = self.remotes.path().join(format!("{}.git", repo_name));
        std::fs::create_dir_all(&bare).expect("bare dir");
        git(&bare, &["init", "--bare", "-q"]);
        git(&bare, &["symbolic-ref", "HEAD", "refs/heads/master"]);

        let bare_url = bare.display().to_string();
        git(self.base(), &["clone", "-q", &bare_url, repo_name]);
        let dir = self.base().join(repo_name);
        git(&dir, &["symbolic-ref", "HEAD", "refs/heads/master"]);

        write_file(&dir, "README.md", "# test\n");
        commit_all(&dir, "Initial commit");
        git(&dir, &["push", "-q", "origin", "master"]);
        dir
    }
}

/// Run git in `dir` and return its stdout. Panics on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = StdCommand::new("git")
        .current_dir(dir)
        .args(["-c", &format!("user.name={}", AUTHOR_NAME)])
        .args(["-c", &format!("user.email={}", AUTHOR_EMAIL)])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn write_file(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

pub fn commit_all(dir: &Path, message: &str) {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", message]);
}
