#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use readiness::testkit::SubmissionBuilder;
use readiness::Submission;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory with input files, used as the working directory of the
/// binary so no stray `.readiness.toml` is picked up.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_json<T: Serialize>(&self, name: &str, records: &T) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, serde_json::to_string_pretty(records).expect("serialize fixture"))
            .expect("write fixture");
        path
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("readiness");
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .env_remove("READINESS_CONFIG")
            .env("NO_COLOR", "1");
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .args(["--format", "json"])
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

/// Pre and Post submissions for `participants` people in `cohort`, Pre rated
/// `pre` and Post rated `post` on every item.
pub fn cohort_submissions(cohort: &str, participants: usize, pre: i32, post: i32) -> Vec<Submission> {
    (1..=participants)
        .flat_map(|n| {
            let id = format!("{cohort}-p{n}");
            [
                SubmissionBuilder::pre(&id, cohort).uniform(pre).build(),
                SubmissionBuilder::post(&id, cohort).uniform(post).build(),
            ]
        })
        .collect()
}
