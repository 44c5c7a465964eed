//! Common test utilities for costfold integration tests
//!
//! Fixture documents are written into a temporary directory that lives as
//! long as the returned `TestEnvironment`.
#![allow(dead_code)]

use serde_json::json;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        TestEnvironment {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Get a path within the test environment
    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// Path as a string argument for the binary
    pub fn arg(&self, relative: &str) -> String {
        self.path(relative).to_string_lossy().into_owned()
    }

    /// Write raw contents to `relative`
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        std::fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    /// Write a one-project estimate with a single priced instance
    pub fn write_estimate(&self, relative: &str, project: &str, monthly: &str) -> PathBuf {
        self.write(
            relative,
            &estimate_json("0.1", project, &[(&format!("aws_instance.{}", project), monthly, false)]),
        )
    }
}

/// Build a cost estimate document. Each resource is `(name, monthly, skipped)`.
pub fn estimate_json(version: &str, project: &str, resources: &[(&str, &str, bool)]) -> String {
    let resources: Vec<_> = resources
        .iter()
        .map(|(name, monthly, skipped)| {
            if *skipped {
                json!({ "name": name, "isSkipped": true, "skipReason": "not supported yet" })
            } else {
                json!({
                    "name": name,
                    "monthlyCost": monthly,
                    "costComponents": [{
                        "name": "Instance usage",
                        "unit": "hours",
                        "monthlyQuantity": "730",
                        "price": "0.01",
                        "monthlyCost": monthly
                    }]
                })
            }
        })
        .collect();

    json!({
        "version": version,
        "currency": "USD",
        "projects": [{
            "name": project,
            "breakdown": { "resources": resources }
        }]
    })
    .to_string()
}

/// Run the costfold binary with a clean environment for its own variables
pub fn run_costfold(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_costfold"))
        .args(args)
        .env_remove("COSTFOLD_CONFIG")
        .env_remove("COSTFOLD_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run costfold")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
