//! Shared test utilities and fixtures
//!
//! Workspaces are temporary directories holding an optional fallback config,
//! an optional live settings file, and annotation files.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use lintlens_config::FALLBACK_CONFIG_PATH;
use serde_json::{Value, json};
use tempfile::TempDir;

pub struct Workspace {
    _dir: TempDir,
    root: PathBuf,
}

impl Workspace {
    /// A fresh workspace with a canonical root, so paths reported by the
    /// file watcher compare equal to paths built here.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        Self { _dir: dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn roots(&self) -> Vec<PathBuf> {
        vec![self.root.clone()]
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn write_fallback(&self, document: &Value) {
        self.write_json(FALLBACK_CONFIG_PATH, document);
    }

    /// Write a live settings file and return its path.
    pub fn write_settings(&self, settings: &Value) -> PathBuf {
        self.write_json("host/settings.json", settings)
    }

    pub fn write_json(&self, relative: &str, value: &Value) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
        path
    }
}

/// One annotation record as an external linter would emit it.
pub fn annotation(file: &str, line: u32, severity: &str, replacements: &[&str]) -> Value {
    json!({
        "source": "hlint",
        "severity": severity,
        "file": file,
        "startLine": line,
        "startColumn": 1,
        "endLine": line,
        "endColumn": 5,
        "message": format!("{severity} at line {line}"),
        "replacements": replacements
    })
}
