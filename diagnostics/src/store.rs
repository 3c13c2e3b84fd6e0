//! Published diagnostics, keyed by target file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::types::{Diagnostic, DiagnosticsSummary};

#[derive(Debug, Default)]
pub struct DiagnosticsStore {
    by_target: HashMap<PathBuf, Vec<Diagnostic>>,
}

impl DiagnosticsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything published for `target`. An empty list unpublishes it.
    pub fn set(&mut self, target: PathBuf, diagnostics: Vec<Diagnostic>) {
        if diagnostics.is_empty() {
            self.by_target.remove(&target);
        } else {
            self.by_target.insert(target, diagnostics);
        }
    }

    /// Unpublish exactly `target`. Returns whether anything was stored.
    pub fn delete(&mut self, target: &Path) -> bool {
        self.by_target.remove(target).is_some()
    }

    #[must_use]
    pub fn get(&self, target: &Path) -> &[Diagnostic] {
        self.by_target.get(target).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn summary(&self) -> DiagnosticsSummary {
        let mut summary = DiagnosticsSummary::default();
        for diagnostics in self.by_target.values() {
            summary.record(diagnostics);
        }
        summary
    }
}
