//! Projection of annotation records into diagnostics.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::parser::{AnnotationRecord, AnnotationSeverity};
use crate::types::{Diagnostic, DiagnosticSeverity, Location, Position, Range, RelatedInformation};

impl From<AnnotationSeverity> for DiagnosticSeverity {
    fn from(severity: AnnotationSeverity) -> Self {
        match severity {
            AnnotationSeverity::Error => Self::Error,
            AnnotationSeverity::Warning => Self::Warning,
            AnnotationSeverity::Info => Self::Information,
            AnnotationSeverity::Hint => Self::Hint,
        }
    }
}

/// Zero-based range from 1-based line/column numbers. A 0 input clamps to 0.
fn zero_based_range(record: &AnnotationRecord) -> Range {
    Range::new(
        Position::new(
            record.start_line.saturating_sub(1),
            record.start_column.saturating_sub(1),
        ),
        Position::new(
            record.end_line.saturating_sub(1),
            record.end_column.saturating_sub(1),
        ),
    )
}

/// Project one record onto `target`, the resolved path of its file.
///
/// Each replacement becomes a related-information entry located at the
/// diagnostic's own range in `target`.
#[must_use]
pub fn project(record: &AnnotationRecord, target: &Path) -> Diagnostic {
    let range = zero_based_range(record);
    let related = record
        .replacements
        .iter()
        .map(|replacement| RelatedInformation {
            location: Location {
                path: target.to_path_buf(),
                range,
            },
            message: replacement.clone(),
        })
        .collect();

    Diagnostic::new(
        range,
        record.severity.into(),
        record.message.clone(),
        record.source.clone(),
    )
    .with_code(record.reference_code.clone())
    .with_related(related)
}

/// Resolve a record's `file` against the workspace root. Absolute paths are
/// kept. `.` components are dropped so every spelling of a file yields the
/// same store key.
#[must_use]
pub fn resolve_target(root: &Path, file: &str) -> PathBuf {
    let file = Path::new(file);
    let joined = if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    };
    joined.components().collect()
}

/// Project every group onto its resolved target.
///
/// Groups whose files resolve to the same target are combined in group
/// order, so each target appears once with its full diagnostic set.
#[must_use]
pub fn project_groups(
    groups: &IndexMap<String, Vec<AnnotationRecord>>,
    root: &Path,
) -> IndexMap<PathBuf, Vec<Diagnostic>> {
    let mut projected: IndexMap<PathBuf, Vec<Diagnostic>> = IndexMap::with_capacity(groups.len());
    for (file, records) in groups {
        let target = resolve_target(root, file);
        let diagnostics = records.iter().map(|r| project(r, &target));
        projected.entry(target.clone()).or_default().extend(diagnostics);
    }
    projected
}
