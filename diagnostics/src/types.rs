//! Public types consumed by hosts.
//!
//! These types define the interface between `lintlens-diagnostics` and its
//! host. The host receives [`AnnotationEvent`]s from the watcher and reads
//! a [`DiagnosticsSummary`] for its status line.

use std::path::{Path, PathBuf};

/// Zero-based position in a text document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[must_use]
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Zero-based half-open range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Whether the two ranges share at least one position. Touching ranges
    /// count, so an empty cursor range at a diagnostic's edge intersects it.
    #[must_use]
    pub fn intersects(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// A range inside a specific file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub range: Range,
}

/// Secondary message attached to a diagnostic. Annotation replacements are
/// carried here, one entry per candidate text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInformation {
    pub location: Location,
    pub message: String,
}

/// Severity level for a diagnostic, numbered as in LSP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    Error = 1,
    Warning = 2,
    Information = 3,
    Hint = 4,
}

impl DiagnosticSeverity {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "info",
            Self::Hint => "hint",
        }
    }
}

/// A single projected diagnostic.
///
/// Fields are private. External consumers read via accessors; the projector
/// is the usual construction path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    range: Range,
    severity: DiagnosticSeverity,
    message: String,
    /// Tool that produced the annotation (e.g. "hlint").
    source: String,
    code: Option<String>,
    related: Vec<RelatedInformation>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(range: Range, severity: DiagnosticSeverity, message: String, source: String) -> Self {
        Self {
            range,
            severity,
            message,
            source,
            code: None,
            related: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    #[must_use]
    pub fn with_related(mut self, related: Vec<RelatedInformation>) -> Self {
        self.related = related;
        self
    }

    #[must_use]
    pub fn range(&self) -> Range {
        self.range
    }

    #[must_use]
    pub fn severity(&self) -> DiagnosticSeverity {
        self.severity
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    #[must_use]
    pub fn related(&self) -> &[RelatedInformation] {
        &self.related
    }

    /// Format as `path:line:col: severity: [source] message` (1-indexed for display).
    #[must_use]
    pub fn display_with_path(&self, path: &Path) -> String {
        let mut line = format!(
            "{}:{}:{}: {}: [{}] {}",
            path.display(),
            self.range.start.line + 1,
            self.range.start.character + 1,
            self.severity.label(),
            self.source,
            self.message,
        );
        if let Some(code) = &self.code {
            line.push_str(&format!(" ({code})"));
        }
        line
    }
}

/// What happened to an annotation source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationEventKind {
    Created,
    Changed,
    Deleted,
}

/// A file-system event for a file matching an annotation pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationEvent {
    pub kind: AnnotationEventKind,
    /// Absolute path of the annotation source file.
    pub path: PathBuf,
    /// Workspace root the matching watch was registered under. Relative
    /// target paths inside the file resolve against it.
    pub root: PathBuf,
}

/// Counts over everything currently published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticsSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl DiagnosticsSummary {
    pub(crate) fn record(&mut self, items: &[Diagnostic]) {
        self.files += 1;
        for diagnostic in items {
            match diagnostic.severity() {
                DiagnosticSeverity::Error => self.errors += 1,
                DiagnosticSeverity::Warning => self.warnings += 1,
                DiagnosticSeverity::Information | DiagnosticSeverity::Hint => {}
            }
        }
    }

    /// No file has published diagnostics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files == 0
    }

    /// Compact status line, e.g. `"E:2 W:1"`. Empty when there are no
    /// errors or warnings.
    #[must_use]
    pub fn status_string(&self) -> String {
        match (self.errors, self.warnings) {
            (0, 0) => String::new(),
            (e, 0) => format!("E:{e}"),
            (0, w) => format!("W:{w}"),
            (e, w) => format!("E:{e} W:{w}"),
        }
    }
}
