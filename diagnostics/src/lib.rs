//! Annotation ingestion: watch annotation files, parse them, and publish
//! the projected diagnostics per target file.

pub mod parser;
pub mod projector;
pub mod quickfix;
pub mod types;

mod manager;
mod store;
mod watcher;

pub use manager::{AnnotationError, AnnotationManager};
pub use parser::{AnnotationRecord, AnnotationSeverity, ParseError, group_by_file, parse_annotations};
pub use projector::{project, project_groups, resolve_target};
pub use quickfix::{QUICK_FIX_KIND, QuickFix, TextEdit, quick_fixes};
pub use store::DiagnosticsStore;
pub use types::{
    AnnotationEvent, AnnotationEventKind, Diagnostic, DiagnosticSeverity, DiagnosticsSummary,
    Location, Position, Range, RelatedInformation,
};
pub use watcher::{AnnotationWatcher, WatchError};
