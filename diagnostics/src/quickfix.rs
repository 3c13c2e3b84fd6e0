//! Quick-fix synthesis from related information.

use std::path::PathBuf;

use crate::types::{Diagnostic, Range};

pub const QUICK_FIX_KIND: &str = "quickfix";

/// Replace `range` in `path` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub path: PathBuf,
    pub range: Range,
    pub new_text: String,
}

/// A fix action scoped to a single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickFix {
    /// The diagnostic's own message, not the replacement text.
    pub title: String,
    pub kind: &'static str,
    pub diagnostic: Diagnostic,
    pub edit: TextEdit,
}

/// One fix per related-information entry. Each replaces the diagnostic's
/// range in the entry's file with the entry's message.
#[must_use]
pub fn quick_fixes(diagnostic: &Diagnostic) -> Vec<QuickFix> {
    diagnostic
        .related()
        .iter()
        .map(|info| QuickFix {
            title: diagnostic.message().to_string(),
            kind: QUICK_FIX_KIND,
            diagnostic: diagnostic.clone(),
            edit: TextEdit {
                path: info.location.path.clone(),
                range: diagnostic.range(),
                new_text: info.message.clone(),
            },
        })
        .collect()
}
