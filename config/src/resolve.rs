//! Resolution engine: pick, sanitize, and optionally merge config sources.

use std::path::PathBuf;

use lintlens_types::ConfigDocument;
use serde_json::Value;

use crate::loader::{SettingsStore, load_fallback, load_live};
use crate::merge::merge_documents;
use crate::sanitize::sanitize;

/// The two raw documents a resolution starts from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSources {
    /// Live settings (mask).
    pub live: Option<Value>,
    /// Workspace fallback file (base).
    pub fallback: Option<Value>,
}

impl ConfigSources {
    /// Read both sources. Unavailable sources are `None`.
    pub fn load(store: Option<&dyn SettingsStore>, workspace_roots: &[PathBuf]) -> Self {
        Self {
            live: store.and_then(load_live),
            fallback: load_fallback(workspace_roots),
        }
    }
}

/// Resolve the configuration document for a session.
///
/// The live document is merged over the fallback only when it sets
/// `mergeConfigs` and a fallback exists. Otherwise the live document wins if
/// present, then the fallback, then the empty document. Whatever is selected
/// is sanitized; a merge always sees two sanitized documents.
#[must_use]
pub fn resolve(sources: &ConfigSources) -> ConfigDocument {
    let live = sources.live.as_ref().map(sanitize);
    match (live, sources.fallback.as_ref()) {
        (Some(live), Some(fallback)) if live.merge_enabled() => {
            tracing::debug!("Merging live settings over fallback config");
            merge_documents(live, sanitize(fallback))
        }
        (Some(live), _) => live,
        (None, Some(fallback)) => sanitize(fallback),
        (None, None) => {
            tracing::debug!("No configuration sources; using empty document");
            ConfigDocument::default()
        }
    }
}

/// Load and resolve in one step.
#[must_use]
pub fn resolve_workspace(
    store: Option<&dyn SettingsStore>,
    workspace_roots: &[PathBuf],
) -> ConfigDocument {
    let document = resolve(&ConfigSources::load(store, workspace_roots));
    tracing::info!(
        languages = document.languages.len(),
        merged = document.merge_enabled(),
        "Configuration resolved"
    );
    document
}
