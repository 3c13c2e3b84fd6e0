//! Configuration loading, sanitizing, and layered merging.
//!
//! Resolution runs in three stages:
//!
//! 1. [`loader`] reads the live settings store and the workspace fallback
//!    file into untyped JSON. Failures become "absent" and are logged.
//! 2. [`sanitize`] projects one untyped document into a [`ConfigDocument`],
//!    trimming strings and dropping malformed or duplicate records.
//! 3. [`merge`] layers the live document (mask) over the fallback (base)
//!    when the live document opts in with `mergeConfigs`.
//!
//! [`resolve`] ties the stages together and always yields a valid document.

pub mod loader;
pub mod merge;
mod resolve;
pub mod sanitize;

pub use lintlens_types::ConfigDocument;
pub use loader::{
    ConfigError, FALLBACK_CONFIG_PATH, JsonSettingsStore, SettingsStore, default_settings_path,
    load_fallback, load_live,
};
pub use merge::{array_merge, keep_mask, merge_documents};
pub use resolve::{ConfigSources, resolve, resolve_workspace};
pub use sanitize::sanitize;
