//! Core configuration types for lintlens.
//!
//! This crate contains the resolved configuration model with no IO, no async,
//! and minimal dependencies. Both the config pipeline (which produces these
//! values) and the diagnostics pipeline (which consumes them) depend on it.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod settings;
mod transform;

pub use settings::{
    AnnotationSourceConfig, ConfigDocument, ImportsProviderConfig, ImportsProviderError,
    LanguageConfig, TagsConfig,
};
pub use transform::{Fragment, Transformation};
