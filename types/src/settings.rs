//! Resolved configuration types shared across crates.
//!
//! These types represent sanitized configuration state. Raw documents are
//! untyped `serde_json::Value`s; `lintlens-config` resolves them into these
//! types at the sanitize boundary, so every value that reaches a consumer
//! upholds:
//!
//! - string fields are trimmed and non-empty (empty means absent);
//! - `languages` is unique by `language_id`, `tags` and `annotations` by `file`;
//! - an imports provider has a non-empty template and match pattern.
//!
//! Values are never patched in place. Reconfiguration builds a new
//! [`ConfigDocument`] and hands it to every consumer.

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::transform::Transformation;

/// Placeholder substituted with the derived module name in `importLine`.
const MODULE_PLACEHOLDER: &str = "${module}";

/// Placeholder substituted with the encoded query in `apiSearchUrl`.
const QUERY_PLACEHOLDER: &str = "${query}";

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal_output: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<LanguageConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose_output: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_configs: Option<bool>,
    /// Path to the external tool the tags integration shells out to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_tool_path: Option<String>,
}

impl ConfigDocument {
    #[must_use]
    pub fn language(&self, language_id: &str) -> Option<&LanguageConfig> {
        self.languages
            .iter()
            .find(|lang| lang.language_id == language_id)
    }

    /// Whether the live document asks to be layered over the fallback file.
    #[must_use]
    pub fn merge_enabled(&self) -> bool {
        self.merge_configs.unwrap_or(false)
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.verbose_output.unwrap_or(false)
    }
}

/// Per-language tooling, keyed by `language_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfig {
    pub language_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_save_command: Option<String>,
    /// Documentation search URL with a `${query}` placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_search_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagsConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationSourceConfig>,
}

impl LanguageConfig {
    /// Expand the documentation search template for `query`.
    ///
    /// The query is form-encoded. Templates without a placeholder are
    /// returned as-is.
    #[must_use]
    pub fn api_search_url(&self, query: &str) -> Option<String> {
        let template = self.api_search_url.as_deref()?;
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        Some(template.replace(QUERY_PLACEHOLDER, &encoded))
    }

    /// Annotation file patterns, in configuration order.
    pub fn annotation_patterns(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().map(|source| source.file.as_str())
    }
}

/// A tags file and the capabilities it backs, keyed by `file`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagsConfig {
    /// Tags file path, relative to the workspace root.
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_provider: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_provider: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imports_provider: Option<ImportsProviderConfig>,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid matchPath pattern `{pattern}`: {source}")]
pub struct ImportsProviderError {
    pattern: String,
    #[source]
    source: regex::Error,
}

/// Derives an import line for a symbol from the path of its definition.
///
/// Invariant: `import_line` and `match_path` are non-empty. The sanitizer
/// drops a provider missing either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportsProviderConfig {
    /// Template containing a `${module}` placeholder, e.g. `import ${module}`.
    pub import_line: String,
    /// Regular expression matched against a definition path. The first
    /// capture group (or the whole match) is the module fragment.
    pub match_path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transformations: Vec<Transformation>,
}

impl ImportsProviderConfig {
    /// Module name for a definition at `path`, or `None` if the path does not match.
    pub fn module_name(&self, path: &str) -> Result<Option<String>, ImportsProviderError> {
        let regex = Regex::new(&self.match_path).map_err(|source| ImportsProviderError {
            pattern: self.match_path.clone(),
            source,
        })?;
        let Some(captures) = regex.captures(path) else {
            return Ok(None);
        };
        let fragment = captures
            .get(1)
            .or_else(|| captures.get(0))
            .map_or("", |m| m.as_str());
        let module = Transformation::apply_all(&self.transformations, fragment).into_text();
        Ok((!module.is_empty()).then_some(module))
    }

    /// Render the import line for a definition at `path`.
    pub fn render_import(&self, path: &str) -> Result<Option<String>, ImportsProviderError> {
        Ok(self
            .module_name(path)?
            .map(|module| self.import_line.replace(MODULE_PLACEHOLDER, &module)))
    }
}

/// A glob of annotation files to watch, keyed by `file`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationSourceConfig {
    pub file: String,
}
