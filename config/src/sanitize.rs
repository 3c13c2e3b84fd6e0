//! Projection of an untyped document into a [`ConfigDocument`].
//!
//! Field access is defensive: a field of the wrong JSON type is treated as
//! absent, a nested record that is not an object or lacks its identity key
//! is dropped, and repeated records are de-duplicated (first occurrence
//! wins). Sanitizing never fails outward; a document that cannot be read at
//! all sanitizes to the empty document.

use lintlens_types::{
    AnnotationSourceConfig, ConfigDocument, ImportsProviderConfig, LanguageConfig, TagsConfig,
    Transformation,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::merge::{annotation_key, array_merge, keep_mask, language_key, tags_key};

type Object = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum SanitizeError {
    #[error("configuration root must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Sanitize one raw document.
#[must_use]
pub fn sanitize(raw: &Value) -> ConfigDocument {
    match try_sanitize(raw) {
        Ok(document) => document,
        Err(err) => {
            tracing::warn!("Discarding configuration document: {err}");
            ConfigDocument::default()
        }
    }
}

fn try_sanitize(raw: &Value) -> Result<ConfigDocument, SanitizeError> {
    let root = raw
        .as_object()
        .ok_or_else(|| SanitizeError::NotAnObject(json_kind(raw)))?;

    let languages: Vec<LanguageConfig> = records(root, "languages")
        .filter_map(sanitize_language)
        .collect();

    Ok(ConfigDocument {
        activation_command: string_field(root, "activationCommand"),
        reveal_output: bool_field(root, "revealOutput"),
        languages: dedup(languages, language_key),
        verbose_output: bool_field(root, "verboseOutput"),
        merge_configs: bool_field(root, "mergeConfigs"),
        external_tool_path: string_field(root, "externalToolPath"),
    })
}

fn dedup<T>(items: Vec<T>, key: fn(&T) -> String) -> Vec<T> {
    array_merge(items, Vec::new(), key, keep_mask)
}

/// Trimmed string field; empty or non-string values are absent.
fn string_field(object: &Object, field: &str) -> Option<String> {
    let trimmed = object.get(field)?.as_str()?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn bool_field(object: &Object, field: &str) -> Option<bool> {
    object.get(field)?.as_bool()
}

/// Object elements of an array field. Non-object elements are skipped.
fn records<'a>(object: &'a Object, field: &str) -> impl Iterator<Item = &'a Object> + use<'a> {
    object
        .get(field)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn sanitize_language(object: &Object) -> Option<LanguageConfig> {
    let Some(language_id) = string_field(object, "languageId") else {
        tracing::debug!("Dropping language config without languageId");
        return None;
    };

    let tags: Vec<TagsConfig> = records(object, "tags").filter_map(sanitize_tags).collect();
    let annotations: Vec<AnnotationSourceConfig> = records(object, "annotations")
        .filter_map(sanitize_annotation_source)
        .collect();

    Some(LanguageConfig {
        server_command: string_field(object, "serverCommand"),
        formatter_command: string_field(object, "formatterCommand"),
        on_save_command: string_field(object, "onSaveCommand"),
        api_search_url: string_field(object, "apiSearchUrl"),
        tags: dedup(tags, tags_key),
        annotations: dedup(annotations, annotation_key),
        language_id,
    })
}

fn sanitize_tags(object: &Object) -> Option<TagsConfig> {
    let Some(file) = string_field(object, "file") else {
        tracing::debug!("Dropping tags config without file");
        return None;
    };

    Some(TagsConfig {
        file,
        init_command: string_field(object, "initCommand"),
        refresh_command: string_field(object, "refreshCommand"),
        completion_provider: bool_field(object, "completionProvider"),
        definition_provider: bool_field(object, "definitionProvider"),
        imports_provider: object
            .get("importsProvider")
            .and_then(Value::as_object)
            .and_then(sanitize_imports_provider),
    })
}

/// An imports provider without a template or match pattern is absent.
fn sanitize_imports_provider(object: &Object) -> Option<ImportsProviderConfig> {
    let import_line = string_field(object, "importLine")?;
    let match_path = string_field(object, "matchPath")?;
    let transformations = object
        .get("transformations")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|step| match Transformation::deserialize(step) {
            Ok(step) if step.is_well_formed() => Some(step),
            Ok(step) => {
                tracing::debug!(?step, "Dropping degenerate transformation");
                None
            }
            Err(err) => {
                tracing::debug!("Dropping malformed transformation: {err}");
                None
            }
        })
        .collect();

    Some(ImportsProviderConfig {
        import_line,
        match_path,
        transformations,
    })
}

fn sanitize_annotation_source(object: &Object) -> Option<AnnotationSourceConfig> {
    string_field(object, "file").map(|file| AnnotationSourceConfig { file })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trims_string_fields_and_drops_empty() {
        let doc = sanitize(&json!({
            "activationCommand": "  start  ",
            "externalToolPath": "   ",
            "languages": [{ "languageId": " hs ", "serverCommand": "\thls\n" }]
        }));
        assert_eq!(doc.activation_command.as_deref(), Some("start"));
        assert_eq!(doc.external_tool_path, None);
        assert_eq!(doc.languages[0].language_id, "hs");
        assert_eq!(doc.languages[0].server_command.as_deref(), Some("hls"));
    }

    #[test]
    fn wrong_field_types_are_absent() {
        let doc = sanitize(&json!({
            "activationCommand": 42,
            "revealOutput": "yes",
            "mergeConfigs": true,
            "languages": "haskell"
        }));
        assert_eq!(doc.activation_command, None);
        assert_eq!(doc.reveal_output, None);
        assert_eq!(doc.merge_configs, Some(true));
        assert!(doc.languages.is_empty());
    }

    #[test]
    fn drops_records_without_identity_key() {
        let doc = sanitize(&json!({
            "languages": [
                { "languageId": "" },
                { "serverCommand": "orphan" },
                "not an object",
                { "languageId": "hs", "tags": [{ "file": " " }, { "file": "tags" }, 7] }
            ]
        }));
        assert_eq!(doc.languages.len(), 1);
        let hs = &doc.languages[0];
        assert_eq!(hs.tags.len(), 1);
        assert_eq!(hs.tags[0].file, "tags");
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let doc = sanitize(&json!({
            "languages": [
                {
                    "languageId": "hs",
                    "tags": [
                        { "file": "x", "initCommand": "1" },
                        { "file": "x", "initCommand": "2" }
                    ],
                    "annotations": [{ "file": "a.json" }, { "file": " a.json " }]
                },
                { "languageId": "hs", "serverCommand": "second" }
            ]
        }));
        assert_eq!(doc.languages.len(), 1);
        let hs = &doc.languages[0];
        assert_eq!(hs.server_command, None);
        assert_eq!(hs.tags.len(), 1);
        assert_eq!(hs.tags[0].init_command.as_deref(), Some("1"));
        assert_eq!(hs.annotations.len(), 1);
    }

    #[test]
    fn incomplete_imports_provider_is_absent() {
        let doc = sanitize(&json!({
            "languages": [{
                "languageId": "hs",
                "tags": [
                    { "file": "a", "importsProvider": { "importLine": "", "matchPath": "(.*)" } },
                    { "file": "b", "importsProvider": { "importLine": "import ${module}" } },
                    { "file": "c", "importsProvider": "import" }
                ]
            }]
        }));
        let tags = &doc.languages[0].tags;
        assert_eq!(tags.len(), 3);
        assert!(tags.iter().all(|t| t.imports_provider.is_none()));
    }

    #[test]
    fn imports_provider_keeps_valid_transformations() {
        let doc = sanitize(&json!({
            "languages": [{
                "languageId": "hs",
                "tags": [{
                    "file": "tags",
                    "completionProvider": true,
                    "importsProvider": {
                        "importLine": " import ${module} ",
                        "matchPath": "src/(.*)\\.hs",
                        "transformations": [
                            { "kind": "split", "separator": "/" },
                            { "kind": "split", "separator": "" },
                            { "kind": "explode" },
                            { "kind": "join", "separator": "." }
                        ]
                    }
                }]
            }]
        }));
        let tags = &doc.languages[0].tags[0];
        assert_eq!(tags.completion_provider, Some(true));
        let provider = tags.imports_provider.as_ref().unwrap();
        assert_eq!(provider.import_line, "import ${module}");
        assert_eq!(
            provider.transformations,
            vec![
                Transformation::Split {
                    separator: "/".to_string()
                },
                Transformation::Join {
                    separator: ".".to_string()
                },
            ]
        );
    }

    #[test]
    fn non_object_root_is_empty_document() {
        assert_eq!(sanitize(&json!([1, 2])), ConfigDocument::default());
        assert_eq!(sanitize(&Value::Null), ConfigDocument::default());
    }

    #[test]
    fn sanitize_error_names_the_found_kind() {
        let err = try_sanitize(&json!("text")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration root must be a JSON object, found a string"
        );
    }

    #[test]
    fn sanitize_is_idempotent_on_its_output() {
        let doc = sanitize(&json!({
            "revealOutput": true,
            "languages": [{
                "languageId": "hs",
                "apiSearchUrl": "https://hoogle.example/?q=${query}",
                "annotations": [{ "file": "dist/*.json" }]
            }]
        }));
        let again = sanitize(&serde_json::to_value(&doc).unwrap());
        assert_eq!(again, doc);
    }
}
