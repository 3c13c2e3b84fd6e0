//! Layered merge of two sanitized documents.
//!
//! `mask` is the higher-precedence (live) document and `base` the fallback.
//! Scalars take the mask value when present. Arrays of records merge by
//! identity key through [`array_merge`], which is also what the sanitizer
//! uses to de-duplicate a single document (merge against an empty base).

use std::hash::Hash;

use indexmap::IndexMap;
use lintlens_types::{AnnotationSourceConfig, ConfigDocument, LanguageConfig, TagsConfig};

/// Index `items` by key. The first occurrence of a key wins.
fn index_first_seen<T, K, F>(items: Vec<T>, key: &F) -> IndexMap<K, T>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut index = IndexMap::with_capacity(items.len());
    for item in items {
        index.entry(key(&item)).or_insert(item);
    }
    index
}

/// Merge two keyed collections.
///
/// Output order: every mask key in mask order, then every base key the mask
/// lacks, in base order. Keys present on both sides are replaced by
/// `combine(mask_entry, base_entry)`. Within each side, the first occurrence
/// of a key wins, so `array_merge(items, Vec::new(), key, keep_mask)`
/// de-duplicates `items`.
pub fn array_merge<T, K, F, C>(mask: Vec<T>, base: Vec<T>, key: F, combine: C) -> Vec<T>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
    C: Fn(T, T) -> T,
{
    let mask = index_first_seen(mask, &key);
    let mut base = index_first_seen(base, &key);
    let mut merged = Vec::with_capacity(mask.len() + base.len());

    for (k, mask_entry) in mask {
        match base.shift_remove(&k) {
            Some(base_entry) => merged.push(combine(mask_entry, base_entry)),
            None => merged.push(mask_entry),
        }
    }
    merged.extend(base.into_values());
    merged
}

/// Combiner that keeps the mask entry verbatim.
pub fn keep_mask<T>(mask: T, _base: T) -> T {
    mask
}

pub(crate) fn language_key(language: &LanguageConfig) -> String {
    language.language_id.clone()
}

pub(crate) fn tags_key(tags: &TagsConfig) -> String {
    tags.file.clone()
}

pub(crate) fn annotation_key(source: &AnnotationSourceConfig) -> String {
    source.file.clone()
}

/// Merge `mask` over `base`. Both must already be sanitized.
#[must_use]
pub fn merge_documents(mask: ConfigDocument, base: ConfigDocument) -> ConfigDocument {
    ConfigDocument {
        activation_command: mask.activation_command.or(base.activation_command),
        reveal_output: mask.reveal_output.or(base.reveal_output),
        languages: array_merge(mask.languages, base.languages, language_key, merge_language),
        verbose_output: mask.verbose_output.or(base.verbose_output),
        merge_configs: mask.merge_configs.or(base.merge_configs),
        external_tool_path: mask.external_tool_path.or(base.external_tool_path),
    }
}

fn merge_language(mask: LanguageConfig, base: LanguageConfig) -> LanguageConfig {
    LanguageConfig {
        language_id: mask.language_id,
        server_command: mask.server_command.or(base.server_command),
        formatter_command: mask.formatter_command.or(base.formatter_command),
        on_save_command: mask.on_save_command.or(base.on_save_command),
        api_search_url: mask.api_search_url.or(base.api_search_url),
        tags: array_merge(mask.tags, base.tags, tags_key, merge_tags),
        annotations: array_merge(mask.annotations, base.annotations, annotation_key, keep_mask),
    }
}

fn merge_tags(mask: TagsConfig, base: TagsConfig) -> TagsConfig {
    TagsConfig {
        file: mask.file,
        init_command: mask.init_command.or(base.init_command),
        refresh_command: mask.refresh_command.or(base.refresh_command),
        completion_provider: mask.completion_provider.or(base.completion_provider),
        definition_provider: mask.definition_provider.or(base.definition_provider),
        imports_provider: mask.imports_provider.or(base.imports_provider),
    }
}
