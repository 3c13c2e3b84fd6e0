//! End-to-end configuration resolution: settings file + fallback file.

use std::fs;

use lintlens_config::{JsonSettingsStore, SettingsStore, resolve_workspace};
use lintlens_types::ConfigDocument;
use serde_json::json;

use crate::common::Workspace;

fn resolve_with_settings(ws: &Workspace, store: Option<&JsonSettingsStore>) -> ConfigDocument {
    resolve_workspace(store.map(|s| s as &dyn SettingsStore), &ws.roots())
}

#[test]
fn live_settings_merge_over_fallback() {
    let ws = Workspace::new();
    ws.write_fallback(&json!({
        "revealOutput": true,
        "languages": [
            { "languageId": "hs", "serverCommand": "ghcid", "apiSearchUrl": "U" },
            { "languageId": "purs", "serverCommand": "purs ide" }
        ]
    }));
    let settings = ws.write_settings(&json!({
        "lintlens.v1.mergeConfigs": true,
        "lintlens.v1.languages": [{ "languageId": "hs", "serverCommand": "hls" }]
    }));
    let store = JsonSettingsStore::open(&settings).unwrap();

    let doc = resolve_with_settings(&ws, store.as_ref());

    let hs = doc.language("hs").unwrap();
    assert_eq!(hs.server_command.as_deref(), Some("hls"));
    assert_eq!(hs.api_search_url.as_deref(), Some("U"));
    assert_eq!(doc.reveal_output, Some(true));
    let ids: Vec<_> = doc
        .languages
        .iter()
        .map(|l| l.language_id.as_str())
        .collect();
    assert_eq!(ids, ["hs", "purs"]);
}

#[test]
fn live_settings_without_merge_shadow_fallback() {
    let ws = Workspace::new();
    ws.write_fallback(&json!({ "languages": [{ "languageId": "hs" }] }));
    let settings = ws.write_settings(&json!({ "lintlens.v1.activationCommand": "start" }));
    let store = JsonSettingsStore::open(&settings).unwrap();

    let doc = resolve_with_settings(&ws, store.as_ref());
    assert_eq!(doc.activation_command.as_deref(), Some("start"));
    assert!(doc.languages.is_empty());
}

#[test]
fn missing_settings_fall_back_to_workspace_file() {
    let ws = Workspace::new();
    ws.write_fallback(&json!({
        "languages": [
            { "languageId": " hs ", "tags": [{ "file": "tags" }, { "file": "tags" }] },
            { "languageId": "" }
        ]
    }));
    let store = JsonSettingsStore::open(&ws.path("host/settings.json")).unwrap();
    assert!(store.is_none());

    let doc = resolve_with_settings(&ws, store.as_ref());
    assert_eq!(doc.languages.len(), 1);
    assert_eq!(doc.languages[0].language_id, "hs");
    assert_eq!(doc.languages[0].tags.len(), 1);
}

#[test]
fn unreadable_fallback_yields_empty_document() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.path(".lintlens")).unwrap();
    fs::write(ws.path(".lintlens/config.json"), "{ nope").unwrap();

    let doc = resolve_with_settings(&ws, None);
    assert_eq!(doc, ConfigDocument::default());
}

#[test]
fn no_roots_uses_live_settings_only() {
    let ws = Workspace::new();
    let settings = ws.write_settings(&json!({
        "lintlens.v1.mergeConfigs": true,
        "lintlens.v1.externalToolPath": " /usr/bin/ctags "
    }));
    let store = JsonSettingsStore::open(&settings).unwrap().unwrap();

    let doc = resolve_workspace(Some(&store), &[]);
    assert_eq!(doc.external_tool_path.as_deref(), Some("/usr/bin/ctags"));
    assert!(doc.merge_enabled());
}
