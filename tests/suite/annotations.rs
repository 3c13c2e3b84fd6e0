//! Annotation pipeline: watcher events through to published diagnostics and
//! quick fixes.

use std::fs;
use std::path::Path;
use std::time::Duration;

use lintlens_config::resolve_workspace;
use lintlens_diagnostics::{
    AnnotationEvent, AnnotationEventKind, AnnotationManager, DiagnosticSeverity, Position, Range,
};
use serde_json::json;
use tokio::time::timeout;

use crate::common::{Workspace, annotation};

const EVENT_TIMEOUT: Duration = Duration::from_secs(10);

fn configured_workspace(pattern: &str) -> Workspace {
    let ws = Workspace::new();
    ws.write_fallback(&json!({
        "languages": [{ "languageId": "hs", "annotations": [{ "file": pattern }] }]
    }));
    ws
}

/// Wait for the next event concerning `path`, skipping unrelated ones.
async fn next_event_for(manager: &mut AnnotationManager, path: &Path) -> AnnotationEvent {
    timeout(EVENT_TIMEOUT, async {
        loop {
            let event = manager.next_event().await.unwrap();
            if event.path == path {
                return event;
            }
        }
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn watched_file_changes_publish_diagnostics() {
    let ws = configured_workspace("lint/*.json");
    // Directories created after the watch starts may race the recursive
    // watch registration.
    fs::create_dir_all(ws.path("lint")).unwrap();
    let config = resolve_workspace(None, &ws.roots());
    let mut manager = AnnotationManager::start(&config, &ws.roots());
    assert_eq!(manager.watch_count(), 1);

    let source = ws.write_json(
        "lint/hlint.json",
        &json!([
            annotation("src/Main.hs", 3, "warning", &["fmap f xs"]),
            annotation("src/Lib.hs", 1, "error", &[])
        ]),
    );

    let event = next_event_for(&mut manager, &source).await;
    assert_eq!(event.root, ws.root());
    assert_ne!(event.kind, AnnotationEventKind::Deleted);
    manager.handle_event(event).await.unwrap();

    let main = manager.diagnostics_for(&ws.path("src/Main.hs"));
    assert_eq!(main.len(), 1);
    assert_eq!(main[0].severity(), DiagnosticSeverity::Warning);
    assert_eq!(
        main[0].range(),
        Range::new(Position::new(2, 0), Position::new(2, 4))
    );
    assert_eq!(manager.summary().status_string(), "E:1 W:1");

    manager.dispose();
    assert!(manager.next_event().await.is_none());
}

#[tokio::test]
async fn unmatched_files_produce_no_events() {
    let ws = configured_workspace("lint/*.json");
    fs::create_dir_all(ws.path("other")).unwrap();
    fs::create_dir_all(ws.path("lint/deep")).unwrap();
    let config = resolve_workspace(None, &ws.roots());
    let mut manager = AnnotationManager::start(&config, &ws.roots());

    ws.write_json("other/hlint.json", &json!([]));
    ws.write_json("lint/deep/hlint.json", &json!([]));
    let matched = ws.write_json("lint/hlint.json", &json!([]));

    // Unmatched writes happened first, so any leak would arrive first.
    let event = timeout(EVENT_TIMEOUT, manager.next_event())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.path, matched);
    manager.poll_events(usize::MAX).await;
    assert!(manager.summary().is_empty());
}

#[tokio::test]
async fn pipeline_publishes_quick_fixes() {
    let ws = Workspace::new();
    let source = ws.write_json(
        "out.json",
        &json!([
            annotation("A.hs", 3, "hint", &["x", "y"]),
            annotation("/abs/B.hs", 5, "info", &[]),
            { "source": "hlint", "file": "A.hs" }
        ]),
    );
    let mut manager = AnnotationManager::start(&resolve_workspace(None, &[]), &ws.roots());

    let targets = manager
        .handle_event(AnnotationEvent {
            kind: AnnotationEventKind::Created,
            path: source,
            root: ws.root().to_path_buf(),
        })
        .await
        .unwrap();
    assert_eq!(targets, vec![ws.path("A.hs"), Path::new("/abs/B.hs").to_path_buf()]);

    let cursor = Range::new(Position::new(2, 1), Position::new(2, 1));
    let fixes = manager.quick_fixes(&ws.path("A.hs"), cursor);
    assert_eq!(fixes.len(), 2);
    assert_eq!(fixes[0].title, "hint at line 3");
    assert_eq!(fixes[0].kind, "quickfix");
    assert_eq!(fixes[0].edit.path, ws.path("A.hs"));
    assert_eq!(fixes[1].edit.new_text, "y");
    assert!(
        manager
            .quick_fixes(Path::new("/abs/B.hs"), cursor)
            .is_empty()
    );
}

#[tokio::test]
async fn malformed_source_is_reported_and_keeps_previous_diagnostics() {
    let ws = Workspace::new();
    let mut manager = AnnotationManager::start(&resolve_workspace(None, &[]), &ws.roots());
    let source = ws.write_json("out.json", &json!([annotation("A.hs", 1, "error", &[])]));
    let changed = || AnnotationEvent {
        kind: AnnotationEventKind::Changed,
        path: source.clone(),
        root: ws.root().to_path_buf(),
    };

    manager.handle_event(changed()).await.unwrap();
    fs::write(&source, "not json").unwrap();
    let err = manager.handle_event(changed()).await.unwrap_err();
    assert_eq!(err.path(), source.as_path());
    assert_eq!(manager.diagnostics_for(&ws.path("A.hs")).len(), 1);
}
