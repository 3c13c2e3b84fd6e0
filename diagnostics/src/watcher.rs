//! Annotation source watcher.
//!
//! One `notify` watch per (pattern, workspace root) pair. Each watch observes
//! its root recursively and forwards events whose root-relative path matches
//! the pattern. Watches that fail to register are logged and skipped so one
//! bad pattern does not disable the others.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use lintlens_types::ConfigDocument;
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::types::{AnnotationEvent, AnnotationEventKind};

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("invalid annotation pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("failed to watch {}: {source}", root.display())]
    Notify {
        root: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Aggregate of every active watch. Dropping it releases all of them.
#[derive(Default)]
pub struct AnnotationWatcher {
    // Dropping a watcher stops its backend thread.
    watchers: Vec<RecommendedWatcher>,
}

impl AnnotationWatcher {
    /// Register watches for every language's annotation patterns under every root.
    pub fn start(
        config: &ConfigDocument,
        workspace_roots: &[PathBuf],
        event_tx: &mpsc::UnboundedSender<AnnotationEvent>,
    ) -> Self {
        let mut watchers = Vec::new();
        for language in &config.languages {
            for pattern in language.annotation_patterns() {
                let pattern = pattern.trim();
                if pattern.is_empty() {
                    continue;
                }
                let matcher = match compile_pattern(pattern) {
                    Ok(matcher) => matcher,
                    Err(err) => {
                        tracing::warn!(language = %language.language_id, "{err}");
                        continue;
                    }
                };
                for root in workspace_roots {
                    match register(&matcher, root, event_tx.clone()) {
                        Ok(watcher) => {
                            tracing::debug!(
                                pattern,
                                root = %root.display(),
                                "Watching annotation source"
                            );
                            watchers.push(watcher);
                        }
                        Err(err) => tracing::warn!("{err}"),
                    }
                }
            }
        }
        Self { watchers }
    }

    /// Number of active (pattern, root) watches.
    #[must_use]
    pub fn watch_count(&self) -> usize {
        self.watchers.len()
    }
}

fn compile_pattern(pattern: &str) -> Result<GlobMatcher, WatchError> {
    let mut glob = GlobBuilder::new(pattern);
    glob.literal_separator(true);
    if cfg!(windows) {
        glob.case_insensitive(true);
    }
    glob.build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| WatchError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn register(
    matcher: &GlobMatcher,
    root: &Path,
    event_tx: mpsc::UnboundedSender<AnnotationEvent>,
) -> Result<RecommendedWatcher, WatchError> {
    let notify_error = |source| WatchError::Notify {
        root: root.to_path_buf(),
        source,
    };

    let callback_matcher = matcher.clone();
    let callback_root = root.to_path_buf();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            for annotation in classify(&event, &callback_root, &callback_matcher) {
                if event_tx.send(annotation).is_err() {
                    // Receiver gone; the manager is shutting down.
                    return;
                }
            }
        }
        Err(err) => tracing::warn!("Annotation watcher error: {err}"),
    })
    .map_err(notify_error)?;

    watcher
        .watch(root, RecursiveMode::Recursive)
        .map_err(notify_error)?;

    Ok(watcher)
}

/// Kind of change for the `index`-th path of a raw event, if it is one we track.
fn event_kind(kind: EventKind, index: usize, path: &Path) -> Option<AnnotationEventKind> {
    match kind {
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            Some(AnnotationEventKind::Created)
        }
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            Some(AnnotationEventKind::Deleted)
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => Some(if index == 0 {
            AnnotationEventKind::Deleted
        } else {
            AnnotationEventKind::Created
        }),
        EventKind::Modify(ModifyKind::Name(_)) => Some(if path.exists() {
            AnnotationEventKind::Created
        } else {
            AnnotationEventKind::Deleted
        }),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(AnnotationEventKind::Changed),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}

/// Translate a raw event into annotation events for paths matching `matcher`
/// relative to `root`.
fn classify(event: &Event, root: &Path, matcher: &GlobMatcher) -> Vec<AnnotationEvent> {
    event
        .paths
        .iter()
        .enumerate()
        .filter_map(|(index, path)| {
            let relative = path.strip_prefix(root).ok()?;
            if !matcher.is_match(relative) {
                return None;
            }
            let kind = event_kind(event.kind, index, path)?;
            Some(AnnotationEvent {
                kind,
                path: path.clone(),
                root: root.to_path_buf(),
            })
        })
        .collect()
}
