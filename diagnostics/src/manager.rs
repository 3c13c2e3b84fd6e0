//! AnnotationManager facade: the public API consumed by hosts.
//!
//! The host interacts with annotation sources through this single type. It
//! owns the watcher, the diagnostics store, and the event channel between
//! them, and runs read → parse → group → project → publish for each event.
//!
//! Events are processed one at a time by whoever owns the manager; the
//! watcher's backend threads only push into the channel.

use std::collections::HashMap;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use lintlens_types::ConfigDocument;
use tokio::fs;
use tokio::sync::mpsc;

use crate::parser::{ParseError, group_by_file, parse_annotations};
use crate::projector::project_groups;
use crate::quickfix::{QuickFix, quick_fixes};
use crate::store::DiagnosticsStore;
use crate::types::{AnnotationEvent, AnnotationEventKind, Diagnostic, DiagnosticsSummary, Range};
use crate::watcher::AnnotationWatcher;

#[derive(Debug, thiserror::Error)]
pub enum AnnotationError {
    #[error("failed to read annotation file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse annotation file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

impl AnnotationError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            AnnotationError::Read { path, .. } | AnnotationError::Parse { path, .. } => path,
        }
    }
}

/// Public facade for the annotation subsystem.
///
/// A live watcher is `Some`; `dispose` takes it, after which no new events
/// arrive until `reconfigure` installs a fresh one.
pub struct AnnotationManager {
    watcher: Option<AnnotationWatcher>,
    store: DiagnosticsStore,
    /// Annotation source file → targets it last published.
    sources: HashMap<PathBuf, Vec<PathBuf>>,
    event_rx: mpsc::UnboundedReceiver<AnnotationEvent>,
    event_tx: mpsc::UnboundedSender<AnnotationEvent>,
}

impl AnnotationManager {
    /// Construct the manager and register watches for `config`.
    pub fn start(config: &ConfigDocument, workspace_roots: &[PathBuf]) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let watcher = AnnotationWatcher::start(config, workspace_roots, &event_tx);
        tracing::info!(watches = watcher.watch_count(), "Annotation watcher started");
        Self {
            watcher: Some(watcher),
            store: DiagnosticsStore::new(),
            sources: HashMap::new(),
            event_rx,
            event_tx,
        }
    }

    /// Rebuild the watcher wholesale from a newly resolved document.
    ///
    /// Published diagnostics are kept.
    pub fn reconfigure(&mut self, config: &ConfigDocument, workspace_roots: &[PathBuf]) {
        // Release the old watches before registering the new ones.
        self.watcher = None;
        let watcher = AnnotationWatcher::start(config, workspace_roots, &self.event_tx);
        tracing::info!(watches = watcher.watch_count(), "Annotation watcher reconfigured");
        self.watcher = Some(watcher);
    }

    /// Release every watch and discard events that were not yet delivered.
    pub fn dispose(&mut self) {
        if self.watcher.take().is_some() {
            tracing::debug!("Annotation watcher disposed");
        }
        while self.event_rx.try_recv().is_ok() {}
    }

    /// Number of active (pattern, root) watches.
    #[must_use]
    pub fn watch_count(&self) -> usize {
        self.watcher.as_ref().map_or(0, AnnotationWatcher::watch_count)
    }

    /// Wait for the next event. Returns `None` once the manager is disposed.
    pub async fn next_event(&mut self) -> Option<AnnotationEvent> {
        self.watcher.as_ref()?;
        self.event_rx.recv().await
    }

    /// Drain pending events, up to `budget`, handling each in order.
    ///
    /// Does not wait for new events. Per-event failures are logged and do not
    /// stop the drain.
    pub async fn poll_events(&mut self, budget: usize) -> usize {
        let mut count = 0;
        while count < budget {
            match self.event_rx.try_recv() {
                Ok(event) => {
                    if let Err(err) = self.handle_event(event).await {
                        tracing::error!(path = %err.path().display(), "{err}");
                    }
                    count += 1;
                }
                Err(mpsc::error::TryRecvError::Empty | mpsc::error::TryRecvError::Disconnected) => {
                    break;
                }
            }
        }
        count
    }

    /// Process one event and return the target paths it touched.
    ///
    /// Created/changed: every target file in the new payload has its
    /// diagnostics replaced. Targets published earlier but missing from the
    /// payload keep their old diagnostics. A read or parse failure leaves
    /// the store untouched.
    ///
    /// Deleted: diagnostics stored under exactly the deleted path are removed.
    pub async fn handle_event(
        &mut self,
        event: AnnotationEvent,
    ) -> Result<Vec<PathBuf>, AnnotationError> {
        match event.kind {
            AnnotationEventKind::Deleted => {
                self.sources.remove(&event.path);
                let removed = self.store.delete(&event.path);
                tracing::debug!(path = %event.path.display(), removed, "Annotation source deleted");
                Ok(if removed { vec![event.path] } else { Vec::new() })
            }
            AnnotationEventKind::Created | AnnotationEventKind::Changed => {
                let bytes = read_source(&event.path).await?;
                let records = parse_annotations(&bytes).map_err(|source| AnnotationError::Parse {
                    path: event.path.clone(),
                    source,
                })?;
                let groups = group_by_file(records);

                let mut targets = Vec::with_capacity(groups.len());
                for (target, diagnostics) in project_groups(&groups, &event.root) {
                    tracing::debug!(
                        path = %target.display(),
                        count = diagnostics.len(),
                        "Diagnostics updated"
                    );
                    self.store.set(target.clone(), diagnostics);
                    targets.push(target);
                }
                self.sources.insert(event.path, targets.clone());
                Ok(targets)
            }
        }
    }

    /// Fixes for stored diagnostics on `path` whose range intersects `range`.
    #[must_use]
    pub fn quick_fixes(&self, path: &Path, range: Range) -> Vec<QuickFix> {
        self.store
            .get(path)
            .iter()
            .filter(|d| d.range().intersects(&range))
            .flat_map(quick_fixes)
            .collect()
    }

    #[must_use]
    pub fn diagnostics_for(&self, path: &Path) -> &[Diagnostic] {
        self.store.get(path)
    }

    /// Targets the given annotation source published on its last successful event.
    #[must_use]
    pub fn targets_for_source(&self, source: &Path) -> &[PathBuf] {
        self.sources.get(source).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn summary(&self) -> DiagnosticsSummary {
        self.store.summary()
    }

    #[cfg(test)]
    pub(crate) fn event_tx(&self) -> &mpsc::UnboundedSender<AnnotationEvent> {
        &self.event_tx
    }
}

/// A source that vanished between the event and the read is treated as empty.
async fn read_source(path: &Path) -> Result<Vec<u8>, AnnotationError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(AnnotationError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
