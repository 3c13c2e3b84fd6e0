//! lintlens CLI - resolve workspace configuration and stream annotation diagnostics.
//!
//! ```text
//! main() -> resolve_workspace() -> AnnotationManager::start() -> event loop
//!                                                                   |
//!                                                                   v
//!                                               next_event -> handle_event -> print
//! ```
//!
//! The live settings file defaults to `<config dir>/lintlens/settings.json`
//! and can be overridden with `LINTLENS_SETTINGS`. Logging goes to stderr;
//! diagnostics go to stdout.

mod args;

use std::{env, fs, io, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio::signal;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

use lintlens_config::{JsonSettingsStore, SettingsStore, default_settings_path, resolve_workspace};
use lintlens_diagnostics::AnnotationManager;
use lintlens_types::ConfigDocument;

use crate::args::{Cli, Mode};

const SETTINGS_ENV: &str = "LINTLENS_SETTINGS";

type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn init_tracing() -> FilterHandle {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let (filter, handle) = reload::Layer::new(env_filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
    handle
}

/// Raise the default level to `debug` when the config asks for verbose
/// output. An explicit `RUST_LOG` always wins.
fn apply_verbose(handle: &FilterHandle, verbose: bool) {
    if !verbose || env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return;
    }
    match handle.reload(EnvFilter::new("debug")) {
        Ok(()) => tracing::debug!("Verbose output enabled"),
        Err(err) => tracing::warn!("Failed to raise log level: {err}"),
    }
}

fn settings_path() -> Option<PathBuf> {
    env::var_os(SETTINGS_ENV)
        .map(PathBuf::from)
        .or_else(default_settings_path)
}

/// Open the live settings store. Any failure means "no live settings".
fn open_settings_store() -> Option<JsonSettingsStore> {
    let path = settings_path()?;
    match JsonSettingsStore::open(&path) {
        Ok(Some(store)) => {
            tracing::debug!(path = %path.display(), "Loaded live settings");
            Some(store)
        }
        Ok(None) => {
            tracing::debug!(path = %path.display(), "No live settings file");
            None
        }
        Err(err) => {
            tracing::warn!("Ignoring live settings: {err}");
            None
        }
    }
}

fn canonical_roots(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if roots.is_empty() {
        let cwd = env::current_dir().context("Failed to determine current directory")?;
        return Ok(vec![cwd]);
    }
    roots
        .iter()
        .map(|root| {
            fs::canonicalize(root)
                .with_context(|| format!("Workspace root {} is not accessible", root.display()))
        })
        .collect()
}

fn search_url(config: &ConfigDocument, language: &str, query: &str) -> Result<String> {
    let Some(lang) = config.language(language) else {
        bail!("no configuration for language '{language}'");
    };
    lang.api_search_url(query)
        .with_context(|| format!("language '{language}' has no apiSearchUrl"))
}

/// Render the import line for `path` using the first tags entry whose
/// imports provider matches it.
fn import_line(config: &ConfigDocument, language: &str, path: &str) -> Result<String> {
    let Some(lang) = config.language(language) else {
        bail!("no configuration for language '{language}'");
    };
    for provider in lang.tags.iter().filter_map(|t| t.imports_provider.as_ref()) {
        if let Some(line) = provider.render_import(path)? {
            return Ok(line);
        }
    }
    bail!("no imports provider for '{language}' matches {path}")
}

fn report(manager: &AnnotationManager, targets: &[PathBuf]) {
    for target in targets {
        for diagnostic in manager.diagnostics_for(target) {
            println!("{}", diagnostic.display_with_path(target));
        }
    }
    let status = manager.summary().status_string();
    if !status.is_empty() {
        tracing::info!(status = %status, "Diagnostics updated");
    }
}

async fn watch(config: &ConfigDocument, roots: &[PathBuf]) -> Result<()> {
    let mut manager = AnnotationManager::start(config, roots);
    if manager.watch_count() == 0 {
        tracing::warn!("No annotation sources configured; waiting for ctrl-c");
    }

    loop {
        tokio::select! {
            event = manager.next_event() => {
                let Some(event) = event else { break };
                let source = event.path.clone();
                match manager.handle_event(event).await {
                    Ok(targets) => {
                        tracing::debug!(
                            source = %source.display(),
                            published = manager.targets_for_source(&source).len(),
                            "Annotation source processed"
                        );
                        report(&manager, &targets);
                    }
                    Err(err) => tracing::error!(path = %err.path().display(), "{err}"),
                }
            }
            interrupted = signal::ctrl_c() => {
                interrupted.context("Failed to listen for ctrl-c")?;
                tracing::info!("Interrupted; shutting down");
                break;
            }
        }
    }

    manager.dispose();
    Ok(())
}

fn root_list(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|r| r.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = init_tracing();

    let roots = canonical_roots(&cli.roots)?;
    tracing::debug!(roots = %root_list(&roots), "Workspace roots");

    let store = open_settings_store();
    let config = resolve_workspace(store.as_ref().map(|s| s as &dyn SettingsStore), &roots);
    apply_verbose(&filter, config.verbose());

    match cli.mode() {
        Mode::PrintConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Mode::SearchUrl { language, query } => {
            println!("{}", search_url(&config, &language, &query)?);
            Ok(())
        }
        Mode::ImportLine { language, path } => {
            println!("{}", import_line(&config, &language, &path)?);
            Ok(())
        }
        Mode::Watch => watch(&config, &roots).await,
    }
}
