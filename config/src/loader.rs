//! Config sources: the live settings store and the workspace fallback file.
//!
//! Both loaders are best-effort. A source that cannot be read or parsed is
//! reported as absent and the failure is logged; nothing here returns an
//! error to the resolution engine.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// Fallback document location, relative to the first workspace root.
pub const FALLBACK_CONFIG_PATH: &str = ".lintlens/config.json";

/// Versioned live-store keys and the document field each one populates.
const SETTINGS_KEYS: [(&str, &str); 6] = [
    ("lintlens.v1.activationCommand", "activationCommand"),
    ("lintlens.v1.revealOutput", "revealOutput"),
    ("lintlens.v1.languages", "languages"),
    ("lintlens.v1.verboseOutput", "verboseOutput"),
    ("lintlens.v1.mergeConfigs", "mergeConfigs"),
    ("lintlens.v1.externalToolPath", "externalToolPath"),
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} must contain a JSON object", path.display())]
    NotAnObject { path: PathBuf },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::NotAnObject { path } => path,
        }
    }
}

/// Read-only key/value view of host-managed settings.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>, ConfigError>;
}

impl SettingsStore for Map<String, Value> {
    fn get(&self, key: &str) -> Result<Option<Value>, ConfigError> {
        Ok(Map::get(self, key).cloned())
    }
}

/// Settings store backed by a flat JSON object on disk, e.g.
///
/// ```json
/// {
///   "lintlens.v1.mergeConfigs": true,
///   "lintlens.v1.languages": [{ "languageId": "haskell", "serverCommand": "hls" }]
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    values: Map<String, Value>,
}

impl JsonSettingsStore {
    /// Open the store at `path`. A missing file is `Ok(None)`.
    pub fn open(path: &Path) -> Result<Option<Self>, ConfigError> {
        let Some(value) = read_json_file(path)? else {
            return Ok(None);
        };
        match value {
            Value::Object(values) => Ok(Some(Self { values })),
            _ => Err(ConfigError::NotAnObject {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>, ConfigError> {
        Ok(self.values.get(key).cloned())
    }
}

/// Default live settings location: `<config dir>/lintlens/settings.json`.
#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lintlens").join("settings.json"))
}

/// Read and parse a JSON file. A missing file is `Ok(None)`.
fn read_json_file(path: &Path) -> Result<Option<Value>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Assemble the live document from the versioned store keys.
///
/// Keys that are unset are left out. Any store failure makes the whole live
/// document absent.
pub fn load_live(store: &dyn SettingsStore) -> Option<Value> {
    let mut document = Map::new();
    for (key, field) in SETTINGS_KEYS {
        match store.get(key) {
            Ok(Some(value)) => {
                document.insert(field.to_string(), value);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(key, "Failed to read live settings: {err}");
                return None;
            }
        }
    }
    Some(Value::Object(document))
}

/// Read the fallback document relative to the first workspace root.
pub fn load_fallback(workspace_roots: &[PathBuf]) -> Option<Value> {
    let Some(root) = workspace_roots.first() else {
        tracing::debug!("No workspace root; fallback config unavailable");
        return None;
    };
    let path = root.join(FALLBACK_CONFIG_PATH);
    match read_json_file(&path) {
        Ok(Some(value)) => {
            tracing::debug!(path = %path.display(), "Loaded fallback config");
            Some(value)
        }
        Ok(None) => {
            tracing::debug!(path = %path.display(), "No fallback config");
            None
        }
        Err(err) => {
            tracing::warn!(path = %err.path().display(), "Ignoring fallback config: {err}");
            None
        }
    }
}
