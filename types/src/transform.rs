//! String transformations for deriving module names from definition paths.
//!
//! An imports provider matches a fragment out of a file path (for example
//! `Data/Map/Strict` out of `src/Data/Map/Strict.hs`) and runs it through an
//! ordered list of [`Transformation`]s to produce a module name
//! (`Data.Map.Strict`).

use serde::{Deserialize, Serialize};

/// One step of a transformation pipeline.
///
/// Arguments are literal text and are never trimmed; `" "` is a valid
/// separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Transformation {
    Replace { from: String, to: String },
    Split { separator: String },
    Join { separator: String },
    ToUpper,
    ToLower,
    Capitalize,
}

/// Value threaded through a transformation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Parts(Vec<String>),
}

impl Fragment {
    fn map_each(self, f: impl Fn(&str) -> String) -> Self {
        match self {
            Self::Text(text) => Self::Text(f(&text)),
            Self::Parts(parts) => Self::Parts(parts.iter().map(|part| f(part)).collect()),
        }
    }

    /// Collapse to a single string. Leftover parts are concatenated.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Parts(parts) => parts.concat(),
        }
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn split_on(value: &str, separator: &str) -> Vec<String> {
    value.split(separator).map(str::to_string).collect()
}

impl Transformation {
    /// Whether the step can be applied without degenerate output.
    ///
    /// `replace` with an empty `from` and `split` with an empty separator
    /// would explode the input into single characters.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        match self {
            Self::Replace { from, .. } => !from.is_empty(),
            Self::Split { separator } => !separator.is_empty(),
            Self::Join { .. } | Self::ToUpper | Self::ToLower | Self::Capitalize => true,
        }
    }

    #[must_use]
    pub fn apply(&self, fragment: Fragment) -> Fragment {
        match self {
            Self::Replace { from, to } => fragment.map_each(|s| s.replace(from.as_str(), to)),
            Self::Split { separator } => match fragment {
                Fragment::Text(text) => Fragment::Parts(split_on(&text, separator)),
                Fragment::Parts(parts) => Fragment::Parts(
                    parts
                        .iter()
                        .flat_map(|part| split_on(part, separator))
                        .collect(),
                ),
            },
            Self::Join { separator } => match fragment {
                Fragment::Parts(parts) => Fragment::Text(parts.join(separator)),
                text @ Fragment::Text(_) => text,
            },
            Self::ToUpper => fragment.map_each(str::to_uppercase),
            Self::ToLower => fragment.map_each(str::to_lowercase),
            Self::Capitalize => fragment.map_each(capitalize),
        }
    }

    /// Run `steps` in order over `input`.
    #[must_use]
    pub fn apply_all(steps: &[Self], input: &str) -> Fragment {
        steps
            .iter()
            .fold(Fragment::Text(input.to_string()), |acc, step| step.apply(acc))
    }
}
