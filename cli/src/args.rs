//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

const ENV_HELP: &str = "\
Environment:
  LINTLENS_SETTINGS   Live settings file (default: <config dir>/lintlens/settings.json)
  RUST_LOG            Log filter (default: info, or debug with verboseOutput)";

#[derive(Debug, Parser)]
#[command(name = "lintlens")]
#[command(
    about = "Resolve lintlens configuration and stream diagnostics from annotation files",
    long_about = None
)]
#[command(version, after_help = ENV_HELP)]
#[command(group(
    ArgGroup::new("mode")
        .args(["print_config", "search_url", "import_line"])
        .multiple(false)
))]
pub struct Cli {
    /// Print the resolved configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Print the documentation search URL for QUERY
    #[arg(long, num_args = 2, value_names = ["LANG", "QUERY"])]
    search_url: Option<Vec<String>>,

    /// Print the import line derived from PATH
    #[arg(long, num_args = 2, value_names = ["LANG", "PATH"])]
    import_line: Option<Vec<String>>,

    /// Workspace roots (default: the current directory)
    #[arg(value_name = "ROOT")]
    pub roots: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Watch,
    PrintConfig,
    SearchUrl { language: String, query: String },
    ImportLine { language: String, path: String },
}

impl Cli {
    /// The selected mode. clap guarantees at most one mode flag and exactly
    /// two values for each two-value flag.
    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.print_config {
            return Mode::PrintConfig;
        }
        if let Some([language, query]) = self.search_url.as_deref() {
            return Mode::SearchUrl {
                language: language.clone(),
                query: query.clone(),
            };
        }
        if let Some([language, path]) = self.import_line.as_deref() {
            return Mode::ImportLine {
                language: language.clone(),
                path: path.clone(),
            };
        }
        Mode::Watch
    }
}
