use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "issuefocus")]
#[command(version = env!("ISSUEFOCUS_VERSION"))]
#[command(about = "Hide noisy events from GitHub issue timelines", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the timeline entries of a page with their categories
    #[command(alias = "c")]
    Classify {
        /// Saved issue page (HTML)
        file: PathBuf,
    },

    /// Mark hidden entries and write the resulting page
    #[command(alias = "a")]
    Apply {
        /// Saved issue page (HTML)
        file: PathBuf,

        /// Where to write the marked page (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Keep a marked page in sync with its source and the settings
    #[command(alias = "w")]
    Watch {
        /// Saved issue page (HTML)
        file: PathBuf,

        /// Where to write the marked page (default: in place)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or change which categories are hidden
    #[command(alias = "s")]
    Settings {
        /// Category key, e.g. labeled or cross-referenced
        #[arg(requires = "switch")]
        category: Option<String>,

        /// `on` hides the category, `off` shows it
        switch: Option<String>,

        /// Restore the built-in defaults
        #[arg(long, conflicts_with_all = ["category", "switch"])]
        reset: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (hidden-class, mutation-delay-ms, navigation-delay-ms)
        key: Option<String>,
        /// Value to set
        value: Option<String>,
    },
}
