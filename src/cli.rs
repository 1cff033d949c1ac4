// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - probe:  discover the images of one product folder
// - render: load the catalog, probe every product, emit the grid as HTML
// - play:   run one product's carousel in the terminal
// - theme:  show or change the saved theme preference
//
// Rust concepts:
// - Derive macros: #[derive(Parser)] generates the argument parser
// - Attributes: #[arg(...)] configures each flag
// - #[command(flatten)]: share one group of flags between subcommands
// - Doc comments (///) become the --help text
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::carousel::Gesture;
use crate::probe::{ProbeOptions, DEFAULT_MAX_INDEX, DEFAULT_MISS_LIMIT};

// The top-level CLI structure
#[derive(Parser, Debug)]
#[command(
    name = "catalog-carousel",
    version,
    about = "Render a product catalog with image carousels discovered by probing",
    long_about = "catalog-carousel loads a product list, discovers each product's numbered images \
                  (Images/Products/<folder>/<n>.<ext>) by trying to load them, and renders one \
                  auto-sliding carousel card per product."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

// Each variant is one subcommand; its fields are that subcommand's arguments
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover the images of a single product folder
    ///
    /// Example: catalog-carousel probe stoneware-mug --source https://shop.example
    Probe {
        /// Folder name under Images/Products/
        folder: String,

        /// Site root URL or local directory holding Images/Products/
        #[arg(long)]
        source: String,

        #[command(flatten)]
        probe: ProbeArgs,

        /// Output the probe report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load the catalog, probe every product and render the product grid
    ///
    /// Example: catalog-carousel render --source ./site --output grid.html
    Render {
        /// Site root URL or local directory holding Images/Products/
        #[arg(long)]
        source: String,

        /// URL of a JSON product list; the embedded list is used if omitted or unavailable
        #[arg(long)]
        catalog: Option<String>,

        /// Write the markup to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Wrap the grid in a complete HTML page
        #[arg(long)]
        page: bool,

        /// Page title used with --page
        #[arg(long, default_value = "Products")]
        title: String,

        /// Preference file holding the saved theme
        #[arg(long, default_value = ".catalog-prefs.json")]
        prefs: PathBuf,

        #[command(flatten)]
        probe: ProbeArgs,

        /// Output card states as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },

    /// Run one product's carousel and print each slide as autoplay advances
    ///
    /// Example: catalog-carousel play brass-desk-lamp --source ./site --ticks 6
    Play {
        /// Folder name under Images/Products/
        folder: String,

        /// Site root URL or local directory holding Images/Products/
        #[arg(long)]
        source: String,

        /// Product name used as alt text (defaults to the folder name)
        #[arg(long)]
        name: Option<String>,

        /// How many autoplay intervals to run before stopping
        #[arg(long, default_value_t = 5)]
        ticks: u32,

        /// Autoplay interval in milliseconds
        #[arg(long, default_value_t = 3500)]
        interval_ms: u64,

        /// Read commands from stdin while playing (n/p/space/click/hover/leave/q)
        #[arg(long)]
        interactive: bool,

        #[command(flatten)]
        probe: ProbeArgs,
    },

    /// Show or change the saved theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,

        /// Preference file holding the saved theme
        // global: accepted before or after the action (theme --prefs x toggle)
        #[arg(long, global = true, default_value = ".catalog-prefs.json")]
        prefs: PathBuf,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ThemeAction {
    /// Print the saved theme (the default action)
    Show,
    /// Switch between dark and light
    Toggle,
    /// Save a specific theme
    Set {
        /// "dark" or "light"
        theme: String,
    },
}

// Flags shared by every command that probes images
#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Highest image index to try
    #[arg(long, default_value_t = DEFAULT_MAX_INDEX, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_index: u32,

    /// Stop after this many consecutive missing indices
    #[arg(long, default_value_t = DEFAULT_MISS_LIMIT, value_parser = clap::value_parser!(u32).range(1..))]
    pub miss_limit: u32,

    /// Candidate extensions in priority order (comma separated)
    #[arg(long = "ext", value_delimiter = ',', default_value = "jpg,jpeg,png,webp")]
    pub extensions: Vec<String>,

    /// Per-request timeout in seconds for HTTP sources
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}

impl ProbeArgs {
    // Turns raw flags into the library's options
    //
    // "--ext .PNG, jpg" -> ["png", "jpg"]: trimmed, no leading dot, lowercase
    pub fn options(&self) -> ProbeOptions {
        ProbeOptions {
            max_index: self.max_index,
            miss_limit: self.miss_limit,
            extensions: self
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// One line typed while `play --interactive` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayInput {
    Gesture(Gesture),
    Quit,
}

// Accepts key names ("ArrowLeft", "Space") as well as short words
pub fn parse_play_input(line: &str) -> Option<PlayInput> {
    // Exact key names first, so " " stays a space before trimming
    if let Some(gesture) = Gesture::from_key(line) {
        return Some(PlayInput::Gesture(gesture));
    }

    let gesture = match line.trim().to_ascii_lowercase().as_str() {
        "" | "space" | "pause" => Gesture::Space,
        "n" | "next" | "right" => Gesture::ArrowRight,
        "p" | "prev" | "previous" | "left" => Gesture::ArrowLeft,
        "click" | "c" => Gesture::Activate,
        "hover" | "enter" => Gesture::HoverEnter,
        "leave" => Gesture::HoverLeave,
        // These two arms return early: they aren't gestures
        "q" | "quit" | "exit" => return Some(PlayInput::Quit),
        _ => return None,
    };
    Some(PlayInput::Gesture(gesture))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a derive macro?
//    - It writes code for you at compile time
//    - #[derive(Parser)] generates all the argument parsing logic
//
// 2. What does value_parser!(u32).range(1..) do?
//    - Rejects 0 while parsing, with a clear error message
//    - The rest of the program never sees an invalid limit
//
// 3. Why Option<ThemeAction>?
//    - `catalog-carousel theme` with no action is allowed
//    - main.rs treats None as Show
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_defaults_match_library_defaults() {
        let cli = Cli::parse_from(["catalog-carousel", "probe", "mug", "--source", "./site"]);
        match cli.command {
            Commands::Probe { probe, .. } => assert_eq!(probe.options(), ProbeOptions::default()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_extension_list_is_normalized() {
        let cli = Cli::parse_from([
            "catalog-carousel", "probe", "mug", "--source", "./site", "--ext", ".PNG, jpg",
        ]);
        match cli.command {
            Commands::Probe { probe, .. } => {
                assert_eq!(probe.options().extensions, vec!["png", "jpg"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_zero_miss_limit_is_rejected() {
        let result = Cli::try_parse_from([
            "catalog-carousel", "probe", "mug", "--source", "./site", "--miss-limit", "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_play_input() {
        assert_eq!(parse_play_input("n"), Some(PlayInput::Gesture(Gesture::ArrowRight)));
        assert_eq!(parse_play_input("ArrowLeft"), Some(PlayInput::Gesture(Gesture::ArrowLeft)));
        assert_eq!(parse_play_input(""), Some(PlayInput::Gesture(Gesture::Space)));
        assert_eq!(parse_play_input(" Click "), Some(PlayInput::Gesture(Gesture::Activate)));
        assert_eq!(parse_play_input("q"), Some(PlayInput::Quit));
        assert_eq!(parse_play_input("jump"), None);
    }

    #[test]
    fn test_theme_action_is_optional() {
        let cli = Cli::parse_from(["catalog-carousel", "theme"]);
        assert!(matches!(cli.command, Commands::Theme { action: None, .. }));
    }
}
