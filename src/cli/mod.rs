//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// sc2-quotes - Pick StarCraft II quotes and turn them into hook sounds.
///
/// Selections are JSON arrays of `{quote: {audioUrl, text}, unitName, categoryName}`.
#[derive(Parser, Debug)]
#[command(name = "sc2-quotes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.sc2-quotes/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend origin, overriding the config file.
    #[arg(long, env = "SC2_QUOTES_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the hook folders quotes can be saved into.
    Folders,

    /// Show catalog sections and units.
    Browse {
        /// Catalog JSON file.
        #[arg(short, long)]
        catalog: PathBuf,

        /// Only units whose name contains this text.
        #[arg(short, long, default_value = "")]
        unit: String,

        /// Collapse a section (repeatable).
        #[arg(long)]
        collapse: Vec<String>,
    },

    /// Pick quotes from a catalog into a selection file.
    Select {
        /// Catalog JSON file.
        #[arg(short, long)]
        catalog: PathBuf,

        /// Only units whose name contains this text.
        #[arg(short, long, default_value = "")]
        unit: String,

        /// Only quotes whose text contains this text.
        #[arg(short, long, default_value = "")]
        quote: String,

        /// Selection file to write.
        #[arg(short, long, default_value = "selection.json")]
        output: PathBuf,
    },

    /// Preview the filenames a selection will produce.
    Names {
        /// Selection JSON file.
        selection: PathBuf,
    },

    /// Save a selection into a hook sound folder via the backend.
    Save {
        /// Selection JSON file.
        selection: PathBuf,

        /// Hook folder: done, start, userpromptsubmit, precompact.
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// Download a selection as a ZIP via the backend.
    Download {
        /// Selection JSON file.
        selection: PathBuf,

        /// Directory to write the ZIP into.
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Manage setup lists.
    Lists {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Edit hooks of the active setup.
    Hooks {
        #[command(subcommand)]
        action: HookAction,
    },

    /// Work with the active setup.
    Setup {
        #[command(subcommand)]
        action: SetupAction,
    },

    /// Inspect or create the config file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ListAction {
    /// Show all lists.
    Show,

    /// Create a new list.
    Create {
        /// List name.
        name: String,
    },

    /// Rename a list (the active one by default).
    Rename {
        /// New name.
        name: String,

        /// List to rename.
        #[arg(long)]
        id: Option<String>,
    },

    /// Delete a list after confirmation.
    Delete {
        /// List to delete.
        id: String,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Make a list active.
    Use {
        /// List to activate.
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum HookAction {
    /// Add the quotes of a selection to a hook.
    Add {
        /// Hook name.
        #[arg(long)]
        hook: String,

        /// Selection JSON file.
        selection: PathBuf,

        /// Faction recorded with each recommendation.
        #[arg(long)]
        race: Option<String>,
    },

    /// Remove one recommendation from a hook.
    Remove {
        /// Hook name.
        #[arg(long)]
        hook: String,

        /// 1-based position within the hook.
        index: usize,
    },

    /// Remove every recommendation from a hook.
    Clear {
        /// Hook name.
        #[arg(long)]
        hook: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SetupAction {
    /// Show hooks and sounds of the active setup.
    Show {
        /// Collapse a hook (repeatable).
        #[arg(long)]
        collapse: Vec<String>,
    },

    /// Save every hook's sounds into its sound folder.
    Sync,

    /// Download every sound of the setup as one ZIP.
    Download {
        /// Directory to write the ZIP into.
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Export the active setup as JSON.
    Export {
        /// Output file (stdout if not specified).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a setup JSON file.
    Import {
        /// Setup JSON file.
        file: PathBuf,

        /// Create a new list instead of replacing the active one's hooks.
        #[arg(long)]
        as_new: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,

    /// Write a default config file if none exists.
    Init,
}
