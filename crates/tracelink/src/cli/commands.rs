//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Create command arguments.
#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Username to log in with
    #[arg(short, long)]
    pub username: String,

    /// Password to log in with
    #[arg(short, long)]
    pub password: String,

    /// Product, exactly as listed in the product catalog
    #[arg(long)]
    pub product: String,

    /// Growing location, exactly as listed in the location catalog
    #[arg(long)]
    pub location: String,

    /// Packing date as YYYY-MM-DD (defaults to today, UTC)
    #[arg(long)]
    pub date: Option<String>,

    /// Copy the shareable link to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// View command arguments.
#[derive(Debug, Args)]
pub struct ViewCommand {
    /// A `/view/{id}` path, a shareable URL, or a bare id
    pub target: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Username to log in with
    #[arg(short, long)]
    pub username: String,

    /// Password to log in with
    #[arg(short, long)]
    pub password: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Catalog command arguments.
#[derive(Debug, Args)]
pub struct CatalogCommand {
    /// Which list to print (all when omitted)
    #[arg(value_enum)]
    pub kind: Option<CatalogKind>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Entry store maintenance commands.
#[derive(Debug, Subcommand)]
pub enum StoreCommand {
    /// Delete every stored entry
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Reference data lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogKind {
    /// Product names
    Products,
    /// Growing locations
    Locations,
    /// Usernames and companies
    Users,
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
