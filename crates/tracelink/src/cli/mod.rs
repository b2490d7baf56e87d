//! Command-line interface for tracelink.
//!
//! This module provides the CLI structure and the interactive shell for the
//! `tracelink` binary.

mod commands;
pub mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CatalogCommand, CatalogKind, ConfigCommand, CreateCommand, ListCommand, OutputFormat,
    StatusCommand, StoreCommand, ViewCommand,
};

/// tracelink - Product traceability records behind short links
///
/// Log in, record a product's growing location and packing date, and get a
/// short link that renders the record for anyone who opens it.
#[derive(Debug, Parser)]
#[command(name = "tracelink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and create a traceability entry
    Create(CreateCommand),

    /// Show the record behind a link
    View(ViewCommand),

    /// Log in and list the links in the store
    List(ListCommand),

    /// Print reference data
    Catalog(CatalogCommand),

    /// Interactive session
    Shell,

    /// Show store status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Maintain the entry store
    #[command(subcommand)]
    Store(StoreCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
