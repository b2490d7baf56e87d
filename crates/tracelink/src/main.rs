//! `tracelink` - CLI for tracelink
//!
//! This binary provides the command-line interface for creating, listing and
//! viewing traceability records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;

use tracelink::app::App;
use tracelink::cli::{
    shell, CatalogCommand, CatalogKind, Cli, Command, ConfigCommand, CreateCommand, ListCommand,
    OutputFormat, StatusCommand, StoreCommand, ViewCommand,
};
use tracelink::clipboard::{SystemClipboard, COPIED_MESSAGE};
use tracelink::{init_logging, viewer, Catalog, Config, EntryDraft, EntryStore, Storage};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Create(cmd) => handle_create(&config, &cmd),
        Command::View(cmd) => handle_view(&config, &cmd),
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Catalog(cmd) => handle_catalog(&config, &cmd),
        Command::Shell => handle_shell(&config),
        Command::Status(cmd) => handle_status(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
        Command::Store(cmd) => handle_store(&config, &cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<EntryStore<Storage>> {
    let path = config.database_path();
    let storage = Storage::open(&path)
        .with_context(|| format!("opening entry store at {}", path.display()))?;
    Ok(EntryStore::from_config(storage, &config.storage))
}

fn open_app(config: &Config) -> anyhow::Result<App<Storage>> {
    let catalog = Catalog::load(&config.catalog)?;
    Ok(App::new(config.clone(), catalog, open_store(config)?))
}

fn handle_create(config: &Config, cmd: &CreateCommand) -> anyhow::Result<()> {
    let mut app = open_app(config)?;
    app.login(&cmd.username, &cmd.password)?;

    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let date = cmd.date.as_deref().unwrap_or(&today);
    let draft = EntryDraft::parse(&cmd.product, &cmd.location, date)?;
    let link = app.submit(draft)?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&link)?),
        OutputFormat::Plain => {
            println!("Created {}", link.path);
            println!("Link: {}", link.url);
        }
    }

    if cmd.copy {
        // The entry is stored either way; a clipboard failure only loses the copy
        match app.copy_link(&link.id, &mut SystemClipboard) {
            Ok(_) => eprintln!("{COPIED_MESSAGE}"),
            Err(e) => eprintln!("Could not copy link: {e}"),
        }
    }
    Ok(())
}

fn handle_view(config: &Config, cmd: &ViewCommand) -> anyhow::Result<()> {
    let mut store = open_store(config)?;
    let outcome = viewer::view(&mut store, &cmd.target)?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Plain => print!("{outcome}"),
    }
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let mut app = open_app(config)?;
    app.login(&cmd.username, &cmd.password)?;
    let links = app.links()?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&links)?),
        OutputFormat::Plain if links.is_empty() => println!("No links created yet"),
        OutputFormat::Plain => {
            for link in &links {
                println!("{}  {}", link.url, link.label());
            }
        }
    }
    Ok(())
}

fn handle_catalog(config: &Config, cmd: &CatalogCommand) -> anyhow::Result<()> {
    let catalog = Catalog::load(&config.catalog)?;
    // Passwords never leave the catalog
    let users: Vec<_> = catalog
        .users()
        .iter()
        .map(|u| serde_json::json!({ "username": u.username, "company": u.company }))
        .collect();

    if cmd.json {
        let value = match cmd.kind {
            Some(CatalogKind::Products) => serde_json::json!(catalog.products()),
            Some(CatalogKind::Locations) => serde_json::json!(catalog.locations()),
            Some(CatalogKind::Users) => serde_json::json!(users),
            None => serde_json::json!({
                "products": catalog.products(),
                "locations": catalog.locations(),
                "users": users,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let show_all = cmd.kind.is_none();
    if show_all || cmd.kind == Some(CatalogKind::Products) {
        println!("[Products]");
        for product in catalog.products() {
            println!("  {product}");
        }
    }
    if show_all || cmd.kind == Some(CatalogKind::Locations) {
        println!("[Locations]");
        for location in catalog.locations() {
            println!("  {location}");
        }
    }
    if show_all || cmd.kind == Some(CatalogKind::Users) {
        println!("[Users]");
        for user in catalog.users() {
            println!("  {:<16} {}", user.username, user.company);
        }
    }
    Ok(())
}

fn handle_shell(config: &Config) -> anyhow::Result<()> {
    let mut app = open_app(config)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell::run(&mut app, stdin.lock(), &mut stdout, &mut SystemClipboard)?;
    Ok(())
}

fn handle_status(config: &Config, cmd: &StatusCommand) -> anyhow::Result<()> {
    let mut store = open_store(config)?;
    let entries = store.load()?;
    let count = entries.len();
    let next_expiry = entries.iter().map(|e| e.expiry).min();
    let policy = store.policy();

    if cmd.json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "entries": count,
            "max_entries": policy.max_entries,
            "entry_ttl_days": policy.ttl.num_days(),
            "next_expiry": next_expiry,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("tracelink status");
        println!("----------------");
        println!("Database:      {}", config.database_path().display());
        println!("Entries:       {count} / {}", policy.max_entries);
        println!("Entry TTL:     {} days", policy.ttl.num_days());
        match next_expiry {
            Some(expiry) => println!("Next expiry:   {}", expiry.to_rfc3339()),
            None => println!("Next expiry:   -"),
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Max entries:        {}", config.storage.max_entries);
                println!("  Entry TTL (days):   {}", config.storage.entry_ttl_days);
                println!("  Storage key:        {}", config.storage.storage_key);
                println!();
                println!("[Links]");
                println!("  Base URL:           {}", config.links.base_url);
                println!();
                println!("[Catalog]");
                for (name, path) in [
                    ("Users", &config.catalog.users_path),
                    ("Products", &config.catalog.products_path),
                    ("Locations", &config.catalog.locations_path),
                ] {
                    let shown = path
                        .as_ref()
                        .map_or_else(|| "(bundled)".to_string(), |p| p.display().to_string());
                    println!("  {:<20}{shown}", format!("{name}:"));
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn handle_store(config: &Config, cmd: &StoreCommand) -> anyhow::Result<()> {
    match cmd {
        StoreCommand::Clear { yes } => {
            if !*yes {
                println!("This will delete every stored entry and its link.");
                println!("Use --yes to confirm.");
                return Ok(());
            }
            let removed = open_store(config)?.clear()?;
            println!("Removed {removed} entries.");
        }
    }
    Ok(())
}
