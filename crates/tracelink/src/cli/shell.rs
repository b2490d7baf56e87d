//! Interactive shell over the application state machine.
//!
//! Reads one command per line. `new` prompts for the form fields on the
//! following lines so product and location names may contain spaces.

use std::io::{BufRead, Write};

use chrono::Utc;
use tracing::warn;

use crate::app::{App, Page, Screen};
use crate::clipboard::{CopyTarget, COPIED_MESSAGE};
use crate::entry::EntryDraft;
use crate::error::Result;
use crate::storage::KeyValueStore;
use crate::viewer::NOT_FOUND_MESSAGE;

const HELP: &str = "\
Commands:
  login <username> <password>   log in
  logout                        log out
  new                           create an entry (prompts for fields)
  open <path>                   open a path such as /view/abc123
  back                          leave the record view
  list                          list stored links
  copy <id>                     copy the shareable link of an entry
  products | locations          show the catalog
  help                          show this help
  quit                          leave the shell";

/// Run the shell until `quit` or end of input.
///
/// Failed commands print their error and the loop continues.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails.
pub fn run<S, R, W, C>(
    app: &mut App<S>,
    mut input: R,
    out: &mut W,
    clipboard: &mut C,
) -> Result<()>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
    C: CopyTarget,
{
    writeln!(out, "tracelink shell. Type 'help' for commands.")?;
    loop {
        write!(out, "{}> ", prompt(app.screen()))?;
        out.flush()?;

        let Some(line) = read_line(&mut input)? else {
            writeln!(out)?;
            return Ok(());
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let result = match command {
            "quit" | "exit" => return Ok(()),
            "help" => writeln!(out, "{HELP}").map_err(Into::into),
            "login" => login(app, rest, out),
            "logout" => {
                app.logout();
                writeln!(out, "Logged out").map_err(Into::into)
            }
            "new" => new_entry(app, &mut input, out),
            "open" => app.navigate(rest).and_then(|page| write_page(out, &page)),
            "back" => app.back().and_then(|page| write_page(out, &page)),
            "list" => app
                .links()
                .and_then(|links| write_page(out, &Page::EntryForm { links })),
            "copy" if rest.is_empty() => writeln!(out, "Usage: copy <id>").map_err(Into::into),
            "copy" => app
                .copy_link(rest, clipboard)
                .and_then(|url| writeln!(out, "{COPIED_MESSAGE}: {url}").map_err(Into::into)),
            "products" => write_list(out, app.catalog().products()),
            "locations" => write_list(out, app.catalog().locations()),
            other => writeln!(out, "Unknown command '{other}'. Type 'help'.").map_err(Into::into),
        };

        if let Err(e) = result {
            if matches!(e, crate::Error::Io(_)) {
                return Err(e);
            }
            if e.is_not_found() {
                writeln!(out, "{NOT_FOUND_MESSAGE}")?;
                continue;
            }
            warn!(command, error = %e, "Shell command failed");
            writeln!(out, "Error: {e}")?;
        }
    }
}

fn prompt(screen: &Screen) -> &'static str {
    match screen {
        Screen::Login => "login",
        Screen::EntryForm => "form",
        Screen::Viewing { .. } => "view",
    }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn login<S: KeyValueStore, W: Write>(app: &mut App<S>, args: &str, out: &mut W) -> Result<()> {
    let mut parts = args.split_whitespace();
    let (Some(username), Some(password)) = (parts.next(), parts.next()) else {
        writeln!(out, "Usage: login <username> <password>")?;
        return Ok(());
    };

    let company = app.login(username, password)?.company.clone();
    writeln!(out, "Logged in as {username} ({company})")?;
    let page = app.navigate("/")?;
    write_page(out, &page)
}

fn new_entry<S, R, W>(app: &mut App<S>, input: &mut R, out: &mut W) -> Result<()>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();

    write!(out, "Product: ")?;
    out.flush()?;
    let product = read_line(input)?.unwrap_or_default();

    write!(out, "Location: ")?;
    out.flush()?;
    let location = read_line(input)?.unwrap_or_default();

    write!(out, "Date [{today}]: ")?;
    out.flush()?;
    let date = read_line(input)?.unwrap_or_default();
    let date = if date.trim().is_empty() {
        today.as_str()
    } else {
        date.trim()
    };

    let draft = EntryDraft::parse(&product, &location, date)?;
    let link = app.submit(draft)?;
    writeln!(out, "Created {}", link.path)?;
    writeln!(out, "Link: {}", link.url)?;
    Ok(())
}

/// Write a page the way the shell shows it.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_page<W: Write>(out: &mut W, page: &Page) -> Result<()> {
    match page {
        Page::Login => writeln!(out, "Please log in: login <username> <password>")?,
        Page::EntryForm { links } => {
            if links.is_empty() {
                writeln!(out, "No links created yet")?;
            } else {
                writeln!(out, "Links created:")?;
                for link in links {
                    writeln!(out, "  {}  {}", link.path, link.label())?;
                }
            }
        }
        Page::Record(outcome) => write!(out, "{outcome}")?,
        Page::Unknown { path } => writeln!(out, "Nothing at {path}")?,
    }
    Ok(())
}

fn write_list<W: Write>(out: &mut W, items: &[String]) -> Result<()> {
    for item in items {
        writeln!(out, "  {item}")?;
    }
    Ok(())
}
