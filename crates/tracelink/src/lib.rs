//! `tracelink` - product traceability records behind short links
//!
//! A logged-in user records a product, its growing location and its packing
//! date. The record gets a 6-character id and a shareable `/view/{id}` link;
//! anyone holding the link can view it until it expires. Entries live in a
//! bounded, self-expiring list persisted under a single key of a local
//! key-value store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod catalog;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod entry;
pub mod error;
pub mod id;
pub mod link;
pub mod logging;
pub mod session;
pub mod storage;
pub mod store;
pub mod viewer;

pub use app::{App, LinkItem, Page, Screen};
pub use catalog::{Catalog, User};
pub use config::Config;
pub use entry::{Entry, EntryDraft};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use session::Session;
pub use storage::{KeyValueStore, MemoryStorage, Storage};
pub use store::{EntryStore, RetentionPolicy};
pub use viewer::{RecordView, ViewOutcome};
