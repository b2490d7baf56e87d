//! Error types for tracelink.
//!
//! Login and form failures carry the exact message shown to the user.
//! Storage, configuration and platform failures wrap their source.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tracelink operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Session Errors ===
    /// The username/password pair matched no known user.
    #[error("wrong username or password")]
    AuthenticationFailed,

    /// An operation that needs a logged-in user was attempted without one.
    #[error("not logged in")]
    NotLoggedIn,

    /// An entry was submitted while another screen was shown.
    #[error("the entry form is not open; go back to it first")]
    FormNotOpen,

    // === Entry Errors ===
    /// No stored entry has the requested id.
    #[error("record not found: {id}")]
    RecordNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A form field was missing or malformed.
    #[error("invalid {field}: {message}")]
    InvalidEntry {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// The product is not part of the product catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// The location is not part of the location catalog.
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// Could not find a short id that is free among the stored entries.
    #[error("could not generate a free short id after {attempts} attempts")]
    IdSpaceExhausted {
        /// Number of ids tried.
        attempts: usize,
    },

    // === Storage Errors ===
    /// The entry database could not be opened or created.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A read or write against the entry database failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The database schema could not be brought up to date.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// The config file or environment could not be parsed.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// A configured value is out of range.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// A catalog file could not be read or parsed.
    #[error("failed to load catalog from {path}: {message}")]
    CatalogLoad {
        /// Path of the catalog file.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    // === Platform Errors ===
    /// The system clipboard could not be written.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    // === I/O Errors ===
    /// Reading input or writing output failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The database directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// Bundled data or output could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for tracelink operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid entry error for the given field.
    #[must_use]
    pub fn invalid_entry(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            field,
            message: message.into(),
        }
    }

    /// Create a record not found error.
    #[must_use]
    pub fn record_not_found(id: impl Into<String>) -> Self {
        Self::RecordNotFound { id: id.into() }
    }

    /// Create a clipboard error.
    #[must_use]
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard(message.into())
    }

    /// Check if this error is a missing record.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. })
    }
}
