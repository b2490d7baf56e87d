//! Static reference data: users, products and growing locations.
//!
//! The catalog ships with bundled JSON data and can be pointed at other files
//! through [`CatalogConfig`]. It is read once at startup and never written.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CatalogConfig;
use crate::error::{Error, Result};

const BUNDLED_USERS: &str = include_str!("../data/users.json");
const BUNDLED_PRODUCTS: &str = include_str!("../data/products.json");
const BUNDLED_LOCATIONS: &str = include_str!("../data/locations.json");

/// A user allowed to create entries.
///
/// The password is stored and compared in plaintext. This is a demonstration
/// gate, not a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Login name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
    /// Company shown as the heading of every record this user creates.
    pub company: String,
    /// Company address.
    pub address: String,
    /// Name of the packing facility.
    pub packing_location: String,
    /// Address of the packing facility.
    pub packing_address: String,
}

/// The full set of reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    users: Vec<User>,
    products: Vec<String>,
    locations: Vec<String>,
}

impl Catalog {
    /// Build a catalog from in-memory lists.
    #[must_use]
    pub fn new(users: Vec<User>, products: Vec<String>, locations: Vec<String>) -> Self {
        Self {
            users,
            products,
            locations,
        }
    }

    /// The catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled JSON is malformed.
    pub fn bundled() -> Result<Self> {
        Ok(Self {
            users: serde_json::from_str(BUNDLED_USERS)?,
            products: serde_json::from_str(BUNDLED_PRODUCTS)?,
            locations: serde_json::from_str(BUNDLED_LOCATIONS)?,
        })
    }

    /// Load the catalog, reading each configured file and falling back to the
    /// bundled list for any that is unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CatalogLoad`] if a configured file is unreadable or
    /// not a JSON array of the expected shape.
    pub fn load(config: &CatalogConfig) -> Result<Self> {
        let bundled = Self::bundled()?;
        Ok(Self {
            users: load_list(config.users_path.as_deref(), bundled.users)?,
            products: load_list(config.products_path.as_deref(), bundled.products)?,
            locations: load_list(config.locations_path.as_deref(), bundled.locations)?,
        })
    }

    /// All known users.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// All selectable products.
    #[must_use]
    pub fn products(&self) -> &[String] {
        &self.products
    }

    /// All selectable growing locations.
    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Check that `product` is one of the catalog products.
    #[must_use]
    pub fn has_product(&self, product: &str) -> bool {
        self.products.iter().any(|p| p == product)
    }

    /// Check that `location` is one of the catalog locations.
    #[must_use]
    pub fn has_location(&self, location: &str) -> bool {
        self.locations.iter().any(|l| l == location)
    }
}

fn load_list<T: DeserializeOwned>(path: Option<&Path>, fallback: Vec<T>) -> Result<Vec<T>> {
    let Some(path) = path else {
        return Ok(fallback);
    };

    debug!("Loading catalog file {}", path.display());
    let raw = std::fs::read_to_string(path).map_err(|e| Error::CatalogLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| Error::CatalogLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
