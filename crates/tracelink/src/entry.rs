//! Traceability entry types.
//!
//! An [`Entry`] is immutable once built. Its serialized form uses camelCase
//! keys and is the on-disk format of the entry list.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, User};
use crate::error::{Error, Result};

/// Form input for a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    /// Product name, from the product catalog.
    pub product: String,
    /// Growing location, from the location catalog.
    pub location: String,
    /// Packing date.
    pub date: NaiveDate,
}

impl EntryDraft {
    /// Create a draft.
    #[must_use]
    pub fn new(product: impl Into<String>, location: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            product: product.into(),
            location: location.into(),
            date,
        }
    }

    /// Parse a draft from raw form strings. The date must be `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEntry`] if a field is empty or the date does
    /// not parse.
    pub fn parse(product: &str, location: &str, date: &str) -> Result<Self> {
        let date = date.trim();
        if date.is_empty() {
            return Err(Error::invalid_entry("date", "must not be empty"));
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| Error::invalid_entry("date", format!("{date}: {e}")))?;
        Ok(Self::new(product.trim(), location.trim(), date))
    }

    /// Check the draft against the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if product or location is empty or not in the catalog.
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        if self.product.is_empty() {
            return Err(Error::invalid_entry("product", "must not be empty"));
        }
        if self.location.is_empty() {
            return Err(Error::invalid_entry("location", "must not be empty"));
        }
        if !catalog.has_product(&self.product) {
            return Err(Error::UnknownProduct(self.product.clone()));
        }
        if !catalog.has_location(&self.location) {
            return Err(Error::UnknownLocation(self.location.clone()));
        }
        Ok(())
    }
}

/// A stored traceability record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Short id, also the last path segment of the view link.
    pub id: String,
    /// Product name.
    pub product: String,
    /// Growing location.
    pub location: String,
    /// Packing date.
    pub date: NaiveDate,
    /// When the entry stops being viewable.
    pub expiry: DateTime<Utc>,
    /// Creating user's company.
    pub company: String,
    /// Creating user's company address.
    pub address: String,
    /// Creating user's packing facility.
    pub packing_location: String,
    /// Creating user's packing facility address.
    pub packing_address: String,
}

impl Entry {
    /// Build an entry from a draft, snapshotting the user's profile.
    #[must_use]
    pub fn from_draft(id: String, draft: EntryDraft, user: &User, expiry: DateTime<Utc>) -> Self {
        Self {
            id,
            product: draft.product,
            location: draft.location,
            date: draft.date,
            expiry,
            company: user.company.clone(),
            address: user.address.clone(),
            packing_location: user.packing_location.clone(),
            packing_address: user.packing_address.clone(),
        }
    }

    /// An entry is live while its expiry is strictly in the future.
    #[must_use]
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry > now
    }

    /// The navigable path of this entry.
    #[must_use]
    pub fn path(&self) -> String {
        crate::link::view_path(&self.id)
    }
}


#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_parse_draft() {
        let draft = EntryDraft::parse(" Xoài ", "Tiền Giang", "2024-01-10").unwrap();
        assert_eq!(draft.product, "Xoài");
        assert_eq!(draft.date, date("2024-01-10"));
    }

    #[test]
    fn test_parse_draft_bad_date() {
        let err = EntryDraft::parse("Xoài", "Tiền Giang", "10/01/2024").unwrap_err();
        assert!(matches!(err, Error::InvalidEntry { field: "date", .. }));

        let err = EntryDraft::parse("Xoài", "Tiền Giang", "").unwrap_err();
        assert!(matches!(err, Error::InvalidEntry { field: "date", .. }));
    }

    #[test]
    fn test_validate_ok() {
        assert!(draft().validate(&catalog()).is_ok());
    }

    #[test]
    fn test_validate_empty_fields() {
        let catalog = catalog();
        let mut d = draft();
        d.product = String::new();
        assert!(matches!(
            d.validate(&catalog),
            Err(Error::InvalidEntry {
                field: "product",
                ..
            })
        ));

        let mut d = draft();
        d.location = String::new();
        assert!(matches!(
            d.validate(&catalog),
            Err(Error::InvalidEntry {
                field: "location",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_unknown_catalog_values() {
        let catalog = catalog();
        let mut d = draft();
        d.product = "Táo".to_string();
        assert!(matches!(d.validate(&catalog), Err(Error::UnknownProduct(p)) if p == "Táo"));

        let mut d = draft();
        d.location = "Hà Nội".to_string();
        assert!(matches!(d.validate(&catalog), Err(Error::UnknownLocation(_))));
    }

    #[test]
    fn test_from_draft_snapshots_user() {
        let now = Utc::now();
        let entry = Entry::from_draft("abc123".to_string(), draft(), &user(), now);

        assert_eq!(entry.id, "abc123");
        assert_eq!(entry.product, "Xoài");
        assert_eq!(entry.location, "Tiền Giang");
        assert_eq!(entry.company, "ABC Co");
        assert_eq!(entry.address, "1 Main St");
        assert_eq!(entry.packing_location, "Plant 1");
        assert_eq!(entry.packing_address, "2 Dock Rd");
        assert_eq!(entry.expiry, now);
        assert_eq!(entry.path(), "/view/abc123");
    }

    #[test]
    fn test_is_live_at_boundary() {
        let now = Utc::now();
        let entry = Entry::from_draft("a".to_string(), draft(), &user(), now);

        assert!(entry.is_live_at(now - Duration::seconds(1)));
        assert!(!entry.is_live_at(now));
        assert!(!entry.is_live_at(now + Duration::seconds(1)));
    }

    #[test]
    fn test_serialized_shape() {
        let entry = Entry::from_draft(
            "zz9zz9".to_string(),
            draft(),
            &user(),
            "2024-01-17T00:00:00Z".parse().unwrap(),
        );
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["date"], "2024-01-10");
        assert_eq!(value["packingLocation"], "Plant 1");
        assert_eq!(value["packingAddress"], "2 Dock Rd");
        assert!(value["expiry"].as_str().unwrap().starts_with("2024-01-17T00:00:00"));
    }

    #[test]
    fn test_deserialize_browser_style_expiry() {
        let json = r#"{
            "id": "k3j9x1", "product": "Xoài", "location": "Bến Tre",
            "date": "2024-01-10", "expiry": "2024-01-17T08:30:00.000Z",
            "company": "C", "address": "A", "packingLocation": "PL", "packingAddress": "PA"
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "k3j9x1");
        assert_eq!(entry.expiry.to_rfc3339(), "2024-01-17T08:30:00+00:00");
    }
}
