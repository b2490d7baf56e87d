//! Read-only record viewer.
//!
//! Resolves an id from a path, looks it up in the entry store and lays the
//! record out as a heading plus two labelled sections.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::entry::Entry;
use crate::error::Result;
use crate::id::is_short_id;
use crate::link::Route;
use crate::storage::KeyValueStore;
use crate::store::EntryStore;

/// Message shown in place of a record that does not exist.
pub const NOT_FOUND_MESSAGE: &str = "Record not found";

/// One titled block of label/value rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Section heading.
    pub title: &'static str,
    /// Rows in display order.
    pub rows: Vec<Row>,
}

/// A single labelled value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Field label.
    pub label: &'static str,
    /// Field value.
    pub value: String,
}

/// Rendered form of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordView {
    /// Record id.
    pub id: String,
    /// Company heading.
    pub company: String,
    /// Address shown under the heading.
    pub address: String,
    /// Product info, then packing info.
    pub sections: Vec<Section>,
}

impl From<&Entry> for RecordView {
    fn from(entry: &Entry) -> Self {
        let row = |label, value: &str| Row {
            label,
            value: value.to_string(),
        };

        Self {
            id: entry.id.clone(),
            company: entry.company.clone(),
            address: entry.address.clone(),
            sections: vec![
                Section {
                    title: "Product information",
                    rows: vec![
                        row("Product", &entry.product),
                        row("Growing location", &entry.location),
                    ],
                },
                Section {
                    title: "Packing information",
                    rows: vec![
                        row("Packing date", &entry.date.format("%Y-%m-%d").to_string()),
                        row("Packing location", &entry.packing_location),
                        row("Packing address", &entry.packing_address),
                    ],
                },
            ],
        }
    }
}

impl fmt::Display for RecordView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .sections
            .iter()
            .flat_map(|s| &s.rows)
            .map(|r| r.label.chars().count() + 1)
            .max()
            .unwrap_or(0);

        writeln!(f, "{}", self.company)?;
        writeln!(f, "{}", self.address)?;
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "[{}]", section.title)?;
            for row in &section.rows {
                let label = format!("{}:", row.label);
                writeln!(f, "  {label:<width$}  {}", row.value)?;
            }
        }
        Ok(())
    }
}

/// Result of viewing a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewOutcome {
    /// The record exists and is live.
    Found(RecordView),
    /// No live record has this id.
    NotFound {
        /// The id that was looked up.
        id: String,
    },
}

impl ViewOutcome {
    /// Whether a record was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl fmt::Display for ViewOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(view) => fmt::Display::fmt(view, f),
            Self::NotFound { .. } => writeln!(f, "{NOT_FOUND_MESSAGE}"),
        }
    }
}

/// Extract the record id from a `/view/{id}` path, a URL, or a bare id.
#[must_use]
pub fn resolve_id(target: &str) -> String {
    match Route::parse(target) {
        Route::View(id) => id,
        Route::Home | Route::Unknown(_) => target.trim().to_string(),
    }
}

/// Look up `target` in the store and render it.
///
/// The lookup loads the store, so expired entries are swept first.
///
/// # Errors
///
/// Returns an error only if the storage backend fails.
pub fn view<S: KeyValueStore>(store: &mut EntryStore<S>, target: &str) -> Result<ViewOutcome> {
    let id = resolve_id(target);
    if !is_short_id(&id) {
        debug!(id = %id, "Looking up an id that is not a standard short id");
    }

    Ok(match store.get(&id)? {
        Some(entry) => ViewOutcome::Found(RecordView::from(entry)),
        None => ViewOutcome::NotFound { id },
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::entry::fixtures::{draft, user};
    use crate::storage::MemoryStorage;
    use crate::store::RetentionPolicy;

    fn store() -> EntryStore<MemoryStorage> {
        EntryStore::new(MemoryStorage::new(), RetentionPolicy::default())
    }

    #[test]
    fn test_resolve_id() {
        assert_eq!(resolve_id("/view/k3j9x1"), "k3j9x1");
        assert_eq!(resolve_id("http://localhost:3000/view/k3j9x1"), "k3j9x1");
        assert_eq!(resolve_id("k3j9x1"), "k3j9x1");
        assert_eq!(resolve_id(" k3j9x1 "), "k3j9x1");
        assert_eq!(resolve_id("http://localhost:3000/#/view/k3j9x1"), "k3j9x1");
    }

    #[test]
    fn test_view_found() {
        let mut store = store();
        let created = store.create(draft(), &user()).unwrap();

        let outcome = view(&mut store, &created.path()).unwrap();
        let ViewOutcome::Found(record) = outcome else {
            panic!("expected a record");
        };

        assert_eq!(record.company, "ABC Co");
        assert_eq!(record.sections.len(), 2);
        assert_eq!(record.sections[0].title, "Product information");
        assert_eq!(record.sections[0].rows[0].value, "Xoài");
        assert_eq!(record.sections[0].rows[1].value, "Tiền Giang");
        assert_eq!(record.sections[1].rows[0].value, "2024-01-10");
        assert_eq!(record.sections[1].rows[1].value, "Plant 1");
        assert_eq!(record.sections[1].rows[2].value, "2 Dock Rd");
    }

    #[test]
    fn test_view_finds_nonstandard_id() {
        let mut store = store();
        let legacy = Entry::from_draft(
            "k3j9".to_string(),
            draft(),
            &user(),
            Utc::now() + Duration::days(1),
        );
        store.append(legacy).unwrap();

        assert!(!is_short_id("k3j9"));
        assert!(view(&mut store, "/view/k3j9").unwrap().is_found());
    }

    #[test]
    fn test_view_not_found_on_empty_store() {
        let mut store = store();
        let outcome = view(&mut store, "/view/zzzzzz").unwrap();

        assert_eq!(
            outcome,
            ViewOutcome::NotFound {
                id: "zzzzzz".to_string()
            }
        );
        assert_eq!(outcome.to_string(), "Record not found\n");
    }

    #[test]
    fn test_view_sweeps_expired() {
        let mut store = store();
        let created = store
            .create_at(draft(), &user(), Utc::now() - Duration::days(8))
            .unwrap();

        assert!(!view(&mut store, &created.id).unwrap().is_found());
        assert!(store.is_empty());
    }

    #[test]
    fn test_display_layout() {
        let mut store = store();
        let created = store.create(draft(), &user()).unwrap();
        let text = RecordView::from(&created).to_string();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ABC Co");
        assert_eq!(lines[1], "1 Main St");
        assert!(text.contains("[Product information]"));
        assert!(text.contains("[Packing information]"));
        assert!(text.contains("  Product:"));
        assert!(text.contains("Xoài"));
        assert!(text.contains("2024-01-10"));
    }

    #[test]
    fn test_json_shape() {
        let outcome = ViewOutcome::NotFound {
            id: "abc123".to_string(),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "not_found");
        assert_eq!(value["id"], "abc123");

        let created = Entry::from_draft("abc123".to_string(), draft(), &user(), Utc::now());
        let value = serde_json::to_value(ViewOutcome::Found(RecordView::from(&created))).unwrap();
        assert_eq!(value["status"], "found");
        assert_eq!(value["company"], "ABC Co");
    }
}
