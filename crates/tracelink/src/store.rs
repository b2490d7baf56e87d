//! The entry store: a bounded, self-expiring list of entries.
//!
//! The whole list lives as one JSON array under a single key of a
//! [`KeyValueStore`]. Every load sweeps expired entries and writes the
//! survivors back; every append keeps only the newest `max_entries`.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::catalog::User;
use crate::config::{
    StorageConfig, DEFAULT_ENTRY_TTL_DAYS, DEFAULT_MAX_ENTRIES, DEFAULT_STORAGE_KEY,
};
use crate::entry::{Entry, EntryDraft};
use crate::error::{Error, Result};
use crate::id::generate_short_id;
use crate::storage::KeyValueStore;

/// How many fresh ids are tried before giving up on a collision-free one.
pub const MAX_ID_ATTEMPTS: usize = 32;

/// Size and age limits for the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Entries kept after an append, newest first.
    pub max_entries: usize,
    /// Lifetime of a new entry.
    pub ttl: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl: Duration::days(i64::from(DEFAULT_ENTRY_TTL_DAYS)),
        }
    }
}

impl From<&StorageConfig> for RetentionPolicy {
    fn from(config: &StorageConfig) -> Self {
        Self {
            max_entries: config.max_entries,
            ttl: config.entry_ttl(),
        }
    }
}

/// Bounded, expiring entry collection over a key-value backend.
#[derive(Debug)]
pub struct EntryStore<S> {
    backend: S,
    key: String,
    policy: RetentionPolicy,
    entries: Vec<Entry>,
    loaded: bool,
    id_source: fn() -> String,
}

impl<S: KeyValueStore> EntryStore<S> {
    /// Create a store over `backend` using the default storage key.
    pub fn new(backend: S, policy: RetentionPolicy) -> Self {
        Self {
            backend,
            key: DEFAULT_STORAGE_KEY.to_string(),
            policy,
            entries: Vec::new(),
            loaded: false,
            id_source: generate_short_id,
        }
    }

    /// Create a store configured from the `[storage]` section.
    pub fn from_config(backend: S, config: &StorageConfig) -> Self {
        Self::new(backend, RetentionPolicy::from(config)).with_key(config.storage_key.clone())
    }

    /// Use a different storage key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Use a different id generator.
    #[must_use]
    pub fn with_id_source(mut self, id_source: fn() -> String) -> Self {
        self.id_source = id_source;
        self
    }

    /// The retention limits in effect.
    #[must_use]
    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// The underlying key-value backend.
    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// The entries as of the last load or append, newest first.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Load the list and sweep expired entries as of now.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend fails. Corrupt data loads as an
    /// empty list.
    pub fn load(&mut self) -> Result<&[Entry]> {
        self.load_at(Utc::now())
    }

    /// Load the list, drop entries whose expiry is not after `now`, and write
    /// the survivors back.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend fails.
    pub fn load_at(&mut self, now: DateTime<Utc>) -> Result<&[Entry]> {
        let stored = self.read_stored()?;
        let before = stored.len();

        let live: Vec<Entry> = stored.into_iter().filter(|e| e.is_live_at(now)).collect();
        if live.len() < before {
            info!(expired = before - live.len(), "Swept expired entries");
        }

        self.write_stored(&live)?;
        self.entries = live;
        self.loaded = true;
        debug!(count = self.entries.len(), "Loaded entries");
        Ok(&self.entries)
    }

    /// Prepend `entry`, keep the newest `max_entries`, and persist.
    ///
    /// Loads first if nothing has been loaded yet, so an append never
    /// clobbers stored entries it has not seen.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn append(&mut self, entry: Entry) -> Result<&[Entry]> {
        if !self.loaded {
            self.load()?;
        }

        let mut updated = Vec::with_capacity(self.entries.len() + 1);
        updated.push(entry);
        updated.append(&mut self.entries);

        if updated.len() > self.policy.max_entries {
            let dropped = updated.len() - self.policy.max_entries;
            updated.truncate(self.policy.max_entries);
            info!(dropped, max = self.policy.max_entries, "Dropped oldest entries");
        }

        self.write_stored(&updated)?;
        self.entries = updated;
        Ok(&self.entries)
    }

    /// Find an entry in the loaded list. The newest match wins.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Load, then look up `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails. A missing id is `Ok(None)`.
    pub fn get(&mut self, id: &str) -> Result<Option<&Entry>> {
        self.load()?;
        Ok(self.find_by_id(id))
    }

    /// Create and store an entry for `user`, expiring one TTL from now.
    ///
    /// # Errors
    ///
    /// Returns an error if no free id is found or the backend fails.
    pub fn create(&mut self, draft: EntryDraft, user: &User) -> Result<Entry> {
        self.create_at(draft, user, Utc::now())
    }

    /// Create and store an entry as of `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if no free id is found or the backend fails.
    pub fn create_at(
        &mut self,
        draft: EntryDraft,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<Entry> {
        if !self.loaded {
            self.load_at(now)?;
        }

        let id = self.fresh_id()?;
        let entry = Entry::from_draft(id, draft, user, now + self.policy.ttl);
        info!(id = %entry.id, product = %entry.product, "Created entry");

        self.append(entry.clone())?;
        Ok(entry)
    }

    /// Remove every stored entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn clear(&mut self) -> Result<usize> {
        if !self.loaded {
            self.load()?;
        }
        let removed = self.entries.len();
        self.backend.remove_item(&self.key)?;
        self.entries.clear();
        info!(removed, "Cleared entry store");
        Ok(removed)
    }

    /// Number of loaded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the loaded list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn fresh_id(&self) -> Result<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = (self.id_source)();
            if self.find_by_id(&id).is_none() {
                return Ok(id);
            }
            debug!(id = %id, "Short id collides with a stored entry, retrying");
        }
        Err(Error::IdSpaceExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn read_stored(&self) -> Result<Vec<Entry>> {
        let Some(raw) = self.backend.get_item(&self.key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding unreadable entry list");
                Ok(Vec::new())
            }
        }
    }

    fn write_stored(&mut self, entries: &[Entry]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        self.backend.set_item(&self.key, &raw)
    }
}
