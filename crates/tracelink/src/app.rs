//! Application state machine.
//!
//! ```text
//! Login --login--> EntryForm
//!   any --/view/{id}--> Viewing --back--> Login | EntryForm
//! EntryForm --logout--> Login
//! ```
//!
//! Viewing a record never requires a session.

use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, User};
use crate::clipboard::CopyTarget;
use crate::config::Config;
use crate::entry::{Entry, EntryDraft};
use crate::error::{Error, Result};
use crate::link::{share_url, view_path, Route};
use crate::session::Session;
use crate::storage::KeyValueStore;
use crate::store::EntryStore;
use crate::viewer::{self, ViewOutcome};

/// The screen currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Logged out, asking for credentials.
    Login,
    /// Logged in, entering product data.
    EntryForm,
    /// Showing the record with this id.
    Viewing {
        /// Id taken from the path.
        id: String,
    },
}

/// What a navigation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// The login form.
    Login,
    /// The entry form with the links created so far.
    EntryForm {
        /// Stored links, newest first.
        links: Vec<LinkItem>,
    },
    /// A record, or the not-found message.
    Record(ViewOutcome),
    /// A path no screen handles. The current screen is unchanged.
    Unknown {
        /// The unmatched path.
        path: String,
    },
}

/// One row of the "links created" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkItem {
    /// Entry id.
    pub id: String,
    /// Product name.
    pub product: String,
    /// Packing date as `YYYY-MM-DD`.
    pub date: String,
    /// Navigable path.
    pub path: String,
    /// Shareable URL.
    pub url: String,
}

impl LinkItem {
    fn new(entry: &Entry, base_url: &str) -> Self {
        Self {
            id: entry.id.clone(),
            product: entry.product.clone(),
            date: entry.date.format("%Y-%m-%d").to_string(),
            path: view_path(&entry.id),
            url: share_url(base_url, &entry.id),
        }
    }

    /// The `product - date` label used in listings.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.product, self.date)
    }
}

/// The state behind the screens.
#[derive(Debug)]
pub struct App<S> {
    config: Config,
    catalog: Catalog,
    session: Session,
    store: EntryStore<S>,
    screen: Screen,
}

impl<S: KeyValueStore> App<S> {
    /// Start logged out on the login screen.
    pub fn new(config: Config, catalog: Catalog, store: EntryStore<S>) -> Self {
        Self {
            config,
            catalog,
            session: Session::new(),
            store,
            screen: Screen::Login,
        }
    }

    /// The current screen.
    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The reference data.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The entry store.
    #[must_use]
    pub fn store(&self) -> &EntryStore<S> {
        &self.store
    }

    /// Log in and move to the entry form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthenticationFailed`] on bad credentials; the screen
    /// and session stay as they were.
    pub fn login(&mut self, username: &str, password: &str) -> Result<&User> {
        self.session.login(self.catalog.users(), username, password)?;
        self.screen = Screen::EntryForm;
        self.session.require_user()
    }

    /// Log out and return to the login screen.
    pub fn logout(&mut self) {
        self.session.logout();
        self.screen = Screen::Login;
    }

    /// Follow a path.
    ///
    /// # Errors
    ///
    /// Returns an error if the store backend fails.
    pub fn navigate(&mut self, path: &str) -> Result<Page> {
        match Route::parse(path) {
            Route::Home => self.home(),
            Route::View(id) => {
                let outcome = viewer::view(&mut self.store, &id)?;
                debug!(id = %id, found = outcome.is_found(), "Opened record view");
                self.screen = Screen::Viewing { id };
                Ok(Page::Record(outcome))
            }
            Route::Unknown(path) => {
                debug!(path = %path, "No screen for path");
                Ok(Page::Unknown { path })
            }
        }
    }

    /// Leave the record view for the home screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the store backend fails.
    pub fn back(&mut self) -> Result<Page> {
        self.home()
    }

    fn home(&mut self) -> Result<Page> {
        if self.session.is_logged_in() {
            self.screen = Screen::EntryForm;
            Ok(Page::EntryForm {
                links: self.links()?,
            })
        } else {
            self.screen = Screen::Login;
            Ok(Page::Login)
        }
    }

    /// The links currently in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store backend fails.
    pub fn links(&mut self) -> Result<Vec<LinkItem>> {
        let base_url = &self.config.links.base_url;
        Ok(self
            .store
            .load()?
            .iter()
            .map(|e| LinkItem::new(e, base_url))
            .collect())
    }

    /// Create an entry from the form and return its link.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] without a session,
    /// [`Error::FormNotOpen`] while another screen is shown, a validation
    /// error for a bad draft, or a storage error.
    pub fn submit(&mut self, draft: EntryDraft) -> Result<LinkItem> {
        let user = self.session.require_user()?;
        if self.screen != Screen::EntryForm {
            return Err(Error::FormNotOpen);
        }
        draft.validate(&self.catalog)?;

        let entry = self.store.create(draft, user)?;
        Ok(LinkItem::new(&entry, &self.config.links.base_url))
    }

    /// Copy the shareable URL of the stored entry `id` to `target`. Returns
    /// the URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no live entry has this id, or an
    /// error if the store or the target fails.
    pub fn copy_link(&mut self, id: &str, target: &mut impl CopyTarget) -> Result<String> {
        if self.store.get(id)?.is_none() {
            return Err(Error::record_not_found(id));
        }
        let url = share_url(&self.config.links.base_url, id);
        target.copy_text(&url)?;
        Ok(url)
    }
}
