//! Login gate and in-memory session.
//!
//! Credentials are compared in plaintext against the catalog's user list.
//! The session lives only as long as the process.

use tracing::{info, warn};

use crate::catalog::User;
use crate::error::{Error, Result};

/// Find the user with exactly this username and password.
///
/// # Errors
///
/// Returns [`Error::AuthenticationFailed`] if no user matches.
pub fn authenticate<'a>(users: &'a [User], username: &str, password: &str) -> Result<&'a User> {
    users
        .iter()
        .find(|u| u.username == username && u.password == password)
        .ok_or(Error::AuthenticationFailed)
}

/// The currently logged-in user, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// A logged-out session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log in against `users`. A failed attempt leaves the session as it was.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthenticationFailed`] on a credential mismatch.
    pub fn login(&mut self, users: &[User], username: &str, password: &str) -> Result<&User> {
        match authenticate(users, username, password) {
            Ok(user) => {
                info!(username, "Logged in");
                Ok(&*self.user.insert(user.clone()))
            }
            Err(e) => {
                warn!(username, "Login rejected");
                Err(e)
            }
        }
    }

    /// Forget the current user.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(username = %user.username, "Logged out");
        }
    }

    /// The logged-in user.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The logged-in user, or [`Error::NotLoggedIn`].
    ///
    /// # Errors
    ///
    /// Returns an error when nobody is logged in.
    pub fn require_user(&self) -> Result<&User> {
        self.user.as_ref().ok_or(Error::NotLoggedIn)
    }

    /// Whether someone is logged in.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}
