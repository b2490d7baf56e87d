//! Navigable paths and shareable URLs.

/// Prefix of record paths.
pub const VIEW_PREFIX: &str = "/view/";

/// A parsed navigable path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: the login screen or the entry form.
    Home,
    /// `/view/{id}`: a record.
    View(String),
    /// Anything else.
    Unknown(String),
}

impl Route {
    /// Parse a path such as `/view/k3j9x1`.
    ///
    /// Hash-router style paths (`#/view/k3j9x1`) and full URLs, including
    /// `http://host/#/view/k3j9x1`, are accepted; only the path part after
    /// the origin is routed. Trailing slashes and query strings are ignored.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let path = if input.starts_with(['/', '#']) {
            input
        } else {
            strip_origin(input)
        };
        let path = path
            .strip_prefix("/#")
            .or_else(|| path.strip_prefix('#'))
            .unwrap_or(path);
        let path = path.split(['?', '#']).next().unwrap_or_default();

        if path.is_empty() || path == "/" {
            return Self::Home;
        }

        match path.strip_prefix(VIEW_PREFIX) {
            Some(id) => {
                let id = id.trim_end_matches('/');
                if id.is_empty() || id.contains('/') {
                    Self::Unknown(path.to_string())
                } else {
                    Self::View(id.to_string())
                }
            }
            None => Self::Unknown(path.to_string()),
        }
    }
}

/// Drop `scheme://host` from a URL. Input without a scheme before its first
/// `/`, `?` or `#` is returned as is.
fn strip_origin(input: &str) -> &str {
    let Some((scheme, rest)) = input.split_once("://") else {
        return input;
    };
    let is_scheme = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !is_scheme {
        return input;
    }
    match rest.find(['/', '?', '#']) {
        Some(idx) => &rest[idx..],
        None => "/",
    }
}

/// The navigable path of a record.
#[must_use]
pub fn view_path(id: &str) -> String {
    format!("{VIEW_PREFIX}{id}")
}

/// The shareable URL of a record under `base_url`.
#[must_use]
pub fn share_url(base_url: &str, id: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), view_path(id))
}
