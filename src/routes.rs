//! Static route table.
//!
//! | path              | route                  |
//! |-------------------|------------------------|
//! | `/`               | [`Route::Home`]        |
//! | `/list/:id`       | [`Route::List`]        |
//! | `/entry/:id/type` | [`Route::EntryType`]   |
//! | `/login`          | [`Route::Login`]       |
//!
//! Paths may carry the `#` of hash-history URLs (`#/list/...`).

use std::fmt;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    List(Uuid),
    EntryType(Uuid),
    Login,
}

impl Route {
    /// Resolve a path to a route. Unknown paths and malformed ids yield `None`.
    pub fn resolve(path: &str) -> Option<Self> {
        let path = path.trim().trim_start_matches('#');
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Self::Home),
            ["list", id] => Uuid::parse_str(id).ok().map(Self::List),
            ["entry", id, "type"] => Uuid::parse_str(id).ok().map(Self::EntryType),
            ["login"] => Some(Self::Login),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::List(_) => "list",
            Self::EntryType(_) => "entry-type",
            Self::Login => "login",
        }
    }

    /// Canonical path of this route.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::List(id) => format!("/list/{}", id),
            Self::EntryType(id) => format!("/entry/{}/type", id),
            Self::Login => "/login".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
