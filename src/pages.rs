//! Pages: the views a user navigates between.
//!
//! Each page makes its API calls and reports the outcome through
//! [`Notify`]. Failures are caught here, never propagated: the user gets a
//! short generic message and the [`ClientError`] goes to the diagnostic log
//! as technical details. A page that failed returns `None`.

use std::sync::Arc;

use uuid::Uuid;

use crate::api::{ClientError, ListinatorClient};
use crate::models::*;
use crate::notifications::Notify;
use crate::routes::Route;

/// What a page produced for display.
#[derive(Debug, Clone)]
pub enum View {
    /// A freshly created list to navigate to.
    NewList(List),
    Entries(Vec<Entry>),
    EntryType { entry: Entry, types: Vec<ItemType> },
    Session(Option<SessionInfo>),
}

#[derive(Clone)]
pub struct Pages {
    client: ListinatorClient,
    notify: Arc<dyn Notify>,
}

impl Pages {
    pub fn new(client: ListinatorClient, notify: Arc<dyn Notify>) -> Self {
        Self { client, notify }
    }

    pub fn notify(&self) -> &Arc<dyn Notify> {
        &self.notify
    }

    /// Render the page a route points to.
    pub async fn open(&self, route: &Route) -> Option<View> {
        tracing::debug!(route = route.name(), path = %route, "Opening page");
        match *route {
            Route::Home => self.home().await.map(View::NewList),
            Route::List(id) => self.list(id).await.map(View::Entries),
            Route::EntryType(id) => self
                .entry_type(id)
                .await
                .map(|(entry, types)| View::EntryType { entry, types }),
            Route::Login => Some(View::Session(self.whoami().await)),
        }
    }

    /// Start a new list.
    pub async fn home(&self) -> Option<List> {
        let list = self.report(self.client.create_list().await, "Could not create list")?;
        self.notify.success("List created");
        Some(list)
    }

    /// Entries of a list, unbought first.
    pub async fn list(&self, list_id: Uuid) -> Option<Vec<Entry>> {
        let mut entries = self.report(self.client.get_entries(list_id).await, "Could not load list")?;
        entries.sort_by_key(|e| e.bought);
        Some(entries)
    }

    /// An entry together with the types it can be filed under.
    pub async fn entry_type(&self, entry_id: Uuid) -> Option<(Entry, Vec<ItemType>)> {
        let entry = self.report(self.client.get_entry(entry_id).await, "Could not load entry")?;
        let mut types = self.report(self.client.get_types().await, "Could not load types")?;
        types.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.name.cmp(&b.name)));
        Some((entry, types))
    }

    pub async fn entry(&self, entry_id: Uuid) -> Option<Entry> {
        self.report(self.client.get_entry(entry_id).await, "Could not load entry")
    }

    pub async fn add_entry(&self, list_id: Uuid, name: &str) -> Option<Entry> {
        let entry = self.report(
            self.client.create_entry(name, list_id).await,
            "Could not add entry",
        )?;
        self.notify.success(&format!("Added {}", entry.name));
        Some(entry)
    }

    /// Apply `change` to an entry. An empty change saves nothing.
    pub async fn update_entry(&self, entry_id: Uuid, change: &EntryChange) -> Option<Entry> {
        let entry = self.entry(entry_id).await?;
        if change.is_empty() {
            return Some(entry);
        }

        let input = change.apply(&entry);
        let saved = self.report(
            self.client.put_entry(entry.id, &input).await,
            "Could not save entry",
        )?;
        self.notify.success("Saved");
        Some(saved)
    }

    pub async fn remove_entry(&self, entry_id: Uuid) -> Option<Entry> {
        let entry = self.entry(entry_id).await?;
        let removed = self.report(
            self.client.delete_entry(&entry).await,
            "Could not remove entry",
        )?;
        self.notify.success(&format!("Removed {}", removed.name));
        Some(removed)
    }

    pub async fn types(&self) -> Option<Vec<ItemType>> {
        self.report(self.client.get_types().await, "Could not load types")
    }

    pub async fn login(&self, credentials: &Credentials) -> Option<()> {
        self.sign_in(credentials).await?;
        self.notify.success("Signed in");
        Some(())
    }

    /// Like [`Pages::login`] but only failures are reported.
    pub async fn sign_in(&self, credentials: &Credentials) -> Option<()> {
        let result = self.client.login(credentials).await;
        if matches!(result, Err(ClientError::Unauthorized)) {
            self.notify.error("Wrong user name or password", result.err().map(Into::into));
            return None;
        }
        self.report(result, "Could not sign in")
    }

    pub async fn logout(&self) -> Option<()> {
        self.report(self.client.logout().await, "Could not sign out")?;
        self.notify.success("Signed out");
        Some(())
    }

    /// The current session, or `None` when signed out. Being signed out is
    /// not an error.
    pub async fn whoami(&self) -> Option<SessionInfo> {
        match self.client.session().await {
            Ok(session) => Some(session),
            Err(ClientError::Unauthorized) => None,
            Err(e) => {
                self.notify.error("Could not check session", Some(e.into()));
                None
            }
        }
    }

    /// Turn a failed call into an error notification.
    fn report<T>(&self, result: Result<T, ClientError>, user_message: &str) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.notify.error(user_message, Some(e.into()));
                None
            }
        }
    }
}
