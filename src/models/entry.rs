use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type id the server assigns to entries created without one.
pub const UNKNOWN_TYPE_ID: &str = "unknown";

/// A single item on a shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "ID")]
    pub id: Uuid,
    #[serde(rename = "Name")]
    pub name: String,
    /// Free-form quantity ("2", "500g"). Empty when unset.
    #[serde(rename = "Number", default)]
    pub number: String,
    #[serde(rename = "Bought", default)]
    pub bought: bool,
    #[serde(rename = "TypeID", default)]
    pub type_id: String,
    #[serde(rename = "ListID")]
    pub list_id: Uuid,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "UpdatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a new entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntryInput {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ListID")]
    pub list_id: Uuid,
    /// Left out of the body when `None`; the server then files the entry
    /// under [`UNKNOWN_TYPE_ID`].
    #[serde(rename = "TypeID", default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
}

/// Full replacement body for `PUT /entries/{id}`.
///
/// The server overwrites every field, so updates are built from the current
/// entry with [`From<&Entry>`] and then modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEntryInput {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Number")]
    pub number: String,
    #[serde(rename = "Bought")]
    pub bought: bool,
    #[serde(rename = "TypeID")]
    pub type_id: String,
    #[serde(rename = "ListID")]
    pub list_id: Uuid,
}

impl From<&Entry> for UpdateEntryInput {
    fn from(entry: &Entry) -> Self {
        Self {
            name: entry.name.clone(),
            number: entry.number.clone(),
            bought: entry.bought,
            type_id: entry.type_id.clone(),
            list_id: entry.list_id,
        }
    }
}

/// A partial change to an entry. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryChange {
    pub name: Option<String>,
    pub number: Option<String>,
    pub bought: Option<bool>,
    pub type_id: Option<String>,
}

impl EntryChange {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.number.is_none() && self.bought.is_none() && self.type_id.is_none()
    }

    /// Applies the change on top of an entry, producing the PUT body.
    pub fn apply(&self, entry: &Entry) -> UpdateEntryInput {
        let mut input = UpdateEntryInput::from(entry);
        if let Some(name) = &self.name {
            input.name = name.clone();
        }
        if let Some(number) = &self.number {
            input.number = number.clone();
        }
        if let Some(bought) = self.bought {
            input.bought = bought;
        }
        if let Some(type_id) = &self.type_id {
            input.type_id = type_id.clone();
        }
        input
    }
}
