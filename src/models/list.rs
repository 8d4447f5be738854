use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Entry;

/// A shopping list.
///
/// The server embeds entries only on some responses; list creation returns
/// an empty `Entries` array, so the field defaults to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List {
    #[serde(rename = "ID")]
    pub id: Uuid,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "UpdatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "Entries", default)]
    pub entries: Vec<Entry>,
}
