use serde::{Deserialize, Serialize};

/// A category for entries.
///
/// Older servers only send `Name` and `Icon`; newer ones add an id, a color
/// and a sort priority. Everything but the name is defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemType {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    /// Built-in types cannot be edited or removed.
    #[serde(rename = "Immutable", default)]
    pub immutable: bool,
    #[serde(rename = "Color", default)]
    pub color: String,
    #[serde(rename = "Priority", default)]
    pub priority: i32,
    #[serde(rename = "Icon", default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ItemType {
    /// Id used when assigning this type to an entry.
    ///
    /// Servers without type ids key types by name.
    pub fn key(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }
}
