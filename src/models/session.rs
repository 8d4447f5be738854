use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body for `POST /session`. Unlike the other records this one uses
/// lowercase keys.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub name: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of `GET /session`: the id of the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub uuid: Uuid,
}
