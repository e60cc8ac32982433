//! Full-status document returned by `ajax/fullstatus`.

use serde::{Deserialize, Deserializer, Serialize};

/// One connected player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "IP", default)]
    pub ip: String,
}

/// Snapshot of the game server as reported by the backend.
///
/// The backend omits fields freely and sends `null` for an empty player
/// list, so every field decodes to its default when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FullStatus {
    pub world_name: String,
    pub online: bool,
    pub seed: String,
    #[serde(rename = "MOTD")]
    pub motd: String,
    pub password: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub players: Vec<PlayerData>,
    pub player_count: usize,
    pub loglevel: i64,
    pub version: String,
}

impl FullStatus {
    /// Decodes a full-status response body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<PlayerData>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<PlayerData>>::deserialize(deserializer)?.unwrap_or_default())
}
