//! Defines the JSON protocol used between unical and provider binaries
//! over stdin/stdout.
//!
//! One request per line in, one response per line out.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::model::{ActionItem, OrgDirectoryEntry, ScheduledMeeting};

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    ListActionItems,
    ListMeetings,
    ListOrgDirectory,
}

/// Request sent from unical to a provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from a provider back to unical.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        serde_json::to_string(&Response::Success { data })
            .unwrap_or_else(|e| Response::<()>::error(&format!("Failed to encode response: {e}")))
    }
}

impl Response<()> {
    pub fn error(msg: &str) -> String {
        let value = serde_json::json!({ "status": "error", "error": msg });
        value.to_string()
    }
}

/// List every action item visible to the configured account.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListActionItems {
    /// Provider-specific config (e.g. base_url, token)
    #[serde(flatten)]
    pub source_config: serde_json::Map<String, serde_json::Value>,
}

impl ProviderCommand for ListActionItems {
    type Response = Vec<ActionItem>;
    fn command() -> Command {
        Command::ListActionItems
    }
}

/// List every scheduled meeting.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListMeetings {
    #[serde(flatten)]
    pub source_config: serde_json::Map<String, serde_json::Value>,
}

impl ProviderCommand for ListMeetings {
    type Response = Vec<ScheduledMeeting>;
    fn command() -> Command {
        Command::ListMeetings
    }
}

/// List the organization directory (id to display name).
#[derive(Debug, Serialize, Deserialize)]
pub struct ListOrgDirectory {
    #[serde(flatten)]
    pub source_config: serde_json::Map<String, serde_json::Value>,
}

impl ProviderCommand for ListOrgDirectory {
    type Response = Vec<OrgDirectoryEntry>;
    fn command() -> Command {
        Command::ListOrgDirectory
    }
}
