//! Source adapters: where action items, meetings and the org directory come from.

pub mod protocol;
pub mod provider;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PROVIDER_TIMEOUT;
use crate::error::TransportError;
use crate::model::{ActionItem, OrgDirectoryEntry, ScheduledMeeting};
use crate::source::protocol::{ListActionItems, ListMeetings, ListOrgDirectory};
use crate::source::provider::Provider;

/// Which of the three collections a fetch was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    ActionItems,
    Meetings,
    OrgDirectory,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            SourceKind::ActionItems => "action items",
            SourceKind::Meetings => "meetings",
            SourceKind::OrgDirectory => "org directory",
        };
        write!(f, "{label}")
    }
}

/// The three independent providers the aggregator joins.
///
/// Each call returns a complete collection or fails.
pub trait CalendarSources {
    fn fetch_action_items(&self) -> impl Future<Output = Result<Vec<ActionItem>, TransportError>> + Send;

    fn fetch_meetings(&self) -> impl Future<Output = Result<Vec<ScheduledMeeting>, TransportError>> + Send;

    fn fetch_org_directory(
        &self,
    ) -> impl Future<Output = Result<Vec<OrgDirectoryEntry>, TransportError>> + Send;
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SourceParams(pub HashMap<String, toml::Value>);

impl From<&SourceParams> for serde_json::Map<String, serde_json::Value> {
    fn from(params: &SourceParams) -> Self {
        params
            .0
            .iter()
            .filter_map(|(k, v)| serde_json::to_value(v).ok().map(|v| (k.clone(), v)))
            .collect()
    }
}

/// The `[source]` table: which provider serves the collections, plus its params.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SourceConfig {
    pub provider: Provider,
    #[serde(flatten)]
    pub params: SourceParams,
}

/// Sources served by a provider binary, one subprocess per collection.
#[derive(Debug, Clone)]
pub struct ProviderSources {
    config: SourceConfig,
    timeout: Duration,
}

impl ProviderSources {
    pub fn new(config: SourceConfig) -> Self {
        ProviderSources {
            config,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider(&self) -> &Provider {
        &self.config.provider
    }

    fn source_config(&self) -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::from(&self.config.params)
    }
}

impl CalendarSources for ProviderSources {
    async fn fetch_action_items(&self) -> Result<Vec<ActionItem>, TransportError> {
        self.config
            .provider
            .call(ListActionItems { source_config: self.source_config() }, self.timeout)
            .await
    }

    async fn fetch_meetings(&self) -> Result<Vec<ScheduledMeeting>, TransportError> {
        self.config
            .provider
            .call(ListMeetings { source_config: self.source_config() }, self.timeout)
            .await
    }

    async fn fetch_org_directory(&self) -> Result<Vec<OrgDirectoryEntry>, TransportError> {
        self.config
            .provider
            .call(ListOrgDirectory { source_config: self.source_config() }, self.timeout)
            .await
    }
}
