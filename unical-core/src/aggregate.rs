//! Merging the three sources into one list of calendar items.
//!
//! The sources are fetched concurrently and joined all-or-nothing: if any of
//! them fails the whole aggregation fails, and results from the sources that
//! did succeed are dropped rather than cached.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::error::{SyncFailure, TransportError};
use crate::item::CalendarItem;
use crate::local_date::ViewerZone;
use crate::model::{ActionItem, CompanyMap, OrgDirectoryEntry, ScheduledMeeting};
use crate::source::{CalendarSources, SourceKind};

/// One successful aggregation, installed into a view as a unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub items: Vec<CalendarItem>,
    pub companies: CompanyMap,
}

impl Aggregation {
    pub fn build(
        action_items: Vec<ActionItem>,
        meetings: Vec<ScheduledMeeting>,
        directory: &[OrgDirectoryEntry],
        zone: &ViewerZone,
    ) -> Self {
        Aggregation {
            items: normalize(action_items, meetings, zone),
            companies: CompanyMap::from_entries(directory),
        }
    }
}

/// Action items first, then meetings, each in source order. Completed and
/// done action items are skipped; meetings are kept whatever their status.
pub fn normalize(
    action_items: Vec<ActionItem>,
    meetings: Vec<ScheduledMeeting>,
    zone: &ViewerZone,
) -> Vec<CalendarItem> {
    let mut items = Vec::with_capacity(action_items.len() + meetings.len());

    items.extend(
        action_items
            .into_iter()
            .filter_map(|item| CalendarItem::from_action_item(Arc::new(item), zone)),
    );
    items.extend(
        meetings
            .into_iter()
            .map(|meeting| CalendarItem::from_meeting(Arc::new(meeting), zone)),
    );

    items
}

pub struct Aggregator<S> {
    sources: S,
    zone: ViewerZone,
    timeout: Option<Duration>,
}

impl<S: CalendarSources> Aggregator<S> {
    pub fn new(sources: S, zone: ViewerZone) -> Self {
        Aggregator {
            sources,
            zone,
            timeout: None,
        }
    }

    /// Bound the whole join. Without this a hung source hangs the aggregation.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    pub fn sources(&self) -> &S {
        &self.sources
    }

    /// Fetch all three sources concurrently and merge them.
    pub async fn aggregate(&self) -> Result<Aggregation, SyncFailure> {
        let joined = async {
            tokio::try_join!(
                tag(SourceKind::ActionItems, self.sources.fetch_action_items()),
                tag(SourceKind::Meetings, self.sources.fetch_meetings()),
                tag(SourceKind::OrgDirectory, self.sources.fetch_org_directory()),
            )
        };

        let fetched = match self.timeout {
            Some(limit) => match timeout(limit, joined).await {
                Ok(result) => result,
                Err(_) => Err(SyncFailure::timed_out(limit)),
            },
            None => joined.await,
        };

        let (action_items, meetings, directory) = fetched.inspect_err(|failure| {
            tracing::warn!(error = %failure, "aggregation failed");
        })?;

        tracing::debug!(
            action_items = action_items.len(),
            meetings = meetings.len(),
            directory = directory.len(),
            "sources fetched"
        );

        Ok(Aggregation::build(action_items, meetings, &directory, &self.zone))
    }
}

async fn tag<T>(
    kind: SourceKind,
    fetch: impl Future<Output = Result<T, TransportError>>,
) -> Result<T, SyncFailure> {
    fetch.await.map_err(|cause| SyncFailure::new(kind, cause))
}
