//! CRM REST API client.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use unical_core::model::{ActionItem, OrgDirectoryEntry, Priority, ScheduledMeeting};

use crate::source_config::CrmSourceConfig;

const TASKS_PATH: &str = "api/v1/tasks/all";
const MEETINGS_PATH: &str = "api/v1/meetings/all";
const DIRECTORY_PATH: &str = "api/v1/crm/all";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskDto {
    id: i64,
    title: String,
    #[serde(default)]
    status: String,
    priority: Option<String>,
    /// The CRM allows tasks without a due date.
    due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeetingDto {
    id: i64,
    title: String,
    date_time: DateTime<Utc>,
    status: String,
}

#[derive(Debug, Deserialize)]
struct CrmEntryDto {
    id: i64,
    company: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrmListDto {
    crm_list: Vec<CrmEntryDto>,
}

impl TaskDto {
    /// `None` for tasks without a due date; they have no calendar day.
    fn into_action_item(self) -> Option<ActionItem> {
        let Some(due_date) = self.due_date else {
            tracing::debug!(task_id = self.id, "skipping task without due date");
            return None;
        };
        Some(ActionItem {
            id: self.id,
            title: self.title,
            due_date,
            status: self.status.into(),
            priority: self.priority.filter(|p| !p.is_empty()).map(Priority::from),
        })
    }
}

fn action_items_from(tasks: Vec<TaskDto>) -> Vec<ActionItem> {
    tasks.into_iter().filter_map(TaskDto::into_action_item).collect()
}

impl From<MeetingDto> for ScheduledMeeting {
    fn from(dto: MeetingDto) -> Self {
        ScheduledMeeting {
            id: dto.id,
            title: dto.title,
            date_time: dto.date_time,
            status: dto.status.into(),
        }
    }
}

impl From<CrmEntryDto> for OrgDirectoryEntry {
    fn from(dto: CrmEntryDto) -> Self {
        OrgDirectoryEntry {
            id: dto.id,
            name: dto.company,
        }
    }
}

pub struct CrmClient {
    http: reqwest::Client,
    config: CrmSourceConfig,
}

impl CrmClient {
    pub fn new(config: CrmSourceConfig) -> Self {
        CrmClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.config.base_url.join(path)?;
        let mut request = self.http.get(url.clone());
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?
            .error_for_status()?;

        response
            .json::<T>()
            .await
            .with_context(|| format!("Unexpected response from {url}"))
    }

    pub async fn action_items(&self) -> Result<Vec<ActionItem>> {
        let tasks: Vec<TaskDto> = self.get(TASKS_PATH).await?;
        Ok(action_items_from(tasks))
    }

    pub async fn meetings(&self) -> Result<Vec<ScheduledMeeting>> {
        let meetings: Vec<MeetingDto> = self.get(MEETINGS_PATH).await?;
        Ok(meetings.into_iter().map(ScheduledMeeting::from).collect())
    }

    pub async fn org_directory(&self) -> Result<Vec<OrgDirectoryEntry>> {
        let list: CrmListDto = self.get(DIRECTORY_PATH).await?;
        Ok(list.crm_list.into_iter().map(OrgDirectoryEntry::from).collect())
    }
}
