//! Dashboard Service
//!
//! Aggregate counts and highlights for the landing page.

use crate::db::TrackerStore;
use crate::models::{Project, ProjectStatus, TaskStatus, Team};
use crate::services::ServiceError;
use chrono::{NaiveDate, Utc};
use serde::Serialize;

/// How many recent projects the dashboard highlights
const RECENT_PROJECT_LIMIT: u32 = 5;

/// Aggregate dashboard numbers plus highlighted entities
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_projects: i64,
    pub active_projects: i64,
    pub total_tasks: i64,
    pub todo_tasks: i64,
    pub in_progress_tasks: i64,
    pub done_tasks: i64,
    pub overdue_tasks: i64,
    pub total_people: i64,
    pub teams: Vec<Team>,
    pub recent_projects: Vec<Project>,
}

/// Service producing the dashboard summary
#[derive(Debug, Clone)]
pub struct DashboardService {
    store: TrackerStore,
}

impl DashboardService {
    /// Create a new DashboardService over a store
    pub fn new(store: TrackerStore) -> Self {
        Self { store }
    }

    /// Summary as of today
    pub async fn summary(&self) -> Result<DashboardSummary, ServiceError> {
        self.summary_as_of(Utc::now().date_naive()).await
    }

    /// Summary with an explicit "today" (overdue cutoff), for deterministic
    /// tests
    pub async fn summary_as_of(&self, today: NaiveDate) -> Result<DashboardSummary, ServiceError> {
        Ok(DashboardSummary {
            total_projects: self.store.count_projects(None).await?,
            active_projects: self
                .store
                .count_projects(Some(ProjectStatus::Active))
                .await?,
            total_tasks: self.store.count_tasks(None).await?,
            todo_tasks: self.store.count_tasks(Some(TaskStatus::Todo)).await?,
            in_progress_tasks: self
                .store
                .count_tasks(Some(TaskStatus::InProgress))
                .await?,
            done_tasks: self.store.count_tasks(Some(TaskStatus::Done)).await?,
            overdue_tasks: self.store.count_overdue_tasks(today).await?,
            total_people: self.store.count_people().await?,
            teams: self.store.list_teams().await?,
            recent_projects: self.store.recent_projects(RECENT_PROJECT_LIMIT).await?,
        })
    }
}
