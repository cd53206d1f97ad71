//! Project Service
//!
//! Project CRUD, status filtering, and the Gantt-chart data feed.

use crate::db::{TaskFilter, TrackerStore};
use crate::models::{Project, ProjectStatus};
use crate::services::ServiceError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Input for creating or replacing a project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
}

/// One bar of the Gantt-chart feed
///
/// Field names are the wire format expected by the chart consumer, so this
/// struct keeps snake_case serialization.
#[derive(Debug, Clone, Serialize)]
pub struct GanttBar {
    /// Bar identifier: `task-<task id>`
    pub id: String,

    /// Task title
    pub name: String,

    /// ISO start date
    pub start: String,

    /// ISO end date
    pub end: String,

    /// Completion percentage (0, 50, or 100)
    pub progress: u8,

    /// Comma-joined bar ids this task depends on
    pub dependencies: String,

    /// Style classes: `status-<status> priority-<priority>`
    pub custom_class: String,
}

/// Service for project management
#[derive(Debug, Clone)]
pub struct ProjectService {
    store: TrackerStore,
}

impl ProjectService {
    /// Create a new ProjectService over a store
    pub fn new(store: TrackerStore) -> Self {
        Self { store }
    }

    /// Create a project
    pub async fn create_project(&self, input: ProjectInput) -> Result<Project, ServiceError> {
        let project = Project::new(
            input.name,
            input.description,
            input.start_date,
            input.end_date,
            input.status,
        );
        self.store.create_project(&project).await?;
        tracing::info!("Created project '{}' ({})", project.name, project.id);
        Ok(project)
    }

    /// Replace a project's fields
    pub async fn update_project(
        &self,
        id: &str,
        input: ProjectInput,
    ) -> Result<Project, ServiceError> {
        let mut project = self.get_project(id).await?;
        project.name = input.name;
        project.description = input.description;
        project.start_date = input.start_date;
        project.end_date = input.end_date;
        project.status = input.status;
        self.store.update_project(&project).await?;
        Ok(project)
    }

    /// Delete a project and (by cascade) its tasks
    pub async fn delete_project(&self, id: &str) -> Result<(), ServiceError> {
        let deleted = self.store.delete_project(id).await?;
        if deleted == 0 {
            return Err(ServiceError::project_not_found(id));
        }
        tracing::info!("Deleted project {}", id);
        Ok(())
    }

    /// Fetch a project by id
    pub async fn get_project(&self, id: &str) -> Result<Project, ServiceError> {
        self.store
            .get_project(id)
            .await?
            .ok_or_else(|| ServiceError::project_not_found(id))
    }

    /// List projects, newest start date first, optionally filtered by status
    pub async fn list_projects(
        &self,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, ServiceError> {
        Ok(self.store.list_projects(status).await?)
    }

    /// Build the Gantt feed for one project: a bar per task with its
    /// dependency ids joined for the chart consumer.
    pub async fn gantt_data(&self, project_id: &str) -> Result<Vec<GanttBar>, ServiceError> {
        self.get_project(project_id).await?;

        let tasks = self
            .store
            .list_tasks(&TaskFilter {
                project_id: Some(project_id.to_string()),
                ..TaskFilter::default()
            })
            .await?;

        let mut bars = Vec::with_capacity(tasks.len());
        for task in tasks {
            let dep_ids = self.store.dependency_ids_for_task(&task.id).await?;
            let dependencies = dep_ids
                .iter()
                .map(|id| format!("task-{}", id))
                .collect::<Vec<_>>()
                .join(",");
            bars.push(GanttBar {
                id: format!("task-{}", task.id),
                name: task.title.clone(),
                start: task.start_date.to_string(),
                end: task.end_date.to_string(),
                progress: task.progress(),
                dependencies,
                custom_class: format!("status-{} priority-{}", task.status, task.priority),
            });
        }
        Ok(bars)
    }
}
