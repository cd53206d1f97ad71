//! Task Service
//!
//! Task CRUD with tag and dependency reconciliation, assignment
//! management, status updates (with @mention resolution and safe body
//! rendering), and milestones with derived status.

use crate::db::{TaskFilter, TrackerStore};
use crate::models::{
    Milestone, MilestoneStatus, Person, Priority, Project, StatusUpdate, Tag, Task,
    TaskAssignment, TaskStatus,
};
use crate::services::{PersonDirectory, ServiceError};
use crate::text::{annotate, extract_mentions};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Input for creating or replacing a task
///
/// `tags` holds tag names (found or created on save); `depends_on` holds
/// task ids this task is blocked by (replaced wholesale on save).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// Partial task update for inline Gantt edits (dates and status only)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickUpdate {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
}

/// A person on a task, with their lead flag
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignee {
    pub person: Person,
    pub is_lead: bool,
}

/// A status update with its resolved mentions and rendered body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateView {
    pub update: StatusUpdate,

    /// People the update mentions (persisted at creation time)
    pub mentions: Vec<Person>,

    /// Safe HTML rendering of the body (URLs linkified, mentions resolved)
    pub body_html: String,
}

/// A milestone with its derived status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneView {
    pub milestone: Milestone,
    pub status: MilestoneStatus,
}

/// Everything the task detail view needs in one fetch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    pub task: Task,
    pub project: Project,
    pub tags: Vec<Tag>,
    pub dependencies: Vec<Task>,
    pub dependents: Vec<Task>,
    pub assignees: Vec<TaskAssignee>,
    pub updates: Vec<StatusUpdateView>,
    pub milestones: Vec<MilestoneView>,
}

impl TaskDetail {
    /// The assignee flagged as lead, if any
    pub fn lead(&self) -> Option<&Person> {
        self.assignees
            .iter()
            .find(|a| a.is_lead)
            .map(|a| &a.person)
    }
}

/// Service for task management
#[derive(Debug, Clone)]
pub struct TaskService {
    store: TrackerStore,
}

impl TaskService {
    /// Create a new TaskService over a store
    pub fn new(store: TrackerStore) -> Self {
        Self { store }
    }

    // ------------------------------------------------------------------
    // CRUD
    // ------------------------------------------------------------------

    /// Create a task in a project, reconciling tags and dependencies
    pub async fn create_task(
        &self,
        project_id: &str,
        input: TaskInput,
    ) -> Result<Task, ServiceError> {
        self.store
            .get_project(project_id)
            .await?
            .ok_or_else(|| ServiceError::project_not_found(project_id))?;

        let task = Task::new(
            input.title,
            input.description,
            project_id,
            input.start_date,
            input.end_date,
            input.status,
            input.priority,
        );
        self.store.create_task(&task).await?;
        self.apply_tags(&task.id, &input.tags).await?;
        self.store
            .replace_dependencies(&task.id, &input.depends_on)
            .await?;
        tracing::info!("Created task '{}' ({})", task.title, task.id);
        Ok(task)
    }

    /// Replace a task's fields, tags, and dependencies (the owning project
    /// never changes)
    pub async fn update_task(&self, id: &str, input: TaskInput) -> Result<Task, ServiceError> {
        let mut task = self.get_task(id).await?;
        task.title = input.title;
        task.description = input.description;
        task.start_date = input.start_date;
        task.end_date = input.end_date;
        task.status = input.status;
        task.priority = input.priority;
        self.store.update_task(&task).await?;
        self.apply_tags(&task.id, &input.tags).await?;
        self.store
            .replace_dependencies(&task.id, &input.depends_on)
            .await?;
        Ok(task)
    }

    /// Delete a task, returning the owning project's id
    pub async fn delete_task(&self, id: &str) -> Result<String, ServiceError> {
        let task = self.get_task(id).await?;
        self.store.delete_task(id).await?;
        tracing::info!("Deleted task {}", id);
        Ok(task.project_id)
    }

    /// Fetch a task by id
    pub async fn get_task(&self, id: &str) -> Result<Task, ServiceError> {
        self.store
            .get_task(id)
            .await?
            .ok_or_else(|| ServiceError::task_not_found(id))
    }

    /// List tasks matching the filter
    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, ServiceError> {
        Ok(self.store.list_tasks(filter).await?)
    }

    /// Tasks overdue as of today (end date passed, not done)
    pub async fn overdue_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        let filter = TaskFilter {
            overdue_as_of: Some(Utc::now().date_naive()),
            ..TaskFilter::default()
        };
        self.list_tasks(&filter).await
    }

    /// Apply dates/status from an inline Gantt edit; returns the task's
    /// progress afterwards.
    pub async fn quick_update(&self, id: &str, update: QuickUpdate) -> Result<u8, ServiceError> {
        let mut task = self.get_task(id).await?;
        if let Some(start_date) = update.start_date {
            task.start_date = start_date;
        }
        if let Some(end_date) = update.end_date {
            task.end_date = end_date;
        }
        if let Some(status) = update.status {
            task.status = status;
        }
        self.store.update_task(&task).await?;
        Ok(task.progress())
    }

    /// Find-or-create tags by name and replace the task's tag set.
    /// Names are trimmed; blanks are dropped.
    async fn apply_tags(&self, task_id: &str, names: &[String]) -> Result<(), ServiceError> {
        let mut tag_ids = Vec::new();
        for name in names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let tag = self.store.find_or_create_tag(name).await?;
            tag_ids.push(tag.id);
        }
        self.store.set_task_tags(task_id, &tag_ids).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Assignments
    // ------------------------------------------------------------------

    /// Assign a person to a task
    pub async fn assign_person(
        &self,
        task_id: &str,
        person_id: &str,
        is_lead: bool,
    ) -> Result<TaskAssignment, ServiceError> {
        self.get_task(task_id).await?;
        self.store
            .get_person(person_id)
            .await?
            .ok_or_else(|| ServiceError::person_not_found(person_id))?;
        let assignment = TaskAssignment::new(task_id, person_id, is_lead);
        self.store.add_assignment(&assignment).await?;
        Ok(assignment)
    }

    /// Replace a task's assignments wholesale with (person id, is_lead)
    /// pairs
    pub async fn set_assignments(
        &self,
        task_id: &str,
        entries: &[(String, bool)],
    ) -> Result<(), ServiceError> {
        self.get_task(task_id).await?;
        self.store.clear_assignments(task_id).await?;
        for (person_id, is_lead) in entries {
            self.store
                .get_person(person_id)
                .await?
                .ok_or_else(|| ServiceError::person_not_found(person_id))?;
            let assignment = TaskAssignment::new(task_id, person_id, *is_lead);
            self.store.add_assignment(&assignment).await?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Status updates
    // ------------------------------------------------------------------

    /// Add a status update to a task.
    ///
    /// Blank content is ignored (returns `None`). Mentioned persons are
    /// resolved against the current people table and persisted; the lookup
    /// never fails the operation.
    pub async fn add_status_update(
        &self,
        task_id: &str,
        content: &str,
    ) -> Result<Option<StatusUpdate>, ServiceError> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }
        self.get_task(task_id).await?;

        let update = StatusUpdate::new(task_id, content);
        self.store.create_status_update(&update).await?;

        let directory = self.directory().await?;
        let mentioned = extract_mentions(content, &directory);
        for person in &mentioned {
            self.store.add_mention(&update.id, &person.id).await?;
        }
        tracing::debug!(
            "Status update {} on task {} mentions {} people",
            update.id,
            task_id,
            mentioned.len()
        );
        Ok(Some(update))
    }

    /// Status updates for a task, newest first, with resolved mentions and
    /// rendered bodies
    pub async fn status_updates_for_task(
        &self,
        task_id: &str,
    ) -> Result<Vec<StatusUpdateView>, ServiceError> {
        self.get_task(task_id).await?;
        let directory = self.directory().await?;
        let updates = self.store.status_updates_for_task(task_id).await?;

        let mut views = Vec::with_capacity(updates.len());
        for update in updates {
            let mentions = self.store.mentions_for_update(&update.id).await?;
            let body_html = annotate(&update.content, &directory).to_html();
            views.push(StatusUpdateView {
                update,
                mentions,
                body_html,
            });
        }
        Ok(views)
    }

    /// Render one status-update body to safe HTML against the current
    /// people table
    pub async fn render_update_body(&self, content: &str) -> Result<String, ServiceError> {
        let directory = self.directory().await?;
        Ok(annotate(content, &directory).to_html())
    }

    async fn directory(&self) -> Result<PersonDirectory, ServiceError> {
        let people = self.store.list_people().await?;
        Ok(PersonDirectory::from_people(&people))
    }

    // ------------------------------------------------------------------
    // Milestones
    // ------------------------------------------------------------------

    /// Add a milestone to a task
    pub async fn add_milestone(
        &self,
        task_id: &str,
        name: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Milestone, ServiceError> {
        self.get_task(task_id).await?;
        let milestone = Milestone::new(task_id, name, date, None);
        self.store.create_milestone(&milestone).await?;
        Ok(milestone)
    }

    /// Update a milestone's name, date, and status override
    pub async fn update_milestone(
        &self,
        id: &str,
        name: impl Into<String>,
        date: NaiveDate,
        status_override: Option<MilestoneStatus>,
    ) -> Result<Milestone, ServiceError> {
        let mut milestone = self
            .store
            .get_milestone(id)
            .await?
            .ok_or_else(|| ServiceError::milestone_not_found(id))?;
        milestone.name = name.into();
        milestone.date = date;
        milestone.status_override = status_override;
        self.store.update_milestone(&milestone).await?;
        Ok(milestone)
    }

    /// Delete a milestone
    pub async fn delete_milestone(&self, id: &str) -> Result<(), ServiceError> {
        let deleted = self.store.delete_milestone(id).await?;
        if deleted == 0 {
            return Err(ServiceError::milestone_not_found(id));
        }
        Ok(())
    }

    /// Milestones on a task with status derived from task/project state as
    /// of today
    pub async fn milestones_for_task(
        &self,
        task_id: &str,
    ) -> Result<Vec<MilestoneView>, ServiceError> {
        let task = self.get_task(task_id).await?;
        let project = self
            .store
            .get_project(&task.project_id)
            .await?
            .ok_or_else(|| ServiceError::project_not_found(&task.project_id))?;
        let today = Utc::now().date_naive();

        let milestones = self.store.milestones_for_task(task_id).await?;
        Ok(milestones
            .into_iter()
            .map(|milestone| {
                let status = milestone.computed_status(task.status, project.status, today);
                MilestoneView { milestone, status }
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Detail view
    // ------------------------------------------------------------------

    /// Everything the task detail view needs in one fetch
    pub async fn task_detail(&self, id: &str) -> Result<TaskDetail, ServiceError> {
        let task = self.get_task(id).await?;
        let project = self
            .store
            .get_project(&task.project_id)
            .await?
            .ok_or_else(|| ServiceError::project_not_found(&task.project_id))?;

        let tags = self.store.tags_for_task(id).await?;
        let dependencies = self.store.dependencies_for_task(id).await?;
        let dependents = self.store.dependents_for_task(id).await?;
        let assignees = self
            .store
            .assignees_for_task(id)
            .await?
            .into_iter()
            .map(|(person, is_lead)| TaskAssignee { person, is_lead })
            .collect();
        let updates = self.status_updates_for_task(id).await?;
        let milestones = self.milestones_for_task(id).await?;

        Ok(TaskDetail {
            task,
            project,
            tags,
            dependencies,
            dependents,
            assignees,
            updates,
            milestones,
        })
    }
}
