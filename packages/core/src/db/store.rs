//! TrackerStore - Typed Query Operations over the Taskmaster Schema
//!
//! This module is the single conversion point between libsql rows and the
//! typed models. All SQL lives here; services never touch the connection
//! directly.
//!
//! # Design
//!
//! - **Row conversion**: one `row_to_*` helper per entity, with `anyhow`
//!   context on every column access
//! - **Association tables**: composite-key rows (`task_tags`,
//!   `task_dependencies`, `status_update_mentions`) are replaced
//!   wholesale or inserted with OR IGNORE
//! - **Simple query operations**: the store exposes exactly the lookups
//!   the services need; no query builder

use crate::db::DatabaseService;
use crate::models::{
    Milestone, MilestoneStatus, Person, Priority, Project, ProjectStatus, StatusUpdate, Tag,
    Task, TaskAssignment, TaskStatus, Team,
};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use libsql::Row;
use std::str::FromStr;
use std::sync::Arc;

/// Filter for task listings; all fields are optional and AND-combined
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Restrict to one project
    pub project_id: Option<String>,

    /// Restrict to one workflow status
    pub status: Option<TaskStatus>,

    /// When set, only overdue tasks as of this date (end date passed and
    /// not done)
    pub overdue_as_of: Option<NaiveDate>,
}

/// Typed store over the Taskmaster schema
///
/// Cheap to clone; wraps the shared [`DatabaseService`].
#[derive(Debug, Clone)]
pub struct TrackerStore {
    db: Arc<DatabaseService>,
}

impl TrackerStore {
    /// Create a new store over an initialized database service
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// The underlying database service
    pub fn database(&self) -> &DatabaseService {
        &self.db
    }

    /// Parse a calendar date column (`YYYY-MM-DD`)
    fn parse_date(s: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Unable to parse date '{}'", s))
    }

    /// Parse a timestamp column - handles both SQLite and RFC3339 formats
    ///
    /// SQLite CURRENT_TIMESTAMP writes "YYYY-MM-DD HH:MM:SS"; rows written
    /// from Rust carry RFC3339.
    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(naive.and_utc());
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        Err(anyhow::anyhow!(
            "Unable to parse timestamp '{}' as SQLite or RFC3339 format",
            s
        ))
    }

    fn row_to_team(row: &Row) -> Result<Team> {
        Ok(Team {
            id: row.get(0).context("Failed to get team id")?,
            name: row.get(1).context("Failed to get team name")?,
        })
    }

    fn row_to_person(row: &Row) -> Result<Person> {
        Ok(Person {
            id: row.get(0).context("Failed to get person id")?,
            name: row.get(1).context("Failed to get person name")?,
            email: row.get(2).context("Failed to get person email")?,
            team_id: row.get(3).context("Failed to get person team_id")?,
        })
    }

    fn row_to_project(row: &Row) -> Result<Project> {
        let start_date: Option<String> = row.get(3).context("Failed to get project start_date")?;
        let end_date: Option<String> = row.get(4).context("Failed to get project end_date")?;
        let status: String = row.get(5).context("Failed to get project status")?;
        Ok(Project {
            id: row.get(0).context("Failed to get project id")?,
            name: row.get(1).context("Failed to get project name")?,
            description: row.get(2).context("Failed to get project description")?,
            start_date: start_date.as_deref().map(Self::parse_date).transpose()?,
            end_date: end_date.as_deref().map(Self::parse_date).transpose()?,
            status: ProjectStatus::from_str(&status)?,
        })
    }

    fn row_to_task(row: &Row) -> Result<Task> {
        let start_date: String = row.get(4).context("Failed to get task start_date")?;
        let end_date: String = row.get(5).context("Failed to get task end_date")?;
        let status: String = row.get(6).context("Failed to get task status")?;
        let priority: String = row.get(7).context("Failed to get task priority")?;
        Ok(Task {
            id: row.get(0).context("Failed to get task id")?,
            title: row.get(1).context("Failed to get task title")?,
            description: row.get(2).context("Failed to get task description")?,
            project_id: row.get(3).context("Failed to get task project_id")?,
            start_date: Self::parse_date(&start_date)?,
            end_date: Self::parse_date(&end_date)?,
            status: TaskStatus::from_str(&status)?,
            priority: Priority::from_str(&priority)?,
        })
    }

    fn row_to_tag(row: &Row) -> Result<Tag> {
        Ok(Tag {
            id: row.get(0).context("Failed to get tag id")?,
            name: row.get(1).context("Failed to get tag name")?,
        })
    }

    fn row_to_status_update(row: &Row) -> Result<StatusUpdate> {
        let created_at: String = row.get(3).context("Failed to get update created_at")?;
        Ok(StatusUpdate {
            id: row.get(0).context("Failed to get update id")?,
            task_id: row.get(1).context("Failed to get update task_id")?,
            content: row.get(2).context("Failed to get update content")?,
            created_at: Self::parse_timestamp(&created_at)?,
        })
    }

    fn row_to_milestone(row: &Row) -> Result<Milestone> {
        let date: String = row.get(3).context("Failed to get milestone date")?;
        let status_override: Option<String> =
            row.get(4).context("Failed to get milestone status_override")?;
        Ok(Milestone {
            id: row.get(0).context("Failed to get milestone id")?,
            task_id: row.get(1).context("Failed to get milestone task_id")?,
            name: row.get(2).context("Failed to get milestone name")?,
            date: Self::parse_date(&date)?,
            status_override: status_override
                .as_deref()
                .map(MilestoneStatus::from_str)
                .transpose()?,
        })
    }

    /// Collect every row of a query through a converter
    async fn collect<T>(
        mut rows: libsql::Rows,
        convert: fn(&Row) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut out = Vec::new();
        while let Some(row) = rows.next().await.context("Failed to read next row")? {
            out.push(convert(&row)?);
        }
        Ok(out)
    }

    async fn scalar_i64(&self, sql: &str, params: Vec<libsql::Value>) -> Result<i64> {
        let conn = self.db.connect_with_timeout().await?;
        let mut rows = conn
            .query(sql, params)
            .await
            .with_context(|| format!("Count query failed: {}", sql))?;
        let row = rows
            .next()
            .await
            .context("Failed to read count row")?
            .context("Count query returned no row")?;
        row.get(0).context("Failed to get count value")
    }

    // ========================================================================
    // Teams
    // ========================================================================

    pub async fn create_team(&self, team: &Team) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "INSERT INTO teams (id, name) VALUES (?, ?)",
            (team.id.as_str(), team.name.as_str()),
        )
        .await
        .context("Failed to insert team")?;
        Ok(())
    }

    pub async fn get_team(&self, id: &str) -> Result<Option<Team>> {
        let conn = self.db.connect_with_timeout().await?;
        let mut rows = conn
            .query("SELECT id, name FROM teams WHERE id = ?", [id])
            .await
            .context("Failed to query team")?;
        match rows.next().await.context("Failed to read team row")? {
            Some(row) => Ok(Some(Self::row_to_team(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_team(&self, team: &Team) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "UPDATE teams SET name = ? WHERE id = ?",
            (team.name.as_str(), team.id.as_str()),
        )
        .await
        .context("Failed to update team")
    }

    pub async fn delete_team(&self, id: &str) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute("DELETE FROM teams WHERE id = ?", [id])
            .await
            .context("Failed to delete team")
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = conn
            .query("SELECT id, name FROM teams ORDER BY name", ())
            .await
            .context("Failed to list teams")?;
        Self::collect(rows, Self::row_to_team).await
    }

    // ========================================================================
    // People
    // ========================================================================

    pub async fn create_person(&self, person: &Person) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "INSERT INTO people (id, name, email, team_id) VALUES (?, ?, ?, ?)",
            (
                person.id.as_str(),
                person.name.as_str(),
                person.email.as_deref(),
                person.team_id.as_deref(),
            ),
        )
        .await
        .context("Failed to insert person")?;
        Ok(())
    }

    pub async fn get_person(&self, id: &str) -> Result<Option<Person>> {
        let conn = self.db.connect_with_timeout().await?;
        let mut rows = conn
            .query(
                "SELECT id, name, email, team_id FROM people WHERE id = ?",
                [id],
            )
            .await
            .context("Failed to query person")?;
        match rows.next().await.context("Failed to read person row")? {
            Some(row) => Ok(Some(Self::row_to_person(&row)?)),
            None => Ok(None),
        }
    }

    /// Case-insensitive exact-name lookup (zero or one person)
    pub async fn find_person_by_name(&self, name: &str) -> Result<Option<Person>> {
        let conn = self.db.connect_with_timeout().await?;
        let mut rows = conn
            .query(
                "SELECT id, name, email, team_id FROM people
                 WHERE name = ? COLLATE NOCASE LIMIT 1",
                [name],
            )
            .await
            .context("Failed to query person by name")?;
        match rows.next().await.context("Failed to read person row")? {
            Some(row) => Ok(Some(Self::row_to_person(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_person(&self, person: &Person) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "UPDATE people SET name = ?, email = ?, team_id = ? WHERE id = ?",
            (
                person.name.as_str(),
                person.email.as_deref(),
                person.team_id.as_deref(),
                person.id.as_str(),
            ),
        )
        .await
        .context("Failed to update person")
    }

    pub async fn delete_person(&self, id: &str) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute("DELETE FROM people WHERE id = ?", [id])
            .await
            .context("Failed to delete person")
    }

    pub async fn list_people(&self) -> Result<Vec<Person>> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = conn
            .query(
                "SELECT id, name, email, team_id FROM people ORDER BY name",
                (),
            )
            .await
            .context("Failed to list people")?;
        Self::collect(rows, Self::row_to_person).await
    }

    /// Case-insensitive substring search on name, for @mention autocomplete
    pub async fn search_people(&self, query: &str) -> Result<Vec<Person>> {
        let pattern = format!("%{}%", query);
        let conn = self.db.connect_with_timeout().await?;
        let rows = conn
            .query(
                "SELECT id, name, email, team_id FROM people
                 WHERE name LIKE ? ORDER BY name",
                [pattern],
            )
            .await
            .context("Failed to search people")?;
        Self::collect(rows, Self::row_to_person).await
    }

    pub async fn people_for_team(&self, team_id: &str) -> Result<Vec<Person>> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = conn
            .query(
                "SELECT id, name, email, team_id FROM people
                 WHERE team_id = ? ORDER BY name",
                [team_id],
            )
            .await
            .context("Failed to list team members")?;
        Self::collect(rows, Self::row_to_person).await
    }

    // ========================================================================
    // Projects
    // ========================================================================

    pub async fn create_project(&self, project: &Project) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "INSERT INTO projects (id, name, description, start_date, end_date, status)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                project.id.as_str(),
                project.name.as_str(),
                project.description.as_str(),
                project.start_date.map(|d| d.to_string()),
                project.end_date.map(|d| d.to_string()),
                project.status.to_string(),
            ),
        )
        .await
        .context("Failed to insert project")?;
        Ok(())
    }

    pub async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let conn = self.db.connect_with_timeout().await?;
        let mut rows = conn
            .query(
                "SELECT id, name, description, start_date, end_date, status
                 FROM projects WHERE id = ?",
                [id],
            )
            .await
            .context("Failed to query project")?;
        match rows.next().await.context("Failed to read project row")? {
            Some(row) => Ok(Some(Self::row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_project(&self, project: &Project) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "UPDATE projects
             SET name = ?, description = ?, start_date = ?, end_date = ?, status = ?
             WHERE id = ?",
            (
                project.name.as_str(),
                project.description.as_str(),
                project.start_date.map(|d| d.to_string()),
                project.end_date.map(|d| d.to_string()),
                project.status.to_string(),
                project.id.as_str(),
            ),
        )
        .await
        .context("Failed to update project")
    }

    pub async fn delete_project(&self, id: &str) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute("DELETE FROM projects WHERE id = ?", [id])
            .await
            .context("Failed to delete project")
    }

    /// List projects, newest start date first, optionally filtered by status
    pub async fn list_projects(&self, status: Option<ProjectStatus>) -> Result<Vec<Project>> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = match status {
            Some(status) => conn
                .query(
                    "SELECT id, name, description, start_date, end_date, status
                     FROM projects WHERE status = ?
                     ORDER BY start_date DESC, rowid DESC",
                    [status.to_string()],
                )
                .await
                .context("Failed to list projects by status")?,
            None => conn
                .query(
                    "SELECT id, name, description, start_date, end_date, status
                     FROM projects ORDER BY start_date DESC, rowid DESC",
                    (),
                )
                .await
                .context("Failed to list projects")?,
        };
        Self::collect(rows, Self::row_to_project).await
    }

    /// The most recently created projects (dashboard sidebar)
    pub async fn recent_projects(&self, limit: u32) -> Result<Vec<Project>> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = conn
            .query(
                "SELECT id, name, description, start_date, end_date, status
                 FROM projects ORDER BY rowid DESC LIMIT ?",
                [limit as i64],
            )
            .await
            .context("Failed to list recent projects")?;
        Self::collect(rows, Self::row_to_project).await
    }

    // ========================================================================
    // Tasks
    // ========================================================================

    pub async fn create_task(&self, task: &Task) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "INSERT INTO tasks (id, title, description, project_id, start_date, end_date, status, priority)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            (
                task.id.as_str(),
                task.title.as_str(),
                task.description.as_str(),
                task.project_id.as_str(),
                task.start_date.to_string(),
                task.end_date.to_string(),
                task.status.to_string(),
                task.priority.to_string(),
            ),
        )
        .await
        .context("Failed to insert task")?;
        Ok(())
    }

    pub async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let conn = self.db.connect_with_timeout().await?;
        let mut rows = conn
            .query(
                "SELECT id, title, description, project_id, start_date, end_date, status, priority
                 FROM tasks WHERE id = ?",
                [id],
            )
            .await
            .context("Failed to query task")?;
        match rows.next().await.context("Failed to read task row")? {
            Some(row) => Ok(Some(Self::row_to_task(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_task(&self, task: &Task) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "UPDATE tasks
             SET title = ?, description = ?, project_id = ?, start_date = ?, end_date = ?,
                 status = ?, priority = ?
             WHERE id = ?",
            (
                task.title.as_str(),
                task.description.as_str(),
                task.project_id.as_str(),
                task.start_date.to_string(),
                task.end_date.to_string(),
                task.status.to_string(),
                task.priority.to_string(),
                task.id.as_str(),
            ),
        )
        .await
        .context("Failed to update task")
    }

    pub async fn delete_task(&self, id: &str) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute("DELETE FROM tasks WHERE id = ?", [id])
            .await
            .context("Failed to delete task")
    }

    /// List tasks matching the filter, ordered by start date
    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut sql = String::from(
            "SELECT id, title, description, project_id, start_date, end_date, status, priority
             FROM tasks",
        );
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(project_id) = &filter.project_id {
            clauses.push("project_id = ?");
            params.push(project_id.clone().into());
        }
        if let Some(status) = filter.status {
            clauses.push("status = ?");
            params.push(status.to_string().into());
        }
        if let Some(as_of) = filter.overdue_as_of {
            clauses.push("end_date < ? AND status != 'done'");
            params.push(as_of.to_string().into());
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY start_date, rowid");

        let conn = self.db.connect_with_timeout().await?;
        let rows = conn
            .query(&sql, params)
            .await
            .context("Failed to list tasks")?;
        Self::collect(rows, Self::row_to_task).await
    }

    /// Tasks a person is assigned to, ordered by start date
    pub async fn tasks_for_person(&self, person_id: &str) -> Result<Vec<Task>> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = conn
            .query(
                "SELECT t.id, t.title, t.description, t.project_id, t.start_date, t.end_date,
                        t.status, t.priority
                 FROM tasks t
                 JOIN task_assignments a ON a.task_id = t.id
                 WHERE a.person_id = ?
                 ORDER BY t.start_date, t.rowid",
                [person_id],
            )
            .await
            .context("Failed to list tasks for person")?;
        Self::collect(rows, Self::row_to_task).await
    }

    // ========================================================================
    // Assignments
    // ========================================================================

    pub async fn add_assignment(&self, assignment: &TaskAssignment) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "INSERT INTO task_assignments (id, task_id, person_id, is_lead)
             VALUES (?, ?, ?, ?)",
            (
                assignment.id.as_str(),
                assignment.task_id.as_str(),
                assignment.person_id.as_str(),
                assignment.is_lead as i64,
            ),
        )
        .await
        .context("Failed to insert assignment")?;
        Ok(())
    }

    pub async fn clear_assignments(&self, task_id: &str) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute("DELETE FROM task_assignments WHERE task_id = ?", [task_id])
            .await
            .context("Failed to clear assignments")
    }

    /// People assigned to a task, with their lead flag, ordered by name
    pub async fn assignees_for_task(&self, task_id: &str) -> Result<Vec<(Person, bool)>> {
        let conn = self.db.connect_with_timeout().await?;
        let mut rows = conn
            .query(
                "SELECT p.id, p.name, p.email, p.team_id, a.is_lead
                 FROM people p
                 JOIN task_assignments a ON a.person_id = p.id
                 WHERE a.task_id = ?
                 ORDER BY p.name",
                [task_id],
            )
            .await
            .context("Failed to list assignees")?;
        let mut assignees = Vec::new();
        while let Some(row) = rows.next().await.context("Failed to read assignee row")? {
            let person = Self::row_to_person(&row)?;
            let is_lead: i64 = row.get(4).context("Failed to get is_lead")?;
            assignees.push((person, is_lead != 0));
        }
        Ok(assignees)
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// Look a tag up by name, creating it when missing
    pub async fn find_or_create_tag(&self, name: &str) -> Result<Tag> {
        let conn = self.db.connect_with_timeout().await?;
        let mut rows = conn
            .query("SELECT id, name FROM tags WHERE name = ?", [name])
            .await
            .context("Failed to query tag")?;
        if let Some(row) = rows.next().await.context("Failed to read tag row")? {
            return Self::row_to_tag(&row);
        }
        let tag = Tag::new(name);
        conn.execute(
            "INSERT INTO tags (id, name) VALUES (?, ?)",
            (tag.id.as_str(), tag.name.as_str()),
        )
        .await
        .context("Failed to insert tag")?;
        Ok(tag)
    }

    pub async fn all_tags(&self) -> Result<Vec<Tag>> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = conn
            .query("SELECT id, name FROM tags ORDER BY name", ())
            .await
            .context("Failed to list tags")?;
        Self::collect(rows, Self::row_to_tag).await
    }

    pub async fn tags_for_task(&self, task_id: &str) -> Result<Vec<Tag>> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = conn
            .query(
                "SELECT t.id, t.name FROM tags t
                 JOIN task_tags tt ON tt.tag_id = t.id
                 WHERE tt.task_id = ?
                 ORDER BY t.name",
                [task_id],
            )
            .await
            .context("Failed to list tags for task")?;
        Self::collect(rows, Self::row_to_tag).await
    }

    /// Replace a task's tag set wholesale
    pub async fn set_task_tags(&self, task_id: &str, tag_ids: &[String]) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute("DELETE FROM task_tags WHERE task_id = ?", [task_id])
            .await
            .context("Failed to clear task tags")?;
        for tag_id in tag_ids {
            conn.execute(
                "INSERT OR IGNORE INTO task_tags (task_id, tag_id) VALUES (?, ?)",
                (task_id, tag_id.as_str()),
            )
            .await
            .context("Failed to insert task tag")?;
        }
        Ok(())
    }

    // ========================================================================
    // Dependencies
    // ========================================================================

    /// Replace a task's dependency edges wholesale
    ///
    /// The graph is stored as-is; no cycle detection is performed.
    pub async fn replace_dependencies(&self, task_id: &str, depends_on: &[String]) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute("DELETE FROM task_dependencies WHERE task_id = ?", [task_id])
            .await
            .context("Failed to clear dependencies")?;
        for dep_id in depends_on {
            conn.execute(
                "INSERT OR IGNORE INTO task_dependencies (task_id, depends_on_id) VALUES (?, ?)",
                (task_id, dep_id.as_str()),
            )
            .await
            .context("Failed to insert dependency")?;
        }
        Ok(())
    }

    /// Ids of the tasks this task depends on, in insertion order
    pub async fn dependency_ids_for_task(&self, task_id: &str) -> Result<Vec<String>> {
        let conn = self.db.connect_with_timeout().await?;
        let mut rows = conn
            .query(
                "SELECT depends_on_id FROM task_dependencies
                 WHERE task_id = ? ORDER BY rowid",
                [task_id],
            )
            .await
            .context("Failed to list dependency ids")?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await.context("Failed to read dependency row")? {
            ids.push(row.get(0).context("Failed to get depends_on_id")?);
        }
        Ok(ids)
    }

    /// Tasks this task depends on (blocked by)
    pub async fn dependencies_for_task(&self, task_id: &str) -> Result<Vec<Task>> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = conn
            .query(
                "SELECT t.id, t.title, t.description, t.project_id, t.start_date, t.end_date,
                        t.status, t.priority
                 FROM tasks t
                 JOIN task_dependencies d ON d.depends_on_id = t.id
                 WHERE d.task_id = ?
                 ORDER BY d.rowid",
                [task_id],
            )
            .await
            .context("Failed to list dependencies")?;
        Self::collect(rows, Self::row_to_task).await
    }

    /// Tasks that depend on this task (blocking)
    pub async fn dependents_for_task(&self, task_id: &str) -> Result<Vec<Task>> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = conn
            .query(
                "SELECT t.id, t.title, t.description, t.project_id, t.start_date, t.end_date,
                        t.status, t.priority
                 FROM tasks t
                 JOIN task_dependencies d ON d.task_id = t.id
                 WHERE d.depends_on_id = ?
                 ORDER BY d.rowid",
                [task_id],
            )
            .await
            .context("Failed to list dependents")?;
        Self::collect(rows, Self::row_to_task).await
    }

    // ========================================================================
    // Status updates and mentions
    // ========================================================================

    pub async fn create_status_update(&self, update: &StatusUpdate) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "INSERT INTO status_updates (id, task_id, content, created_at)
             VALUES (?, ?, ?, ?)",
            (
                update.id.as_str(),
                update.task_id.as_str(),
                update.content.as_str(),
                update.created_at.to_rfc3339(),
            ),
        )
        .await
        .context("Failed to insert status update")?;
        Ok(())
    }

    /// Status updates for a task, newest first
    pub async fn status_updates_for_task(&self, task_id: &str) -> Result<Vec<StatusUpdate>> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = conn
            .query(
                "SELECT id, task_id, content, created_at FROM status_updates
                 WHERE task_id = ?
                 ORDER BY created_at DESC, rowid DESC",
                [task_id],
            )
            .await
            .context("Failed to list status updates")?;
        Self::collect(rows, Self::row_to_status_update).await
    }

    /// Record that a status update mentions a person (idempotent)
    pub async fn add_mention(&self, status_update_id: &str, person_id: &str) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "INSERT OR IGNORE INTO status_update_mentions (status_update_id, person_id)
             VALUES (?, ?)",
            (status_update_id, person_id),
        )
        .await
        .context("Failed to insert mention")?;
        Ok(())
    }

    /// People mentioned by a status update, ordered by name
    pub async fn mentions_for_update(&self, status_update_id: &str) -> Result<Vec<Person>> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = conn
            .query(
                "SELECT p.id, p.name, p.email, p.team_id
                 FROM people p
                 JOIN status_update_mentions m ON m.person_id = p.id
                 WHERE m.status_update_id = ?
                 ORDER BY p.name",
                [status_update_id],
            )
            .await
            .context("Failed to list mentions")?;
        Self::collect(rows, Self::row_to_person).await
    }

    // ========================================================================
    // Milestones
    // ========================================================================

    pub async fn create_milestone(&self, milestone: &Milestone) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "INSERT INTO milestones (id, task_id, name, date, status_override)
             VALUES (?, ?, ?, ?, ?)",
            (
                milestone.id.as_str(),
                milestone.task_id.as_str(),
                milestone.name.as_str(),
                milestone.date.to_string(),
                milestone.status_override.map(|s| s.to_string()),
            ),
        )
        .await
        .context("Failed to insert milestone")?;
        Ok(())
    }

    pub async fn get_milestone(&self, id: &str) -> Result<Option<Milestone>> {
        let conn = self.db.connect_with_timeout().await?;
        let mut rows = conn
            .query(
                "SELECT id, task_id, name, date, status_override FROM milestones WHERE id = ?",
                [id],
            )
            .await
            .context("Failed to query milestone")?;
        match rows.next().await.context("Failed to read milestone row")? {
            Some(row) => Ok(Some(Self::row_to_milestone(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_milestone(&self, milestone: &Milestone) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "UPDATE milestones SET name = ?, date = ?, status_override = ? WHERE id = ?",
            (
                milestone.name.as_str(),
                milestone.date.to_string(),
                milestone.status_override.map(|s| s.to_string()),
                milestone.id.as_str(),
            ),
        )
        .await
        .context("Failed to update milestone")
    }

    pub async fn delete_milestone(&self, id: &str) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute("DELETE FROM milestones WHERE id = ?", [id])
            .await
            .context("Failed to delete milestone")
    }

    /// Milestones on a task, earliest date first
    pub async fn milestones_for_task(&self, task_id: &str) -> Result<Vec<Milestone>> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = conn
            .query(
                "SELECT id, task_id, name, date, status_override FROM milestones
                 WHERE task_id = ?
                 ORDER BY date, rowid",
                [task_id],
            )
            .await
            .context("Failed to list milestones")?;
        Self::collect(rows, Self::row_to_milestone).await
    }

    // ========================================================================
    // Dashboard counts
    // ========================================================================

    pub async fn count_projects(&self, status: Option<ProjectStatus>) -> Result<i64> {
        match status {
            Some(status) => {
                self.scalar_i64(
                    "SELECT COUNT(*) FROM projects WHERE status = ?",
                    vec![status.to_string().into()],
                )
                .await
            }
            None => self.scalar_i64("SELECT COUNT(*) FROM projects", vec![]).await,
        }
    }

    pub async fn count_tasks(&self, status: Option<TaskStatus>) -> Result<i64> {
        match status {
            Some(status) => {
                self.scalar_i64(
                    "SELECT COUNT(*) FROM tasks WHERE status = ?",
                    vec![status.to_string().into()],
                )
                .await
            }
            None => self.scalar_i64("SELECT COUNT(*) FROM tasks", vec![]).await,
        }
    }

    pub async fn count_overdue_tasks(&self, as_of: NaiveDate) -> Result<i64> {
        self.scalar_i64(
            "SELECT COUNT(*) FROM tasks WHERE end_date < ? AND status != 'done'",
            vec![as_of.to_string().into()],
        )
        .await
    }

    pub async fn count_people(&self) -> Result<i64> {
        self.scalar_i64("SELECT COUNT(*) FROM people", vec![]).await
    }
}
