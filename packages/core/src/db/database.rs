//! Database Connection Management
//!
//! This module provides the core database connection and initialization
//! functionality using libsql for Taskmaster's relational schema.
//!
//! # Architecture
//!
//! - **Path-agnostic**: Accepts any valid PathBuf
//! - **Idempotent schema**: CREATE TABLE IF NOT EXISTS, no migrations
//! - **WAL mode**: Write-Ahead Logging for better concurrency
//! - **Foreign keys**: Enabled for referential integrity
//!
//! # Database Connection Patterns
//!
//! Use `connect_with_timeout()` in async functions. The 5-second busy
//! timeout lets concurrent operations wait and retry instead of failing
//! immediately with `SQLITE_BUSY` when the Tokio runtime moves futures
//! between threads. `connect()` is for single-threaded synchronous
//! contexts only.

use crate::db::error::DatabaseError;
use libsql::{Builder, Database};
use std::path::PathBuf;
use std::sync::Arc;

/// Database service for managing the libsql connection and schema
///
/// # Examples
///
/// ```no_run
/// use taskmaster_core::db::DatabaseService;
/// use std::path::PathBuf;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let db_path = PathBuf::from("./data/taskmaster.db");
///     let db_service = DatabaseService::new(db_path).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database handle (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

impl DatabaseService {
    /// Create a new DatabaseService with the specified database path
    ///
    /// This will:
    /// 1. Ensure the parent directory exists (create if needed)
    /// 2. Open/create the database file
    /// 3. Initialize the schema (CREATE TABLE IF NOT EXISTS)
    /// 4. Enable SQLite features (WAL mode, foreign keys, busy timeout)
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if:
    /// - Parent directory cannot be created
    /// - Database connection fails
    /// - Schema initialization fails
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        // New database files need a WAL checkpoint after schema creation,
        // existing ones can skip it.
        let is_new_database = !db_path.exists();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        DatabaseError::permission_denied(db_path.clone())
                    } else {
                        DatabaseError::DirectoryCreationFailed(e)
                    }
                })?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
        };

        service.initialize_schema(is_new_database).await?;

        Ok(service)
    }

    /// Get a plain synchronous connection
    ///
    /// Use only in single-threaded contexts where the connection does not
    /// cross an await point; async code should call `connect_with_timeout()`.
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        self.db.connect().map_err(DatabaseError::LibsqlError)
    }

    /// Get an async connection with busy timeout configured
    ///
    /// Sets a 5-second busy timeout so concurrent operations wait and retry
    /// instead of failing immediately when the database is locked. Foreign
    /// keys are per-connection in SQLite, so they are re-enabled here -
    /// cascading deletes depend on it.
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.connect()?;
        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;
        self.execute_pragma(&conn, "PRAGMA foreign_keys = ON")
            .await?;
        Ok(conn)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so we must use query() instead of
    /// execute(). This helper encapsulates that pattern.
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), DatabaseError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Execute one DDL statement with a named context for error messages
    async fn execute_ddl(
        &self,
        conn: &libsql::Connection,
        what: &str,
        sql: &str,
    ) -> Result<(), DatabaseError> {
        conn.execute(sql, ()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to create {}: {}", what, e))
        })?;
        Ok(())
    }

    /// Initialize database schema and configuration
    ///
    /// Creates tables and indexes using CREATE TABLE IF NOT EXISTS,
    /// ensuring idempotent initialization (safe to call multiple times).
    ///
    /// # Schema
    ///
    /// Entity tables: `teams`, `people`, `projects`, `tasks`,
    /// `status_updates`, `milestones`, `tags`, `task_assignments`.
    /// Association tables (composite primary keys, cascading deletes):
    /// `task_tags`, `task_dependencies`, `status_update_mentions`.
    async fn initialize_schema(&self, is_new_database: bool) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        // Enable WAL mode for better concurrency
        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        // Enable foreign key constraints
        self.execute_pragma(&conn, "PRAGMA foreign_keys = ON")
            .await?;

        self.create_tables(&conn).await?;
        self.create_core_indexes(&conn).await?;

        // Force WAL checkpoint only for newly created databases so the
        // schema is flushed before any rapid reopen (test databases).
        if is_new_database {
            self.execute_pragma(&conn, "PRAGMA wal_checkpoint(TRUNCATE)")
                .await?;
        }

        Ok(())
    }

    async fn create_tables(&self, conn: &libsql::Connection) -> Result<(), DatabaseError> {
        self.execute_ddl(
            conn,
            "teams table",
            "CREATE TABLE IF NOT EXISTS teams (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            )",
        )
        .await?;

        self.execute_ddl(
            conn,
            "people table",
            "CREATE TABLE IF NOT EXISTS people (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT,
                team_id TEXT,
                -- Deleting a team leaves its members unaffiliated
                FOREIGN KEY (team_id) REFERENCES teams(id) ON DELETE SET NULL
            )",
        )
        .await?;

        self.execute_ddl(
            conn,
            "projects table",
            "CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                start_date TEXT,
                end_date TEXT,
                status TEXT NOT NULL DEFAULT 'active'
            )",
        )
        .await?;

        self.execute_ddl(
            conn,
            "tasks table",
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                project_id TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'todo',
                priority TEXT NOT NULL DEFAULT 'medium',
                -- Project deletion cascades to its tasks
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
            )",
        )
        .await?;

        self.execute_ddl(
            conn,
            "task_assignments table",
            "CREATE TABLE IF NOT EXISTS task_assignments (
                id TEXT PRIMARY KEY,
                task_id TEXT NOT NULL,
                person_id TEXT NOT NULL,
                is_lead INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE,
                FOREIGN KEY (person_id) REFERENCES people(id) ON DELETE CASCADE
            )",
        )
        .await?;

        self.execute_ddl(
            conn,
            "task_dependencies table",
            "CREATE TABLE IF NOT EXISTS task_dependencies (
                task_id TEXT NOT NULL,
                depends_on_id TEXT NOT NULL,
                PRIMARY KEY (task_id, depends_on_id),
                FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE,
                FOREIGN KEY (depends_on_id) REFERENCES tasks(id) ON DELETE CASCADE
            )",
        )
        .await?;

        self.execute_ddl(
            conn,
            "tags table",
            "CREATE TABLE IF NOT EXISTS tags (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            )",
        )
        .await?;

        self.execute_ddl(
            conn,
            "task_tags table",
            "CREATE TABLE IF NOT EXISTS task_tags (
                task_id TEXT NOT NULL,
                tag_id TEXT NOT NULL,
                PRIMARY KEY (task_id, tag_id),
                FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            )",
        )
        .await?;

        self.execute_ddl(
            conn,
            "status_updates table",
            "CREATE TABLE IF NOT EXISTS status_updates (
                id TEXT PRIMARY KEY,
                task_id TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
            )",
        )
        .await?;

        self.execute_ddl(
            conn,
            "status_update_mentions table",
            "CREATE TABLE IF NOT EXISTS status_update_mentions (
                status_update_id TEXT NOT NULL,
                person_id TEXT NOT NULL,
                PRIMARY KEY (status_update_id, person_id),
                FOREIGN KEY (status_update_id) REFERENCES status_updates(id) ON DELETE CASCADE,
                FOREIGN KEY (person_id) REFERENCES people(id) ON DELETE CASCADE
            )",
        )
        .await?;

        self.execute_ddl(
            conn,
            "milestones table",
            "CREATE TABLE IF NOT EXISTS milestones (
                id TEXT PRIMARY KEY,
                task_id TEXT NOT NULL,
                name TEXT NOT NULL,
                date TEXT NOT NULL,
                status_override TEXT,
                FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
            )",
        )
        .await?;

        Ok(())
    }

    /// Create core indexes
    ///
    /// These indexes back the common query paths and never change, so no
    /// ALTER TABLE is required on user machines.
    async fn create_core_indexes(&self, conn: &libsql::Connection) -> Result<(), DatabaseError> {
        // People are listed and searched by name, and filtered by team
        self.execute_ddl(
            conn,
            "index 'idx_people_name'",
            "CREATE INDEX IF NOT EXISTS idx_people_name ON people(name)",
        )
        .await?;
        self.execute_ddl(
            conn,
            "index 'idx_people_team'",
            "CREATE INDEX IF NOT EXISTS idx_people_team ON people(team_id)",
        )
        .await?;

        // Tasks are fetched per project and filtered by status/end date
        self.execute_ddl(
            conn,
            "index 'idx_tasks_project'",
            "CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id)",
        )
        .await?;
        self.execute_ddl(
            conn,
            "index 'idx_tasks_status'",
            "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status)",
        )
        .await?;
        self.execute_ddl(
            conn,
            "index 'idx_tasks_end_date'",
            "CREATE INDEX IF NOT EXISTS idx_tasks_end_date ON tasks(end_date)",
        )
        .await?;

        // Assignments are traversed in both directions
        self.execute_ddl(
            conn,
            "index 'idx_assignments_task'",
            "CREATE INDEX IF NOT EXISTS idx_assignments_task ON task_assignments(task_id)",
        )
        .await?;
        self.execute_ddl(
            conn,
            "index 'idx_assignments_person'",
            "CREATE INDEX IF NOT EXISTS idx_assignments_person ON task_assignments(person_id)",
        )
        .await?;

        // Dependency edges are queried from the dependent side by the
        // composite primary key; the reverse direction needs its own index
        self.execute_ddl(
            conn,
            "index 'idx_dependencies_target'",
            "CREATE INDEX IF NOT EXISTS idx_dependencies_target ON task_dependencies(depends_on_id)",
        )
        .await?;

        self.execute_ddl(
            conn,
            "index 'idx_task_tags_tag'",
            "CREATE INDEX IF NOT EXISTS idx_task_tags_tag ON task_tags(tag_id)",
        )
        .await?;

        self.execute_ddl(
            conn,
            "index 'idx_updates_task'",
            "CREATE INDEX IF NOT EXISTS idx_updates_task ON status_updates(task_id)",
        )
        .await?;

        self.execute_ddl(
            conn,
            "index 'idx_mentions_person'",
            "CREATE INDEX IF NOT EXISTS idx_mentions_person ON status_update_mentions(person_id)",
        )
        .await?;

        self.execute_ddl(
            conn,
            "index 'idx_milestones_task'",
            "CREATE INDEX IF NOT EXISTS idx_milestones_task ON milestones(task_id)",
        )
        .await?;

        Ok(())
    }
}
