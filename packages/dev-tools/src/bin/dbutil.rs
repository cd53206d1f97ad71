//! Export and import the Taskmaster database to/from CSV files.
//!
//! Usage:
//!   dbutil export [dir]            # default: ./export
//!   dbutil import [dir] [--yes]    # default: ./export
//!
//! Import replaces all data; a timestamped CSV backup of the current
//! database is written first.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use taskmaster_core::db::DatabaseService;

/// Table export order (respects foreign key dependencies)
const TABLES: &[(&str, &str, &[&str])] = &[
    ("teams.csv", "teams", &["id", "name"]),
    ("people.csv", "people", &["id", "name", "email", "team_id"]),
    (
        "projects.csv",
        "projects",
        &["id", "name", "description", "start_date", "end_date", "status"],
    ),
    ("tags.csv", "tags", &["id", "name"]),
    (
        "tasks.csv",
        "tasks",
        &[
            "id",
            "title",
            "description",
            "project_id",
            "start_date",
            "end_date",
            "status",
            "priority",
        ],
    ),
    (
        "task_assignments.csv",
        "task_assignments",
        &["id", "task_id", "person_id", "is_lead"],
    ),
    (
        "task_dependencies.csv",
        "task_dependencies",
        &["task_id", "depends_on_id"],
    ),
    ("task_tags.csv", "task_tags", &["task_id", "tag_id"]),
    (
        "status_updates.csv",
        "status_updates",
        &["id", "task_id", "content", "created_at"],
    ),
    (
        "status_update_mentions.csv",
        "status_update_mentions",
        &["status_update_id", "person_id"],
    ),
    (
        "milestones.csv",
        "milestones",
        &["id", "task_id", "name", "date", "status_override"],
    ),
];

/// Columns where an empty CSV cell round-trips to NULL
const NULLABLE_COLUMNS: &[&str] = &["email", "team_id", "start_date", "end_date", "status_override"];

#[derive(Parser)]
#[command(
    name = "dbutil",
    about = "Export and import the Taskmaster database to/from CSV files"
)]
struct Cli {
    /// Path to the database file
    #[arg(long, default_value = "data/taskmaster.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export all tables to CSV files
    Export {
        /// Output directory
        #[arg(default_value = "export")]
        dir: PathBuf,
    },
    /// Replace all data with the contents of a CSV directory
    Import {
        /// Input directory
        #[arg(default_value = "export")]
        dir: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let db = DatabaseService::new(cli.db).await?;

    match cli.command {
        Command::Export { dir } => {
            println!("Exporting database to {}/...\n", dir.display());
            export_db(&db, &dir).await?;
        }
        Command::Import { dir, yes } => {
            if !dir.is_dir() {
                anyhow::bail!("directory \"{}\" not found", dir.display());
            }
            if !yes && !confirm_replace(&dir)? {
                println!("Aborted.");
                return Ok(());
            }
            println!("Importing database from {}/...\n", dir.display());
            import_db(&db, &dir).await?;
        }
    }
    Ok(())
}

fn confirm_replace(dir: &Path) -> Result<bool> {
    print!(
        "This will REPLACE all data with contents of {}/. Continue? [y/N] ",
        dir.display()
    );
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// One CSV cell from a database value
fn value_to_cell(value: libsql::Value) -> String {
    match value {
        libsql::Value::Null => String::new(),
        libsql::Value::Integer(i) => i.to_string(),
        libsql::Value::Real(f) => f.to_string(),
        libsql::Value::Text(s) => s,
        // No blob columns in this schema
        libsql::Value::Blob(_) => String::new(),
    }
}

/// One database value from a CSV cell
fn cell_to_value(column: &str, cell: &str) -> libsql::Value {
    if cell.is_empty() && NULLABLE_COLUMNS.contains(&column) {
        return libsql::Value::Null;
    }
    if column == "is_lead" {
        // Accept both numeric and boolean-ish spellings
        let truthy = matches!(cell, "1" | "true" | "True");
        return libsql::Value::Integer(truthy as i64);
    }
    libsql::Value::Text(cell.to_string())
}

async fn export_db(db: &DatabaseService, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let conn = db.connect_with_timeout().await?;

    for (filename, table, columns) in TABLES {
        let path = output_dir.join(filename);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        writer.write_record(*columns)?;

        let sql = format!("SELECT {} FROM {} ORDER BY rowid", columns.join(", "), table);
        let mut rows = conn
            .query(&sql, ())
            .await
            .with_context(|| format!("Failed to read table {}", table))?;

        let mut count = 0usize;
        while let Some(row) = rows.next().await? {
            let mut record = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                record.push(value_to_cell(row.get_value(i as i32)?));
            }
            writer.write_record(&record)?;
            count += 1;
        }
        writer.flush()?;
        println!("  Exported {:>4} rows -> {}", count, filename);
    }

    println!("\nExport complete: {}/", output_dir.display());
    Ok(())
}

async fn import_db(db: &DatabaseService, input_dir: &Path) -> Result<()> {
    // Auto-backup before overwriting
    let backup_dir = PathBuf::from(format!("backup_{}", Local::now().format("%Y%m%d_%H%M%S")));
    println!("Backing up current database to {}/...\n", backup_dir.display());
    export_db(db, &backup_dir).await?;
    println!("\nBackup complete. Proceeding with import...\n");

    let conn = db.connect_with_timeout().await?;

    // Clear all data in reverse order to respect foreign keys
    for (_, table, _) in TABLES.iter().rev() {
        conn.execute(&format!("DELETE FROM {}", table), ())
            .await
            .with_context(|| format!("Failed to clear table {}", table))?;
    }

    for (filename, table, columns) in TABLES {
        let path = input_dir.join(filename);
        if !path.exists() {
            println!("  Skipped {} (not found)", filename);
            continue;
        }

        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders
        );

        let mut reader = csv::Reader::from_path(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let mut count = 0usize;
        for record in reader.records() {
            let record = record?;
            let params: Vec<libsql::Value> = columns
                .iter()
                .enumerate()
                .map(|(i, column)| cell_to_value(column, record.get(i).unwrap_or("")))
                .collect();
            conn.execute(&sql, params)
                .await
                .with_context(|| format!("Failed to insert into {}", table))?;
            count += 1;
        }
        println!("  Imported {:>4} rows <- {}", count, filename);
    }

    println!("\nImport complete from: {}/", input_dir.display());
    Ok(())
}
