//! Integration tests for the service layer
//!
//! Tests cover:
//! - Task creation/update with tag and dependency reconciliation
//! - Status updates: blank rejection, mention persistence, safe rendering
//! - Milestones with derived status through the service
//! - Gantt feed wire format
//! - Dashboard summary
//! - Person workload grouping

use chrono::NaiveDate;
use std::sync::Arc;
use taskmaster_core::db::{DatabaseService, TaskFilter, TrackerStore};
use taskmaster_core::models::{MilestoneStatus, Priority, ProjectStatus, TaskStatus};
use taskmaster_core::services::{
    DashboardService, PeopleService, ProjectInput, ProjectService, QuickUpdate, TaskInput,
    TaskService,
};
use tempfile::TempDir;

struct TestServices {
    people: PeopleService,
    projects: ProjectService,
    tasks: TaskService,
    dashboard: DashboardService,
    _temp_dir: TempDir,
}

/// Helper to create all services over a fresh temp database
async fn create_test_services() -> TestServices {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = DatabaseService::new(db_path).await.unwrap();
    let store = TrackerStore::new(Arc::new(db));
    TestServices {
        people: PeopleService::new(store.clone()),
        projects: ProjectService::new(store.clone()),
        tasks: TaskService::new(store.clone()),
        dashboard: DashboardService::new(store),
        _temp_dir: temp_dir,
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn project_input(name: &str, status: ProjectStatus) -> ProjectInput {
    ProjectInput {
        name: name.to_string(),
        description: "A test project".to_string(),
        start_date: Some(day(2025, 1, 1)),
        end_date: Some(day(2025, 12, 31)),
        status,
    }
}

fn task_input(title: &str, status: TaskStatus) -> TaskInput {
    TaskInput {
        title: title.to_string(),
        description: String::new(),
        start_date: day(2025, 1, 1),
        end_date: day(2025, 6, 30),
        status,
        priority: Priority::Medium,
        tags: Vec::new(),
        depends_on: Vec::new(),
    }
}

// =========================================================================
// Tasks: tags, dependencies, quick update
// =========================================================================

#[tokio::test]
async fn test_create_task_with_tags_and_dependencies() {
    let svc = create_test_services().await;
    let project = svc
        .projects
        .create_project(project_input("Website Redesign", ProjectStatus::Active))
        .await
        .unwrap();

    let mockups = svc
        .tasks
        .create_task(&project.id, task_input("Design mockups", TaskStatus::Done))
        .await
        .unwrap();

    let mut input = task_input("Frontend implementation", TaskStatus::InProgress);
    input.tags = vec!["frontend".to_string(), " v2 ".to_string(), "".to_string()];
    input.depends_on = vec![mockups.id.clone()];
    let implementation = svc.tasks.create_task(&project.id, input).await.unwrap();

    let detail = svc.tasks.task_detail(&implementation.id).await.unwrap();
    let tag_names: Vec<&str> = detail.tags.iter().map(|t| t.name.as_str()).collect();
    // Trimmed, blanks dropped, listed by name
    assert_eq!(tag_names, vec!["frontend", "v2"]);
    assert_eq!(detail.dependencies.len(), 1);
    assert_eq!(detail.dependencies[0].id, mockups.id);
    assert_eq!(detail.project.id, project.id);
}

#[tokio::test]
async fn test_update_task_replaces_tags_and_dependencies() {
    let svc = create_test_services().await;
    let project = svc
        .projects
        .create_project(project_input("P", ProjectStatus::Active))
        .await
        .unwrap();
    let dep = svc
        .tasks
        .create_task(&project.id, task_input("Dep", TaskStatus::Todo))
        .await
        .unwrap();

    let mut input = task_input("Task", TaskStatus::Todo);
    input.tags = vec!["old".to_string()];
    input.depends_on = vec![dep.id.clone()];
    let task = svc.tasks.create_task(&project.id, input).await.unwrap();

    let mut update = task_input("Task renamed", TaskStatus::InProgress);
    update.tags = vec!["new".to_string()];
    let updated = svc.tasks.update_task(&task.id, update).await.unwrap();
    assert_eq!(updated.title, "Task renamed");
    assert_eq!(updated.status, TaskStatus::InProgress);

    let detail = svc.tasks.task_detail(&task.id).await.unwrap();
    let tag_names: Vec<&str> = detail.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tag_names, vec!["new"]);
    assert!(detail.dependencies.is_empty());
}

#[tokio::test]
async fn test_quick_update_reports_progress() {
    let svc = create_test_services().await;
    let project = svc
        .projects
        .create_project(project_input("P", ProjectStatus::Active))
        .await
        .unwrap();
    let task = svc
        .tasks
        .create_task(&project.id, task_input("T", TaskStatus::Todo))
        .await
        .unwrap();

    let progress = svc
        .tasks
        .quick_update(
            &task.id,
            QuickUpdate {
                status: Some(TaskStatus::InProgress),
                ..QuickUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(progress, 50);

    let progress = svc
        .tasks
        .quick_update(
            &task.id,
            QuickUpdate {
                start_date: Some(day(2025, 3, 1)),
                end_date: Some(day(2025, 9, 1)),
                status: Some(TaskStatus::Done),
            },
        )
        .await
        .unwrap();
    assert_eq!(progress, 100);

    let fetched = svc.tasks.get_task(&task.id).await.unwrap();
    assert_eq!(fetched.start_date, day(2025, 3, 1));
    assert_eq!(fetched.end_date, day(2025, 9, 1));
}

#[tokio::test]
async fn test_overdue_listing_excludes_done() {
    let svc = create_test_services().await;
    let project = svc
        .projects
        .create_project(project_input("P", ProjectStatus::Active))
        .await
        .unwrap();

    let mut overdue = task_input("Overdue Task", TaskStatus::InProgress);
    overdue.end_date = day(2025, 3, 1);
    svc.tasks.create_task(&project.id, overdue).await.unwrap();

    let mut done_past = task_input("Done Past", TaskStatus::Done);
    done_past.end_date = day(2025, 3, 1);
    svc.tasks.create_task(&project.id, done_past).await.unwrap();

    let listed = svc
        .tasks
        .list_tasks(&TaskFilter {
            overdue_as_of: Some(day(2025, 6, 1)),
            ..TaskFilter::default()
        })
        .await
        .unwrap();
    let titles: Vec<&str> = listed.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Overdue Task"]);
}

// =========================================================================
// Status updates and mentions
// =========================================================================

#[tokio::test]
async fn test_blank_status_update_is_ignored() {
    let svc = create_test_services().await;
    let project = svc
        .projects
        .create_project(project_input("P", ProjectStatus::Active))
        .await
        .unwrap();
    let task = svc
        .tasks
        .create_task(&project.id, task_input("T", TaskStatus::Todo))
        .await
        .unwrap();

    let created = svc.tasks.add_status_update(&task.id, "   ").await.unwrap();
    assert!(created.is_none());
    assert!(svc
        .tasks
        .status_updates_for_task(&task.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_mention_of_known_person_is_persisted() {
    let svc = create_test_services().await;
    let person = svc
        .people
        .create_person("Jane Smith", Some("jane@example.com".into()), None)
        .await
        .unwrap();
    let project = svc
        .projects
        .create_project(project_input("P", ProjectStatus::Active))
        .await
        .unwrap();
    let task = svc
        .tasks
        .create_task(&project.id, task_input("T", TaskStatus::Todo))
        .await
        .unwrap();

    let update = svc
        .tasks
        .add_status_update(&task.id, r#"@"Jane Smith" has reviewed this"#)
        .await
        .unwrap()
        .expect("non-blank update is created");

    let views = svc.tasks.status_updates_for_task(&task.id).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].update.id, update.id);
    assert_eq!(views[0].mentions.len(), 1);
    assert_eq!(views[0].mentions[0].id, person.id);
}

#[tokio::test]
async fn test_unknown_mention_does_not_fail_the_update() {
    let svc = create_test_services().await;
    let project = svc
        .projects
        .create_project(project_input("P", ProjectStatus::Active))
        .await
        .unwrap();
    let task = svc
        .tasks
        .create_task(&project.id, task_input("T", TaskStatus::Todo))
        .await
        .unwrap();

    let update = svc
        .tasks
        .add_status_update(&task.id, "@Nobody knows")
        .await
        .unwrap()
        .unwrap();

    let views = svc.tasks.status_updates_for_task(&task.id).await.unwrap();
    assert_eq!(views[0].update.id, update.id);
    assert!(views[0].mentions.is_empty());
    // Renders as a styled non-link span
    assert!(views[0].body_html.contains(r#"<span class="mention">@Nobody knows</span>"#));
}

#[tokio::test]
async fn test_rendered_body_links_mention_and_escapes_html() {
    let svc = create_test_services().await;
    let person = svc
        .people
        .create_person("Jane Smith", None, None)
        .await
        .unwrap();
    let project = svc
        .projects
        .create_project(project_input("P", ProjectStatus::Active))
        .await
        .unwrap();
    let task = svc
        .tasks
        .create_task(&project.id, task_input("T", TaskStatus::Todo))
        .await
        .unwrap();

    svc.tasks
        .add_status_update(&task.id, r#"@"Jane Smith" reviewed <script>"#)
        .await
        .unwrap();

    let views = svc.tasks.status_updates_for_task(&task.id).await.unwrap();
    let body = &views[0].body_html;
    assert!(body.contains(&format!(
        r#"<a href="/people/{}" class="mention">@Jane Smith</a>"#,
        person.id
    )));
    assert!(body.contains("&lt;script&gt;"));
    assert!(!body.contains("<script>"));
}

#[tokio::test]
async fn test_render_update_body_linkifies_urls() {
    let svc = create_test_services().await;
    let body = svc
        .tasks
        .render_update_body("Spec uploaded to https://example.com/spec.pdf for review")
        .await
        .unwrap();
    assert!(body.contains(r#"<a href="https://example.com/spec.pdf">spec.pdf</a>"#));
}

// =========================================================================
// Milestones
// =========================================================================

#[tokio::test]
async fn test_milestone_lifecycle_and_derived_status() {
    let svc = create_test_services().await;
    let project = svc
        .projects
        .create_project(project_input("P", ProjectStatus::Active))
        .await
        .unwrap();
    let task = svc
        .tasks
        .create_task(&project.id, task_input("T", TaskStatus::InProgress))
        .await
        .unwrap();

    // Far-future date: on track regardless of when the test runs
    let milestone = svc
        .tasks
        .add_milestone(&task.id, "Launch", day(2099, 6, 15))
        .await
        .unwrap();

    let views = svc.tasks.milestones_for_task(&task.id).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].milestone.name, "Launch");
    assert_eq!(views[0].status, MilestoneStatus::OnTrack);

    // Far-past date on an unfinished task: delayed
    svc.tasks
        .update_milestone(&milestone.id, "Launch", day(1999, 6, 15), None)
        .await
        .unwrap();
    let views = svc.tasks.milestones_for_task(&task.id).await.unwrap();
    assert_eq!(views[0].status, MilestoneStatus::Delayed);

    // Manual override wins
    svc.tasks
        .update_milestone(
            &milestone.id,
            "Launch",
            day(1999, 6, 15),
            Some(MilestoneStatus::OnHold),
        )
        .await
        .unwrap();
    let views = svc.tasks.milestones_for_task(&task.id).await.unwrap();
    assert_eq!(views[0].status, MilestoneStatus::OnHold);

    svc.tasks.delete_milestone(&milestone.id).await.unwrap();
    assert!(svc
        .tasks
        .milestones_for_task(&task.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_milestone_on_hold_when_project_on_hold() {
    let svc = create_test_services().await;
    let project = svc
        .projects
        .create_project(project_input("P", ProjectStatus::OnHold))
        .await
        .unwrap();
    let task = svc
        .tasks
        .create_task(&project.id, task_input("T", TaskStatus::InProgress))
        .await
        .unwrap();
    svc.tasks
        .add_milestone(&task.id, "Beta", day(2099, 1, 1))
        .await
        .unwrap();

    let views = svc.tasks.milestones_for_task(&task.id).await.unwrap();
    assert_eq!(views[0].status, MilestoneStatus::OnHold);
}

// =========================================================================
// Gantt feed
// =========================================================================

#[tokio::test]
async fn test_gantt_feed_wire_format() {
    let svc = create_test_services().await;
    let project = svc
        .projects
        .create_project(project_input("P", ProjectStatus::Active))
        .await
        .unwrap();

    let mut first = task_input("Design mockups", TaskStatus::Done);
    first.start_date = day(2025, 1, 1);
    first.end_date = day(2025, 2, 1);
    first.priority = Priority::High;
    let mockups = svc.tasks.create_task(&project.id, first).await.unwrap();

    let mut second = task_input("Frontend implementation", TaskStatus::InProgress);
    second.start_date = day(2025, 2, 2);
    second.end_date = day(2025, 4, 1);
    second.depends_on = vec![mockups.id.clone()];
    let implementation = svc.tasks.create_task(&project.id, second).await.unwrap();

    let bars = svc.projects.gantt_data(&project.id).await.unwrap();
    assert_eq!(bars.len(), 2);

    assert_eq!(bars[0].id, format!("task-{}", mockups.id));
    assert_eq!(bars[0].start, "2025-01-01");
    assert_eq!(bars[0].end, "2025-02-01");
    assert_eq!(bars[0].progress, 100);
    assert_eq!(bars[0].dependencies, "");
    assert_eq!(bars[0].custom_class, "status-done priority-high");

    assert_eq!(bars[1].id, format!("task-{}", implementation.id));
    assert_eq!(bars[1].progress, 50);
    assert_eq!(bars[1].dependencies, format!("task-{}", mockups.id));
    assert_eq!(bars[1].custom_class, "status-in_progress priority-medium");

    // Serialized field names are the chart's wire format
    let json = serde_json::to_value(&bars[1]).unwrap();
    assert!(json.get("custom_class").is_some());
    assert!(json.get("dependencies").is_some());
}

// =========================================================================
// Dashboard and workload
// =========================================================================

#[tokio::test]
async fn test_dashboard_summary() {
    let svc = create_test_services().await;
    let team = svc.people.create_team("The A-Team").await.unwrap();
    svc.people
        .create_person("Alice", None, Some(team.id.clone()))
        .await
        .unwrap();

    let active = svc
        .projects
        .create_project(project_input("Recent Project Alpha", ProjectStatus::Active))
        .await
        .unwrap();
    svc.projects
        .create_project(project_input("Done", ProjectStatus::Completed))
        .await
        .unwrap();

    let mut overdue = task_input("Overdue", TaskStatus::InProgress);
    overdue.end_date = day(2025, 3, 1);
    svc.tasks.create_task(&active.id, overdue).await.unwrap();
    svc.tasks
        .create_task(&active.id, task_input("Todo", TaskStatus::Todo))
        .await
        .unwrap();

    let summary = svc.dashboard.summary_as_of(day(2025, 6, 1)).await.unwrap();
    assert_eq!(summary.total_projects, 2);
    assert_eq!(summary.active_projects, 1);
    assert_eq!(summary.total_tasks, 2);
    assert_eq!(summary.todo_tasks, 1);
    assert_eq!(summary.in_progress_tasks, 1);
    assert_eq!(summary.done_tasks, 0);
    assert_eq!(summary.overdue_tasks, 1);
    assert_eq!(summary.total_people, 1);
    assert_eq!(summary.teams.len(), 1);
    assert_eq!(summary.teams[0].name, "The A-Team");
    // Most recent first, capped at five
    assert_eq!(summary.recent_projects[0].name, "Done");
}

#[tokio::test]
async fn test_person_workload_groups_by_project() {
    let svc = create_test_services().await;
    let person = svc.people.create_person("Alice", None, None).await.unwrap();

    let web = svc
        .projects
        .create_project(project_input("Web", ProjectStatus::Active))
        .await
        .unwrap();
    let app = svc
        .projects
        .create_project(project_input("App", ProjectStatus::Active))
        .await
        .unwrap();

    let t1 = svc
        .tasks
        .create_task(&web.id, task_input("Web Task 1", TaskStatus::Todo))
        .await
        .unwrap();
    let t2 = svc
        .tasks
        .create_task(&web.id, task_input("Web Task 2", TaskStatus::Todo))
        .await
        .unwrap();
    let t3 = svc
        .tasks
        .create_task(&app.id, task_input("App Task", TaskStatus::Todo))
        .await
        .unwrap();

    svc.tasks.assign_person(&t1.id, &person.id, true).await.unwrap();
    svc.tasks.assign_person(&t2.id, &person.id, false).await.unwrap();
    svc.tasks.assign_person(&t3.id, &person.id, false).await.unwrap();

    let workload = svc.people.person_workload(&person.id).await.unwrap();
    assert_eq!(workload.person.id, person.id);
    assert_eq!(workload.projects.len(), 2);
    let web_group = workload
        .projects
        .iter()
        .find(|g| g.project.id == web.id)
        .unwrap();
    assert_eq!(web_group.tasks.len(), 2);

    // Lead derivation via the detail view
    let detail = svc.tasks.task_detail(&t1.id).await.unwrap();
    assert_eq!(detail.lead().unwrap().id, person.id);
    let detail = svc.tasks.task_detail(&t2.id).await.unwrap();
    assert!(detail.lead().is_none());
}
