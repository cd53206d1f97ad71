//! Integration tests for TrackerStore
//!
//! Tests cover:
//! - Entity CRUD round trips through a real libsql database
//! - Association tables (tags, dependencies, mentions)
//! - Name lookup and search semantics
//! - Dashboard count queries

use chrono::NaiveDate;
use std::sync::Arc;
use taskmaster_core::db::{DatabaseService, TaskFilter, TrackerStore};
use taskmaster_core::models::{
    Milestone, MilestoneStatus, Person, Priority, Project, ProjectStatus, StatusUpdate, Task,
    TaskStatus, Team,
};
use tempfile::TempDir;

/// Helper to create a store over a fresh temp database.
/// The TempDir must be kept alive for the test duration.
async fn create_test_store() -> (TrackerStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = DatabaseService::new(db_path).await.unwrap();
    (TrackerStore::new(Arc::new(db)), temp_dir)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_project() -> Project {
    Project::new(
        "Website Redesign",
        "Overhaul of the company website",
        Some(day(2025, 1, 1)),
        Some(day(2025, 12, 31)),
        ProjectStatus::Active,
    )
}

fn sample_task(project_id: &str) -> Task {
    Task::new(
        "Design mockups",
        "Wireframes and high-fidelity mockups",
        project_id,
        day(2025, 1, 1),
        day(2025, 6, 30),
        TaskStatus::Todo,
        Priority::Medium,
    )
}

// =========================================================================
// Teams and people
// =========================================================================

#[tokio::test]
async fn test_team_crud_round_trip() {
    let (store, _dir) = create_test_store().await;

    let mut team = Team::new("Engineering");
    store.create_team(&team).await.unwrap();

    let fetched = store.get_team(&team.id).await.unwrap().unwrap();
    assert_eq!(fetched, team);

    team.name = "Platform Engineering".to_string();
    assert_eq!(store.update_team(&team).await.unwrap(), 1);
    let fetched = store.get_team(&team.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Platform Engineering");

    assert_eq!(store.delete_team(&team.id).await.unwrap(), 1);
    assert!(store.get_team(&team.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_deleting_team_unaffiliates_members() {
    let (store, _dir) = create_test_store().await;

    let team = Team::new("Design");
    store.create_team(&team).await.unwrap();
    let person = Person::new("Carol Johnson", None, Some(team.id.clone()));
    store.create_person(&person).await.unwrap();

    store.delete_team(&team.id).await.unwrap();

    let fetched = store.get_person(&person.id).await.unwrap().unwrap();
    assert_eq!(fetched.team_id, None);
}

#[tokio::test]
async fn test_people_are_listed_by_name() {
    let (store, _dir) = create_test_store().await;

    for name in ["Carol", "Alice", "Bob"] {
        store
            .create_person(&Person::new(name, None, None))
            .await
            .unwrap();
    }

    let people = store.list_people().await.unwrap();
    let names: Vec<&str> = people.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
}

#[tokio::test]
async fn test_find_person_by_name_is_case_insensitive_exact() {
    let (store, _dir) = create_test_store().await;

    let person = Person::new("Jane Smith", Some("jane@example.com".into()), None);
    store.create_person(&person).await.unwrap();

    let found = store.find_person_by_name("jane smith").await.unwrap();
    assert_eq!(found.unwrap().id, person.id);

    assert!(store.find_person_by_name("Jane").await.unwrap().is_none());
    assert!(store
        .find_person_by_name("Jane Smithson")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_search_people_matches_substring() {
    let (store, _dir) = create_test_store().await;

    store
        .create_person(&Person::new("Alice Chen", None, None))
        .await
        .unwrap();
    store
        .create_person(&Person::new("Bob Martinez", None, None))
        .await
        .unwrap();

    let hits = store.search_people("ali").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Alice Chen");

    let all = store.search_people("").await.unwrap();
    assert_eq!(all.len(), 2);
}

// =========================================================================
// Projects and tasks
// =========================================================================

#[tokio::test]
async fn test_project_crud_round_trip() {
    let (store, _dir) = create_test_store().await;

    let mut project = sample_project();
    store.create_project(&project).await.unwrap();

    let fetched = store.get_project(&project.id).await.unwrap().unwrap();
    assert_eq!(fetched, project);

    project.status = ProjectStatus::Completed;
    project.end_date = None;
    store.update_project(&project).await.unwrap();
    let fetched = store.get_project(&project.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, ProjectStatus::Completed);
    assert_eq!(fetched.end_date, None);
}

#[tokio::test]
async fn test_list_projects_filters_by_status() {
    let (store, _dir) = create_test_store().await;

    let mut active = sample_project();
    active.name = "Active One".to_string();
    store.create_project(&active).await.unwrap();

    let mut done = sample_project();
    done.name = "Done One".to_string();
    done.status = ProjectStatus::Completed;
    store.create_project(&done).await.unwrap();

    let only_active = store
        .list_projects(Some(ProjectStatus::Active))
        .await
        .unwrap();
    assert_eq!(only_active.len(), 1);
    assert_eq!(only_active[0].name, "Active One");

    let all = store.list_projects(None).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_recent_projects_newest_first() {
    let (store, _dir) = create_test_store().await;

    for i in 1..=7 {
        let mut project = sample_project();
        project.name = format!("Project {}", i);
        store.create_project(&project).await.unwrap();
    }

    let recent = store.recent_projects(5).await.unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].name, "Project 7");
    assert_eq!(recent[4].name, "Project 3");
}

#[tokio::test]
async fn test_task_crud_round_trip() {
    let (store, _dir) = create_test_store().await;

    let project = sample_project();
    store.create_project(&project).await.unwrap();

    let mut task = sample_task(&project.id);
    store.create_task(&task).await.unwrap();

    let fetched = store.get_task(&task.id).await.unwrap().unwrap();
    assert_eq!(fetched, task);

    task.status = TaskStatus::InProgress;
    task.priority = Priority::Critical;
    store.update_task(&task).await.unwrap();
    let fetched = store.get_task(&task.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, TaskStatus::InProgress);
    assert_eq!(fetched.priority, Priority::Critical);

    assert_eq!(store.delete_task(&task.id).await.unwrap(), 1);
    assert!(store.get_task(&task.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_deleting_project_cascades_to_tasks() {
    let (store, _dir) = create_test_store().await;

    let project = sample_project();
    store.create_project(&project).await.unwrap();
    let task = sample_task(&project.id);
    store.create_task(&task).await.unwrap();

    store.delete_project(&project.id).await.unwrap();
    assert!(store.get_task(&task.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_tasks_status_and_overdue_filters() {
    let (store, _dir) = create_test_store().await;

    let project = sample_project();
    store.create_project(&project).await.unwrap();

    let mut overdue = sample_task(&project.id);
    overdue.title = "Overdue Task".to_string();
    overdue.status = TaskStatus::InProgress;
    overdue.end_date = day(2025, 3, 1);
    store.create_task(&overdue).await.unwrap();

    let mut done_past = sample_task(&project.id);
    done_past.title = "Done Past".to_string();
    done_past.status = TaskStatus::Done;
    done_past.end_date = day(2025, 3, 1);
    store.create_task(&done_past).await.unwrap();

    let mut future = sample_task(&project.id);
    future.title = "Future Task".to_string();
    future.end_date = day(2025, 12, 1);
    store.create_task(&future).await.unwrap();

    let in_progress = store
        .list_tasks(&TaskFilter {
            status: Some(TaskStatus::InProgress),
            ..TaskFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(in_progress.len(), 1);
    assert_eq!(in_progress[0].title, "Overdue Task");

    // Overdue as of June 1: past end date and not done
    let overdue_tasks = store
        .list_tasks(&TaskFilter {
            overdue_as_of: Some(day(2025, 6, 1)),
            ..TaskFilter::default()
        })
        .await
        .unwrap();
    let titles: Vec<&str> = overdue_tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Overdue Task"]);
}

// =========================================================================
// Tags and dependencies
// =========================================================================

#[tokio::test]
async fn test_find_or_create_tag_is_idempotent() {
    let (store, _dir) = create_test_store().await;

    let first = store.find_or_create_tag("backend").await.unwrap();
    let second = store.find_or_create_tag("backend").await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(store.all_tags().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_set_task_tags_replaces_wholesale() {
    let (store, _dir) = create_test_store().await;

    let project = sample_project();
    store.create_project(&project).await.unwrap();
    let task = sample_task(&project.id);
    store.create_task(&task).await.unwrap();

    let frontend = store.find_or_create_tag("frontend").await.unwrap();
    let urgent = store.find_or_create_tag("urgent").await.unwrap();
    store
        .set_task_tags(&task.id, &[frontend.id.clone(), urgent.id.clone()])
        .await
        .unwrap();
    assert_eq!(store.tags_for_task(&task.id).await.unwrap().len(), 2);

    store
        .set_task_tags(&task.id, &[urgent.id.clone()])
        .await
        .unwrap();
    let tags = store.tags_for_task(&task.id).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "urgent");
}

#[tokio::test]
async fn test_dependencies_traverse_both_directions() {
    let (store, _dir) = create_test_store().await;

    let project = sample_project();
    store.create_project(&project).await.unwrap();
    let mockups = sample_task(&project.id);
    store.create_task(&mockups).await.unwrap();
    let mut implementation = sample_task(&project.id);
    implementation.title = "Frontend implementation".to_string();
    store.create_task(&implementation).await.unwrap();

    store
        .replace_dependencies(&implementation.id, &[mockups.id.clone()])
        .await
        .unwrap();

    let deps = store.dependencies_for_task(&implementation.id).await.unwrap();
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].id, mockups.id);

    let dependents = store.dependents_for_task(&mockups.id).await.unwrap();
    assert_eq!(dependents.len(), 1);
    assert_eq!(dependents[0].id, implementation.id);

    assert_eq!(
        store.dependency_ids_for_task(&implementation.id).await.unwrap(),
        vec![mockups.id.clone()]
    );

    // Replacing with an empty set clears the edges
    store
        .replace_dependencies(&implementation.id, &[])
        .await
        .unwrap();
    assert!(store
        .dependencies_for_task(&implementation.id)
        .await
        .unwrap()
        .is_empty());
}

// =========================================================================
// Status updates, mentions, milestones
// =========================================================================

#[tokio::test]
async fn test_status_updates_newest_first() {
    let (store, _dir) = create_test_store().await;

    let project = sample_project();
    store.create_project(&project).await.unwrap();
    let task = sample_task(&project.id);
    store.create_task(&task).await.unwrap();

    for content in ["first", "second", "third"] {
        store
            .create_status_update(&StatusUpdate::new(&task.id, content))
            .await
            .unwrap();
    }

    let updates = store.status_updates_for_task(&task.id).await.unwrap();
    let bodies: Vec<&str> = updates.iter().map(|u| u.content.as_str()).collect();
    assert_eq!(bodies, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_mention_links_are_idempotent() {
    let (store, _dir) = create_test_store().await;

    let project = sample_project();
    store.create_project(&project).await.unwrap();
    let task = sample_task(&project.id);
    store.create_task(&task).await.unwrap();
    let person = Person::new("Jane Smith", None, None);
    store.create_person(&person).await.unwrap();

    let update = StatusUpdate::new(&task.id, r#"@"Jane Smith" reviewed this"#);
    store.create_status_update(&update).await.unwrap();

    store.add_mention(&update.id, &person.id).await.unwrap();
    store.add_mention(&update.id, &person.id).await.unwrap();

    let mentions = store.mentions_for_update(&update.id).await.unwrap();
    assert_eq!(mentions.len(), 1);
    assert_eq!(mentions[0].id, person.id);
}

#[tokio::test]
async fn test_milestone_round_trip_with_override() {
    let (store, _dir) = create_test_store().await;

    let project = sample_project();
    store.create_project(&project).await.unwrap();
    let task = sample_task(&project.id);
    store.create_task(&task).await.unwrap();

    let mut milestone = Milestone::new(&task.id, "Beta", day(2025, 6, 1), None);
    store.create_milestone(&milestone).await.unwrap();

    let fetched = store.get_milestone(&milestone.id).await.unwrap().unwrap();
    assert_eq!(fetched, milestone);

    milestone.status_override = Some(MilestoneStatus::OnHold);
    milestone.date = day(2025, 7, 1);
    store.update_milestone(&milestone).await.unwrap();
    let fetched = store.get_milestone(&milestone.id).await.unwrap().unwrap();
    assert_eq!(fetched.status_override, Some(MilestoneStatus::OnHold));
    assert_eq!(fetched.date, day(2025, 7, 1));

    assert_eq!(store.delete_milestone(&milestone.id).await.unwrap(), 1);
    assert!(store.get_milestone(&milestone.id).await.unwrap().is_none());
}

// =========================================================================
// Dashboard counts
// =========================================================================

#[tokio::test]
async fn test_dashboard_counts() {
    let (store, _dir) = create_test_store().await;

    let active = sample_project();
    store.create_project(&active).await.unwrap();
    let mut completed = sample_project();
    completed.status = ProjectStatus::Completed;
    store.create_project(&completed).await.unwrap();

    let mut todo = sample_task(&active.id);
    todo.end_date = day(2025, 3, 1);
    store.create_task(&todo).await.unwrap();
    let mut done = sample_task(&active.id);
    done.status = TaskStatus::Done;
    store.create_task(&done).await.unwrap();

    store
        .create_person(&Person::new("Alice", None, None))
        .await
        .unwrap();

    assert_eq!(store.count_projects(None).await.unwrap(), 2);
    assert_eq!(
        store
            .count_projects(Some(ProjectStatus::Active))
            .await
            .unwrap(),
        1
    );
    assert_eq!(store.count_tasks(None).await.unwrap(), 2);
    assert_eq!(
        store.count_tasks(Some(TaskStatus::Done)).await.unwrap(),
        1
    );
    assert_eq!(store.count_overdue_tasks(day(2025, 6, 1)).await.unwrap(), 1);
    assert_eq!(store.count_people().await.unwrap(), 1);
}
