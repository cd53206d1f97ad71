//! Populate the database with sample data for development and demos.
//!
//! Usage: `cargo run -p taskmaster-dev-tools --bin seed -- [--db path]`
//!
//! The database file is created if missing; seeding into a non-empty
//! database simply adds another copy of the sample data, so point this at
//! a fresh path for a clean fixture.

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use taskmaster_core::db::{DatabaseService, TrackerStore};
use taskmaster_core::models::{Priority, ProjectStatus, TaskStatus};
use taskmaster_core::services::{
    PeopleService, ProjectInput, ProjectService, TaskInput, TaskService,
};

#[derive(Parser)]
#[command(name = "seed", about = "Populate the Taskmaster database with sample data")]
struct Cli {
    /// Path to the database file
    #[arg(long, default_value = "data/taskmaster.db")]
    db: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let db = DatabaseService::new(cli.db).await?;
    let store = TrackerStore::new(Arc::new(db));
    let people = PeopleService::new(store.clone());
    let projects = ProjectService::new(store.clone());
    let tasks = TaskService::new(store);

    let today = Utc::now().date_naive();

    // --- Teams ---
    let engineering = people.create_team("Engineering").await?;
    let design = people.create_team("Design").await?;
    let marketing = people.create_team("Marketing").await?;

    // --- People ---
    let alice = people
        .create_person(
            "Alice Chen",
            Some("alice@example.com".into()),
            Some(engineering.id.clone()),
        )
        .await?;
    let bob = people
        .create_person(
            "Bob Martinez",
            Some("bob@example.com".into()),
            Some(engineering.id.clone()),
        )
        .await?;
    let carol = people
        .create_person(
            "Carol Johnson",
            Some("carol@example.com".into()),
            Some(design.id.clone()),
        )
        .await?;
    let dave = people
        .create_person(
            "Dave Kim",
            Some("dave@example.com".into()),
            Some(design.id.clone()),
        )
        .await?;
    let eve = people
        .create_person(
            "Eve Williams",
            Some("eve@example.com".into()),
            Some(marketing.id.clone()),
        )
        .await?;
    let frank = people
        .create_person(
            "Frank Lee",
            Some("frank@example.com".into()),
            Some(engineering.id.clone()),
        )
        .await?;

    let mut task_count = 0usize;

    // --- Project 1: Website Redesign ---
    let p1 = projects
        .create_project(ProjectInput {
            name: "Website Redesign".into(),
            description:
                "Complete overhaul of the company website with new branding and improved UX."
                    .into(),
            start_date: Some(today - Duration::days(30)),
            end_date: Some(today + Duration::days(60)),
            status: ProjectStatus::Active,
        })
        .await?;

    let mockups = tasks
        .create_task(
            &p1.id,
            TaskInput {
                title: "Design mockups".into(),
                description: "Create wireframes and high-fidelity mockups for all pages.".into(),
                start_date: today - Duration::days(30),
                end_date: today - Duration::days(15),
                status: TaskStatus::Done,
                priority: Priority::High,
                tags: vec!["design".into()],
                depends_on: vec![],
            },
        )
        .await?;
    let frontend = tasks
        .create_task(
            &p1.id,
            TaskInput {
                title: "Frontend implementation".into(),
                description: "Build components based on approved designs.".into(),
                start_date: today - Duration::days(14),
                end_date: today + Duration::days(20),
                status: TaskStatus::InProgress,
                priority: Priority::High,
                tags: vec!["frontend".into(), "v2".into()],
                depends_on: vec![mockups.id.clone()],
            },
        )
        .await?;
    let api = tasks
        .create_task(
            &p1.id,
            TaskInput {
                title: "Backend API".into(),
                description: "Build REST API endpoints for the new site.".into(),
                start_date: today - Duration::days(14),
                end_date: today + Duration::days(10),
                status: TaskStatus::InProgress,
                priority: Priority::High,
                tags: vec!["backend".into(), "v2".into()],
                depends_on: vec![],
            },
        )
        .await?;
    let migration = tasks
        .create_task(
            &p1.id,
            TaskInput {
                title: "Content migration".into(),
                description: "Migrate existing content to the new CMS structure.".into(),
                start_date: today + Duration::days(10),
                end_date: today + Duration::days(30),
                status: TaskStatus::Todo,
                priority: Priority::Medium,
                tags: vec!["frontend".into()],
                depends_on: vec![api.id.clone()],
            },
        )
        .await?;
    let qa = tasks
        .create_task(
            &p1.id,
            TaskInput {
                title: "QA testing".into(),
                description: "Full regression testing of the new website.".into(),
                start_date: today + Duration::days(25),
                end_date: today + Duration::days(45),
                status: TaskStatus::Todo,
                priority: Priority::High,
                tags: vec!["frontend".into(), "backend".into()],
                depends_on: vec![frontend.id.clone(), api.id.clone()],
            },
        )
        .await?;
    let launch = tasks
        .create_task(
            &p1.id,
            TaskInput {
                title: "Launch".into(),
                description: "Deploy to production and monitor.".into(),
                start_date: today + Duration::days(50),
                end_date: today + Duration::days(60),
                status: TaskStatus::Todo,
                priority: Priority::Critical,
                tags: vec!["infrastructure".into(), "urgent".into()],
                depends_on: vec![qa.id.clone()],
            },
        )
        .await?;
    task_count += 6;

    tasks.assign_person(&mockups.id, &carol.id, true).await?;
    tasks.assign_person(&frontend.id, &alice.id, true).await?;
    tasks.assign_person(&api.id, &bob.id, true).await?;
    tasks.assign_person(&migration.id, &eve.id, true).await?;
    tasks.assign_person(&qa.id, &frank.id, true).await?;
    tasks.assign_person(&launch.id, &alice.id, true).await?;
    tasks.assign_person(&launch.id, &frank.id, false).await?;

    tasks
        .add_status_update(
            &mockups.id,
            "Initial wireframes completed and shared for review.",
        )
        .await?;
    tasks
        .add_status_update(
            &mockups.id,
            r#"Mockups approved by stakeholders. @"Carol Johnson" handing off to @"Alice Chen"."#,
        )
        .await?;
    tasks
        .add_status_update(
            &frontend.id,
            "Set up project scaffolding and the component library.",
        )
        .await?;
    tasks
        .add_status_update(
            &frontend.id,
            "Homepage and about page components done. Style guide at \
             https://example.com/docs/style-guide.pdf",
        )
        .await?;
    tasks
        .add_status_update(
            &api.id,
            "Database schema finalized. Building auth endpoints.",
        )
        .await?;

    tasks
        .add_milestone(&launch.id, "Go-live", today + Duration::days(60))
        .await?;

    // --- Project 2: Mobile App v2 ---
    let p2 = projects
        .create_project(ProjectInput {
            name: "Mobile App v2".into(),
            description: "Major update to the mobile app with offline support and new navigation."
                .into(),
            start_date: Some(today - Duration::days(10)),
            end_date: Some(today + Duration::days(90)),
            status: ProjectStatus::Active,
        })
        .await?;

    let research = tasks
        .create_task(
            &p2.id,
            TaskInput {
                title: "UX research".into(),
                description: "User interviews and competitor analysis.".into(),
                start_date: today - Duration::days(10),
                end_date: today + Duration::days(5),
                status: TaskStatus::InProgress,
                priority: Priority::Medium,
                tags: vec!["design".into()],
                depends_on: vec![],
            },
        )
        .await?;
    let architecture = tasks
        .create_task(
            &p2.id,
            TaskInput {
                title: "App architecture planning".into(),
                description: "Plan the new offline-first architecture.".into(),
                start_date: today - Duration::days(5),
                end_date: today + Duration::days(10),
                status: TaskStatus::InProgress,
                priority: Priority::High,
                tags: vec!["backend".into(), "infrastructure".into()],
                depends_on: vec![],
            },
        )
        .await?;
    let sync_engine = tasks
        .create_task(
            &p2.id,
            TaskInput {
                title: "Offline sync engine".into(),
                description: "Build the offline data sync layer.".into(),
                start_date: today + Duration::days(10),
                end_date: today + Duration::days(50),
                status: TaskStatus::Todo,
                priority: Priority::Critical,
                tags: vec!["backend".into(), "urgent".into()],
                depends_on: vec![architecture.id.clone()],
            },
        )
        .await?;
    let navigation = tasks
        .create_task(
            &p2.id,
            TaskInput {
                title: "New navigation UI".into(),
                description: "Implement the redesigned navigation flow.".into(),
                start_date: today + Duration::days(15),
                end_date: today + Duration::days(45),
                status: TaskStatus::Todo,
                priority: Priority::High,
                tags: vec!["frontend".into(), "v2".into()],
                depends_on: vec![research.id.clone()],
            },
        )
        .await?;
    let beta = tasks
        .create_task(
            &p2.id,
            TaskInput {
                title: "Beta testing".into(),
                description: "Distribute beta builds and collect feedback.".into(),
                start_date: today + Duration::days(55),
                end_date: today + Duration::days(80),
                status: TaskStatus::Todo,
                priority: Priority::Medium,
                tags: vec!["v2".into()],
                depends_on: vec![sync_engine.id.clone(), navigation.id.clone()],
            },
        )
        .await?;
    task_count += 5;

    tasks.assign_person(&research.id, &dave.id, true).await?;
    tasks.assign_person(&architecture.id, &bob.id, true).await?;
    tasks.assign_person(&sync_engine.id, &frank.id, true).await?;
    tasks.assign_person(&navigation.id, &alice.id, true).await?;
    tasks.assign_person(&beta.id, &eve.id, true).await?;

    tasks
        .add_status_update(
            &research.id,
            "Completed 5 user interviews. Synthesizing findings.",
        )
        .await?;
    tasks
        .add_status_update(
            &architecture.id,
            r#"Evaluated CRDTs vs operational transforms with @"Frank Lee". Leaning towards CRDTs."#,
        )
        .await?;

    tasks
        .add_milestone(&beta.id, "Beta cut", today + Duration::days(55))
        .await?;

    // --- Project 3: Q1 Marketing Campaign ---
    let p3 = projects
        .create_project(ProjectInput {
            name: "Q1 Marketing Campaign".into(),
            description: "Multi-channel marketing campaign for the product launch.".into(),
            start_date: Some(today - Duration::days(45)),
            end_date: Some(today - Duration::days(5)),
            status: ProjectStatus::Completed,
        })
        .await?;

    let strategy = tasks
        .create_task(
            &p3.id,
            TaskInput {
                title: "Campaign strategy".into(),
                description: "Define target audience, channels, and messaging.".into(),
                start_date: today - Duration::days(45),
                end_date: today - Duration::days(35),
                status: TaskStatus::Done,
                priority: Priority::High,
                tags: vec![],
                depends_on: vec![],
            },
        )
        .await?;
    let assets = tasks
        .create_task(
            &p3.id,
            TaskInput {
                title: "Creative assets".into(),
                description: "Design banners, social media graphics, and email templates.".into(),
                start_date: today - Duration::days(34),
                end_date: today - Duration::days(20),
                status: TaskStatus::Done,
                priority: Priority::Medium,
                tags: vec!["design".into()],
                depends_on: vec![strategy.id.clone()],
            },
        )
        .await?;
    let execution = tasks
        .create_task(
            &p3.id,
            TaskInput {
                title: "Campaign execution".into(),
                description: "Launch ads, send emails, post on social media.".into(),
                start_date: today - Duration::days(19),
                end_date: today - Duration::days(5),
                status: TaskStatus::Done,
                priority: Priority::High,
                tags: vec!["urgent".into()],
                depends_on: vec![assets.id.clone()],
            },
        )
        .await?;
    task_count += 3;

    tasks.assign_person(&strategy.id, &eve.id, true).await?;
    tasks.assign_person(&assets.id, &carol.id, true).await?;
    tasks.assign_person(&execution.id, &eve.id, true).await?;

    tasks
        .add_status_update(&strategy.id, "Strategy approved by leadership.")
        .await?;
    tasks
        .add_status_update(
            &execution.id,
            "Campaign complete. 23% increase in signups vs last quarter.",
        )
        .await?;

    // --- Project 4: Infrastructure Upgrade ---
    let p4 = projects
        .create_project(ProjectInput {
            name: "Infrastructure Upgrade".into(),
            description: "Migrate from legacy infrastructure to Kubernetes with improved CI/CD."
                .into(),
            start_date: Some(today - Duration::days(5)),
            end_date: Some(today + Duration::days(45)),
            status: ProjectStatus::Active,
        })
        .await?;

    let cluster = tasks
        .create_task(
            &p4.id,
            TaskInput {
                title: "K8s cluster setup".into(),
                description: "Provision and configure the Kubernetes cluster.".into(),
                start_date: today - Duration::days(5),
                end_date: today + Duration::days(10),
                status: TaskStatus::InProgress,
                priority: Priority::Critical,
                tags: vec!["infrastructure".into(), "urgent".into()],
                depends_on: vec![],
            },
        )
        .await?;
    let pipeline = tasks
        .create_task(
            &p4.id,
            TaskInput {
                title: "CI/CD pipeline".into(),
                description: "Set up automated build and deployment pipelines.".into(),
                start_date: today + Duration::days(5),
                end_date: today + Duration::days(25),
                status: TaskStatus::Todo,
                priority: Priority::High,
                tags: vec!["infrastructure".into()],
                depends_on: vec![cluster.id.clone()],
            },
        )
        .await?;
    let services_migration = tasks
        .create_task(
            &p4.id,
            TaskInput {
                title: "Service migration".into(),
                description: "Migrate services one-by-one to the new infrastructure.".into(),
                start_date: today + Duration::days(20),
                end_date: today + Duration::days(40),
                status: TaskStatus::Todo,
                priority: Priority::High,
                tags: vec!["infrastructure".into(), "backend".into()],
                depends_on: vec![pipeline.id.clone()],
            },
        )
        .await?;
    let monitoring = tasks
        .create_task(
            &p4.id,
            TaskInput {
                title: "Monitoring setup".into(),
                description: "Set up metrics dashboards and alerting.".into(),
                start_date: today + Duration::days(10),
                end_date: today + Duration::days(20),
                status: TaskStatus::Todo,
                priority: Priority::Medium,
                tags: vec!["infrastructure".into()],
                depends_on: vec![cluster.id.clone()],
            },
        )
        .await?;
    task_count += 4;

    tasks.assign_person(&cluster.id, &frank.id, true).await?;
    tasks.assign_person(&pipeline.id, &bob.id, true).await?;
    tasks
        .assign_person(&services_migration.id, &alice.id, true)
        .await?;
    tasks.assign_person(&monitoring.id, &frank.id, true).await?;

    tasks
        .add_status_update(
            &cluster.id,
            "Node pool provisioned. Configuring networking and RBAC. Runbook: \
             https://example.com/runbooks/k8s-setup.md",
        )
        .await?;

    println!("Seed data created successfully!");
    println!("  Teams: 3");
    println!("  People: 6");
    println!("  Projects: 4");
    println!("  Tasks: {}", task_count);
    println!("  Tags: 6");
    Ok(())
}
