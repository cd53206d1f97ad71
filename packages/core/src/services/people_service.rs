//! People and Teams Service
//!
//! CRUD over teams and people, person search for @mention autocomplete,
//! and the per-person workload view (assigned tasks grouped by project).

use crate::db::TrackerStore;
use crate::models::{Person, Project, Task, Team};
use crate::services::{PersonDirectory, ServiceError};
use serde::Serialize;

/// Tasks a person is assigned to within one project
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTasks {
    pub project: Project,
    pub tasks: Vec<Task>,
}

/// A person's assigned tasks, grouped by project in order of first
/// appearance
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonWorkload {
    pub person: Person,
    pub projects: Vec<ProjectTasks>,
}

/// Service for team and person management
#[derive(Debug, Clone)]
pub struct PeopleService {
    store: TrackerStore,
}

impl PeopleService {
    /// Create a new PeopleService over a store
    pub fn new(store: TrackerStore) -> Self {
        Self { store }
    }

    // ------------------------------------------------------------------
    // Teams
    // ------------------------------------------------------------------

    /// Create a team
    pub async fn create_team(&self, name: impl Into<String>) -> Result<Team, ServiceError> {
        let team = Team::new(name);
        self.store.create_team(&team).await?;
        tracing::info!("Created team '{}' ({})", team.name, team.id);
        Ok(team)
    }

    /// Rename a team
    pub async fn rename_team(&self, id: &str, name: impl Into<String>) -> Result<Team, ServiceError> {
        let mut team = self
            .store
            .get_team(id)
            .await?
            .ok_or_else(|| ServiceError::team_not_found(id))?;
        team.name = name.into();
        self.store.update_team(&team).await?;
        Ok(team)
    }

    /// Delete a team; its members become unaffiliated
    pub async fn delete_team(&self, id: &str) -> Result<(), ServiceError> {
        let deleted = self.store.delete_team(id).await?;
        if deleted == 0 {
            return Err(ServiceError::team_not_found(id));
        }
        tracing::info!("Deleted team {}", id);
        Ok(())
    }

    /// All teams, ordered by name
    pub async fn list_teams(&self) -> Result<Vec<Team>, ServiceError> {
        Ok(self.store.list_teams().await?)
    }

    /// Members of a team, ordered by name
    pub async fn team_members(&self, team_id: &str) -> Result<Vec<Person>, ServiceError> {
        self.store
            .get_team(team_id)
            .await?
            .ok_or_else(|| ServiceError::team_not_found(team_id))?;
        Ok(self.store.people_for_team(team_id).await?)
    }

    // ------------------------------------------------------------------
    // People
    // ------------------------------------------------------------------

    /// Create a person
    pub async fn create_person(
        &self,
        name: impl Into<String>,
        email: Option<String>,
        team_id: Option<String>,
    ) -> Result<Person, ServiceError> {
        if let Some(team_id) = &team_id {
            self.store
                .get_team(team_id)
                .await?
                .ok_or_else(|| ServiceError::team_not_found(team_id))?;
        }
        let person = Person::new(name, email, team_id);
        self.store.create_person(&person).await?;
        tracing::info!("Created person '{}' ({})", person.name, person.id);
        Ok(person)
    }

    /// Update a person's name, email, and team
    pub async fn update_person(
        &self,
        id: &str,
        name: impl Into<String>,
        email: Option<String>,
        team_id: Option<String>,
    ) -> Result<Person, ServiceError> {
        let mut person = self.get_person(id).await?;
        if let Some(team_id) = &team_id {
            self.store
                .get_team(team_id)
                .await?
                .ok_or_else(|| ServiceError::team_not_found(team_id))?;
        }
        person.name = name.into();
        person.email = email;
        person.team_id = team_id;
        self.store.update_person(&person).await?;
        Ok(person)
    }

    /// Delete a person
    pub async fn delete_person(&self, id: &str) -> Result<(), ServiceError> {
        let deleted = self.store.delete_person(id).await?;
        if deleted == 0 {
            return Err(ServiceError::person_not_found(id));
        }
        tracing::info!("Deleted person {}", id);
        Ok(())
    }

    /// Fetch a person by id
    pub async fn get_person(&self, id: &str) -> Result<Person, ServiceError> {
        self.store
            .get_person(id)
            .await?
            .ok_or_else(|| ServiceError::person_not_found(id))
    }

    /// All people, ordered by name
    pub async fn list_people(&self) -> Result<Vec<Person>, ServiceError> {
        Ok(self.store.list_people().await?)
    }

    /// Case-insensitive substring search on name; an empty query returns
    /// everyone (the autocomplete shows the full roster on a bare `@`).
    pub async fn search_people(&self, query: &str) -> Result<Vec<Person>, ServiceError> {
        Ok(self.store.search_people(query.trim()).await?)
    }

    /// A person's assigned tasks grouped by project
    pub async fn person_workload(&self, id: &str) -> Result<PersonWorkload, ServiceError> {
        let person = self.get_person(id).await?;
        let tasks = self.store.tasks_for_person(id).await?;

        let mut projects: Vec<ProjectTasks> = Vec::new();
        for task in tasks {
            if let Some(group) = projects
                .iter_mut()
                .find(|group| group.project.id == task.project_id)
            {
                group.tasks.push(task);
                continue;
            }
            let project = self
                .store
                .get_project(&task.project_id)
                .await?
                .ok_or_else(|| ServiceError::project_not_found(&task.project_id))?;
            projects.push(ProjectTasks {
                project,
                tasks: vec![task],
            });
        }

        Ok(PersonWorkload { person, projects })
    }

    /// Build the mention-lookup directory from the current people table
    pub async fn directory(&self) -> Result<PersonDirectory, ServiceError> {
        let people = self.store.list_people().await?;
        Ok(PersonDirectory::from_people(&people))
    }
}
