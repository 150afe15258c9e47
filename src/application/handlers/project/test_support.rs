//! Shared in-memory mocks for project handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, ProjectId, Timestamp, UserId};
use crate::domain::project::{
    InvitationCode, MemberStatus, NewProject, Project, ProjectSettings, ProjectStatus,
    TaskMetadata,
};
use crate::ports::{ListOptions, ProjectList, ProjectReader, ProjectRepository, ProjectSummary};

pub fn test_user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub fn test_code(code: &str) -> InvitationCode {
    InvitationCode::try_new(code).unwrap()
}

/// A fresh project created by `creator` with default settings.
pub fn test_project(creator: &str, code: &str) -> Project {
    Project::create(
        NewProject {
            name: "Test Project".to_string(),
            description: None,
            settings: ProjectSettings::default(),
            metadata: TaskMetadata::default(),
        },
        test_user(creator),
        test_code(code),
        Timestamp::now(),
    )
    .unwrap()
}

/// In-memory repository with version enforcement, code uniqueness, and
/// fault injection for duplicate-code and version-conflict paths.
pub struct InMemoryProjectRepository {
    store: Mutex<HashMap<ProjectId, Project>>,
    taken_codes: Mutex<Vec<String>>,
    duplicate_inserts: Mutex<u32>,
    conflict_updates: Mutex<u32>,
    fail_all: bool,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(HashMap::new()),
            taken_codes: Mutex::new(Vec::new()),
            duplicate_inserts: Mutex::new(0),
            conflict_updates: Mutex::new(0),
            fail_all: false,
        }
    }

    pub fn with_project(project: Project) -> Self {
        let repo = Self::new();
        repo.store.lock().unwrap().insert(project.id, project);
        repo
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::new()
        }
    }

    /// The next `count` inserts fail as duplicate-code conflicts.
    pub fn reject_inserts_as_duplicate(&self, count: u32) {
        *self.duplicate_inserts.lock().unwrap() = count;
    }

    /// The next `count` updates fail as version conflicts, simulating a
    /// concurrent writer landing between load and write.
    pub fn inject_conflicts(&self, count: u32) {
        *self.conflict_updates.lock().unwrap() = count;
    }

    /// Place a project directly into the store, bypassing insert checks.
    pub fn seed(&self, project: Project) {
        self.store.lock().unwrap().insert(project.id, project);
    }

    pub fn get(&self, id: &ProjectId) -> Option<Project> {
        self.store.lock().unwrap().get(id).cloned()
    }

    pub fn stored_count(&self) -> usize {
        self.store.lock().unwrap().len()
    }
}

impl Default for InMemoryProjectRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicate_code_error(code: &str) -> DomainError {
    DomainError::new(
        ErrorCode::DuplicateInvitationCode,
        "invitation code already in use",
    )
    .with_detail("code", code)
}

fn version_conflict_error(expected: u64) -> DomainError {
    DomainError::new(ErrorCode::VersionConflict, "stale project version")
        .with_detail("expected_version", expected.to_string())
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn insert(&self, project: &Project) -> Result<(), DomainError> {
        if self.fail_all {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "simulated insert failure",
            ));
        }
        {
            let mut remaining = self.duplicate_inserts.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(duplicate_code_error(project.invitation_code.as_str()));
            }
        }
        let mut store = self.store.lock().unwrap();
        let code_taken = store
            .values()
            .any(|p| p.invitation_code == project.invitation_code)
            || self
                .taken_codes
                .lock()
                .unwrap()
                .iter()
                .any(|c| c == project.invitation_code.as_str());
        if code_taken {
            return Err(duplicate_code_error(project.invitation_code.as_str()));
        }
        store.insert(project.id, project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project, expected_version: u64) -> Result<(), DomainError> {
        if self.fail_all {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "simulated update failure",
            ));
        }
        {
            let mut remaining = self.conflict_updates.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(version_conflict_error(expected_version));
            }
        }
        let mut store = self.store.lock().unwrap();
        let stored = store
            .get(&project.id)
            .ok_or_else(|| DomainError::new(ErrorCode::ProjectNotFound, "project not found"))?;
        if stored.version != expected_version {
            return Err(version_conflict_error(expected_version));
        }
        let mut next = project.clone();
        next.version = expected_version + 1;
        store.insert(next.id, next);
        Ok(())
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        if self.fail_all {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "simulated read failure",
            ));
        }
        Ok(self.store.lock().unwrap().get(id).cloned())
    }

    async fn find_by_code(
        &self,
        code: &InvitationCode,
    ) -> Result<Option<Project>, DomainError> {
        if self.fail_all {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "simulated read failure",
            ));
        }
        Ok(self
            .store
            .lock()
            .unwrap()
            .values()
            .find(|p| &p.invitation_code == code && p.status != ProjectStatus::Deleted)
            .cloned())
    }
}

/// Reader mock that derives summaries from a fixed set of projects.
pub struct StubProjectReader {
    projects: Vec<Project>,
}

impl StubProjectReader {
    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub fn empty() -> Self {
        Self {
            projects: Vec::new(),
        }
    }
}

#[async_trait]
impl ProjectReader for StubProjectReader {
    async fn list_for_user(
        &self,
        user_id: &UserId,
        options: &ListOptions,
    ) -> Result<ProjectList, DomainError> {
        let mut matching: Vec<ProjectSummary> = self
            .projects
            .iter()
            .filter(|p| p.status != ProjectStatus::Deleted)
            .filter_map(|p| {
                let member = p
                    .members()
                    .iter()
                    .find(|m| m.is_user(user_id) && m.status != MemberStatus::Removed)?;
                Some(ProjectSummary {
                    id: p.id,
                    name: p.name.clone(),
                    description: p.description.clone(),
                    status: p.status,
                    role: member.role,
                    member_count: p
                        .members()
                        .iter()
                        .filter(|m| m.counts_toward_limit())
                        .count() as u32,
                    progress: p.progress().value(),
                    created_at: p.created_at,
                    updated_at: p.updated_at,
                })
            })
            .filter(|s| options.status.map_or(true, |status| s.status == status))
            .filter(|s| options.role.map_or(true, |role| s.role == role))
            .filter(|s| {
                options.search.as_deref().map_or(true, |term| {
                    s.name.to_lowercase().contains(&term.to_lowercase())
                })
            })
            .collect();
        matching.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let total = matching.len() as u64;
        let offset = options.offset.unwrap_or(0) as usize;
        let limit = options.limit.unwrap_or(u32::MAX) as usize;
        let items: Vec<ProjectSummary> = matching.into_iter().skip(offset).take(limit).collect();
        let has_more = offset + items.len() < total as usize;

        Ok(ProjectList {
            items,
            total,
            has_more,
        })
    }
}
