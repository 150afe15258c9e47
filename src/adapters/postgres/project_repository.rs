//! PostgreSQL implementation of ProjectRepository.
//!
//! Provides persistent storage for Project aggregates using PostgreSQL.
//! The roster, settings, and task counters are stored as JSONB alongside
//! the scalar columns; the invitation code carries a unique constraint and
//! the version column backs the conditional update.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, ProjectId, Timestamp, UserId};
use crate::domain::project::{
    InvitationCode, Member, Project, ProjectSettings, ProjectStatus, TaskMetadata,
};
use crate::ports::ProjectRepository;

/// PostgreSQL implementation of the ProjectRepository port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// Creates a new PostgresProjectRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a project.
#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_by: String,
    invitation_code: String,
    status: String,
    settings: serde_json::Value,
    metadata: serde_json::Value,
    members: serde_json::Value,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = DomainError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let status = parse_status(&row.status)?;
        let settings: ProjectSettings = serde_json::from_value(row.settings).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid settings payload: {}", e),
            )
        })?;
        let metadata: TaskMetadata = serde_json::from_value(row.metadata).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid metadata payload: {}", e),
            )
        })?;
        let members: Vec<Member> = serde_json::from_value(row.members).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid members payload: {}", e),
            )
        })?;

        Ok(Project {
            id: ProjectId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            created_by: UserId::new(row.created_by).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid created_by: {}", e))
            })?,
            invitation_code: InvitationCode::try_new(&row.invitation_code).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid invitation_code: {}", e),
                )
            })?,
            status,
            settings,
            metadata,
            members,
            version: row.version as u64,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_status(s: &str) -> Result<ProjectStatus, DomainError> {
    match s {
        "active" => Ok(ProjectStatus::Active),
        "archived" => Ok(ProjectStatus::Archived),
        "deleted" => Ok(ProjectStatus::Deleted),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )),
    }
}

fn members_to_json(members: &[Member]) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(members).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to serialize members: {}", e),
        )
    })
}

fn settings_to_json(settings: &ProjectSettings) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(settings).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to serialize settings: {}", e),
        )
    })
}

fn metadata_to_json(metadata: &TaskMetadata) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(metadata).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to serialize metadata: {}", e),
        )
    })
}

fn duplicate_code_error(code: &InvitationCode) -> DomainError {
    DomainError::new(
        ErrorCode::DuplicateInvitationCode,
        "Invitation code already in use",
    )
    .with_detail("code", code.as_str())
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, description, created_by, invitation_code, status,
           settings, metadata, members, version, created_at, updated_at
    FROM projects
"#;

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn insert(&self, project: &Project) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO projects (
                id, name, description, created_by, invitation_code, status,
                settings, metadata, members, version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(project.id.as_uuid())
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.created_by.as_str())
        .bind(project.invitation_code.as_str())
        .bind(project.status.as_str())
        .bind(settings_to_json(&project.settings)?)
        .bind(metadata_to_json(&project.metadata)?)
        .bind(members_to_json(&project.members)?)
        .bind(project.version as i64)
        .bind(project.created_at.as_datetime())
        .bind(project.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("projects_invitation_code_key") {
                    return duplicate_code_error(&project.invitation_code);
                }
            }
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert project: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, project: &Project, expected_version: u64) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE projects SET
                name = $3,
                description = $4,
                status = $5,
                settings = $6,
                metadata = $7,
                members = $8,
                updated_at = $9,
                version = $2 + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(project.id.as_uuid())
        .bind(expected_version as i64)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status.as_str())
        .bind(settings_to_json(&project.settings)?)
        .bind(metadata_to_json(&project.metadata)?)
        .bind(members_to_json(&project.members)?)
        .bind(project.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update project: {}", e),
            )
        })?;

        // Zero rows means the row is gone or the version moved; either way
        // the caller must reload before retrying.
        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::VersionConflict,
                "Project was modified concurrently",
            )
            .with_detail("expected_version", expected_version.to_string()));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        let row: Option<ProjectRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find project: {}", e),
                    )
                })?;

        row.map(Project::try_from).transpose()
    }

    async fn find_by_code(&self, code: &InvitationCode) -> Result<Option<Project>, DomainError> {
        let row: Option<ProjectRow> = sqlx::query_as(&format!(
            "{} WHERE invitation_code = $1 AND status != 'deleted'",
            SELECT_COLUMNS
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find project by code: {}", e),
            )
        })?;

        row.map(Project::try_from).transpose()
    }
}
