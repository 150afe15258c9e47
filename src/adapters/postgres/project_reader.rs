//! PostgreSQL implementation of ProjectReader.
//!
//! Provides read-optimized queries for project listings. The caller's
//! membership is resolved by unnesting the JSONB roster; only bound,
//! non-removed records count as membership.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, ProjectId, Timestamp, UserId};
use crate::domain::project::{MemberRole, ProjectStatus, TaskMetadata};
use crate::ports::{ListOptions, ProjectList, ProjectReader, ProjectSort, ProjectSummary};

/// PostgreSQL implementation of ProjectReader.
#[derive(Clone)]
pub struct PostgresProjectReader {
    pool: PgPool,
}

impl PostgresProjectReader {
    /// Creates a new PostgresProjectReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Helper to count matching projects with options applied.
    async fn count_for_user(
        &self,
        user_id: &UserId,
        options: &ListOptions,
    ) -> Result<u64, DomainError> {
        let mut query = String::from(
            r#"
            SELECT COUNT(*)
            FROM projects p
            CROSS JOIN LATERAL jsonb_array_elements(p.members) AS m(record)
            WHERE p.status != 'deleted'
              AND m.record->>'status' != 'removed'
              AND m.record->'identity'->>'kind' = 'bound_by_user'
              AND m.record->'identity'->>'user_id' = $1
            "#,
        );
        push_filters(&mut query, options);

        let mut sql = sqlx::query_as(&query).bind(user_id.as_str());
        if options.search.is_some() {
            sql = sql.bind(search_pattern(options));
        }
        let result: (i64,) = sql.fetch_one(&self.pool).await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to count projects: {}", e),
            )
        })?;

        Ok(result.0 as u64)
    }
}

#[async_trait]
impl ProjectReader for PostgresProjectReader {
    async fn list_for_user(
        &self,
        user_id: &UserId,
        options: &ListOptions,
    ) -> Result<ProjectList, DomainError> {
        // Build the base query
        let mut query = String::from(
            r#"
            SELECT p.id, p.name, p.description, p.status, p.metadata,
                   p.created_at, p.updated_at,
                   m.record->>'role' AS role,
                   (SELECT COUNT(*)
                    FROM jsonb_array_elements(p.members) r
                    WHERE r->>'status' != 'removed') AS member_count
            FROM projects p
            CROSS JOIN LATERAL jsonb_array_elements(p.members) AS m(record)
            WHERE p.status != 'deleted'
              AND m.record->>'status' != 'removed'
              AND m.record->'identity'->>'kind' = 'bound_by_user'
              AND m.record->'identity'->>'user_id' = $1
            "#,
        );
        push_filters(&mut query, options);

        // Order
        query.push_str(match options.sort {
            ProjectSort::UpdatedAt => " ORDER BY p.updated_at DESC",
            ProjectSort::CreatedAt => " ORDER BY p.created_at DESC",
            ProjectSort::Name => " ORDER BY p.name ASC",
        });

        // Add limit and offset
        if let Some(limit) = options.limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = options.offset {
            query.push_str(&format!(" OFFSET {}", offset));
        }

        // Execute the query
        let mut sql = sqlx::query(&query).bind(user_id.as_str());
        if options.search.is_some() {
            sql = sql.bind(search_pattern(options));
        }
        let rows = sql.fetch_all(&self.pool).await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list projects: {}", e),
            )
        })?;

        let items: Result<Vec<ProjectSummary>, DomainError> =
            rows.into_iter().map(row_to_project_summary).collect();
        let items = items?;

        // Get total count
        let total = self.count_for_user(user_id, options).await?;

        // Calculate has_more
        let offset = options.offset.unwrap_or(0) as u64;
        let has_more = offset + (items.len() as u64) < total;

        Ok(ProjectList {
            items,
            total,
            has_more,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

/// Append status/role/search filters. Status and role values are fixed
/// enum strings; only the search term is bound as a parameter ($2).
fn push_filters(query: &mut String, options: &ListOptions) {
    if let Some(status) = options.status {
        query.push_str(&format!(" AND p.status = '{}'", status.as_str()));
    }
    if let Some(role) = options.role {
        query.push_str(&format!(" AND m.record->>'role' = '{}'", role.as_str()));
    }
    if options.search.is_some() {
        query.push_str(" AND p.name ILIKE $2");
    }
}

fn search_pattern(options: &ListOptions) -> String {
    let term = options.search.as_deref().unwrap_or_default();
    // Escape LIKE wildcards in the user-supplied term
    let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped)
}

fn str_to_project_status(s: &str) -> Result<ProjectStatus, DomainError> {
    match s {
        "active" => Ok(ProjectStatus::Active),
        "archived" => Ok(ProjectStatus::Archived),
        "deleted" => Ok(ProjectStatus::Deleted),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid project status: {}", s),
        )),
    }
}

fn str_to_member_role(s: &str) -> Result<MemberRole, DomainError> {
    match s {
        "viewer" => Ok(MemberRole::Viewer),
        "member" => Ok(MemberRole::Member),
        "admin" => Ok(MemberRole::Admin),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid member role: {}", s),
        )),
    }
}

fn row_to_project_summary(row: sqlx::postgres::PgRow) -> Result<ProjectSummary, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to get id: {}", e))
    })?;

    let name: String = row.try_get("name").map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to get name: {}", e))
    })?;

    let description: Option<String> = row.try_get("description").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get description: {}", e),
        )
    })?;

    let status_str: String = row.try_get("status").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get status: {}", e),
        )
    })?;
    let status = str_to_project_status(&status_str)?;

    let role_str: String = row.try_get("role").map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to get role: {}", e))
    })?;
    let role = str_to_member_role(&role_str)?;

    let member_count: i64 = row.try_get("member_count").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get member_count: {}", e),
        )
    })?;

    let metadata_json: serde_json::Value = row.try_get("metadata").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get metadata: {}", e),
        )
    })?;
    let metadata: TaskMetadata = serde_json::from_value(metadata_json).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid metadata payload: {}", e),
        )
    })?;

    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get created_at: {}", e),
        )
    })?;

    let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get updated_at: {}", e),
        )
    })?;

    Ok(ProjectSummary {
        id: ProjectId::from_uuid(id),
        name,
        description,
        status,
        role,
        member_count: member_count as u32,
        progress: metadata.progress().value(),
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}
