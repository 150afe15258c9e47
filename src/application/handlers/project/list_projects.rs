//! ListProjectsHandler - Query handler for listing a user's projects.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::project::{MemberRole, ProjectError, ProjectStatus};
use crate::ports::{ListOptions, ProjectList, ProjectReader, ProjectSort};

/// Query to list projects for a user.
#[derive(Debug, Clone)]
pub struct ListProjectsQuery {
    pub user: UserId,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<ProjectStatus>,
    pub role: Option<MemberRole>,
    pub search: Option<String>,
    pub sort: ProjectSort,
}

impl ListProjectsQuery {
    /// Create a simple query for all of a user's projects.
    pub fn all(user: UserId) -> Self {
        Self {
            user,
            page: None,
            per_page: None,
            status: None,
            role: None,
            search: None,
            sort: ProjectSort::default(),
        }
    }

    /// Create a paginated query.
    pub fn paginated(user: UserId, page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            ..Self::all(user)
        }
    }

    fn to_list_options(&self) -> ListOptions {
        let mut options = match (self.page, self.per_page) {
            (Some(page), Some(per_page)) => ListOptions::paginated(page, per_page),
            _ => ListOptions::default(),
        };
        if let Some(status) = self.status {
            options = options.with_status(status);
        }
        if let Some(role) = self.role {
            options = options.with_role(role);
        }
        if let Some(search) = &self.search {
            options = options.with_search(search.clone());
        }
        options.sorted_by(self.sort)
    }
}

/// Handler for listing projects.
pub struct ListProjectsHandler {
    reader: Arc<dyn ProjectReader>,
}

impl ListProjectsHandler {
    pub fn new(reader: Arc<dyn ProjectReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: ListProjectsQuery) -> Result<ProjectList, ProjectError> {
        let options = query.to_list_options();
        let list = self
            .reader
            .list_for_user(&query.user, &options)
            .await
            .map_err(ProjectError::from)?;
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::project::test_support::{
        test_project, test_user, StubProjectReader,
    };
    use crate::domain::foundation::Timestamp;

    #[tokio::test]
    async fn lists_only_the_users_projects() {
        let mine = test_project("u-me", "AAAA1111");
        let theirs = test_project("u-them", "BBBB2222");
        let reader = Arc::new(StubProjectReader::with_projects(vec![mine, theirs]));
        let handler = ListProjectsHandler::new(reader);

        let list = handler
            .handle(ListProjectsQuery::all(test_user("u-me")))
            .await
            .unwrap();

        assert_eq!(list.total, 1);
        assert_eq!(list.items[0].role, MemberRole::Admin);
    }

    #[tokio::test]
    async fn excludes_deleted_projects() {
        let mut project = test_project("u-me", "AAAA1111");
        project.soft_delete(Timestamp::now()).unwrap();
        let reader = Arc::new(StubProjectReader::with_projects(vec![project]));
        let handler = ListProjectsHandler::new(reader);

        let list = handler
            .handle(ListProjectsQuery::all(test_user("u-me")))
            .await
            .unwrap();
        assert_eq!(list.total, 0);
    }

    #[tokio::test]
    async fn returns_empty_list_for_user_with_no_projects() {
        let reader = Arc::new(StubProjectReader::empty());
        let handler = ListProjectsHandler::new(reader);

        let list = handler
            .handle(ListProjectsQuery::all(test_user("u-me")))
            .await
            .unwrap();
        assert!(list.items.is_empty());
        assert!(!list.has_more);
    }

    #[tokio::test]
    async fn supports_pagination() {
        let projects = vec![
            test_project("u-me", "AAAA1111"),
            test_project("u-me", "BBBB2222"),
            test_project("u-me", "CCCC3333"),
        ];
        let reader = Arc::new(StubProjectReader::with_projects(projects));
        let handler = ListProjectsHandler::new(reader);

        let list = handler
            .handle(ListProjectsQuery::paginated(test_user("u-me"), 1, 2))
            .await
            .unwrap();

        assert_eq!(list.items.len(), 2);
        assert_eq!(list.total, 3);
        assert!(list.has_more);
    }

    #[tokio::test]
    async fn filters_by_status() {
        let active = test_project("u-me", "AAAA1111");
        let mut archived = test_project("u-me", "BBBB2222");
        archived.archive(Timestamp::now()).unwrap();
        let reader = Arc::new(StubProjectReader::with_projects(vec![active, archived]));
        let handler = ListProjectsHandler::new(reader);

        let mut query = ListProjectsQuery::all(test_user("u-me"));
        query.status = Some(ProjectStatus::Archived);
        let list = handler.handle(query).await.unwrap();

        assert_eq!(list.total, 1);
        assert_eq!(list.items[0].status, ProjectStatus::Archived);
    }

    #[tokio::test]
    async fn query_converts_filters_to_options() {
        let mut query = ListProjectsQuery::paginated(test_user("u-me"), 2, 10);
        query.search = Some("launch".to_string());
        query.role = Some(MemberRole::Admin);

        let options = query.to_list_options();
        assert_eq!(options.offset, Some(10));
        assert_eq!(options.limit, Some(10));
        assert_eq!(options.search.as_deref(), Some("launch"));
        assert_eq!(options.role, Some(MemberRole::Admin));
    }
}
