//! User service - CRUD orchestration over a `UserRepository`
//!
//! Owns id assignment, the read-modify-write update, pagination arithmetic,
//! and the concurrent count + page fetch behind listing. Repository errors
//! pass through unchanged.

use std::sync::{Arc, OnceLock};

use uuid::Uuid;

use crate::db::repos::{DbError, UserRepository};
use crate::models::{
    effective_limit, offset_for, CreateUserRequest, ListUsersRequest, PageMeta,
    UpdateUserRequest, User, UserPage, UserView,
};
use crate::scope::CallScope;

/// Service settings fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Page size substituted when a listing request carries `limit == 0`
    pub default_limit: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

/// User operations exposed to the transport layer
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    config: ServiceConfig,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    /// Assign a fresh id and store the user. Returns the new id.
    ///
    /// Names are not checked for duplicates.
    pub async fn create_user(
        &self,
        scope: &CallScope,
        request: CreateUserRequest,
    ) -> Result<String, DbError> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: request.name().to_owned(),
            age: request.age(),
        };
        tracing::debug!(id = %user.id, "creating user");

        self.repo.create(scope, &user).await?;
        Ok(user.id)
    }

    /// Fetch one page of users together with the table-wide count.
    ///
    /// Count and page run concurrently under one child scope. The first
    /// failure is kept, cancels that scope, and is what the caller sees;
    /// whatever the sibling returns afterwards is discarded. The two reads
    /// are not isolated from each other, so under concurrent writes the
    /// count and the page may disagree.
    pub async fn get_list_user(
        &self,
        scope: &CallScope,
        request: ListUsersRequest,
    ) -> Result<UserPage, DbError> {
        let limit = effective_limit(request.limit, self.config.default_limit);
        let offset = offset_for(request.page, limit);
        tracing::debug!(limit, offset, "listing users");

        let fan_out = scope.child();
        let first_error: OnceLock<DbError> = OnceLock::new();
        let record = |err: DbError| {
            if first_error.set(err).is_ok() {
                fan_out.cancel();
            }
        };

        let (count, users) = tokio::join!(
            async { self.repo.count(&fan_out).await.map_err(record).ok() },
            async { self.repo.get(&fan_out, limit, offset).await.map_err(record).ok() },
        );

        let (count, users) = match (count, users, first_error.into_inner()) {
            (_, _, Some(err)) => {
                tracing::warn!(error = %err, "user listing failed");
                return Err(err);
            }
            (Some(count), Some(users), None) => (count, users),
            // Unreachable in practice: a branch only yields None after recording an error.
            _ => return Err(DbError::Cancelled),
        };

        Ok(UserPage {
            users: users.into_iter().map(UserView::from).collect(),
            meta: PageMeta::new(count, limit),
        })
    }

    /// Fetch one user's view. Missing rows surface as the repository reports them.
    pub async fn get_user_detail(
        &self,
        scope: &CallScope,
        id: &str,
    ) -> Result<UserView, DbError> {
        let user = self.repo.get_by_id(scope, id).await?;
        Ok(UserView::from(user))
    }

    /// Read-modify-write: fetch, overlay name and age, write back.
    ///
    /// Not atomic. Two concurrent updates of the same id race and the last
    /// write wins.
    pub async fn update_user(
        &self,
        scope: &CallScope,
        id: &str,
        request: UpdateUserRequest,
    ) -> Result<(), DbError> {
        let mut user = self.repo.get_by_id(scope, id).await?;
        request.apply_to(&mut user);
        tracing::debug!(id = %user.id, "updating user");

        self.repo.update(scope, &user).await
    }

    /// Delete by id without checking existence first.
    pub async fn delete_user(&self, scope: &CallScope, id: &str) -> Result<(), DbError> {
        tracing::debug!(id, "deleting user");
        self.repo.delete(scope, id).await
    }
}
