//! PostgreSQL user repository
//!
//! Plain parameterized statements against `users (id, name, age)`.
//! Each call derives its own deadline from the caller's scope.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use super::{DbError, UserRepository};
use crate::models::User;
use crate::scope::CallScope;

/// User repository backed by a shared connection pool
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgUserRepository {
    /// `timeout` is applied fresh to every call.
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, scope: &CallScope, user: &User) -> Result<(), DbError> {
        let call = scope.derive(self.timeout);
        call.run(
            sqlx::query("INSERT INTO users (id, name, age) VALUES ($1, $2, $3)")
                .bind(&user.id)
                .bind(&user.name)
                .bind(user.age)
                .execute(&self.pool),
        )
        .await??;

        Ok(())
    }

    async fn get(
        &self,
        scope: &CallScope,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, DbError> {
        let call = scope.derive(self.timeout);
        // No ORDER BY: rows come back in whatever order the planner picks.
        let users: Vec<User> = call
            .run(
                sqlx::query_as("SELECT id, name, age FROM users LIMIT $1 OFFSET $2")
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool),
            )
            .await??;

        Ok(users)
    }

    async fn get_by_id(&self, scope: &CallScope, id: &str) -> Result<User, DbError> {
        let call = scope.derive(self.timeout);
        let user: Option<User> = call
            .run(
                sqlx::query_as("SELECT id, name, age FROM users WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool),
            )
            .await??;

        user.ok_or_else(|| DbError::NotFound { id: id.to_owned() })
    }

    async fn count(&self, scope: &CallScope) -> Result<i64, DbError> {
        let call = scope.derive(self.timeout);
        let (count,): (i64,) = call
            .run(sqlx::query_as("SELECT COUNT(*) FROM users").fetch_one(&self.pool))
            .await??;

        Ok(count)
    }

    async fn update(&self, scope: &CallScope, user: &User) -> Result<(), DbError> {
        let call = scope.derive(self.timeout);
        call.run(
            sqlx::query("UPDATE users SET name = $1, age = $2 WHERE id = $3")
                .bind(&user.name)
                .bind(user.age)
                .bind(&user.id)
                .execute(&self.pool),
        )
        .await??;

        Ok(())
    }

    async fn delete(&self, scope: &CallScope, id: &str) -> Result<(), DbError> {
        let call = scope.derive(self.timeout);
        call.run(
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await??;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, migrations};
    use crate::config::DatabaseConfig;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p roster-server -- --ignored

    async fn repo() -> PgUserRepository {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let config = DatabaseConfig {
            url,
            ..DatabaseConfig::default()
        };
        let pool = create_pool(&config).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        PgUserRepository::new(pool, Duration::from_secs(2))
    }

    fn user(name: &str, age: i32) -> User {
        User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_owned(),
            age,
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_fetch() {
        let repo = repo().await;
        let scope = CallScope::unbounded();
        let ada = user("Ada", 30);

        repo.create(&scope, &ada).await.unwrap();
        let fetched = repo.get_by_id(&scope, &ada.id).await.unwrap();
        assert_eq!(fetched, ada);

        repo.delete(&scope, &ada.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_id_is_rejected() {
        let repo = repo().await;
        let scope = CallScope::unbounded();
        let ada = user("Ada", 30);

        repo.create(&scope, &ada).await.unwrap();
        let err = repo.create(&scope, &ada).await.unwrap_err();
        assert!(matches!(err, DbError::Sqlx(_)));

        repo.delete(&scope, &ada.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_row_is_not_found() {
        let repo = repo().await;
        let err = repo
            .get_by_id(&CallScope::unbounded(), "no-such-user")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_missing_row_succeeds() {
        let repo = repo().await;
        repo.delete(&CallScope::unbounded(), "no-such-user")
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn page_beyond_end_is_empty() {
        let repo = repo().await;
        let scope = CallScope::unbounded();
        let count = repo.count(&scope).await.unwrap();
        let rows = repo.get(&scope, 10, count + 10).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn cancelled_scope_aborts_call() {
        let repo = repo().await;
        let scope = CallScope::unbounded();
        scope.cancel();
        let err = repo.count(&scope).await.unwrap_err();
        assert!(matches!(err, DbError::Cancelled));
    }
}
