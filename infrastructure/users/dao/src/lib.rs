use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sql_connection::{PgError, SqlConnect};
use tokio_postgres::{Row, error::SqlState};
use tracing::{debug, instrument};
use user_errors::ApiUserError;
use user_models::{ApiUser, NewUser, User};

/// Schema of the tables this DAO reads and writes
pub const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");

/// Persistence operations needed to provision API users
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn username_exists(&self, username: &str)
    -> Result<bool, ApiUserError>;

    async fn email_exists(&self, email: &str) -> Result<bool, ApiUserError>;

    /// Usernames of every account that was itself created as an API user
    async fn api_usernames(&self) -> Result<Vec<String>, ApiUserError>;

    async fn find_by_username(
        &self, username: &str,
    ) -> Result<Option<User>, ApiUserError>;

    /// Creates the account and its API user link as one unit: either both
    /// rows exist afterwards or neither does.
    async fn create_api_user(
        &self, new_user: NewUser, creator: &User,
    ) -> Result<(User, ApiUser), ApiUserError>;
}

#[async_trait]
impl<T> AccountStore for Arc<T>
where
    T: AccountStore + ?Sized,
{
    async fn username_exists(
        &self, username: &str,
    ) -> Result<bool, ApiUserError> {
        (**self).username_exists(username).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, ApiUserError> {
        (**self).email_exists(email).await
    }

    async fn api_usernames(&self) -> Result<Vec<String>, ApiUserError> {
        (**self).api_usernames().await
    }

    async fn find_by_username(
        &self, username: &str,
    ) -> Result<Option<User>, ApiUserError> {
        (**self).find_by_username(username).await
    }

    async fn create_api_user(
        &self, new_user: NewUser, creator: &User,
    ) -> Result<(User, ApiUser), ApiUserError> {
        (**self).create_api_user(new_user, creator).await
    }
}

#[derive(Clone)]
pub struct UserDao {
    db: SqlConnect,
}

impl UserDao {
    pub fn new(db: SqlConnect) -> Self { Self { db } }

    fn map_user(row: &Row) -> User {
        User {
            id: row.get(0),
            username: row.get(1),
            email: row.get(2),
            password: row.get(3),
            date_joined: row.get(4),
        }
    }

    fn map_api_user(row: &Row) -> ApiUser {
        ApiUser {
            id: row.get(0),
            user_id: row.get(1),
            created_by_id: row.get(2),
            created_at: row.get(3),
        }
    }

    async fn exists(
        &self, sql: &str, value: &str,
    ) -> Result<bool, ApiUserError> {
        let client = self.db.get_read_client().await?;
        let stmt = client.prepare_cached(sql).await?;
        let row = client.query_one(&stmt, &[&value]).await?;
        Ok(row.get(0))
    }
}

/// Turns a unique violation raced in between the existence checks and the
/// insert into the matching rejection.
fn map_insert_error(err: PgError, new_user: &NewUser) -> ApiUserError {
    let constraint = err
        .as_db_error()
        .filter(|db| *db.code() == SqlState::UNIQUE_VIOLATION)
        .and_then(|db| db.constraint())
        .map(str::to_owned);

    match constraint.as_deref() {
        Some("users_username_key") => {
            ApiUserError::DuplicateUsername {
                username: new_user.username.clone(),
            }
        }
        Some("users_email_key") => {
            ApiUserError::DuplicateEmail {
                email: new_user.email.clone(),
            }
        }
        _ => ApiUserError::Database(err),
    }
}

#[async_trait]
impl AccountStore for UserDao {
    #[instrument(skip(self))]
    async fn username_exists(
        &self, username: &str,
    ) -> Result<bool, ApiUserError> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
            username,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> Result<bool, ApiUserError> {
        self.exists("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)", email)
            .await
    }

    #[instrument(skip(self))]
    async fn api_usernames(&self) -> Result<Vec<String>, ApiUserError> {
        let client = self.db.get_read_client().await?;
        let stmt = client
            .prepare_cached(
                "SELECT u.username FROM api_users a
                 JOIN users u ON u.id = a.user_id
                 ORDER BY a.id ASC",
            )
            .await?;
        let rows = client.query(&stmt, &[]).await?;

        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_username(
        &self, username: &str,
    ) -> Result<Option<User>, ApiUserError> {
        let client = self.db.get_read_client().await?;
        let stmt = client
            .prepare_cached(
                "SELECT id, username, email, password, date_joined
                 FROM users WHERE username = $1",
            )
            .await?;
        let rows = client.query(&stmt, &[&username]).await?;

        Ok(rows.first().map(Self::map_user))
    }

    #[instrument(skip(self, new_user), fields(username = %new_user.username))]
    async fn create_api_user(
        &self, new_user: NewUser, creator: &User,
    ) -> Result<(User, ApiUser), ApiUserError> {
        let mut client = self.db.get_client().await?;
        // Dropping the transaction without commit rolls both inserts back
        let tx = client.transaction().await?;
        let now = Utc::now();

        let user_row = tx
            .query_one(
                "INSERT INTO users (username, email, password, date_joined)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, username, email, password, date_joined",
                &[
                    &new_user.username,
                    &new_user.email,
                    &new_user.password_hash,
                    &now,
                ],
            )
            .await
            .map_err(|e| map_insert_error(e, &new_user))?;
        let user = Self::map_user(&user_row);
        debug!(user.id = user.id, "Inserted account row");

        let api_user_row = tx
            .query_one(
                "INSERT INTO api_users (user_id, created_by_id, created_at)
                 VALUES ($1, $2, $3)
                 RETURNING id, user_id, created_by_id, created_at",
                &[&user.id, &creator.id, &now],
            )
            .await?;
        let api_user = Self::map_api_user(&api_user_row);

        tx.commit().await?;

        Ok((user, api_user))
    }
}
