use anyhow::Result;
use sql_connection::SqlConnect;

use crate::postgres::TestPostgresContainer;

pub fn create_sql_connect(container: &TestPostgresContainer) -> SqlConnect {
    SqlConnect::new(container.pool.clone())
}

/// Insert a regular account named `username` with `{username}@example.com`
pub async fn insert_user(
    container: &TestPostgresContainer, username: &str,
) -> Result<i64> {
    let client = container.pool.get().await?;
    let row = client
        .query_one(
            "INSERT INTO users (username, email, password) VALUES ($1, $2, \
             '') RETURNING id",
            &[&username, &format!("{username}@example.com")],
        )
        .await?;
    Ok(row.get(0))
}

/// Insert an account linked as an API user of `created_by_id`
pub async fn insert_api_user(
    container: &TestPostgresContainer, username: &str, created_by_id: i64,
) -> Result<i64> {
    let user_id = insert_user(container, username).await?;
    let client = container.pool.get().await?;
    client
        .execute(
            "INSERT INTO api_users (user_id, created_by_id) VALUES ($1, $2)",
            &[&user_id, &created_by_id],
        )
        .await?;
    Ok(user_id)
}
