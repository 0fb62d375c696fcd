use sqlx::PgPool;

use crate::{error::Result, models::Credential};

/// `None` unless exactly one row carries `username`.
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Credential>> {
    let mut rows = sqlx::query_as::<_, Credential>(
        "SELECT username, password FROM login WHERE username = $1 LIMIT 2",
    )
    .bind(username)
    .fetch_all(pool)
    .await?;

    if rows.len() != 1 {
        return Ok(None);
    }

    Ok(rows.pop())
}
