use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::models::user::UserSummary;

/// High-water mark for the new-users poll.
///
/// Starts at process start and is not persisted. The lock serializes pollers;
/// the window is bounded by the database clock.
#[derive(Debug)]
pub struct NewUserCursor {
    last_checked: Mutex<DateTime<Utc>>,
}

impl NewUserCursor {
    pub fn starting_at(at: DateTime<Utc>) -> Self {
        NewUserCursor { last_checked: Mutex::new(at) }
    }

    pub fn starting_now() -> Self {
        Self::starting_at(Utc::now())
    }

    pub async fn last_checked(&self) -> DateTime<Utc> {
        *self.last_checked.lock().await
    }
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
    sqlx::query_as::<_, UserSummary>(
        "SELECT username, email, profile_image FROM users ORDER BY id DESC",
    )
    .fetch_all(pool)
    .await
}

/// Users created after the cursor, up to the transaction's `now()`. The cursor
/// advances to that reading once the read has committed.
///
/// Not gap-free: a row whose insert began before this transaction but commits
/// after the select has `created_at` below the new cursor and is never seen.
pub async fn list_new_since(
    pool: &PgPool,
    cursor: &NewUserCursor,
) -> Result<Vec<UserSummary>, sqlx::Error> {
    let mut last_checked = cursor.last_checked.lock().await;

    let mut tx = pool.begin().await?;
    let checked_at: DateTime<Utc> = sqlx::query_scalar("SELECT now()")
        .fetch_one(&mut *tx)
        .await?;
    let users = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT username, email, profile_image
        FROM users
        WHERE created_at > $1 AND created_at <= $2
        ORDER BY created_at, id
        "#,
    )
    .bind(*last_checked)
    .bind(checked_at)
    .fetch_all(&mut *tx)
    .await?;
    tx.commit().await?;

    *last_checked = checked_at;
    Ok(users)
}
