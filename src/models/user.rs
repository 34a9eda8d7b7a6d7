use serde::{Deserialize, Serialize};

/// The public slice of a row in the login service's `users` table.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub username: String,
    pub email: String,
    pub profile_image: Option<String>,
}
