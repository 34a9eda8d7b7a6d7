use sqlx::PgPool;

use crate::config::ImagePolicy;
use crate::models::employee::{Employee, NewEmployee};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertKind {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOutcome {
    pub kind: UpsertKind,
    /// The image path stored in the row after the write.
    pub profile_image: Option<String>,
}

const UPSERT_PREFIX: &str = r#"
    INSERT INTO employees (
        id, name, role, gender, dob, location, email,
        phone, join_date, experience, skills, achievement, profile_image
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
    ON CONFLICT (id) DO UPDATE SET
        name = EXCLUDED.name,
        role = EXCLUDED.role,
        gender = EXCLUDED.gender,
        dob = EXCLUDED.dob,
        location = EXCLUDED.location,
        email = EXCLUDED.email,
        phone = EXCLUDED.phone,
        join_date = EXCLUDED.join_date,
        experience = EXCLUDED.experience,
        skills = EXCLUDED.skills,
        achievement = EXCLUDED.achievement,
"#;

// xmax is zero only for a freshly inserted row version
const UPSERT_SUFFIX: &str = "\n    RETURNING profile_image, (xmax = 0) AS inserted";

pub fn upsert_sql(policy: ImagePolicy) -> String {
    let image_assignment = match policy {
        ImagePolicy::Replace => "        profile_image = EXCLUDED.profile_image",
        ImagePolicy::Keep => {
            "        profile_image = COALESCE(EXCLUDED.profile_image, employees.profile_image)"
        }
    };
    format!("{}{}{}", UPSERT_PREFIX, image_assignment, UPSERT_SUFFIX)
}

/// Inserts the employee, or replaces every field of the row with the same id.
pub async fn upsert(
    pool: &PgPool,
    employee: &NewEmployee,
    profile_image: Option<&str>,
    policy: ImagePolicy,
) -> Result<UpsertOutcome, sqlx::Error> {
    let sql = upsert_sql(policy);
    let (stored_image, inserted): (Option<String>, bool) = sqlx::query_as(&sql)
        .bind(&employee.id)
        .bind(&employee.name)
        .bind(&employee.role)
        .bind(&employee.gender)
        .bind(employee.dob)
        .bind(&employee.location)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(employee.join_date)
        .bind(employee.experience)
        .bind(&employee.skills)
        .bind(&employee.achievement)
        .bind(profile_image)
        .fetch_one(pool)
        .await?;

    Ok(UpsertOutcome {
        kind: if inserted { UpsertKind::Created } else { UpsertKind::Updated },
        profile_image: stored_image,
    })
}

pub async fn list(pool: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, name, role, gender, dob, location, email, phone,
               join_date, experience, skills, achievement, profile_image
        FROM employees
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Returns the number of rows removed (0 or 1).
pub async fn delete(pool: &PgPool, id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM employees WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
