use log::info;
use sqlx::PgPool;

const CREATE_EMPLOYEES: &str = r#"
    CREATE TABLE employees (
        id VARCHAR(7) PRIMARY KEY,
        name VARCHAR(50) NOT NULL,
        role VARCHAR(40) NOT NULL,
        gender VARCHAR(10) NOT NULL,
        dob DATE NOT NULL,
        location VARCHAR(40) NOT NULL,
        email VARCHAR(50) NOT NULL,
        phone VARCHAR(10) NOT NULL,
        join_date DATE NOT NULL,
        experience INTEGER NOT NULL,
        skills TEXT NOT NULL,
        achievement TEXT NOT NULL,
        profile_image VARCHAR(255)
    )
"#;

/// Brings the `employees` table into shape: creates it, or adds `profile_image`
/// to a table that predates image uploads. Safe to run on every start.
pub async fn bootstrap(pool: &PgPool) -> Result<(), sqlx::Error> {
    let table_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = 'employees'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        info!("Creating employees table...");
        sqlx::query(CREATE_EMPLOYEES).execute(pool).await?;
        info!("Employees table created successfully.");
        return Ok(());
    }

    let column_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT FROM information_schema.columns
            WHERE table_schema = 'public'
            AND table_name = 'employees'
            AND column_name = 'profile_image'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !column_exists {
        info!("Adding profile_image column to employees table...");
        sqlx::query("ALTER TABLE employees ADD COLUMN profile_image VARCHAR(255)")
            .execute(pool)
            .await?;
        info!("profile_image column added successfully.");
    }

    Ok(())
}
