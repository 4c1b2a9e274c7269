use crate::models::DbDoctor;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn get_doctor_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbDoctor>> {
    tracing::debug!("Getting doctor by id: {}", id);

    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, has_error, updated_at
        FROM doctors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(doctor)
}

/// Inserts the doctor or overwrites its name and error flag.
pub async fn upsert_doctor(
    pool: &Pool<Postgres>,
    id: i64,
    name: &str,
    has_error: bool,
) -> Result<DbDoctor> {
    let now = Utc::now();

    tracing::debug!(
        "Saving doctor: id={}, name={}, has_error={}",
        id, name, has_error
    );

    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        INSERT INTO doctors (id, name, has_error, updated_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO UPDATE
        SET name = EXCLUDED.name,
            has_error = EXCLUDED.has_error,
            updated_at = EXCLUDED.updated_at
        RETURNING id, name, has_error, updated_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(has_error)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(doctor)
}
