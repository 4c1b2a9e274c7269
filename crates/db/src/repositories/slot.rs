use crate::models::DbSlot;
use chrono::{DateTime, Utc};
use eyre::{Result, eyre};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_slot_by_doctor_and_start(
    pool: &Pool<Postgres>,
    doctor_id: i64,
    start_time: DateTime<Utc>,
) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, doctor_id, start_time, end_time, created_at
        FROM slots
        WHERE doctor_id = $1 AND start_time = $2
        "#,
    )
    .bind(doctor_id)
    .bind(start_time)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn create_slot(
    pool: &Pool<Postgres>,
    doctor_id: i64,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    created_at: DateTime<Utc>,
) -> Result<DbSlot> {
    let id = Uuid::new_v4();

    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        INSERT INTO slots (id, doctor_id, start_time, end_time, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, doctor_id, start_time, end_time, created_at
        "#,
    )
    .bind(id)
    .bind(doctor_id)
    .bind(start_time)
    .bind(end_time)
    .bind(created_at)
    .fetch_one(pool)
    .await?;

    Ok(slot)
}

/// Overwrites the end time only; `created_at` stays as first inserted.
pub async fn update_slot_end(
    pool: &Pool<Postgres>,
    id: Uuid,
    end_time: DateTime<Utc>,
) -> Result<DbSlot> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        UPDATE slots
        SET end_time = $2
        WHERE id = $1
        RETURNING id, doctor_id, start_time, end_time, created_at
        "#,
    )
    .bind(id)
    .bind(end_time)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| eyre!("Slot not found: {}", id))?;

    Ok(slot)
}

pub async fn get_slots_by_doctor_id(pool: &Pool<Postgres>, doctor_id: i64) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, doctor_id, start_time, end_time, created_at
        FROM slots
        WHERE doctor_id = $1
        ORDER BY start_time ASC
        "#,
    )
    .bind(doctor_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}
