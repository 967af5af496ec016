//! Shared fixtures for monitor integration tests

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use pathways_common::db::create_schema;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

/// In-memory database with the real schema
pub async fn setup_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    create_schema(&pool).await.expect("Failed to create schema");
    pool
}

pub async fn seed_partner(pool: &SqlitePool, name: &str) -> Uuid {
    let guid = Uuid::new_v4();
    sqlx::query("INSERT INTO partners (guid, name, status) VALUES (?, ?, 'active')")
        .bind(guid.to_string())
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
    guid
}

pub async fn seed_monitor_user(pool: &SqlitePool, partner_id: Uuid, name: &str) -> Uuid {
    let guid = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (guid, partner_id, display_name, role) VALUES (?, ?, ?, 'monitor')",
    )
    .bind(guid.to_string())
    .bind(partner_id.to_string())
    .bind(name)
    .execute(pool)
    .await
    .unwrap();
    guid
}

pub async fn seed_cohort(pool: &SqlitePool, partner_id: Uuid, name: &str, status: &str) -> Uuid {
    let guid = Uuid::new_v4();
    sqlx::query("INSERT INTO cohorts (guid, partner_id, name, status) VALUES (?, ?, ?, ?)")
        .bind(guid.to_string())
        .bind(partner_id.to_string())
        .bind(name)
        .bind(status)
        .execute(pool)
        .await
        .unwrap();
    guid
}

pub async fn seed_participant(pool: &SqlitePool, partner_id: Uuid, name: &str) -> Uuid {
    let guid = Uuid::new_v4();
    sqlx::query("INSERT INTO participants (guid, partner_id, display_name) VALUES (?, ?, ?)")
        .bind(guid.to_string())
        .bind(partner_id.to_string())
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
    guid
}

pub async fn seed_enrollment(
    pool: &SqlitePool,
    partner_id: Uuid,
    cohort_id: Uuid,
    participant_id: Uuid,
    status: &str,
) -> Uuid {
    let guid = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO enrollments (guid, partner_id, cohort_id, participant_id, status) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(guid.to_string())
    .bind(partner_id.to_string())
    .bind(cohort_id.to_string())
    .bind(participant_id.to_string())
    .bind(status)
    .execute(pool)
    .await
    .unwrap();
    guid
}

pub async fn seed_attendance(
    pool: &SqlitePool,
    partner_id: Uuid,
    enrollment_id: Uuid,
    session_date: DateTime<Utc>,
) -> Uuid {
    let guid = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO attendance_records (guid, partner_id, enrollment_id, session_date) VALUES (?, ?, ?, ?)",
    )
    .bind(guid.to_string())
    .bind(partner_id.to_string())
    .bind(enrollment_id.to_string())
    .bind(session_date)
    .execute(pool)
    .await
    .unwrap();
    guid
}

pub async fn seed_score(
    pool: &SqlitePool,
    partner_id: Uuid,
    enrollment_id: Uuid,
    module_name: &str,
    value: f64,
    max_value: f64,
    assessed_on: DateTime<Utc>,
) -> Uuid {
    let guid = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO scores (guid, partner_id, enrollment_id, module_name, value, max_value, assessed_on) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(guid.to_string())
    .bind(partner_id.to_string())
    .bind(enrollment_id.to_string())
    .bind(module_name)
    .bind(value)
    .bind(max_value)
    .bind(assessed_on)
    .execute(pool)
    .await
    .unwrap();
    guid
}

pub async fn seed_survey(
    pool: &SqlitePool,
    partner_id: Uuid,
    title: &str,
    status: &str,
    created_at: DateTime<Utc>,
) -> Uuid {
    let guid = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO surveys (guid, partner_id, title, status, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(guid.to_string())
    .bind(partner_id.to_string())
    .bind(title)
    .bind(status)
    .bind(created_at)
    .execute(pool)
    .await
    .unwrap();
    guid
}

/// Seed `submitted` submitted and `pending` pending responses for a survey
pub async fn seed_responses(
    pool: &SqlitePool,
    partner_id: Uuid,
    survey_id: Uuid,
    submitted: usize,
    pending: usize,
) {
    for _ in 0..submitted {
        sqlx::query(
            "INSERT INTO survey_responses (guid, partner_id, survey_id, status, submitted_at) VALUES (?, ?, ?, 'submitted', ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(partner_id.to_string())
        .bind(survey_id.to_string())
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap();
    }
    for _ in 0..pending {
        sqlx::query(
            "INSERT INTO survey_responses (guid, partner_id, survey_id, status) VALUES (?, ?, ?, 'pending')",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(partner_id.to_string())
        .bind(survey_id.to_string())
        .execute(pool)
        .await
        .unwrap();
    }
}
