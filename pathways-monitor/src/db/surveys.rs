//! Survey and survey-response queries

use chrono::{DateTime, Utc};
use pathways_common::db::parse_guid;
use pathways_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Partner-wide response totals across published surveys
#[derive(Debug, Clone, Copy)]
pub struct CompletionTotals {
    pub total: i64,
    pub submitted: i64,
}

/// Per-survey completion stats
#[derive(Debug, Clone)]
pub struct SurveyCompletion {
    pub guid: Uuid,
    pub title: String,
    pub total: i64,
    pub submitted: i64,
}

/// Draft survey created recently
#[derive(Debug, Clone)]
pub struct DraftSurvey {
    pub guid: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Response totals over all published surveys of a partner
pub async fn program_completion_totals(
    pool: &SqlitePool,
    partner_id: Uuid,
) -> Result<CompletionTotals> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(r.guid) AS total,
               COALESCE(SUM(CASE WHEN r.status = 'submitted' THEN 1 ELSE 0 END), 0) AS submitted
        FROM survey_responses r
        JOIN surveys s ON r.survey_id = s.guid
        WHERE s.partner_id = ? AND s.status = 'published'
        "#,
    )
    .bind(partner_id.to_string())
    .fetch_one(pool)
    .await?;

    Ok(CompletionTotals {
        total: row.get("total"),
        submitted: row.get("submitted"),
    })
}

/// Per-survey completion stats for published surveys with at least one response
pub async fn survey_completion_stats(
    pool: &SqlitePool,
    partner_id: Uuid,
) -> Result<Vec<SurveyCompletion>> {
    let rows = sqlx::query(
        r#"
        SELECT s.guid, s.title,
               COUNT(r.guid) AS total,
               COALESCE(SUM(CASE WHEN r.status = 'submitted' THEN 1 ELSE 0 END), 0) AS submitted
        FROM surveys s
        JOIN survey_responses r ON r.survey_id = s.guid
        WHERE s.partner_id = ? AND s.status = 'published'
        GROUP BY s.guid, s.title
        "#,
    )
    .bind(partner_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut surveys = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        surveys.push(SurveyCompletion {
            guid: parse_guid(&guid_str)?,
            title: row.get("title"),
            total: row.get("total"),
            submitted: row.get("submitted"),
        });
    }
    Ok(surveys)
}

/// Draft surveys created at or after the cutoff
pub async fn recent_draft_surveys(
    pool: &SqlitePool,
    partner_id: Uuid,
    cutoff: DateTime<Utc>,
) -> Result<Vec<DraftSurvey>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, title, created_at
        FROM surveys
        WHERE partner_id = ? AND status = 'draft' AND datetime(created_at) >= datetime(?)
        "#,
    )
    .bind(partner_id.to_string())
    .bind(cutoff)
    .fetch_all(pool)
    .await?;

    let mut surveys = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        surveys.push(DraftSurvey {
            guid: parse_guid(&guid_str)?,
            title: row.get("title"),
            created_at: row.get("created_at"),
        });
    }
    Ok(surveys)
}
