//! Participant queries

use pathways_common::db::parse_guid;
use pathways_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Participant with enrollment history but no active enrollment
#[derive(Debug, Clone)]
pub struct DetachedParticipant {
    pub guid: Uuid,
    pub display_name: String,
}

/// Participants whose enrollments are all inactive while an active cohort
/// they are not enrolled in exists (suggests an enrollment was lost)
pub async fn participants_without_active_enrollment(
    pool: &SqlitePool,
    partner_id: Uuid,
) -> Result<Vec<DetachedParticipant>> {
    let rows = sqlx::query(
        r#"
        SELECT p.guid, p.display_name
        FROM participants p
        WHERE p.partner_id = ?
          AND EXISTS (
            SELECT 1 FROM enrollments e WHERE e.participant_id = p.guid
          )
          AND NOT EXISTS (
            SELECT 1 FROM enrollments e
            WHERE e.participant_id = p.guid AND e.status = 'active'
          )
          AND EXISTS (
            SELECT 1 FROM cohorts c
            WHERE c.partner_id = p.partner_id
              AND c.status = 'active'
              AND NOT EXISTS (
                SELECT 1 FROM enrollments e2
                WHERE e2.participant_id = p.guid AND e2.cohort_id = c.guid
              )
          )
        "#,
    )
    .bind(partner_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut participants = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        participants.push(DetachedParticipant {
            guid: parse_guid(&guid_str)?,
            display_name: row.get("display_name"),
        });
    }
    Ok(participants)
}
