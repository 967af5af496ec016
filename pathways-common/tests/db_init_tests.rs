//! Tests for database initialization and schema bootstrap

use pathways_common::db::init_database;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("pathways-test.db");

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());

    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("pathways-test-existing.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());

    // Open database second time (should succeed)
    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_default_settings_initialized() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("pathways-test-settings.db");

    let pool = init_database(&db_path).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(count >= 11, "Expected 11+ default settings, got {}", count);

    let gap: Option<String> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = 'monitor_attendance_gap_hours'")
            .fetch_optional(&pool)
            .await
            .unwrap();
    assert!(gap.is_some(), "monitor_attendance_gap_hours setting not initialized");
    assert_eq!(gap.unwrap(), "48");
}

#[tokio::test]
async fn test_existing_settings_preserved_on_reinit() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("pathways-test-preserve.db");

    let pool = init_database(&db_path).await.unwrap();

    sqlx::query("UPDATE settings SET value = '24' WHERE key = 'monitor_attendance_gap_hours'")
        .execute(&pool)
        .await
        .unwrap();
    drop(pool);

    let pool = init_database(&db_path).await.unwrap();
    let gap: String =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = 'monitor_attendance_gap_hours'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(gap, "24", "Re-init must not overwrite operator-tuned settings");
}
