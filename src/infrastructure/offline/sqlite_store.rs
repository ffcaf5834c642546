use crate::application::ports::QueuePersistence;
use crate::domain::entities::{OperationRecord, QueuedOperation};
use crate::domain::value_objects::QueueEntryStatus;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};

/// SQLite-backed queue persistence. Rows keep insertion order via the
/// autoincrement id; the operation record itself is stored as JSON so the
/// schema does not chase the record shape.
pub struct SqliteQueueStore {
    pool: Pool<Sqlite>,
}

impl SqliteQueueStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS offline_queue (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                operation TEXT NOT NULL,
                status TEXT NOT NULL,
                retry_count INTEGER NOT NULL DEFAULT 0,
                error_message TEXT,
                queued_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl QueuePersistence for SqliteQueueStore {
    async fn read_queue(&self) -> Result<Vec<QueuedOperation>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT operation, status, retry_count, error_message, queued_at
            FROM offline_queue
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let operation: String = row.try_get("operation")?;
            let status: String = row.try_get("status")?;
            let retry_count: i64 = row.try_get("retry_count")?;
            let error_message: Option<String> = row.try_get("error_message")?;
            let queued_at: i64 = row.try_get("queued_at")?;

            let record: OperationRecord = serde_json::from_str(&operation)?;
            entries.push(QueuedOperation {
                record,
                status: QueueEntryStatus::from(status.as_str()),
                retry_count: retry_count as u32,
                error_message,
                queued_at: DateTime::from_timestamp(queued_at, 0).unwrap_or_else(Utc::now),
            });
        }
        Ok(entries)
    }

    async fn write_queue(&self, entries: &[QueuedOperation]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM offline_queue")
            .execute(&mut *tx)
            .await?;

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO offline_queue (operation, status, retry_count, error_message, queued_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(serde_json::to_string(&entry.record)?)
            .bind(entry.status.as_str())
            .bind(entry.retry_count as i64)
            .bind(entry.error_message.as_deref())
            .bind(entry.queued_at.timestamp())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{OperationKind, ResumeId, ResumePayload};
    use serde_json::json;

    fn record(kind: OperationKind, target: Option<&str>, title: &str) -> OperationRecord {
        OperationRecord::new(
            kind,
            target.map(|t| ResumeId::confirmed(t).unwrap()),
            ResumePayload::new(json!({ "title": title })).unwrap(),
            None,
        )
    }

    async fn memory_store() -> SqliteQueueStore {
        SqliteQueueStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn round_trips_entries_in_insertion_order() {
        let store = memory_store().await;

        let entries = vec![
            QueuedOperation::new(record(OperationKind::Create, None, "first")),
            QueuedOperation::new(record(OperationKind::Update, Some("b"), "second")),
            QueuedOperation::new(record(OperationKind::Delete, Some("c"), "third")),
        ];
        store.write_queue(&entries).await.unwrap();

        let loaded = store.read_queue().await.unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].record.kind, OperationKind::Create);
        assert_eq!(loaded[1].record.kind, OperationKind::Update);
        assert_eq!(
            loaded[1].record.target_id.as_ref().unwrap().to_string(),
            "b"
        );
        assert_eq!(loaded[2].record.kind, OperationKind::Delete);
        assert_eq!(loaded[0].record.payload.title(), Some("first"));
    }

    #[tokio::test]
    async fn write_replaces_the_previous_contents() {
        let store = memory_store().await;

        store
            .write_queue(&[
                QueuedOperation::new(record(OperationKind::Create, None, "old a")),
                QueuedOperation::new(record(OperationKind::Create, None, "old b")),
            ])
            .await
            .unwrap();
        store
            .write_queue(&[QueuedOperation::new(record(
                OperationKind::Create,
                None,
                "only survivor",
            ))])
            .await
            .unwrap();

        let loaded = store.read_queue().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].record.payload.title(), Some("only survivor"));
    }

    #[tokio::test]
    async fn preserves_retry_state_and_error_message() {
        let store = memory_store().await;

        let mut entry = QueuedOperation::new(record(OperationKind::Update, Some("x"), "retried"));
        entry.mark_failed_attempt("connection reset".to_string(), 3);
        store.write_queue(&[entry]).await.unwrap();

        let loaded = store.read_queue().await.unwrap();
        assert_eq!(loaded[0].retry_count, 1);
        assert_eq!(loaded[0].status, QueueEntryStatus::Queued);
        assert_eq!(
            loaded[0].error_message.as_deref(),
            Some("connection reset")
        );
    }

    #[tokio::test]
    async fn survives_a_store_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.db");
        let url = format!("sqlite://{}?mode=rwc", path.display());

        {
            let store = SqliteQueueStore::connect(&url).await.unwrap();
            store
                .write_queue(&[QueuedOperation::new(record(
                    OperationKind::Create,
                    None,
                    "durable",
                ))])
                .await
                .unwrap();
        }

        let reopened = SqliteQueueStore::connect(&url).await.unwrap();
        let loaded = reopened.read_queue().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].record.payload.title(), Some("durable"));
    }
}
