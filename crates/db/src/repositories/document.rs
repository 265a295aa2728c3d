use async_trait::async_trait;

use ndawonga_core::domain::document::{Document, DocumentId};

use super::{column, timestamp_column, DocumentRepository, RepositoryError};
use crate::DbPool;

pub struct SqlDocumentRepository {
    pool: DbPool,
}

impl SqlDocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for SqlDocumentRepository {
    async fn list_visible(&self) -> Result<Vec<Document>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, title, category, file, visible, uploaded_at FROM documents
             WHERE visible = 1 ORDER BY uploaded_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let visible: i64 = column(row, "visible")?;
                Ok(Document {
                    id: DocumentId(column(row, "id")?),
                    title: column(row, "title")?,
                    category: column(row, "category")?,
                    file: column(row, "file")?,
                    visible: visible != 0,
                    uploaded_at: timestamp_column(row, "uploaded_at")?,
                })
            })
            .collect()
    }
}
