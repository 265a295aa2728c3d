use async_trait::async_trait;
use chrono::Utc;

use ndawonga_core::domain::contact::{ContactMessageId, NewContactMessage};

use super::{format_timestamp, ContactRepository, RepositoryError};
use crate::DbPool;

pub struct SqlContactRepository {
    pool: DbPool,
}

impl SqlContactRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlContactRepository {
    async fn submit(
        &self,
        message: NewContactMessage,
    ) -> Result<ContactMessageId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO messages (name, email, phone, subject, message, category, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(&message.category)
        .bind(format_timestamp(Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(ContactMessageId(result.last_insert_rowid()))
    }
}
