use async_trait::async_trait;
use chrono::Utc;

use ndawonga_core::chat::ChatLogStore;
use ndawonga_core::domain::chat::{ChatExchange, ChatExchangeId, NewChatExchange};
use ndawonga_core::errors::ApplicationError;

use super::{column, format_timestamp, timestamp_column, ChatLogRepository, RepositoryError};
use crate::DbPool;

pub struct SqlChatLogRepository {
    pool: DbPool,
}

impl SqlChatLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_exchange(row: &sqlx::sqlite::SqliteRow) -> Result<ChatExchange, RepositoryError> {
    Ok(ChatExchange {
        id: ChatExchangeId(column(row, "id")?),
        session_id: column(row, "session_id")?,
        user_message: column(row, "user_message")?,
        bot_response: column(row, "bot_response")?,
        created_at: timestamp_column(row, "created_at")?,
    })
}

#[async_trait]
impl ChatLogRepository for SqlChatLogRepository {
    async fn append(&self, exchange: NewChatExchange) -> Result<ChatExchangeId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO chatbot_logs (session_id, user_message, bot_response, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&exchange.session_id)
        .bind(&exchange.user_message)
        .bind(&exchange.bot_response)
        .bind(format_timestamp(Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(ChatExchangeId(result.last_insert_rowid()))
    }

    async fn list_for_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<ChatExchange>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, session_id, user_message, bot_response, created_at
             FROM chatbot_logs WHERE session_id = ? ORDER BY id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_exchange).collect()
    }
}

#[async_trait]
impl ChatLogStore for SqlChatLogRepository {
    async fn append(&self, exchange: NewChatExchange) -> Result<ChatExchangeId, ApplicationError> {
        Ok(ChatLogRepository::append(self, exchange).await?)
    }
}

#[cfg(test)]
mod tests {
    use ndawonga_core::domain::chat::NewChatExchange;

    use super::SqlChatLogRepository;
    use crate::repositories::ChatLogRepository;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn exchanges_are_listed_per_session_in_append_order() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let repo = SqlChatLogRepository::new(pool);

        for (session, message) in [("a", "first"), ("b", "other"), ("a", "second")] {
            repo.append(NewChatExchange {
                session_id: session.to_string(),
                user_message: Some(message.to_string()),
                bot_response: "reply".to_string(),
            })
            .await
            .expect("append");
        }

        let session_a = repo.list_for_session("a").await.expect("list");
        let messages: Vec<&str> =
            session_a.iter().filter_map(|exchange| exchange.user_message.as_deref()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert!(session_a[0].id < session_a[1].id);
    }

    #[tokio::test]
    async fn absent_user_message_is_stored_as_null() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let repo = SqlChatLogRepository::new(pool.clone());

        repo.append(NewChatExchange {
            session_id: "web-session".to_string(),
            user_message: None,
            bot_response: "greeting".to_string(),
        })
        .await
        .expect("append");

        let raw: Option<String> = sqlx::query_scalar("SELECT user_message FROM chatbot_logs")
            .fetch_one(&pool)
            .await
            .expect("row");
        assert_eq!(raw, None);
        let history = repo.list_for_session("web-session").await.expect("list");
        assert_eq!(history[0].user_message, None);
    }
}
