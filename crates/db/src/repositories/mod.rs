use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use sqlx::Row;
use thiserror::Error;

use ndawonga_core::domain::chat::{ChatExchange, ChatExchangeId, NewChatExchange};
use ndawonga_core::domain::contact::{ContactMessageId, NewContactMessage};
use ndawonga_core::domain::document::Document;
use ndawonga_core::domain::project::{NewProject, Project, ProjectId};
use ndawonga_core::domain::quote_request::{NewQuoteRequest, QuoteRequest, QuoteRequestId};
use ndawonga_core::domain::team::TeamMember;
use ndawonga_core::domain::tender::{NewTender, Tender, TenderId, TenderSummary};
use ndawonga_core::errors::ApplicationError;

pub mod chat_log;
pub mod contact;
pub mod document;
pub mod memory;
pub mod project;
pub mod quote_request;
pub mod team;
pub mod tender;

pub use chat_log::SqlChatLogRepository;
pub use contact::SqlContactRepository;
pub use document::SqlDocumentRepository;
pub use memory::{
    InMemoryChatLogRepository, InMemoryQuoteRequestRepository, InMemoryTenderRepository,
};
pub use project::SqlProjectRepository;
pub use quote_request::SqlQuoteRequestRepository;
pub use team::SqlTeamRepository;
pub use tender::SqlTenderRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        ApplicationError::Collaborator(error.to_string())
    }
}

/// Append-only store of submitted quote requests.
#[async_trait]
pub trait QuoteRequestRepository: Send + Sync {
    async fn submit(&self, request: NewQuoteRequest) -> Result<QuoteRequestId, RepositoryError>;
    async fn find_by_id(&self, id: QuoteRequestId)
        -> Result<Option<QuoteRequest>, RepositoryError>;
}

/// Append-only chat transcript.
#[async_trait]
pub trait ChatLogRepository: Send + Sync {
    async fn append(&self, exchange: NewChatExchange) -> Result<ChatExchangeId, RepositoryError>;
    async fn list_for_session(&self, session_id: &str)
        -> Result<Vec<ChatExchange>, RepositoryError>;
}

#[async_trait]
pub trait TenderRepository: Send + Sync {
    /// Featured first, then latest closing date.
    async fn list(&self) -> Result<Vec<Tender>, RepositoryError>;
    /// Latest closing date first, undated tenders last.
    async fn latest_by_closing_date(
        &self,
        limit: u32,
    ) -> Result<Vec<TenderSummary>, RepositoryError>;
    async fn create(&self, tender: NewTender) -> Result<TenderId, RepositoryError>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn list_active(&self) -> Result<Vec<Project>, RepositoryError>;
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError>;
    async fn create(&self, project: NewProject) -> Result<ProjectId, RepositoryError>;
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<TeamMember>, RepositoryError>;
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn list_visible(&self) -> Result<Vec<Document>, RepositoryError>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn submit(&self, message: NewContactMessage)
        -> Result<ContactMessageId, RepositoryError>;
}

/// Fixed-width UTC timestamps so TEXT ordering matches time ordering.
pub(crate) fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn format_date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

pub(crate) fn column<'r, T>(row: &'r sqlx::sqlite::SqliteRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name).map_err(|e| RepositoryError::Decode(format!("{name}: {e}")))
}

pub(crate) fn timestamp_column(
    row: &sqlx::sqlite::SqliteRow,
    name: &str,
) -> Result<DateTime<Utc>, RepositoryError> {
    let raw: String = column(row, name)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("{name}: `{raw}` is not RFC 3339: {e}")))
}

pub(crate) fn date_column(
    row: &sqlx::sqlite::SqliteRow,
    name: &str,
) -> Result<Option<NaiveDate>, RepositoryError> {
    let raw: Option<String> = column(row, name)?;
    raw.map(|value| {
        NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map_err(|e| RepositoryError::Decode(format!("{name}: `{value}` is not a date: {e}")))
    })
    .transpose()
}

pub(crate) fn decimal_column(
    row: &sqlx::sqlite::SqliteRow,
    name: &str,
) -> Result<Decimal, RepositoryError> {
    let raw: String = column(row, name)?;
    Decimal::from_str(&raw)
        .map_err(|e| RepositoryError::Decode(format!("{name}: `{raw}` is not a decimal: {e}")))
}
