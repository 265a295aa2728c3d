use chrono::Utc;

use ndawonga_core::domain::quote_request::{NewQuoteRequest, QuoteRequest, QuoteRequestId};

use super::{
    column, decimal_column, format_timestamp, timestamp_column, QuoteRequestRepository,
    RepositoryError,
};
use crate::DbPool;

pub struct SqlQuoteRequestRepository {
    pool: DbPool,
}

impl SqlQuoteRequestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_quote_request(row: &sqlx::sqlite::SqliteRow) -> Result<QuoteRequest, RepositoryError> {
    Ok(QuoteRequest {
        id: QuoteRequestId(column(row, "id")?),
        name: column(row, "name")?,
        email: column(row, "email")?,
        phone: column(row, "phone")?,
        project_type: column(row, "project_type")?,
        area_sq_m: decimal_column(row, "area_sq_m")?,
        complexity: column(row, "complexity")?,
        estimated_cost: decimal_column(row, "estimated_cost")?,
        message: column(row, "message")?,
        created_at: timestamp_column(row, "created_at")?,
    })
}

#[async_trait::async_trait]
impl QuoteRequestRepository for SqlQuoteRequestRepository {
    async fn submit(&self, request: NewQuoteRequest) -> Result<QuoteRequestId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO quotes (name, email, phone, project_type, area_sq_m, complexity,
                                 estimated_cost, message, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.project_type)
        .bind(request.area_sq_m.to_string())
        .bind(&request.complexity)
        .bind(request.estimated_cost.to_string())
        .bind(&request.message)
        .bind(format_timestamp(Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(QuoteRequestId(result.last_insert_rowid()))
    }

    async fn find_by_id(
        &self,
        id: QuoteRequestId,
    ) -> Result<Option<QuoteRequest>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, email, phone, project_type, area_sq_m, complexity,
                    estimated_cost, message, created_at
             FROM quotes WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_quote_request).transpose()
    }
}
