use async_trait::async_trait;
use chrono::Utc;

use ndawonga_core::chat::TenderLookup;
use ndawonga_core::domain::tender::{NewTender, Tender, TenderId, TenderSummary};
use ndawonga_core::errors::ApplicationError;

use super::{
    column, date_column, format_date, format_timestamp, timestamp_column, RepositoryError,
    TenderRepository,
};
use crate::DbPool;

pub struct SqlTenderRepository {
    pool: DbPool,
}

impl SqlTenderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_tender(row: &sqlx::sqlite::SqliteRow) -> Result<Tender, RepositoryError> {
    let featured: i64 = column(row, "featured")?;
    Ok(Tender {
        id: TenderId(column(row, "id")?),
        title: column(row, "title")?,
        description: column(row, "description")?,
        closing_date: date_column(row, "closing_date")?,
        file: column(row, "file")?,
        featured: featured != 0,
        created_at: timestamp_column(row, "created_at")?,
    })
}

#[async_trait]
impl TenderRepository for SqlTenderRepository {
    async fn list(&self) -> Result<Vec<Tender>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, title, description, closing_date, file, featured, created_at
             FROM tenders ORDER BY featured DESC, closing_date DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_tender).collect()
    }

    async fn latest_by_closing_date(
        &self,
        limit: u32,
    ) -> Result<Vec<TenderSummary>, RepositoryError> {
        // NULL closing dates sort last under DESC in SQLite.
        let rows = sqlx::query(
            "SELECT title, closing_date FROM tenders
             ORDER BY closing_date DESC, id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(TenderSummary {
                    title: column(row, "title")?,
                    closing_date: date_column(row, "closing_date")?,
                })
            })
            .collect()
    }

    async fn create(&self, tender: NewTender) -> Result<TenderId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO tenders (title, description, closing_date, file, featured, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&tender.title)
        .bind(&tender.description)
        .bind(tender.closing_date.map(format_date))
        .bind(&tender.file)
        .bind(i64::from(tender.featured))
        .bind(format_timestamp(Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(TenderId(result.last_insert_rowid()))
    }
}

#[async_trait]
impl TenderLookup for SqlTenderRepository {
    async fn latest_tenders(&self, limit: u32) -> Result<Vec<TenderSummary>, ApplicationError> {
        Ok(self.latest_by_closing_date(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use ndawonga_core::domain::tender::NewTender;

    use super::SqlTenderRepository;
    use crate::repositories::TenderRepository;
    use crate::{connect_with_settings, migrations};

    fn tender(title: &str, closing: Option<(i32, u32, u32)>, featured: bool) -> NewTender {
        NewTender {
            title: title.to_string(),
            description: None,
            closing_date: closing.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            file: None,
            featured,
        }
    }

    async fn seeded() -> SqlTenderRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let repo = SqlTenderRepository::new(pool);
        for item in [
            tender("Undated", None, false),
            tender("March", Some((2026, 3, 1)), false),
            tender("December", Some((2026, 12, 15)), true),
            tender("July", Some((2026, 7, 20)), false),
        ] {
            repo.create(item).await.expect("create");
        }
        repo
    }

    #[tokio::test]
    async fn latest_orders_by_closing_date_descending_with_undated_last() {
        let repo = seeded().await;

        let latest = repo.latest_by_closing_date(5).await.expect("latest");
        let titles: Vec<&str> = latest.iter().map(|t| t.title.as_str()).collect();

        assert_eq!(titles, vec!["December", "July", "March", "Undated"]);
        assert_eq!(latest[0].closing_date, NaiveDate::from_ymd_opt(2026, 12, 15));
        assert_eq!(latest[3].closing_date, None);
    }

    #[tokio::test]
    async fn latest_respects_limit() {
        let repo = seeded().await;
        assert_eq!(repo.latest_by_closing_date(2).await.expect("latest").len(), 2);
    }

    #[tokio::test]
    async fn list_puts_featured_tenders_first() {
        let repo = seeded().await;

        let all = repo.list().await.expect("list");

        assert_eq!(all.len(), 4);
        assert_eq!(all[0].title, "December");
        assert!(all[0].featured);
        assert_eq!(all[1].title, "July");
    }
}
