use sqlx::Executor;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Rows the demo fixture guarantees, keyed by table and id.
const SEED_ROWS: &[SeedRowContract] = &[
    SeedRowContract { label: "project-road-upgrade", table: "projects", id: 1, title: "Provincial Road Upgrade" },
    SeedRowContract { label: "project-bulk-earthworks", table: "projects", id: 2, title: "Bulk Earthworks for Housing" },
    SeedRowContract { label: "project-water-reticulation", table: "projects", id: 3, title: "Water Reticulation Upgrade" },
    SeedRowContract { label: "tender-district-road", table: "tenders", id: 1, title: "Rehabilitation of District Road D3810" },
    SeedRowContract { label: "tender-bulk-water-pipes", table: "tenders", id: 2, title: "Supply of Bulk Water Pipes" },
    SeedRowContract { label: "tender-landfill-cell", table: "tenders", id: 3, title: "Landfill Cell Construction" },
    SeedRowContract { label: "team-managing-director", table: "team", id: 1, title: "Ndawonga Mthembu" },
    SeedRowContract { label: "team-projects-manager", table: "team", id: 2, title: "Zanele Khumalo" },
    SeedRowContract { label: "team-quantity-surveyor", table: "team", id: 3, title: "Pieter van Wyk" },
    SeedRowContract { label: "document-cidb", table: "documents", id: 1, title: "CIDB Grading Certificate" },
    SeedRowContract { label: "document-bbbee", table: "documents", id: 2, title: "B-BBEE Level 1 Affidavit" },
    SeedRowContract { label: "document-profile", table: "documents", id: 3, title: "Company Profile" },
    SeedRowContract { label: "document-safety-draft", table: "documents", id: 4, title: "Draft Safety Plan" },
];

const SEED_TABLES: &[&str] = &["projects", "tenders", "team", "documents"];

/// Demo content for a fresh site: projects, tenders, team and documents.
///
/// Loading is idempotent; rows carry fixed ids and use `INSERT OR IGNORE`.
pub struct SiteSeedDataset;

impl SiteSeedDataset {
    pub const SQL: &str = include_str!("../../../config/fixtures/site_seed_data.sql");

    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        let count = |table: &str| SEED_ROWS.iter().filter(|row| row.table == table).count();
        let result = SeedResult {
            projects: count("projects"),
            tenders: count("tenders"),
            team_members: count("team"),
            documents: count("documents"),
        };
        tracing::info!(
            event_name = "db.seed.loaded",
            projects = result.projects,
            tenders = result.tenders,
            team_members = result.team_members,
            documents = result.documents,
            "site seed dataset loaded"
        );
        Ok(result)
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::with_capacity(SEED_ROWS.len());

        for row in SEED_ROWS {
            let title_column = if row.table == "team" { "name" } else { "title" };
            let present: i64 = sqlx::query_scalar(&format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1 AND {title_column} = ?2)",
                row.table
            ))
            .bind(row.id)
            .bind(row.title)
            .fetch_one(pool)
            .await?;
            checks.push((row.label, present == 1));
        }

        let all_present = checks.iter().all(|(_, present)| *present);
        Ok(VerificationResult { all_present, checks })
    }

    /// Removes the seeded rows, leaving anything else untouched.
    pub async fn clean(pool: &DbPool) -> Result<(), RepositoryError> {
        let mut tx = pool.begin().await?;

        for table in SEED_TABLES {
            let ids = SEED_ROWS
                .iter()
                .filter(|row| row.table == *table)
                .map(|row| row.id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            sqlx::query(&format!("DELETE FROM {table} WHERE id IN ({ids})"))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct SeedRowContract {
    label: &'static str,
    table: &'static str,
    id: i64,
    title: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedResult {
    pub projects: usize,
    pub tenders: usize,
    pub team_members: usize,
    pub documents: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{
        DocumentRepository, ProjectRepository, SqlDocumentRepository, SqlProjectRepository,
        SqlTenderRepository, TenderRepository,
    };
    use crate::{connect_with_settings, migrations};

    async fn migrated_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30)
            .await
            .expect("connect to test database");
        migrations::run_pending(&pool).await.expect("run migrations");
        pool
    }

    #[test]
    fn sql_fixture_is_present() {
        assert!(SiteSeedDataset::SQL.contains("INSERT OR IGNORE INTO projects"));
    }

    #[tokio::test]
    async fn load_is_idempotent_and_verifies() {
        let pool = migrated_pool().await;

        let first = SiteSeedDataset::load(&pool).await.expect("load seed fixtures");
        let first_verification = SiteSeedDataset::verify(&pool).await.expect("verify");
        assert!(first_verification.all_present);
        assert_eq!(first.projects, 3);
        assert_eq!(first.documents, 4);

        let second = SiteSeedDataset::load(&pool).await.expect("reload seed fixtures");
        let second_verification = SiteSeedDataset::verify(&pool).await.expect("re-verify");
        assert_eq!(first, second);
        assert_eq!(first_verification.checks, second_verification.checks);

        let project_rows: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM projects")
            .fetch_one(&pool)
            .await
            .expect("count projects");
        assert_eq!(project_rows, 3);
    }

    #[tokio::test]
    async fn verify_reports_missing_rows_before_load() {
        let pool = migrated_pool().await;

        let verification = SiteSeedDataset::verify(&pool).await.expect("verify");

        assert!(!verification.all_present);
        assert!(verification.checks.iter().all(|(_, present)| !present));
    }

    #[tokio::test]
    async fn seeded_content_reads_through_repositories() {
        let pool = migrated_pool().await;
        SiteSeedDataset::load(&pool).await.expect("load seed fixtures");

        let projects = SqlProjectRepository::new(pool.clone()).list_active().await.expect("projects");
        assert_eq!(projects[0].title, "Provincial Road Upgrade");

        let documents =
            SqlDocumentRepository::new(pool.clone()).list_visible().await.expect("documents");
        assert_eq!(documents.len(), 3);
        assert_eq!(documents[0].title, "B-BBEE Level 1 Affidavit");

        let latest = SqlTenderRepository::new(pool.clone())
            .latest_by_closing_date(5)
            .await
            .expect("tenders");
        assert_eq!(latest.last().map(|t| t.title.as_str()), Some("Landfill Cell Construction"));
    }

    #[tokio::test]
    async fn clean_removes_seeded_rows() {
        let pool = migrated_pool().await;
        SiteSeedDataset::load(&pool).await.expect("load seed fixtures");

        SiteSeedDataset::clean(&pool).await.expect("clean");

        let verification = SiteSeedDataset::verify(&pool).await.expect("verify");
        assert!(verification.checks.iter().all(|(_, present)| !present));
    }
}
