use ndawonga_core::config::{AppConfig, ConfigError};
use ndawonga_db::{connect_with_config, migrations, DbPool};
use thiserror::Error;
use tracing::info;

use crate::state::AppState;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool =
        connect_with_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let state = AppState::from_pool(db_pool.clone(), config.pricing.clone())
        .with_uploads_dir(config.server.uploads_dir.clone());
    Ok(Application { config, db_pool, state })
}

#[cfg(test)]
mod tests {
    use ndawonga_core::config::{AppConfig, ConfigOverrides, LoadOptions};
    use ndawonga_core::domain::quote_request::NewQuoteRequest;
    use rust_decimal::Decimal;

    use crate::bootstrap::{bootstrap_with_config, Application, BootstrapError};

    async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
        let config = AppConfig::load(options)?;
        bootstrap_with_config(config).await
    }

    fn options(database_url: &str) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_rejects_non_sqlite_url() {
        let result = bootstrap(options("postgres://localhost/ndawonga")).await;

        assert!(matches!(result, Err(BootstrapError::Config(_))));
    }

    #[tokio::test]
    async fn bootstrap_migrates_and_wires_the_quote_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("bootstrap.db").display());

        let app = bootstrap(options(&url)).await.expect("bootstrap should succeed");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('quotes', 'chatbot_logs', 'tenders')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("tables should exist after bootstrap");
        assert_eq!(table_count, 3);

        let id = app
            .state
            .quotes
            .submit(NewQuoteRequest {
                name: "Smoke".to_string(),
                email: "smoke@example.co.za".to_string(),
                phone: None,
                project_type: None,
                area_sq_m: Decimal::ZERO,
                complexity: "medium".to_string(),
                estimated_cost: Decimal::ZERO,
                message: None,
            })
            .await
            .expect("submit");
        assert!(id.0 > 0);
        assert_eq!(app.config.pricing, *app.state.pricing);

        app.db_pool.close().await;
    }
}
