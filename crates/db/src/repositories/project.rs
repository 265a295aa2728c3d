use async_trait::async_trait;
use chrono::Utc;

use ndawonga_core::domain::project::{NewProject, Project, ProjectId, ProjectStatus};

use super::{column, format_timestamp, timestamp_column, ProjectRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProjectRepository {
    pool: DbPool,
}

impl SqlProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const PROJECT_COLUMNS: &str =
    "id, title, description, type, year, location, featured_image, status, created_at";

fn row_to_project(row: &sqlx::sqlite::SqliteRow) -> Result<Project, RepositoryError> {
    let status: String = column(row, "status")?;
    let year: Option<i64> = column(row, "year")?;
    Ok(Project {
        id: ProjectId(column(row, "id")?),
        title: column(row, "title")?,
        description: column(row, "description")?,
        project_type: column(row, "type")?,
        year: year
            .map(|value| {
                i32::try_from(value)
                    .map_err(|_| RepositoryError::Decode(format!("year: {value} out of range")))
            })
            .transpose()?,
        location: column(row, "location")?,
        featured_image: column(row, "featured_image")?,
        status: ProjectStatus::parse(&status),
        created_at: timestamp_column(row, "created_at")?,
    })
}

#[async_trait]
impl ProjectRepository for SqlProjectRepository {
    async fn list_active(&self) -> Result<Vec<Project>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects
             WHERE status = 'active' ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_project).collect()
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_project).transpose()
    }

    async fn create(&self, project: NewProject) -> Result<ProjectId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO projects (title, description, type, year, location, featured_image,
                                   status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.project_type)
        .bind(project.year.map(i64::from))
        .bind(&project.location)
        .bind(&project.featured_image)
        .bind(ProjectStatus::Active.as_str())
        .bind(format_timestamp(Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(ProjectId(result.last_insert_rowid()))
    }
}
