use async_trait::async_trait;

use ndawonga_core::domain::team::{TeamMember, TeamMemberId};

use super::{column, RepositoryError, TeamRepository};
use crate::DbPool;

pub struct SqlTeamRepository {
    pool: DbPool,
}

impl SqlTeamRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for SqlTeamRepository {
    async fn list(&self) -> Result<Vec<TeamMember>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, role, bio, photo, linkedin FROM team ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(TeamMember {
                    id: TeamMemberId(column(row, "id")?),
                    name: column(row, "name")?,
                    role: column(row, "role")?,
                    bio: column(row, "bio")?,
                    photo: column(row, "photo")?,
                    linkedin: column(row, "linkedin")?,
                })
            })
            .collect()
    }
}
