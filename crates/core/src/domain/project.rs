use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{non_blank, required};
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "archived" => Self::Archived,
            _ => Self::Active,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub project_type: Option<String>,
    pub year: Option<i32>,
    pub location: Option<String>,
    /// Filename in the upload store, served under `/uploads`.
    pub featured_image: Option<String>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub project_type: Option<String>,
    pub year: Option<i32>,
    pub location: Option<String>,
    pub featured_image: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectSubmission {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub project_type: Option<String>,
    pub year: Option<i32>,
    pub location: Option<String>,
    pub featured_image: Option<String>,
}

impl ProjectSubmission {
    pub fn into_new_project(self) -> Result<NewProject, DomainError> {
        Ok(NewProject {
            title: required(self.title, "title")?,
            description: required(self.description, "description")?,
            project_type: non_blank(self.project_type),
            year: self.year,
            location: non_blank(self.location),
            featured_image: non_blank(self.featured_image),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectStatus, ProjectSubmission};

    #[test]
    fn submission_reads_type_field() {
        let submission: ProjectSubmission = serde_json::from_str(
            r#"{"title":"Provincial Road Upgrade","description":"12km","type":"Road Construction","year":2024}"#,
        )
        .expect("deserialize");

        let project = submission.into_new_project().expect("valid project");
        assert_eq!(project.project_type.as_deref(), Some("Road Construction"));
        assert_eq!(project.year, Some(2024));
    }

    #[test]
    fn unknown_status_reads_as_active() {
        assert_eq!(ProjectStatus::parse("archived"), ProjectStatus::Archived);
        assert_eq!(ProjectStatus::parse("draft"), ProjectStatus::Active);
    }
}
