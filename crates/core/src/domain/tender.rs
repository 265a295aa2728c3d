use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{non_blank, required};
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenderId(pub i64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tender {
    pub id: TenderId,
    pub title: String,
    pub description: Option<String>,
    pub closing_date: Option<NaiveDate>,
    pub file: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Read-only projection the chat responder lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderSummary {
    pub title: String,
    pub closing_date: Option<NaiveDate>,
}

impl From<&Tender> for TenderSummary {
    fn from(tender: &Tender) -> Self {
        Self { title: tender.title.clone(), closing_date: tender.closing_date }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTender {
    pub title: String,
    pub description: Option<String>,
    pub closing_date: Option<NaiveDate>,
    pub file: Option<String>,
    pub featured: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TenderSubmission {
    pub title: Option<String>,
    pub description: Option<String>,
    pub closing_date: Option<String>,
    pub file: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

impl TenderSubmission {
    pub fn into_new_tender(self) -> Result<NewTender, DomainError> {
        let closing_date = non_blank(self.closing_date)
            .map(|raw| {
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                    DomainError::ValidationGap {
                        field: "closing_date",
                        reason: format!("`{raw}` is not a YYYY-MM-DD date"),
                    }
                })
            })
            .transpose()?;

        Ok(NewTender {
            title: required(self.title, "title")?,
            description: non_blank(self.description),
            closing_date,
            file: non_blank(self.file),
            featured: self.featured,
        })
    }
}
