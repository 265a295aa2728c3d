use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{non_blank, required};
use crate::errors::DomainError;
use crate::pricing::table::DEFAULT_COMPLEXITY;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuoteRequestId(pub i64);

/// A stored quote request. `estimated_cost` is the figure the client computed
/// and is never recomputed server-side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub id: QuoteRequestId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub project_type: Option<String>,
    pub area_sq_m: Decimal,
    pub complexity: String,
    pub estimated_cost: Decimal,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewQuoteRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub project_type: Option<String>,
    pub area_sq_m: Decimal,
    pub complexity: String,
    pub estimated_cost: Decimal,
    pub message: Option<String>,
}

/// Quote form payload as posted by the site.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct QuoteSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub project_type: Option<String>,
    pub area_sq_m: Option<Decimal>,
    pub complexity: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub message: Option<String>,
}

impl QuoteSubmission {
    pub fn into_new_request(self) -> Result<NewQuoteRequest, DomainError> {
        let area_sq_m = self.area_sq_m.unwrap_or(Decimal::ZERO);
        if area_sq_m < Decimal::ZERO {
            return Err(DomainError::ValidationGap {
                field: "area_sq_m",
                reason: "must not be negative".to_owned(),
            });
        }

        let estimated_cost = self.estimated_cost.unwrap_or(Decimal::ZERO);
        if estimated_cost < Decimal::ZERO {
            return Err(DomainError::ValidationGap {
                field: "estimated_cost",
                reason: "must not be negative".to_owned(),
            });
        }

        Ok(NewQuoteRequest {
            name: required(self.name, "name")?,
            email: required(self.email, "email")?,
            phone: non_blank(self.phone),
            project_type: non_blank(self.project_type),
            area_sq_m,
            complexity: non_blank(self.complexity)
                .unwrap_or_else(|| DEFAULT_COMPLEXITY.to_string()),
            estimated_cost,
            message: non_blank(self.message),
        })
    }
}
