use serde::Deserialize;

use super::{non_blank, required};
use crate::errors::DomainError;

pub const DEFAULT_CONTACT_CATEGORY: &str = "General";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContactMessageId(pub i64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub category: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ContactSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub category: Option<String>,
}

impl ContactSubmission {
    pub fn into_new_message(self) -> Result<NewContactMessage, DomainError> {
        Ok(NewContactMessage {
            name: required(self.name, "name")?,
            email: required(self.email, "email")?,
            phone: non_blank(self.phone),
            subject: non_blank(self.subject),
            message: non_blank(self.message),
            category: non_blank(self.category)
                .unwrap_or_else(|| DEFAULT_CONTACT_CATEGORY.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ContactSubmission;

    #[test]
    fn category_defaults_to_general() {
        let message = ContactSubmission {
            name: Some("Sipho".to_string()),
            email: Some("sipho@example.co.za".to_string()),
            subject: Some("CIDB grading".to_string()),
            ..ContactSubmission::default()
        }
        .into_new_message()
        .expect("valid message");

        assert_eq!(message.category, "General");
        assert_eq!(message.subject.as_deref(), Some("CIDB grading"));
    }
}
