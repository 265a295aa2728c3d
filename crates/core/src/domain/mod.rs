pub mod chat;
pub mod contact;
pub mod document;
pub mod project;
pub mod quote_request;
pub mod team;
pub mod tender;

/// Collapses blank form values to `None`, the way the site's forms submit
/// untouched inputs as empty strings.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

pub(crate) fn required(
    value: Option<String>,
    field: &'static str,
) -> Result<String, crate::errors::DomainError> {
    non_blank(value).ok_or_else(|| crate::errors::DomainError::missing(field))
}
