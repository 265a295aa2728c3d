//! Form intake for the admin create endpoints.
//!
//! `POST /api/projects` and `POST /api/tenders` accept either a JSON body or a
//! `multipart/form-data` form carrying one attached file. Attached files are
//! written to `server.uploads_dir` as `<unix millis>-<sanitized name>` and the
//! stored name is what ends up in the database row.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use chrono::Utc;
use ndawonga_core::errors::{ApplicationError, DomainError};
use serde::de::DeserializeOwned;
use tracing::info;

/// Ceiling for a create request including its attachment.
pub const UPLOAD_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// A file part pulled out of a multipart form, not yet on disk.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub original_name: String,
    pub bytes: Bytes,
}

/// Submission types that can also be read from plain form fields.
pub trait FormFields: Sized {
    fn from_fields(fields: HashMap<String, String>) -> Result<Self, DomainError>;
}

#[derive(Clone, Debug, Default)]
pub struct UploadStore {
    dir: Option<PathBuf>,
}

impl UploadStore {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Writes the file and returns the generated name it was stored under.
    pub async fn save(&self, upload: &UploadedFile) -> Result<String, ApplicationError> {
        let dir = self.dir.as_deref().ok_or_else(|| {
            ApplicationError::Configuration(
                "server.uploads_dir is not set; file uploads are disabled".to_owned(),
            )
        })?;

        tokio::fs::create_dir_all(dir).await.map_err(|error| {
            ApplicationError::Collaborator(format!(
                "could not create uploads dir `{}`: {error}",
                dir.display()
            ))
        })?;

        let name = stored_name(Utc::now().timestamp_millis(), &upload.original_name);
        tokio::fs::write(dir.join(&name), &upload.bytes).await.map_err(|error| {
            ApplicationError::Collaborator(format!("could not write upload `{name}`: {error}"))
        })?;

        info!(
            event_name = "api.uploads.stored",
            stored_name = %name,
            size_bytes = upload.bytes.len(),
            "upload stored"
        );
        Ok(name)
    }
}

/// `<millis>-<name>` with the client path stripped, whitespace turned into `-`
/// and anything outside `[A-Za-z0-9._-]` replaced by `_`.
pub fn stored_name(millis: i64, original_name: &str) -> String {
    // Some browsers still send the full Windows path.
    let base = original_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let base = Path::new(base).file_name().and_then(|name| name.to_str()).unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| match c {
            c if c.is_whitespace() => '-',
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => c,
            _ => '_',
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        format!("{millis}-upload")
    } else {
        format!("{millis}-{cleaned}")
    }
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.get(.."multipart/form-data".len()))
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("multipart/form-data"))
}

fn malformed_body(reason: String) -> ApplicationError {
    DomainError::ValidationGap { field: "body", reason }.into()
}

/// Reads a submission from a JSON body or from a multipart form whose
/// `file_field` part, when present and non-empty, is returned alongside.
pub async fn read_submission<T>(
    request: Request,
    file_field: &str,
) -> Result<(T, Option<UploadedFile>), ApplicationError>
where
    T: DeserializeOwned + FormFields,
{
    if !is_multipart(&request) {
        let Json(submission) = Json::<T>::from_request(request, &())
            .await
            .map_err(|rejection| malformed_body(rejection.body_text()))?;
        return Ok((submission, None));
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|rejection| malformed_body(rejection.body_text()))?;
    let mut fields = HashMap::new();
    let mut upload = None;

    while let Some(field) =
        multipart.next_field().await.map_err(|error| malformed_body(error.body_text()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == file_field {
            if let Some(original_name) = field.file_name().map(str::to_owned) {
                let bytes =
                    field.bytes().await.map_err(|error| malformed_body(error.body_text()))?;
                // Browsers send an empty part when no file was picked.
                if !original_name.trim().is_empty() && !bytes.is_empty() {
                    upload = Some(UploadedFile { original_name, bytes });
                }
                continue;
            }
        }

        let value = field.text().await.map_err(|error| malformed_body(error.body_text()))?;
        fields.insert(name, value);
    }

    Ok((T::from_fields(fields)?, upload))
}
