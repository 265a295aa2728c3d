//! Site content API: projects, tenders, team, documents and the contact form.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, Request, State},
    routing::{get, post},
    Json, Router,
};
use ndawonga_core::domain::contact::ContactSubmission;
use ndawonga_core::domain::document::Document;
use ndawonga_core::domain::project::{Project, ProjectId, ProjectSubmission};
use ndawonga_core::domain::team::TeamMember;
use ndawonga_core::domain::tender::{Tender, TenderSubmission};
use ndawonga_core::errors::{ApplicationError, DomainError};
use serde::Serialize;
use tracing::info;

use crate::error::{correlation_id, json_body, reject, ApiError};
use crate::state::AppState;
use crate::uploads::{read_submission, FormFields, UPLOAD_BODY_LIMIT};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Created {
    pub id: i64,
    pub message: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route("/api/projects/{id}", get(get_project))
        .route("/api/tenders", get(list_tenders).post(create_tender))
        .route("/api/team", get(list_team))
        .route("/api/documents", get(list_documents))
        .route("/api/contact", post(submit_contact))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

fn non_empty_field(fields: &mut HashMap<String, String>, name: &str) -> Option<String> {
    fields.remove(name).filter(|value| !value.trim().is_empty())
}

impl FormFields for ProjectSubmission {
    fn from_fields(mut fields: HashMap<String, String>) -> Result<Self, DomainError> {
        let year = non_empty_field(&mut fields, "year")
            .map(|raw| {
                raw.trim().parse::<i32>().map_err(|_| DomainError::ValidationGap {
                    field: "year",
                    reason: format!("`{raw}` is not a year"),
                })
            })
            .transpose()?;

        Ok(Self {
            title: fields.remove("title"),
            description: fields.remove("description"),
            project_type: fields.remove("type"),
            year,
            location: fields.remove("location"),
            featured_image: None,
        })
    }
}

impl FormFields for TenderSubmission {
    fn from_fields(mut fields: HashMap<String, String>) -> Result<Self, DomainError> {
        // Checkbox semantics: present and truthy means featured.
        let featured = fields.remove("featured").is_some_and(|raw| {
            matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1" | "on" | "yes")
        });

        Ok(Self {
            title: fields.remove("title"),
            description: fields.remove("description"),
            closing_date: fields.remove("closing_date"),
            file: None,
            featured,
        })
    }
}

pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    let correlation_id = correlation_id();
    let projects = state
        .projects
        .list_active()
        .await
        .map_err(|error| reject("api.projects.list_failed", &correlation_id, error))?;
    Ok(Json(projects))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Project>, ApiError> {
    const EVENT: &str = "api.projects.get_failed";
    let correlation_id = correlation_id();

    let project = state
        .projects
        .find_by_id(ProjectId(id))
        .await
        .map_err(|error| reject(EVENT, &correlation_id, error))?;

    project.map(Json).ok_or_else(|| {
        reject(
            EVENT,
            &correlation_id,
            ApplicationError::NotFound { entity: "project", id: id.to_string() },
        )
    })
}

/// Accepts JSON or a multipart form with an optional `featured_image` file.
pub async fn create_project(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<Created>, ApiError> {
    const EVENT: &str = "api.projects.create_failed";
    let correlation_id = correlation_id();

    let (submission, upload) = read_submission::<ProjectSubmission>(request, "featured_image")
        .await
        .map_err(|error| reject(EVENT, &correlation_id, error))?;
    let mut project =
        submission.into_new_project().map_err(|error| reject(EVENT, &correlation_id, error))?;
    if let Some(upload) = upload {
        let stored = state
            .uploads
            .save(&upload)
            .await
            .map_err(|error| reject(EVENT, &correlation_id, error))?;
        project.featured_image = Some(stored);
    }
    let id = state
        .projects
        .create(project)
        .await
        .map_err(|error| reject(EVENT, &correlation_id, error))?;

    info!(
        event_name = "api.projects.created",
        correlation_id = %correlation_id,
        project_id = id.0,
        "project created"
    );
    Ok(Json(Created { id: id.0, message: "Project created" }))
}

pub async fn list_tenders(State(state): State<AppState>) -> Result<Json<Vec<Tender>>, ApiError> {
    let correlation_id = correlation_id();
    let tenders = state
        .tenders
        .list()
        .await
        .map_err(|error| reject("api.tenders.list_failed", &correlation_id, error))?;
    Ok(Json(tenders))
}

/// Accepts JSON or a multipart form with an optional `file` attachment.
pub async fn create_tender(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<Created>, ApiError> {
    const EVENT: &str = "api.tenders.create_failed";
    let correlation_id = correlation_id();

    let (submission, upload) = read_submission::<TenderSubmission>(request, "file")
        .await
        .map_err(|error| reject(EVENT, &correlation_id, error))?;
    let mut tender =
        submission.into_new_tender().map_err(|error| reject(EVENT, &correlation_id, error))?;
    if let Some(upload) = upload {
        let stored = state
            .uploads
            .save(&upload)
            .await
            .map_err(|error| reject(EVENT, &correlation_id, error))?;
        tender.file = Some(stored);
    }
    let id = state
        .tenders
        .create(tender)
        .await
        .map_err(|error| reject(EVENT, &correlation_id, error))?;

    info!(
        event_name = "api.tenders.created",
        correlation_id = %correlation_id,
        tender_id = id.0,
        "tender created"
    );
    Ok(Json(Created { id: id.0, message: "Tender created" }))
}

pub async fn list_team(State(state): State<AppState>) -> Result<Json<Vec<TeamMember>>, ApiError> {
    let correlation_id = correlation_id();
    let team = state
        .team
        .list()
        .await
        .map_err(|error| reject("api.team.list_failed", &correlation_id, error))?;
    Ok(Json(team))
}

pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let correlation_id = correlation_id();
    let documents = state
        .documents
        .list_visible()
        .await
        .map_err(|error| reject("api.documents.list_failed", &correlation_id, error))?;
    Ok(Json(documents))
}

pub async fn submit_contact(
    State(state): State<AppState>,
    body: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Json<Created>, ApiError> {
    const EVENT: &str = "api.contact.submit_failed";
    let correlation_id = correlation_id();

    let message = json_body(EVENT, &correlation_id, body)?
        .into_new_message()
        .map_err(|error| reject(EVENT, &correlation_id, error))?;
    let category = message.category.clone();
    let id = state
        .contact
        .submit(message)
        .await
        .map_err(|error| reject(EVENT, &correlation_id, error))?;

    info!(
        event_name = "api.contact.submitted",
        correlation_id = %correlation_id,
        message_id = id.0,
        category = %category,
        "contact message saved"
    );
    Ok(Json(Created { id: id.0, message: "Message saved" }))
}
