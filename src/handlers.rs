use axum::extract::rejection::JsonRejection;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode, response::IntoResponse};
use tracing::{debug, info, warn};

use crate::{
    AppState,
    auth::Caller,
    error::ApiError,
    models::{BoardSummary, Course, CourseInput, ErrorBody},
    store::StoreError,
    validation::{ValidationMode, is_valid_slug, validate_course},
};

#[derive(Debug, serde::Deserialize)]
pub struct CourseListQuery {
    pub status: Option<String>,
}

#[utoipa::path(get, path = "/", tag = "service")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Course Dashboard API",
        "endpoints": {
            "/api/courses": "List or create courses",
            "/api/courses/{id}": "Get or update a course",
            "/api/courses/{id}/board": "Get the task board of a course"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "service")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "service")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/api/courses",
    params(
        ("status" = Option<String>, Query, description = "Only courses with exactly this status")
    ),
    responses(
        (status = 200, description = "List of courses", body = [Course]),
        (status = 401, description = "Missing or malformed bearer token", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "courses"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseListQuery>,
) -> Json<Vec<Course>> {
    Json(state.courses.list(query.status.as_deref()).await)
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course slug")),
    responses(
        (status = 200, description = "The course", body = Course),
        (status = 404, description = "Unknown course", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, ApiError> {
    Ok(Json(state.courses.get(&id).await?))
}

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CourseInput,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Invalid JSON or failed validation", body = ErrorBody),
        (status = 409, description = "Slug already in use", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "courses"
)]
pub async fn create_course(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<CourseInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let course = validate_course(&input, ValidationMode::Strict)
        .map_err(ApiError::Validation)?
        .into_course()
        .ok_or_else(|| ApiError::Internal("validated course is incomplete".into()))?;

    let id = course.id.clone();
    let created = state.courses.create(course).await.inspect_err(|err| {
        if *err == StoreError::Conflict {
            warn!(course_id = %id, "rejected duplicate course slug");
        }
    })?;
    info!(course_id = %created.id, authenticated = caller.is_authenticated(), "course created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// An empty update body carries no fields and leaves the course as is.
fn parse_update_body(body: &[u8]) -> Result<CourseInput, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CourseInput::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        debug!("rejected request body: {err}");
        ApiError::BadRequest("invalid JSON payload".into())
    })
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course slug")),
    request_body = CourseInput,
    responses(
        (status = 200, description = "Updated course", body = Course),
        (status = 400, description = "Invalid JSON, field or date range", body = ErrorBody),
        (status = 404, description = "Unknown course", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "courses"
)]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    caller: Caller,
    body: Bytes,
) -> Result<Json<Course>, ApiError> {
    if !state.courses.contains(&id).await {
        return Err(StoreError::NotFound.into());
    }

    let input = parse_update_body(&body)?;
    let patch = validate_course(&input, ValidationMode::Partial).map_err(|errors| {
        errors
            .into_iter()
            .next()
            .map(|first| ApiError::BadRequest(first.message))
            .unwrap_or_else(|| ApiError::Internal("validation failed without errors".into()))
    })?;

    let updated = state.courses.update(&id, patch).await?;
    info!(course_id = %updated.id, authenticated = caller.is_authenticated(), "course updated");

    Ok(Json(updated))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/board",
    params(("id" = String, Path, description = "Course slug")),
    responses(
        (status = 200, description = "Task board of the course", body = BoardSummary),
        (status = 400, description = "Malformed course id", body = ErrorBody),
        (status = 404, description = "Unknown course", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "courses"
)]
pub async fn get_course_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BoardSummary>, ApiError> {
    if !is_valid_slug(&id) {
        return Err(ApiError::BadRequest("invalid course ID format".into()));
    }
    let course = state.courses.get(&id).await?;
    Ok(Json(state.boards.summary_for(&course)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_body_is_a_no_op() {
        let input = parse_update_body(b"").unwrap();
        assert!(input.name.is_none() && input.description.is_none());
        assert!(parse_update_body(b"  \n").is_ok());
    }

    #[test]
    fn test_malformed_update_body_is_rejected() {
        match parse_update_body(b"{not json") {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "invalid JSON payload"),
            other => panic!("expected bad request, got {other:?}"),
        }
        assert!(parse_update_body(br#"{"name": 42}"#).is_err());
    }
}
