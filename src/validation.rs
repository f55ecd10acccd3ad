use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{CourseInput, CoursePatch, CourseStatus, FieldError};

pub const MIN_TOKEN_LENGTH: usize = 10;
pub const MAX_TOKEN_LENGTH: usize = 500;
pub const MIN_SLUG_LENGTH: usize = 3;
pub const MAX_SLUG_LENGTH: usize = 50;
pub const MIN_NAME_LENGTH: usize = 3;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("regex compiles"));
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("regex compiles"));
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("regex compiles"));

const NAME_LENGTH_MSG: &str = "name must be between 3 and 100 characters";
const SLUG_FORMAT_MSG: &str =
    "slug must contain only lowercase letters, numbers and hyphens (3-50 chars)";
const STATUS_MSG: &str = "invalid status value. Must be one of: created, hidden, in_progress, all_tasks_issued, doreshka, finished";
const START_DATE_MSG: &str = "startDate must be in format YYYY-MM-DD";
const END_DATE_MSG: &str = "endDate must be in format YYYY-MM-DD";
pub const DATE_RANGE_MSG: &str = "endDate must be after startDate";
const DESCRIPTION_LENGTH_MSG: &str = "description must not exceed 500 characters";

pub fn is_valid_slug(slug: &str) -> bool {
    (MIN_SLUG_LENGTH..=MAX_SLUG_LENGTH).contains(&slug.len()) && SLUG_RE.is_match(slug)
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if !DATE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn is_valid_date(value: &str) -> bool {
    parse_date(value).is_some()
}

pub fn is_valid_date_range(start: &str, end: &str) -> bool {
    match (parse_date(start), parse_date(end)) {
        (Some(start), Some(end)) => end > start,
        _ => false,
    }
}

pub fn is_valid_status(value: &str) -> bool {
    value.parse::<CourseStatus>().is_ok()
}

pub fn is_valid_token(token: &str) -> bool {
    (MIN_TOKEN_LENGTH..=MAX_TOKEN_LENGTH).contains(&token.len()) && TOKEN_RE.is_match(token)
}

fn is_valid_name(name: &str) -> bool {
    (MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&name.chars().count())
}

fn is_valid_description(description: &str) -> bool {
    description.chars().count() <= MAX_DESCRIPTION_LENGTH
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Creation: every field is required, all failures are collected.
    Strict,
    /// Update: only provided fields are checked, the slug is ignored.
    Partial,
}

fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Checks a course payload and converts the provided fields into typed form.
///
/// Failures are returned in a fixed field order. In `Partial` mode callers
/// only report the first one.
pub fn validate_course(
    input: &CourseInput,
    mode: ValidationMode,
) -> Result<CoursePatch, Vec<FieldError>> {
    let strict = mode == ValidationMode::Strict;
    let mut errors = Vec::new();
    let mut patch = CoursePatch::default();

    match provided(&input.name) {
        Some(name) if is_valid_name(name) => patch.name = Some(name.to_string()),
        Some(_) => errors.push(FieldError::new("name", NAME_LENGTH_MSG)),
        None if strict => errors.push(FieldError::new("name", "name is required")),
        None => {}
    }

    if strict {
        match provided(&input.slug) {
            Some(slug) if is_valid_slug(slug) => patch.slug = Some(slug.to_string()),
            Some(_) => errors.push(FieldError::new("slug", SLUG_FORMAT_MSG)),
            None => errors.push(FieldError::new("slug", "slug is required")),
        }
    }

    match provided(&input.status).map(str::parse::<CourseStatus>) {
        Some(Ok(status)) => patch.status = Some(status),
        Some(Err(_)) => errors.push(FieldError::new("status", STATUS_MSG)),
        None if strict => errors.push(FieldError::new("status", "status is required")),
        None => {}
    }

    let start = provided(&input.start_date);
    match start.map(parse_date) {
        Some(Some(date)) => patch.start_date = Some(date),
        Some(None) => errors.push(FieldError::new("startDate", START_DATE_MSG)),
        None if strict => errors.push(FieldError::new("startDate", "startDate is required")),
        None => {}
    }

    let end = provided(&input.end_date);
    match end.map(parse_date) {
        Some(Some(date)) => patch.end_date = Some(date),
        Some(None) => errors.push(FieldError::new("endDate", END_DATE_MSG)),
        None if strict => errors.push(FieldError::new("endDate", "endDate is required")),
        None => {}
    }

    // Partial updates re-check the range after merging with the stored course.
    if strict {
        if let (Some(start), Some(end)) = (start, end) {
            if !is_valid_date_range(start, end) {
                errors.push(FieldError::new("dateRange", DATE_RANGE_MSG));
            }
        }
    }

    match provided(&input.repo_template) {
        Some(template) => patch.repo_template = Some(template.to_string()),
        None if strict => {
            errors.push(FieldError::new("repoTemplate", "repoTemplate is required"))
        }
        None => {}
    }

    match provided(&input.description) {
        Some(description) if is_valid_description(description) => {
            patch.description = Some(description.to_string())
        }
        Some(_) => errors.push(FieldError::new("description", DESCRIPTION_LENGTH_MSG)),
        None if strict => {
            errors.push(FieldError::new("description", "description is required"))
        }
        None => {}
    }

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}
