use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    Created,
    Hidden,
    InProgress,
    AllTasksIssued,
    Doreshka,
    Finished,
}

impl CourseStatus {
    pub const ALL: [CourseStatus; 6] = [
        CourseStatus::Created,
        CourseStatus::Hidden,
        CourseStatus::InProgress,
        CourseStatus::AllTasksIssued,
        CourseStatus::Doreshka,
        CourseStatus::Finished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Created => "created",
            CourseStatus::Hidden => "hidden",
            CourseStatus::InProgress => "in_progress",
            CourseStatus::AllTasksIssued => "all_tasks_issued",
            CourseStatus::Doreshka => "doreshka",
            CourseStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for CourseStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CourseStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[schema(example = "algorithms")]
    pub id: String,
    pub name: String,
    pub status: CourseStatus,
    #[schema(value_type = String, format = "date", example = "2024-10-01")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date", example = "2024-12-20")]
    pub end_date: NaiveDate,
    pub repo_template: String,
    pub description: String,
    #[schema(example = "/course/algorithms")]
    pub url: String,
}

impl Course {
    pub fn url_for(id: &str) -> String {
        format!("/course/{id}")
    }
}

/// Body of `POST /api/courses` and `PUT /api/courses/{id}`.
///
/// Every field is optional on the wire; an empty string counts as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub status: Option<String>,
    #[schema(example = "2024-03-01")]
    pub start_date: Option<String>,
    #[schema(example = "2024-04-01")]
    pub end_date: Option<String>,
    pub repo_template: Option<String>,
    pub description: Option<String>,
}

/// Fields that passed validation, ready to be merged into a stored course.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoursePatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub status: Option<CourseStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub repo_template: Option<String>,
    pub description: Option<String>,
}

impl CoursePatch {
    /// Builds a full course. `None` when any field is missing, which a
    /// strictly validated patch never is.
    pub fn into_course(self) -> Option<Course> {
        let id = self.slug?;
        Some(Course {
            url: Course::url_for(&id),
            id,
            name: self.name?,
            status: self.status?,
            start_date: self.start_date?,
            end_date: self.end_date?,
            repo_template: self.repo_template?,
            description: self.description?,
        })
    }

    pub fn apply_to(self, course: &mut Course) {
        if let Some(name) = self.name {
            course.name = name;
        }
        if let Some(status) = self.status {
            course.status = status;
        }
        if let Some(start_date) = self.start_date {
            course.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            course.end_date = end_date;
        }
        if let Some(repo_template) = self.repo_template {
            course.repo_template = repo_template;
        }
        if let Some(description) = self.description {
            course.description = description;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct FieldError {
    #[schema(example = "slug")]
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    Active,
    Urgent,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardDeadline {
    pub id: String,
    pub label: String,
    /// Share of the group's score that must be reached by `due_at`, 0..=1.
    pub percent: f64,
    #[schema(value_type = String, format = "date-time", example = "2024-10-14T18:00:00Z")]
    pub due_at: DateTime<Utc>,
    pub status: DeadlineStatus,
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardTask {
    pub id: String,
    pub name: String,
    pub score: u32,
    pub score_earned: u32,
    /// Fraction of students who solved the task.
    pub stats: f64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_bonus: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_special: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardGroup {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_special: bool,
    #[schema(value_type = String, format = "date-time")]
    pub started_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub ends_at: DateTime<Utc>,
    pub deadlines: Vec<BoardDeadline>,
    pub tasks: Vec<BoardTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub course_name: String,
    pub course_status: CourseStatus,
    pub solved_score: u32,
    pub max_score: u32,
    pub solved_percent: u32,
    pub groups: Vec<BoardGroup>,
}

impl BoardSummary {
    /// Summary for a course that has no board data yet.
    pub fn empty_for(course: &Course) -> Self {
        Self {
            course_name: course.name.clone(),
            course_status: course.status,
            solved_score: 0,
            max_score: 0,
            solved_percent: 0,
            groups: Vec::new(),
        }
    }
}
