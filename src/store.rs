use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{Course, CoursePatch};
use crate::validation::DATE_RANGE_MSG;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("course not found")]
    NotFound,
    #[error("course with this slug already exists")]
    Conflict,
    #[error("{}", DATE_RANGE_MSG)]
    InvalidDateRange,
}

/// In-memory course storage keyed by slug.
///
/// A single reader/writer lock guards the map; nothing inside the critical
/// sections awaits anything else.
#[derive(Debug, Default)]
pub struct CourseStore {
    courses: RwLock<BTreeMap<String, Course>>,
}

impl CourseStore {
    pub fn new(courses: impl IntoIterator<Item = Course>) -> Self {
        let courses = courses
            .into_iter()
            .map(|course| (course.id.clone(), course))
            .collect();
        Self {
            courses: RwLock::new(courses),
        }
    }

    /// All courses ordered by id, restricted to an exact status match when
    /// `status` is non-empty.
    pub async fn list(&self, status: Option<&str>) -> Vec<Course> {
        let status = status.filter(|s| !s.is_empty());
        let courses = self.courses.read().await;
        courses
            .values()
            .filter(|course| status.is_none_or(|s| course.status.as_str() == s))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<Course, StoreError> {
        self.courses
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.courses.read().await.contains_key(id)
    }

    pub async fn create(&self, course: Course) -> Result<Course, StoreError> {
        let mut courses = self.courses.write().await;
        match courses.entry(course.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => Ok(slot.insert(course).clone()),
        }
    }

    /// Merges `patch` into the stored course. The id never changes and the
    /// stored record is left untouched when the merged dates are out of order.
    pub async fn update(&self, id: &str, patch: CoursePatch) -> Result<Course, StoreError> {
        let mut courses = self.courses.write().await;
        let stored = courses.get_mut(id).ok_or(StoreError::NotFound)?;

        let mut updated = stored.clone();
        patch.apply_to(&mut updated);
        if updated.end_date <= updated.start_date {
            return Err(StoreError::InvalidDateRange);
        }

        *stored = updated.clone();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::CourseStatus;

    fn course(id: &str, status: CourseStatus) -> Course {
        Course {
            id: id.to_string(),
            name: format!("Course {id}"),
            status,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            repo_template: "git@test/repo.git".into(),
            description: "test".into(),
            url: Course::url_for(id),
        }
    }

    fn store() -> CourseStore {
        CourseStore::new([
            course("algorithms", CourseStatus::Created),
            course("hidden", CourseStatus::Hidden),
        ])
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let store = store();
        assert_eq!(store.list(None).await.len(), 2);
        assert_eq!(store.list(Some("")).await.len(), 2);

        let hidden = store.list(Some("hidden")).await;
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].id, "hidden");

        assert!(store.list(Some("finished")).await.is_empty());
        assert!(store.list(Some("nonsense")).await.is_empty());
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        assert_eq!(store().get("missing").await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_and_keeps_original() {
        let store = store();
        let mut duplicate = course("algorithms", CourseStatus::Finished);
        duplicate.name = "Impostor".into();

        assert_eq!(store.create(duplicate).await, Err(StoreError::Conflict));
        let original = store.get("algorithms").await.unwrap();
        assert_eq!(original.name, "Course algorithms");
        assert_eq!(original.status, CourseStatus::Created);
    }

    #[tokio::test]
    async fn test_create_inserts_new_course() {
        let store = store();
        let created = store
            .create(course("go-course", CourseStatus::Created))
            .await
            .unwrap();
        assert_eq!(created.id, "go-course");
        assert!(store.contains("go-course").await);
    }

    #[tokio::test]
    async fn test_update_merges_only_provided_fields() {
        let store = store();
        let patch = CoursePatch {
            description: Some("updated".into()),
            ..Default::default()
        };
        let updated = store.update("algorithms", patch).await.unwrap();

        assert_eq!(updated.description, "updated");
        assert_eq!(updated.name, "Course algorithms");
        assert_eq!(updated.status, CourseStatus::Created);
        assert_eq!(updated.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(store.get("algorithms").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_ignores_slug() {
        let store = store();
        let patch = CoursePatch {
            slug: Some("renamed".into()),
            name: Some("Renamed".into()),
            ..Default::default()
        };
        let updated = store.update("algorithms", patch).await.unwrap();
        assert_eq!(updated.id, "algorithms");
        assert_eq!(updated.url, "/course/algorithms");
        assert!(!store.contains("renamed").await);
    }

    #[tokio::test]
    async fn test_update_rejects_inverted_range_without_writing() {
        let store = store();
        let patch = CoursePatch {
            name: Some("Changed".into()),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        assert_eq!(
            store.update("algorithms", patch).await,
            Err(StoreError::InvalidDateRange)
        );
        assert_eq!(store.get("algorithms").await.unwrap().name, "Course algorithms");
    }

    #[test]
    fn test_date_range_error_shares_validation_message() {
        assert_eq!(StoreError::InvalidDateRange.to_string(), DATE_RANGE_MSG);
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let result = store().update("missing", CoursePatch::default()).await;
        assert_eq!(result, Err(StoreError::NotFound));
    }
}
