use std::collections::HashMap;

use crate::models::{BoardSummary, Course};

/// Precomputed task boards keyed by course id. Read-only once built.
#[derive(Debug, Default)]
pub struct BoardStore {
    boards: HashMap<String, BoardSummary>,
}

impl BoardStore {
    pub fn new(boards: impl IntoIterator<Item = (String, BoardSummary)>) -> Self {
        Self {
            boards: boards.into_iter().collect(),
        }
    }

    /// Board for `course`, or an empty summary carrying only its name and
    /// status when none was precomputed.
    pub fn summary_for(&self, course: &Course) -> BoardSummary {
        self.boards
            .get(&course.id)
            .cloned()
            .unwrap_or_else(|| BoardSummary::empty_for(course))
    }
}
