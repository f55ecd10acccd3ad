//! Records the service starts with.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{
    BoardDeadline, BoardGroup, BoardSummary, BoardTask, Course, CourseStatus, DeadlineStatus,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid sample date")
}

fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    date(year, month, day)
        .and_hms_opt(hour, 0, 0)
        .expect("valid sample time")
        .and_utc()
}

fn course(
    id: &str,
    name: &str,
    status: CourseStatus,
    start: NaiveDate,
    end: NaiveDate,
    description: &str,
) -> Course {
    Course {
        id: id.to_string(),
        name: name.to_string(),
        status,
        start_date: start,
        end_date: end,
        repo_template: format!("git@gitlab.local/{id}-template.git"),
        description: description.to_string(),
        url: Course::url_for(id),
    }
}

pub fn courses() -> Vec<Course> {
    vec![
        course(
            "algorithms",
            "Algorithms 101",
            CourseStatus::InProgress,
            date(2024, 10, 1),
            date(2024, 12, 20),
            "Основы алгоритмов и структур данных",
        ),
        course(
            "mlops",
            "MLOps Studio",
            CourseStatus::AllTasksIssued,
            date(2024, 9, 1),
            date(2024, 11, 30),
            "Продвинутые практики MLOps",
        ),
        course(
            "rust",
            "Rust Core",
            CourseStatus::Created,
            date(2024, 10, 15),
            date(2025, 1, 15),
            "Основы системного программирования на Rust",
        ),
        course(
            "golang",
            "Go Lab",
            CourseStatus::Finished,
            date(2024, 8, 1),
            date(2024, 10, 31),
            "Практикум по языку Go",
        ),
        course(
            "advanced-cpp",
            "Advanced C++",
            CourseStatus::InProgress,
            date(2024, 10, 1),
            date(2024, 12, 20),
            "Продвинутые концепции C++",
        ),
        course(
            "advanced-python",
            "Advanced Python",
            CourseStatus::Created,
            date(2024, 11, 1),
            date(2025, 2, 28),
            "Продвинутый анализ данных на Python",
        ),
    ]
}

fn deadline(
    id: &str,
    label: &str,
    percent: f64,
    due_at: DateTime<Utc>,
    status: DeadlineStatus,
) -> BoardDeadline {
    BoardDeadline {
        id: id.to_string(),
        label: label.to_string(),
        percent,
        due_at,
        status,
    }
}

fn task(id: &str, name: &str, score: u32, score_earned: u32, stats: f64) -> BoardTask {
    BoardTask {
        id: id.to_string(),
        name: name.to_string(),
        score,
        score_earned,
        stats,
        is_bonus: false,
        is_special: false,
        url: None,
    }
}

pub fn boards() -> Vec<(String, BoardSummary)> {
    let algorithms = BoardSummary {
        course_name: "Algorithms 101".into(),
        course_status: CourseStatus::InProgress,
        solved_score: 126,
        max_score: 200,
        solved_percent: 63,
        groups: vec![
            BoardGroup {
                id: "week-1".into(),
                name: "Week 1: Warmup".into(),
                is_special: false,
                started_at: at(2024, 10, 1, 9),
                ends_at: at(2024, 10, 14, 18),
                deadlines: vec![
                    deadline("d1", "Checkpoint", 0.6, at(2024, 9, 20, 18), DeadlineStatus::Expired),
                    deadline("d2", "Final", 1.0, at(2024, 10, 14, 18), DeadlineStatus::Urgent),
                ],
                tasks: vec![
                    task("t1", "Arrays Sprint", 20, 20, 0.82),
                    task("t2", "Stack Trace", 25, 10, 0.64),
                    BoardTask {
                        is_special: true,
                        ..task("t3", "Sorting Arena", 30, 0, 0.38)
                    },
                ],
            },
            BoardGroup {
                id: "week-2".into(),
                name: "Week 2: Graphs".into(),
                is_special: true,
                started_at: at(2024, 10, 15, 9),
                ends_at: at(2024, 10, 28, 18),
                deadlines: vec![
                    deadline("d3", "Checkpoint", 0.5, at(2024, 10, 22, 18), DeadlineStatus::Active),
                    deadline("d4", "Final", 1.0, at(2024, 10, 28, 18), DeadlineStatus::Active),
                ],
                tasks: vec![
                    task("t4", "Bridge Builder", 40, 25, 0.57),
                    task("t5", "Shortest Path Lab", 30, 0, 0.44),
                    BoardTask {
                        is_bonus: true,
                        ..task("t6", "Bonus Relay", 10, 12, 0.91)
                    },
                ],
            },
        ],
    };

    let mlops = BoardSummary {
        course_name: "MLOps Studio".into(),
        course_status: CourseStatus::AllTasksIssued,
        solved_score: 95,
        max_score: 150,
        solved_percent: 63,
        groups: vec![BoardGroup {
            id: "project-phase-1".into(),
            name: "Project Phase 1".into(),
            is_special: false,
            started_at: at(2024, 9, 1, 9),
            ends_at: at(2024, 10, 15, 18),
            deadlines: vec![
                deadline("mlops-d1", "Proposal", 0.3, at(2024, 9, 15, 18), DeadlineStatus::Expired),
                deadline("mlops-d2", "MVP", 1.0, at(2024, 10, 15, 18), DeadlineStatus::Expired),
            ],
            tasks: vec![
                task("mlops-t1", "Data Pipeline", 50, 45, 0.9),
                task("mlops-t2", "Model Training", 50, 30, 0.6),
                task("mlops-t3", "Monitoring Setup", 50, 20, 0.4),
            ],
        }],
    };

    vec![("algorithms".into(), algorithms), ("mlops".into(), mlops)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::is_valid_slug;

    #[test]
    fn test_sample_courses_hold_invariants() {
        for course in courses() {
            assert!(is_valid_slug(&course.id), "{}", course.id);
            assert!(course.end_date > course.start_date, "{}", course.id);
            assert_eq!(course.url, format!("/course/{}", course.id));
            assert!(course.description.chars().count() <= 500);
        }
    }

    #[test]
    fn test_sample_descriptions_are_kept_verbatim() {
        let algorithms = courses().into_iter().find(|c| c.id == "algorithms").unwrap();
        assert_eq!(algorithms.description, "Основы алгоритмов и структур данных");
    }

    #[test]
    fn test_sample_boards_belong_to_sample_courses() {
        let courses = courses();
        for (id, board) in boards() {
            let course = courses.iter().find(|c| c.id == id).unwrap();
            assert_eq!(board.course_name, course.name);
            assert_eq!(board.course_status, course.status);
            assert!(board.solved_score <= board.max_score);
        }
    }
}
