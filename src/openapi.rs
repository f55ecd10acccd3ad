use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    BoardDeadline, BoardGroup, BoardSummary, BoardTask, Course, CourseInput, CourseStatus,
    DeadlineStatus, ErrorBody, FieldError,
};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::list_courses,
        crate::handlers::get_course,
        crate::handlers::create_course,
        crate::handlers::update_course,
        crate::handlers::get_course_board
    ),
    components(schemas(
        Course,
        CourseInput,
        CourseStatus,
        FieldError,
        ErrorBody,
        BoardSummary,
        BoardGroup,
        BoardDeadline,
        BoardTask,
        DeadlineStatus
    )),
    tags(
        (name = "courses", description = "Course management and task boards"),
        (name = "service", description = "Service metadata and health")
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;
