use crate::{
    routes::{
        index::get_index_route,
        students::{
            delete_student, get_all_students, get_student, get_students_by_age_range,
            get_students_by_course, post_student, put_student,
        },
    },
    state::RosterState,
};
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

pub mod index;
pub mod students;

pub fn app(state: RosterState) -> Router {
    let trace_layer = TraceLayer::new_for_http();

    Router::new()
        .route("/", get(get_index_route))
        .route(
            "/api/students",
            get(get_all_students).post(post_student),
        )
        .route(
            "/api/students/{id}",
            get(get_student).put(put_student).delete(delete_student),
        )
        .route("/api/students/course/{course}", get(get_students_by_course))
        .route("/api/students/age/{range}", get(get_students_by_age_range))
        .layer(trace_layer)
        .with_state(state)
}
