use crate::{
    data::student::{Student, StudentDetails},
    error::{ErrorKind, ParseAgeBoundSnafu, ParseAgeRangeSnafu, RosterError, RosterResult},
    state::RosterState,
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use snafu::{OptionExt, ResultExt};

/// `{"error": ..., "detalles": ...}`, the body of every failed single-student call.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    pub detalles: String,
}

/// `{"mensaje": ...}`, sent when a filter matched nobody.
#[derive(Serialize, Debug)]
pub struct MessageBody {
    pub mensaje: String,
}

fn error_response(status: StatusCode, error: String, detalles: impl ToString) -> Response {
    (
        status,
        Json(ErrorBody {
            error,
            detalles: detalles.to_string(),
        }),
    )
        .into_response()
}

/// Turns an unparseable `{id}` segment into the same JSON error body the handler would send.
fn student_id(path: Result<Path<i64>, PathRejection>, error: &str) -> Result<i64, Response> {
    path.map(|Path(id)| id).map_err(|rejection| {
        error_response(StatusCode::BAD_REQUEST, error.into(), rejection.body_text())
    })
}

/// `NotFound` is always a 404, everything else falls back to `otherwise`.
fn classify(e: &RosterError, otherwise: StatusCode) -> StatusCode {
    match e.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Unexpected => otherwise,
    }
}

fn list_response(
    result: RosterResult<Vec<Student>>,
    when_empty: impl FnOnce() -> Response,
) -> Response {
    match result {
        Ok(students) if students.is_empty() => when_empty(),
        Ok(students) => Json(students).into_response(),
        Err(e) => {
            error!(?e, "Error listing students");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn get_all_students(State(state): State<RosterState>) -> Response {
    list_response(state.students().get_all().await, || {
        StatusCode::NO_CONTENT.into_response()
    })
}

pub async fn get_student(
    State(state): State<RosterState>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let id = match student_id(path, "Invalid student ID") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.students().get_by_id(id).await {
        Ok(student) => Json(student).into_response(),
        Err(e) => {
            warn!(?e, id, "Unable to get student");
            error_response(
                classify(&e, StatusCode::INTERNAL_SERVER_ERROR),
                format!("No student found with ID: {id}"),
                e,
            )
        }
    }
}

pub async fn post_student(
    State(state): State<RosterState>,
    body: Result<Json<StudentDetails>, JsonRejection>,
) -> Response {
    const ERROR: &str = "Error creating the student";

    let Json(details) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, ERROR.into(), rejection.body_text());
        }
    };

    match state.students().create(details).await {
        Ok(student) => (StatusCode::CREATED, Json(student)).into_response(),
        Err(e) => {
            warn!(?e, "Unable to create student");
            error_response(StatusCode::BAD_REQUEST, ERROR.into(), e)
        }
    }
}

pub async fn put_student(
    State(state): State<RosterState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<StudentDetails>, JsonRejection>,
) -> Response {
    const ERROR: &str = "Error updating the student";

    let id = match student_id(path, ERROR) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let Json(details) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, ERROR.into(), rejection.body_text());
        }
    };

    match state.students().update(id, details).await {
        Ok(student) => Json(student).into_response(),
        Err(e) => {
            warn!(?e, id, "Unable to update student");
            error_response(classify(&e, StatusCode::BAD_REQUEST), ERROR.into(), e)
        }
    }
}

pub async fn delete_student(
    State(state): State<RosterState>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    const ERROR: &str = "Error deleting the student";

    let id = match student_id(path, ERROR) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.students().delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            warn!(?e, id, "Unable to delete student");
            error_response(
                classify(&e, StatusCode::BAD_REQUEST),
                ERROR.into(),
                e,
            )
        }
    }
}

pub async fn get_students_by_course(
    State(state): State<RosterState>,
    Path(course): Path<String>,
) -> Response {
    list_response(state.students().get_by_course(&course).await, || {
        (
            StatusCode::NOT_FOUND,
            Json(MessageBody {
                mensaje: format!("No students found in course: {course}"),
            }),
        )
            .into_response()
    })
}

pub async fn get_students_by_age_range(
    State(state): State<RosterState>,
    Path(range): Path<String>,
) -> Response {
    let (min, max) = match parse_age_range(&range) {
        Ok(bounds) => bounds,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid age range: {range}"),
                e,
            );
        }
    };

    list_response(state.students().get_by_age_range(min, max).await, || {
        (
            StatusCode::NOT_FOUND,
            Json(MessageBody {
                mensaje: format!("No students found in the age range: {min} - {max}"),
            }),
        )
            .into_response()
    })
}

/// Splits `<min>-<max>`. The separator is the first `-` after the opening character, so a negative
/// minimum still parses.
fn parse_age_range(raw: &str) -> RosterResult<(i32, i32)> {
    let split = raw
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '-')
        .map(|(i, _)| i)
        .context(ParseAgeRangeSnafu { original: raw })?;

    let (min, max) = (&raw[..split], &raw[split + 1..]);
    let parse_bound = |bound: &str| -> RosterResult<i32> {
        bound.trim().parse().context(ParseAgeBoundSnafu {
            bound,
            original: raw,
        })
    };

    Ok((parse_bound(min)?, parse_bound(max)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::memory::MemoryStudentRepository, routes::app};
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn server() -> TestServer {
        let state = RosterState::with_repository(Arc::new(MemoryStudentRepository::new()));
        TestServer::new(app(state)).unwrap()
    }

    async fn seeded_server() -> (TestServer, Student, Student) {
        let server = server();
        let john: Student = server
            .post("/api/students")
            .json(&json!({"name": "john", "lastName": "Doe", "age": 20, "course": "Math"}))
            .await
            .json();
        let jane: Student = server
            .post("/api/students")
            .json(&json!({"name": "Jane", "lastName": "Smith", "age": 22, "course": "Science"}))
            .await
            .json();
        (server, john, jane)
    }

    #[test]
    fn age_ranges_parse() {
        assert_eq!(parse_age_range("18-22").unwrap(), (18, 22));
        assert_eq!(parse_age_range("-5-3").unwrap(), (-5, 3));
        assert_eq!(parse_age_range("30-20").unwrap(), (30, 20));
        assert!(matches!(
            parse_age_range("18"),
            Err(RosterError::ParseAgeRange { .. })
        ));
        assert!(matches!(
            parse_age_range(""),
            Err(RosterError::ParseAgeRange { .. })
        ));
        assert!(matches!(
            parse_age_range("a-b"),
            Err(RosterError::ParseAgeBound { ref bound, .. }) if bound == "a"
        ));
        assert!(matches!(
            parse_age_range("18-99999999999"),
            Err(RosterError::ParseAgeBound { ref bound, .. }) if bound == "99999999999"
        ));
    }

    #[tokio::test]
    async fn empty_roster_is_no_content() {
        let response = server().get("/api/students").await;

        response.assert_status(StatusCode::NO_CONTENT);
        assert!(response.text().is_empty());
    }

    #[tokio::test]
    async fn create_returns_201_with_generated_id() {
        let response = server()
            .post("/api/students")
            .json(&json!({"name": "Alice", "lastName": "Brown", "age": 19, "course": "History"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert!(body["id"].is_i64());
        assert_eq!(body["name"], "Alice");
        assert_eq!(body["lastName"], "Brown");
    }

    #[tokio::test]
    async fn create_with_long_course_is_bad_request() {
        let response = server()
            .post("/api/students")
            .json(&json!({"name": "Alice", "lastName": "Brown", "age": 19, "course": "Advanced Quantum Mechanics"}))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "Error creating the student");
        assert!(body["detalles"].as_str().unwrap().contains("course"));
    }

    #[tokio::test]
    async fn create_with_malformed_body_is_bad_request() {
        let response = server()
            .post("/api/students")
            .json(&json!({"name": "Alice", "age": "nineteen"}))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "Error creating the student");
    }

    #[tokio::test]
    async fn list_and_fetch_after_creation() {
        let (server, john, jane) = seeded_server().await;

        let all = server.get("/api/students").await;
        all.assert_status_ok();
        assert_eq!(all.json::<Vec<Student>>(), vec![john.clone(), jane]);

        let one = server.get(&format!("/api/students/{}", john.id)).await;
        one.assert_status_ok();
        assert_eq!(one.json::<Student>(), john);
    }

    #[tokio::test]
    async fn unknown_id_is_404_with_details() {
        let response = server().get("/api/students/99").await;

        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["error"], "No student found with ID: 99");
        assert_eq!(body["detalles"], "Student not found with ID: 99");
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_id() {
        let (server, john, _) = seeded_server().await;

        let response = server
            .put(&format!("/api/students/{}", john.id))
            .json(&json!({"id": 1234, "name": "John", "lastName": "Doe", "age": 21, "course": "Physics"}))
            .await;

        response.assert_status_ok();
        let updated: Student = response.json();
        assert_eq!(updated.id, john.id);
        assert_eq!(updated.age, 21);
        assert_eq!(updated.course, "Physics");
    }

    #[tokio::test]
    async fn update_of_missing_student_is_404_and_writes_nothing() {
        let server = server();

        let response = server
            .put("/api/students/99")
            .json(&json!({"name": "Ghost", "lastName": "Nobody", "age": 40, "course": "None"}))
            .await;

        response.assert_status_not_found();
        assert_eq!(response.json::<Value>()["error"], "Error updating the student");
        server
            .get("/api/students")
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn delete_then_get_is_404() {
        let (server, john, _) = seeded_server().await;
        let path = format!("/api/students/{}", john.id);

        let deleted = server.delete(&path).await;
        deleted.assert_status(StatusCode::NO_CONTENT);
        assert!(deleted.text().is_empty());

        server.get(&path).await.assert_status_not_found();

        let again = server.delete(&path).await;
        again.assert_status_not_found();
        assert_eq!(again.json::<Value>()["error"], "Error deleting the student");
    }

    #[tokio::test]
    async fn course_filter_matches_exactly() {
        let (server, john, _) = seeded_server().await;

        let response = server.get("/api/students/course/Math").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Student>>(), vec![john]);

        let none = server.get("/api/students/course/math").await;
        none.assert_status_not_found();
        assert_eq!(
            none.json::<Value>(),
            json!({"mensaje": "No students found in course: math"})
        );
    }

    #[tokio::test]
    async fn age_filter_is_inclusive_and_404s_when_empty() {
        let (server, john, jane) = seeded_server().await;

        let both = server.get("/api/students/age/18-22").await;
        both.assert_status_ok();
        assert_eq!(both.json::<Vec<Student>>(), vec![john, jane]);

        let none = server.get("/api/students/age/23-30").await;
        none.assert_status_not_found();
        assert_eq!(
            none.json::<Value>(),
            json!({"mensaje": "No students found in the age range: 23 - 30"})
        );

        server
            .get("/api/students/age/22-18")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn non_numeric_ids_get_a_json_error_body() {
        let server = server();

        let put = server
            .put("/api/students/abc")
            .json(&json!({"name": "john", "lastName": "Doe", "age": 20, "course": "Math"}))
            .await;
        put.assert_status_bad_request();
        let body: Value = put.json();
        assert_eq!(body["error"], "Error updating the student");
        assert!(body["detalles"].as_str().unwrap().contains("abc"));

        let get = server.get("/api/students/abc").await;
        get.assert_status_bad_request();
        assert_eq!(get.json::<Value>()["error"], "Invalid student ID");

        let delete = server.delete("/api/students/99999999999999999999").await;
        delete.assert_status_bad_request();
        assert_eq!(delete.json::<Value>()["error"], "Error deleting the student");
    }

    #[tokio::test]
    async fn unparseable_age_bound_names_the_bound() {
        let response = server().get("/api/students/age/18-old").await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "Invalid age range: 18-old");
        assert!(body["detalles"].as_str().unwrap().contains("\"old\""));
    }

    #[tokio::test]
    async fn malformed_age_range_is_bad_request() {
        let response = server().get("/api/students/age/young").await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["error"], "Invalid age range: young");
    }
}
