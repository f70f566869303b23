use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use snafu::Snafu;
use std::num::ParseIntError;

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RosterError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error getting db connection"))]
    GetDatabaseConnection { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error commiting SQL transaction"))]
    CommitTransaction { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse IP port"))]
    ParsePort { source: ParseIntError },
    #[snafu(display("Unable to parse `{}` as a number", original))]
    ParseNumber {
        source: ParseIntError,
        original: String,
    },
    #[snafu(display("Unknown store kind {:?}, expected `postgres` or `memory`", found))]
    UnknownStore { found: String },
    #[snafu(display("Student not found with ID: {}", id))]
    MissingStudent { id: i64 },
    #[snafu(display("Field `{}` is {} characters long, the limit is {}", field, len, max))]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[snafu(display("Unable to parse age range {:?}, expected `<min>-<max>`", original))]
    ParseAgeRange { original: String },
    #[snafu(display("Unable to parse age bound {:?} in range {:?}", bound, original))]
    ParseAgeBound {
        source: ParseIntError,
        bound: String,
        original: String,
    },
}

/// The two outcomes callers distinguish: the referenced student is absent, or something else broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unexpected,
}

impl RosterError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingStudent { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Unexpected,
        }
    }
}

impl IntoResponse for RosterError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"Roster Error"}
                    span {(desc)}
                }
            }
        };

        let status_code = match &self {
            Self::OpenDatabase { .. } | Self::GetDatabaseConnection { .. } => ISE,
            Self::MigrateError { .. } => ISE,
            Self::MakeQuery { .. } => ISE,
            Self::CommitTransaction { .. } => ISE,
            Self::BadEnvVar { .. } | Self::ParsePort { .. } => ISE,
            Self::ParseNumber { .. } => ISE,
            Self::UnknownStore { .. } => ISE,
            Self::MissingStudent { .. } => NF,
            Self::FieldTooLong { .. } => BI,
            Self::ParseAgeRange { .. } | Self::ParseAgeBound { .. } => BI,
        };

        error!(?self, "Error!");
        (status_code, Html(basic_error(self.to_string()))).into_response()
    }
}
