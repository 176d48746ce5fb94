use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use snafu::Snafu;
use std::num::ParseIntError;
use uuid::Uuid;

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
    #[snafu(display("Error creating table `{}`", table))]
    CreateSchema {
        source: sqlx::Error,
        table: &'static str,
    },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse IP port"))]
    ParsePort { source: ParseIntError },
    #[snafu(display("Unable to parse max connections"))]
    ParseMaxConnections { source: ParseIntError },
    #[snafu(display("Unknown store kind {:?}, expected `postgres` or `memory`", original))]
    UnknownStoreKind { original: String },
    #[snafu(display("Unable to find student with UUID: {}", id))]
    MissingStudent { id: Uuid },
    #[snafu(display("A student with UUID {} already exists", id))]
    DuplicateStudent { id: Uuid },
    #[snafu(display("Malformed student body: {}", source.body_text()))]
    MalformedBody { source: JsonRejection },
    #[snafu(display("Malformed student id: {}", source.body_text()))]
    MalformedId { source: PathRejection },
    #[snafu(display("`{}` is {} characters long, the maximum is {}", field, len, max))]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

impl RosterError {
    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        match self {
            Self::OpenDatabase { .. } | Self::GetDatabaseConnection { .. } => ISE,
            Self::MakeQuery { source } => match source {
                sqlx::Error::RowNotFound => NF,
                _ => ISE,
            },
            Self::CommitTransaction { .. } | Self::CreateSchema { .. } => ISE,
            Self::BadEnvVar { .. }
            | Self::ParsePort { .. }
            | Self::ParseMaxConnections { .. }
            | Self::UnknownStoreKind { .. } => ISE,
            Self::MissingStudent { .. } => NF,
            Self::DuplicateStudent { .. } => ISE,
            Self::MalformedBody { source } => match source.status() {
                StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                _ => BI,
            },
            Self::MalformedId { .. } | Self::FieldTooLong { .. } => BI,
        }
    }
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code == StatusCode::NOT_FOUND {
            debug!(?self, "Not found");
            return status_code.into_response();
        }

        if status_code.is_server_error() {
            error!(?self, "Error!");
        } else {
            warn!(?self, "Rejected request");
        }

        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_are_not_found() {
        let missing = RosterError::MissingStudent { id: Uuid::new_v4() };
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let row_not_found = RosterError::MakeQuery {
            source: sqlx::Error::RowNotFound,
        };
        assert_eq!(row_not_found.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_failures_are_server_errors() {
        let timed_out = RosterError::MakeQuery {
            source: sqlx::Error::PoolTimedOut,
        };
        assert_eq!(timed_out.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let duplicate = RosterError::DuplicateStudent { id: Uuid::new_v4() };
        assert_eq!(duplicate.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let commit = RosterError::CommitTransaction {
            source: sqlx::Error::PoolClosed,
        };
        assert_eq!(commit.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn too_long_fields_are_bad_input() {
        let err = RosterError::FieldTooLong {
            field: "firstName",
            len: 51,
            max: 50,
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "`firstName` is 51 characters long, the maximum is 50"
        );
    }

    #[test]
    fn not_found_response_has_empty_body() {
        let response = RosterError::MissingStudent { id: Uuid::nil() }.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            axum::body::HttpBody::size_hint(response.body()).exact(),
            Some(0)
        );
    }
}
