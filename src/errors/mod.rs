use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use sqlx::postgres::PgDatabaseError;
use std::fmt;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Upload(String),
    Conflict(String),
    NotFound(String),
    DatabaseError(String),
    InternalServerError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Upload(msg) => write!(f, "Upload Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Upload(_) | AppError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(msg)
            | AppError::Upload(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg) => ErrorResponse { error: msg.clone(), details: None },
            AppError::DatabaseError(detail) | AppError::InternalServerError(detail) => {
                ErrorResponse {
                    error: "Server error".to_string(),
                    details: Some(detail.clone()),
                }
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Renders a database error with its SQLSTATE code and backend detail, for logs.
pub fn describe_db_error(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => {
            let mut out = format!("message: {}", db_err.message());
            if let Some(code) = db_err.code() {
                out.push_str(&format!(", code: {}", code));
            }
            if let Some(pg_err) = db_err.try_downcast_ref::<PgDatabaseError>() {
                if let Some(detail) = pg_err.detail() {
                    out.push_str(&format!(", detail: {}", detail));
                }
                if let Some(table) = pg_err.table() {
                    out.push_str(&format!(", table: {}", table));
                }
            }
            out
        }
        other => format!("message: {}", other),
    }
}
