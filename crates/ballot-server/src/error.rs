// Error handling for the HTTP layer
// Services return anyhow errors carrying a BallotError; AppError maps them to ErrorResult bodies.

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::HttpResponse;

pub use ballot_common::error::{
    ALREADY_PROCESSED, CONFLICT, FEES_NOT_PAID, FORBIDDEN, INTERNAL_ERROR, INVALID_CREDENTIALS,
    INVALID_POSITION, INVALID_TOKEN, NOT_FOUND, NOT_NOMINATED, TOKEN_EXPIRED, VALIDATION_ERROR,
};
pub use ballot_common::{BallotError, ErrorCode, find_ballot_error};

use crate::model::response::ErrorResult;

static EXPOSE_DETAIL: AtomicBool = AtomicBool::new(true);

/// Whether error bodies carry the full cause chain. Off in production.
pub fn set_expose_detail(expose: bool) {
    EXPOSE_DETAIL.store(expose, Ordering::Relaxed);
}

// Local wrapper for application errors to implement actix-web error handling
// (Cannot impl foreign trait for foreign type due to orphan rules)
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<BallotError> for AppError {
    fn from(value: BallotError) -> Self {
        AppError {
            inner: anyhow::Error::new(value),
        }
    }
}

impl AppError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn ballot_error(&self) -> Option<&BallotError> {
        find_ballot_error(&self.inner)
    }

    fn error_code(&self) -> ErrorCode<'static> {
        self.ballot_error()
            .map(BallotError::error_code)
            .unwrap_or(INTERNAL_ERROR)
    }

    pub fn to_error_result(&self) -> ErrorResult {
        let error_code = self.error_code();
        let message = match self.ballot_error() {
            Some(e) => e.to_string(),
            None => error_code.message.to_string(),
        };
        let detail = EXPOSE_DETAIL
            .load(Ordering::Relaxed)
            .then(|| format!("{:#}", self.inner));

        ErrorResult::new(error_code, message, detail)
    }
}

impl actix_web::error::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::from_u16(self.error_code().status)
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        if self.ballot_error().is_none() {
            tracing::error!(error = %format!("{:#}", self.inner), "Unhandled error");
        }
        self.to_error_result().http_response()
    }
}
