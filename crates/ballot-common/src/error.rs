//! Error types and error codes for Ballot
//!
//! This module defines:
//! - `BallotError`: the single tagged union for every domain rule violation
//! - `ErrorCode`: structured error codes carried in API error bodies

use serde::{Deserialize, Serialize};

/// Domain error raised by every service layer.
///
/// Services return `anyhow::Result`; a `BallotError` travels inside the
/// `anyhow::Error` and is recovered at the HTTP boundary with [`find_ballot_error`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BallotError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("candidate '{candidate_id}' has not paid the nomination fee for '{position_path}'")]
    FeesNotPaid {
        candidate_id: String,
        position_path: String,
    },

    #[error("candidate participation {0} has not been nominated")]
    NotNominated(i64),

    #[error("pending action {0} has already been processed")]
    AlreadyProcessed(i64),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("invalid position: {0}")]
    Position(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BallotError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        BallotError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        BallotError::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        BallotError::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        BallotError::Conflict(message.into())
    }

    pub fn error_code(&self) -> ErrorCode<'static> {
        match self {
            BallotError::Validation(_) => VALIDATION_ERROR,
            BallotError::NotFound { .. } => NOT_FOUND,
            BallotError::Forbidden(_) => FORBIDDEN,
            BallotError::Conflict(_) => CONFLICT,
            BallotError::FeesNotPaid { .. } => FEES_NOT_PAID,
            BallotError::NotNominated(_) => NOT_NOMINATED,
            BallotError::AlreadyProcessed(_) => ALREADY_PROCESSED,
            BallotError::InvalidCredentials => INVALID_CREDENTIALS,
            BallotError::TokenExpired => TOKEN_EXPIRED,
            BallotError::InvalidToken(_) => INVALID_TOKEN,
            BallotError::Position(_) => INVALID_POSITION,
            BallotError::Internal(_) => INTERNAL_ERROR,
        }
    }
}

/// Find the first `BallotError` in an error's context chain.
pub fn find_ballot_error(err: &anyhow::Error) -> Option<&BallotError> {
    err.chain().find_map(|cause| cause.downcast_ref::<BallotError>())
}

/// Error code structure for API responses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: &'a str,
    pub status: u16,
    pub message: &'a str,
}

pub const VALIDATION_ERROR: ErrorCode<'static> = ErrorCode {
    code: "VALIDATION_ERROR",
    status: 400,
    message: "validation error",
};

pub const NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: "NOT_FOUND",
    status: 404,
    message: "resource not found",
};

pub const FORBIDDEN: ErrorCode<'static> = ErrorCode {
    code: "FORBIDDEN",
    status: 403,
    message: "forbidden",
};

pub const CONFLICT: ErrorCode<'static> = ErrorCode {
    code: "CONFLICT",
    status: 400,
    message: "duplicate record",
};

pub const FEES_NOT_PAID: ErrorCode<'static> = ErrorCode {
    code: "FEES_NOT_PAID",
    status: 400,
    message: "nomination fee not paid",
};

pub const NOT_NOMINATED: ErrorCode<'static> = ErrorCode {
    code: "NOT_NOMINATED",
    status: 400,
    message: "candidate not nominated",
};

pub const ALREADY_PROCESSED: ErrorCode<'static> = ErrorCode {
    code: "ALREADY_PROCESSED",
    status: 409,
    message: "pending action already processed",
};

pub const INVALID_CREDENTIALS: ErrorCode<'static> = ErrorCode {
    code: "INVALID_CREDENTIALS",
    status: 401,
    message: "invalid credentials",
};

pub const TOKEN_EXPIRED: ErrorCode<'static> = ErrorCode {
    code: "TOKEN_EXPIRED",
    status: 401,
    message: "token expired",
};

pub const INVALID_TOKEN: ErrorCode<'static> = ErrorCode {
    code: "INVALID_TOKEN",
    status: 401,
    message: "invalid token",
};

pub const INVALID_POSITION: ErrorCode<'static> = ErrorCode {
    code: "INVALID_POSITION",
    status: 400,
    message: "invalid position selection",
};

pub const INTERNAL_ERROR: ErrorCode<'static> = ErrorCode {
    code: "INTERNAL_ERROR",
    status: 500,
    message: "internal server error",
};

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn test_ballot_error_display() {
        let err = BallotError::not_found("district", 5);
        assert_eq!(err.to_string(), "district '5' not found");

        let err = BallotError::FeesNotPaid {
            candidate_id: "CM90012345ABCD".to_string(),
            position_path: "PRIMARIES.DISTRICT.LCV".to_string(),
        };
        assert!(err.to_string().contains("has not paid"));
    }

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(BallotError::validation("x").error_code().status, 400);
        assert_eq!(BallotError::not_found("fee", 1).error_code().status, 404);
        assert_eq!(BallotError::forbidden("x").error_code().status, 403);
        assert_eq!(BallotError::conflict("x").error_code().status, 400);
        assert_eq!(BallotError::AlreadyProcessed(1).error_code().status, 409);
        assert_eq!(BallotError::TokenExpired.error_code().code, "TOKEN_EXPIRED");
        assert_eq!(
            BallotError::InvalidToken("bad".to_string()).error_code().code,
            "INVALID_TOKEN"
        );
        assert_eq!(BallotError::Internal("x".to_string()).error_code().status, 500);
    }

    #[test]
    fn test_find_ballot_error_through_context() {
        let err: anyhow::Result<()> = Err(BallotError::AlreadyProcessed(7).into());
        let err = err.context("approving pending action").unwrap_err();

        assert_eq!(
            find_ballot_error(&err),
            Some(&BallotError::AlreadyProcessed(7))
        );
    }

    #[test]
    fn test_find_ballot_error_absent() {
        let err = anyhow::anyhow!("connection reset");
        assert!(find_ballot_error(&err).is_none());
    }
}
