//! HTTP response types for Ballot server
//!
//! Successful responses share the `Result` envelope; failures use `ErrorResult`.

use actix_web::{HttpResponse, HttpResponseBuilder, http::StatusCode};
use serde::{Deserialize, Serialize};

use ballot_api::workflow::PendingReceipt;
use ballot_common::ErrorCode;

/// Generic result wrapper for API responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Result<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> Result<T> {
    pub fn new(code: i32, message: String, data: T) -> Self {
        Result::<T> {
            code,
            message,
            data,
        }
    }

    pub fn success(data: T) -> Result<T> {
        Result::<T> {
            code: 0,
            message: "success".to_string(),
            data,
        }
    }

    pub fn http_success(data: T) -> HttpResponse {
        HttpResponse::Ok().json(Result::success(data))
    }

    pub fn http_created(data: T) -> HttpResponse {
        HttpResponse::Created().json(Result::success(data))
    }
}

impl Result<PendingReceipt> {
    /// `202 Accepted`: the write was stored for approval, nothing changed yet.
    pub fn http_accepted(receipt: PendingReceipt) -> HttpResponse {
        HttpResponse::Accepted().json(Result::new(
            0,
            "pending approval".to_string(),
            receipt,
        ))
    }
}

/// Error result for API error responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResult {
    pub timestamp: String,
    pub status: u16,
    pub code: String,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResult {
    pub fn new(error_code: ErrorCode<'_>, message: String, detail: Option<String>) -> Self {
        ErrorResult {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: error_code.status,
            code: error_code.code.to_string(),
            error: message.clone(),
            message,
            detail,
        }
    }

    pub fn http_response(self) -> HttpResponse {
        HttpResponseBuilder::new(
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        )
        .json(self)
    }
}

#[cfg(test)]
mod tests {
    use ballot_common::error::{CONFLICT, NOT_FOUND};
    use ballot_persistence::PendingStatus;

    use super::*;

    #[test]
    fn test_success_envelope() {
        let result = Result::success(vec![1, 2]);
        assert_eq!(result.code, 0);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"code": 0, "message": "success", "data": [1, 2]})
        );
    }

    #[test]
    fn test_accepted_status() {
        let response = Result::http_accepted(PendingReceipt {
            pending_action_id: 4,
            status: PendingStatus::Pending,
            entity_type: "districts".to_string(),
        });
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_error_result_status() {
        let result = ErrorResult::new(NOT_FOUND, "district '5' not found".to_string(), None);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], 404);
        assert_eq!(value["code"], "NOT_FOUND");
        assert_eq!(value["error"], "district '5' not found");
        assert!(value.get("detail").is_none());

        let response = ErrorResult::new(CONFLICT, "duplicate".to_string(), None).http_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
