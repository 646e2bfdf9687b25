//! Helpers shared by the store modules

use sea_orm::{DbErr, SqlErr};
use serde::Serialize;

/// Current UTC time as stored in `DateTime` columns
pub fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// Serialize a record into the JSON text kept in audit and pending-action columns
pub fn snapshot<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Whether a database error is a unique-key violation
pub fn unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_json_text() {
        let text = snapshot(&serde_json::json!({"name": "Acholi"})).unwrap();
        assert_eq!(text, r#"{"name":"Acholi"}"#);
    }

    #[test]
    fn test_unique_violation_on_plain_error() {
        assert!(!unique_violation(&DbErr::Custom("boom".to_string())));
    }
}
