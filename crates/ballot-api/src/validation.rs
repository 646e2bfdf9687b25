//! Input validation functions used by `#[validate(custom(...))]` rules

use validator::ValidationError;

/// Maximum length for person and unit names
pub const MAX_NAME_LENGTH: usize = 100;

/// Minimum length for account passwords
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum length for account passwords (bcrypt truncates after 72 bytes)
pub const MAX_PASSWORD_LENGTH: usize = 72;

/// Validate a national identification number
pub fn validate_nin(nin: &str) -> Result<(), ValidationError> {
    if ballot_common::is_valid_nin(nin) {
        Ok(())
    } else {
        Err(ValidationError::new("nin_invalid").with_message(
            "NIN must be two uppercase letters followed by twelve letters or digits".into(),
        ))
    }
}

/// Validate a phone number: optional leading '+', then 9 to 15 digits
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.len() < 9 || digits.len() > 15 {
        return Err(ValidationError::new("phone_length"));
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("phone_invalid_chars"));
    }
    Ok(())
}

/// Validate a position config key supplied by a client
///
/// Keys are matched exactly against the position catalog, so the only
/// structural rule is that they cannot contain the path separator.
pub fn validate_position_key(key: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::new("position_key_empty"));
    }
    if key.contains(ballot_common::POSITION_PATH_SEPARATOR) {
        return Err(ValidationError::new("position_key_contains_separator"));
    }
    Ok(())
}

/// Validate password length and content
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new("password_too_short"));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::new("password_too_long"));
    }
    if password.chars().all(char::is_alphabetic) {
        return Err(ValidationError::new("password_needs_non_letter"));
    }
    Ok(())
}

/// Flatten `validator` errors into one readable message
pub fn describe(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let reasons: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{}: {}", field, reasons.join(", "))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_nin() {
        assert!(validate_nin("CM90012345ABCD").is_ok());
        assert!(validate_nin("CM9001").is_err());
        assert!(validate_nin("").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+256772123456").is_ok());
        assert!(validate_phone("0772123456").is_ok());
        assert!(validate_phone("0772-123456").is_err());
        assert!(validate_phone("12345").is_err());
    }

    #[test]
    fn test_validate_position_key() {
        assert!(validate_position_key("SIG_COMMITTEE").is_ok());
        assert!(validate_position_key("LC V").is_ok());
        assert!(validate_position_key("A.B").is_err());
        assert!(validate_position_key("").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("s3cretpass").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("onlyletters").is_err());
        assert!(validate_password(&"a1".repeat(40)).is_err());
    }
}
