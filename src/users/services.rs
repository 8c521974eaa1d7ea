use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ApiError, FieldError};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Field checks for registration. Runs before any store access, so a
/// rejected request has no side effects.
pub fn validate_registration(name: &str, email: &str) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push(FieldError {
            msg: "Please enter a name",
            param: "name",
        });
    }
    if !is_valid_email(email) {
        errors.push(FieldError {
            msg: "Enter a valid email address",
            param: "email",
        });
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

pub fn validate_login(email: &str) -> Result<(), ApiError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ApiError::Validation(vec![FieldError {
            msg: "Please enter a valid email id",
            param: "email",
        }]))
    }
}

/// A profile read succeeds only when the union of retrieved records is
/// non-empty. Counted over both sequences; an empty-but-present collection
/// is not treated as data.
pub fn has_history(report_count: usize, prescription_count: usize) -> bool {
    report_count + prescription_count > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("asha@example.com"));
        assert!(is_valid_email("a.b+tag@clinic.co.in"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn registration_collects_all_field_errors() {
        let err = validate_registration("", "bad").expect_err("both fields invalid");
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().any(|e| e.param == "name"));
                assert!(errors.iter().any(|e| e.param == "email"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn registration_passes_with_valid_fields() {
        assert!(validate_registration("Asha Rao", "asha@example.com").is_ok());
    }

    #[test]
    fn whitespace_only_name_is_rejected() {
        let err = validate_registration("   ", "asha@example.com").expect_err("blank name");
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].param, "name");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn login_rejects_invalid_email() {
        assert!(validate_login("nope").is_err());
        assert!(validate_login("asha@example.com").is_ok());
    }

    #[test]
    fn history_check_counts_both_collections() {
        assert!(!has_history(0, 0));
        assert!(has_history(1, 0));
        assert!(has_history(0, 3));
        assert!(has_history(2, 2));
    }
}
