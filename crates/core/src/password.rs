//! Password rule engine.
//!
//! Pure checks for password strength and password confirmation. Both treat
//! empty input as valid: whether a value is present at all is the job of the
//! separate "required" rule in [`crate::forms`].

use crate::validation::{ValidationResult, Violation};

/// Characters that satisfy the special-character requirement.
pub const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Check password strength.
///
/// A non-empty password must contain, in this priority order, a character
/// from [`SPECIAL_CHARS`], an ASCII digit and an ASCII uppercase letter. Only
/// the first missing class is reported.
///
/// # Errors
///
/// Returns [`Violation::SpecialChar`], [`Violation::Number`] or
/// [`Violation::Uppercase`] for the first requirement the password misses.
///
/// # Examples
///
/// ```
/// use shopfront_core::password::check_strength;
/// use shopfront_core::Violation;
///
/// assert_eq!(check_strength("Password@"), Err(Violation::Number));
/// assert_eq!(check_strength("Password@123"), Ok(()));
/// assert_eq!(check_strength(""), Ok(()));
/// ```
pub fn check_strength(password: &str) -> ValidationResult {
    if password.is_empty() {
        return Ok(());
    }

    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(Violation::SpecialChar);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(Violation::Number);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(Violation::Uppercase);
    }

    Ok(())
}

/// Check that a password confirmation matches the password.
///
/// A mismatch is only reported when both values are non-empty. In particular
/// a filled password with an empty confirmation passes here and is left to
/// the confirmation field's "required" rule.
///
/// # Errors
///
/// Returns [`Violation::ConfirmPassword`] when both values are present and differ.
pub fn check_confirmation(password: &str, confirm_password: &str) -> ValidationResult {
    if password.is_empty() || confirm_password.is_empty() {
        return Ok(());
    }

    if password == confirm_password {
        Ok(())
    } else {
        Err(Violation::ConfirmPassword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_empty_is_deferred() {
        assert_eq!(check_strength(""), Ok(()));
    }

    #[test]
    fn test_strength_reports_first_missing_class() {
        assert_eq!(check_strength("password"), Err(Violation::SpecialChar));
        assert_eq!(check_strength("Password"), Err(Violation::SpecialChar));
        assert_eq!(check_strength("Password123"), Err(Violation::SpecialChar));
        assert_eq!(check_strength("Password@"), Err(Violation::Number));
        assert_eq!(check_strength("password@123"), Err(Violation::Uppercase));
        assert_eq!(check_strength("Password@123"), Ok(()));
    }

    #[test]
    fn test_strength_accepts_every_special_char() {
        for special in SPECIAL_CHARS.chars() {
            let password = format!("Abc1{special}");
            assert_eq!(check_strength(&password), Ok(()), "rejected {special:?}");
        }
    }

    #[test]
    fn test_strength_ignores_other_symbols() {
        assert_eq!(check_strength("Abc1-_+="), Err(Violation::SpecialChar));
    }

    #[test]
    fn test_strength_uppercase_is_ascii_only() {
        assert_eq!(check_strength("ñandú@1É"), Err(Violation::Uppercase));
    }

    #[test]
    fn test_confirmation() {
        assert_eq!(check_confirmation("Password123", "Password123"), Ok(()));
        assert_eq!(
            check_confirmation("Password123", "Different"),
            Err(Violation::ConfirmPassword)
        );
        assert_eq!(check_confirmation("", ""), Ok(()));
    }

    #[test]
    fn test_confirmation_with_one_side_empty_is_not_a_mismatch() {
        assert_eq!(check_confirmation("Password123", ""), Ok(()));
        assert_eq!(check_confirmation("", "Password123"), Ok(()));
    }
}
