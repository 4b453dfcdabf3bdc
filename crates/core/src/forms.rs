//! Form validation.
//!
//! Each form validates its raw input field by field and, when every field
//! passes, produces a typed value that the client flows accept. A field
//! reports only its first failing rule.
//!
//! | form | field | rules, in order |
//! |------|-------|-----------------|
//! | login | email | required, email |
//! | login | password | required, min length 6 |
//! | register | username | required, min length 3 |
//! | register | email | required, email |
//! | register | password | required, strength, min length 6, max length 8 |
//! | register | confirm password | required, confirmation |
//! | edit profile | username | required |
//! | edit profile | email | required, email |
//! | recover | email | required, email |

use std::fmt;

use secrecy::SecretString;

use crate::password::{check_confirmation, check_strength};
use crate::types::Email;
use crate::validation::{Field, FieldErrors, ValidationResult, Violation};

/// Minimum password length accepted by the login and registration forms.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Maximum password length accepted by the registration form.
pub const PASSWORD_MAX_LENGTH: usize = 8;

/// Minimum username length accepted by the registration form.
pub const USERNAME_MIN_LENGTH: usize = 3;

// =============================================================================
// Rules
// =============================================================================

/// The value must be non-empty.
///
/// # Errors
///
/// Returns [`Violation::Required`] for an empty value.
pub const fn required(value: &str) -> ValidationResult {
    if value.is_empty() {
        Err(Violation::Required)
    } else {
        Ok(())
    }
}

/// A non-empty value must be a valid email address.
///
/// # Errors
///
/// Returns [`Violation::Email`] when the value does not parse as an [`Email`].
pub fn email(value: &str) -> ValidationResult {
    if value.is_empty() || Email::parse(value).is_ok() {
        Ok(())
    } else {
        Err(Violation::Email)
    }
}

/// A non-empty value must have at least `min` characters.
///
/// # Errors
///
/// Returns [`Violation::MinLength`] for a shorter value.
pub fn min_length(value: &str, min: usize) -> ValidationResult {
    if value.is_empty() || value.chars().count() >= min {
        Ok(())
    } else {
        Err(Violation::MinLength { required: min })
    }
}

/// The value must have at most `max` characters.
///
/// # Errors
///
/// Returns [`Violation::MaxLength`] for a longer value.
pub fn max_length(value: &str, max: usize) -> ValidationResult {
    if value.chars().count() <= max {
        Ok(())
    } else {
        Err(Violation::MaxLength { required: max })
    }
}

fn check_email_field(errors: &mut FieldErrors, value: &str) {
    errors.check(Field::Email, required(value));
    errors.check(Field::Email, email(value));
}

/// Converts a field that already passed the email rule.
fn parsed_email(value: &str, errors: &mut FieldErrors) -> Option<Email> {
    match Email::parse(value) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.check(Field::Email, Err(Violation::Email));
            None
        }
    }
}

// =============================================================================
// Validated values
// =============================================================================

/// Login credentials that passed form validation.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: Email,
    pub password: SecretString,
}

/// A registration request that passed form validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: Email,
    pub username: String,
    pub password: SecretString,
}

impl Registration {
    /// The credentials used for the login that follows registration.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// New profile values that passed form validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: Email,
}

// =============================================================================
// Forms
// =============================================================================

/// Raw login form input.
#[derive(Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns the per-field violations when any field fails.
    pub fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_email_field(&mut errors, &self.email);
        errors.check(Field::Password, required(&self.password));
        errors.check(Field::Password, min_length(&self.password, PASSWORD_MIN_LENGTH));

        if !errors.is_empty() {
            return Err(errors);
        }
        let email = parsed_email(&self.email, &mut errors).ok_or(errors)?;

        Ok(Credentials {
            email,
            password: SecretString::from(self.password.clone()),
        })
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Raw registration form input.
#[derive(Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns the per-field violations when any field fails.
    pub fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.check(Field::Username, required(&self.username));
        errors.check(Field::Username, min_length(&self.username, USERNAME_MIN_LENGTH));

        check_email_field(&mut errors, &self.email);

        errors.check(Field::Password, required(&self.password));
        errors.check(Field::Password, check_strength(&self.password));
        errors.check(Field::Password, min_length(&self.password, PASSWORD_MIN_LENGTH));
        errors.check(Field::Password, max_length(&self.password, PASSWORD_MAX_LENGTH));

        errors.check(Field::ConfirmPassword, required(&self.confirm_password));
        errors.check(
            Field::ConfirmPassword,
            check_confirmation(&self.password, &self.confirm_password),
        );

        if !errors.is_empty() {
            return Err(errors);
        }
        let email = parsed_email(&self.email, &mut errors).ok_or(errors)?;

        Ok(Registration {
            email,
            username: self.username.clone(),
            password: SecretString::from(self.password.clone()),
        })
    }
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

/// Raw profile edit form input.
#[derive(Debug, Clone, Default)]
pub struct EditProfileForm {
    pub username: String,
    pub email: String,
}

impl EditProfileForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns the per-field violations when any field fails.
    pub fn validate(&self) -> Result<ProfileUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(Field::Username, required(&self.username));
        check_email_field(&mut errors, &self.email);

        if !errors.is_empty() {
            return Err(errors);
        }
        let email = parsed_email(&self.email, &mut errors).ok_or(errors)?;

        Ok(ProfileUpdate {
            username: self.username.clone(),
            email,
        })
    }
}

/// Raw password recovery form input.
#[derive(Debug, Clone, Default)]
pub struct RecoverForm {
    pub email: String,
}

impl RecoverForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns the per-field violations when the email is missing or invalid.
    pub fn validate(&self) -> Result<Email, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_email_field(&mut errors, &self.email);

        if !errors.is_empty() {
            return Err(errors);
        }
        parsed_email(&self.email, &mut errors).ok_or(errors)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn register_form(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            username: "testuser".to_string(),
            email: "test@mail.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_rules_pass_empty_except_required() {
        assert_eq!(required(""), Err(Violation::Required));
        assert_eq!(email(""), Ok(()));
        assert_eq!(min_length("", 6), Ok(()));
        assert_eq!(max_length("", 8), Ok(()));
    }

    #[test]
    fn test_length_counts_characters() {
        assert_eq!(min_length("ñññ", 3), Ok(()));
        assert_eq!(max_length("ñññ", 2), Err(Violation::MaxLength { required: 2 }));
    }

    #[test]
    fn test_login_form_valid() {
        let form = LoginForm {
            email: "test@mail.com".to_string(),
            password: "password123".to_string(),
        };
        let credentials = form.validate().unwrap();
        assert_eq!(credentials.email.as_str(), "test@mail.com");
        assert_eq!(credentials.password.expose_secret(), "password123");
    }

    #[test]
    fn test_login_form_errors() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(Violation::Required));
        assert_eq!(errors.get(Field::Password), Some(Violation::Required));

        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(Violation::Email));
        assert_eq!(
            errors.get(Field::Password),
            Some(Violation::MinLength { required: 6 })
        );
    }

    #[test]
    fn test_register_form_valid() {
        let registration = register_form("Pass@123", "Pass@123").validate().unwrap();
        assert_eq!(registration.username, "testuser");
        assert_eq!(registration.credentials().email.as_str(), "test@mail.com");
    }

    #[test]
    fn test_register_password_strength_before_length() {
        let errors = register_form("pass", "pass").validate().unwrap_err();
        assert_eq!(errors.get(Field::Password), Some(Violation::SpecialChar));

        let errors = register_form("Pa@1", "Pa@1").validate().unwrap_err();
        assert_eq!(
            errors.get(Field::Password),
            Some(Violation::MinLength { required: 6 })
        );

        let errors = register_form("Password@123", "Password@123")
            .validate()
            .unwrap_err();
        assert_eq!(
            errors.get(Field::Password),
            Some(Violation::MaxLength { required: 8 })
        );
    }

    #[test]
    fn test_register_confirmation() {
        let errors = register_form("Pass@123", "Pass@124").validate().unwrap_err();
        assert_eq!(errors.get(Field::ConfirmPassword), Some(Violation::ConfirmPassword));
        assert_eq!(errors.len(), 1);

        let errors = register_form("Pass@123", "").validate().unwrap_err();
        assert_eq!(errors.get(Field::ConfirmPassword), Some(Violation::Required));
    }

    #[test]
    fn test_register_username_length() {
        let mut form = register_form("Pass@123", "Pass@123");
        form.username = "ab".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get(Field::Username),
            Some(Violation::MinLength { required: 3 })
        );
    }

    #[test]
    fn test_register_form_debug_redacts_passwords() {
        let debug = format!("{:?}", register_form("Pass@123", "Pass@123"));
        assert!(!debug.contains("Pass@123"));
    }

    #[test]
    fn test_edit_profile_form() {
        let form = EditProfileForm {
            username: "jane".to_string(),
            email: "jane@mail.com".to_string(),
        };
        assert_eq!(form.validate().unwrap().username, "jane");

        let errors = EditProfileForm::default().validate().unwrap_err();
        assert_eq!(errors.get(Field::Username), Some(Violation::Required));
        assert_eq!(errors.get(Field::Email), Some(Violation::Required));
    }

    #[test]
    fn test_recover_form() {
        let form = RecoverForm {
            email: "jane@mail.com".to_string(),
        };
        assert_eq!(form.validate().unwrap().as_str(), "jane@mail.com");

        let form = RecoverForm {
            email: "jane".to_string(),
        };
        assert_eq!(
            form.validate().unwrap_err().get(Field::Email),
            Some(Violation::Email)
        );
    }
}
