//! Validation outcomes.
//!
//! A single rule yields a [`ValidationResult`]: `Ok(())` when the value passes,
//! otherwise the named [`Violation`]. A form collects at most one violation per
//! [`Field`] into [`FieldErrors`].

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Outcome of a single validation rule.
pub type ValidationResult = Result<(), Violation>;

/// A named rule violation.
///
/// Serialized names match the keys the front-end has always used
/// (`specialChar`, `confirmPassword`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
pub enum Violation {
    /// The field is empty.
    #[error("this field is required")]
    Required,
    /// The value is not a syntactically valid email address.
    #[error("enter a valid email address")]
    Email,
    /// The value is shorter than allowed.
    #[error("must be at least {required} characters")]
    MinLength { required: usize },
    /// The value is longer than allowed.
    #[error("must be at most {required} characters")]
    MaxLength { required: usize },
    /// The password has no special character.
    #[error("must contain at least one special character")]
    SpecialChar,
    /// The password has no digit.
    #[error("must contain at least one number")]
    Number,
    /// The password has no uppercase letter.
    #[error("must contain at least one uppercase letter")]
    Uppercase,
    /// Password and confirmation differ.
    #[error("passwords do not match")]
    ConfirmPassword,
}

/// Form fields that can carry a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Username,
    Email,
    Password,
    ConfirmPassword,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm password",
        })
    }
}

/// Per-field violations of a form. Holds at most one violation per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, Violation>);

impl FieldErrors {
    /// An empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record the outcome of a rule for `field`.
    ///
    /// The first violation recorded for a field wins; later ones are ignored.
    pub fn check(&mut self, field: Field, result: ValidationResult) {
        if let Err(violation) = result {
            self.0.entry(field).or_insert(violation);
        }
    }

    /// Whether `field` already has a violation.
    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// The violation recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<Violation> {
        self.0.get(&field).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(field, violation)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, Violation)> + '_ {
        self.0.iter().map(|(field, violation)| (*field, *violation))
    }

    /// `Ok(value)` when there are no violations, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the error set itself when it is non-empty.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, violation) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {violation}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}
