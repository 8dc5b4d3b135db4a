//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! non-negative income, well-formed CPF) so that once a value reaches the
//! domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of a formatted CPF (`000.000.000-00`).
pub const CPF_MAX_LEN: usize = 14;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// CPF contained unexpected characters or was too long.
    #[error("invalid cpf")]
    InvalidCpf,
    /// Income was negative, NaN or infinite.
    #[error("income must be a finite, non-negative number")]
    NegativeIncome,
    /// Children count was negative.
    #[error("children count cannot be negative")]
    NegativeChildren,
    /// Page index or page size outside the accepted range.
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(ClientId, "Unique identifier for a client, assigned by storage.");

/// Trimmed, non-empty client display name.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ClientName(String);

impl ClientName {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ClientName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ClientName {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ClientName {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientName> for String {
    fn from(value: ClientName) -> Self {
        value.0
    }
}

/// Brazilian taxpayer identifier, either bare digits or formatted with `.`/`-`.
///
/// Only the character set and length are checked; check digits are not
/// verified so that partially known identifiers can still be stored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Cpf(String);

impl Cpf {
    /// Trims whitespace and validates the character set.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        let valid_chars = trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == '-');
        if !valid_chars || trimmed.len() > CPF_MAX_LEN {
            return Err(TypeConstraintError::InvalidCpf);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the CPF as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Cpf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Cpf {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Cpf {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Cpf> for String {
    fn from(value: Cpf) -> Self {
        value.0
    }
}

/// Monthly income. Always finite and non-negative.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Income(f64);

impl Income {
    /// Rejects negative, NaN and infinite amounts.
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value >= 0.0 {
            // Normalise -0.0 so equality queries behave.
            Ok(Self(value + 0.0))
        } else {
            Err(TypeConstraintError::NegativeIncome)
        }
    }

    /// Returns the raw amount.
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Display for Income {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f64> for Income {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Income> for f64 {
    fn from(value: Income) -> Self {
        value.0
    }
}

/// Number of children declared by a client.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChildrenCount(i32);

impl ChildrenCount {
    /// Rejects negative counts.
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value >= 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeChildren)
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Display for ChildrenCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for ChildrenCount {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChildrenCount> for i32 {
    fn from(value: ChildrenCount) -> Self {
        value.0
    }
}
