//! Invitation code value object and generator.
//!
//! Codes are eight characters drawn uniformly from `[A-Z0-9]`. Uniqueness
//! is not checked here: the store enforces it with a unique constraint and
//! an insert-or-fail, and the create-project handler regenerates on a
//! duplicate-code conflict up to a bounded attempt count.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Alphabet the code is drawn from.
pub const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Fixed code length.
pub const CODE_LENGTH: usize = 8;

/// An 8-character uppercase alphanumeric join code, unique per project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvitationCode(String);

impl InvitationCode {
    /// Draws a fresh code from the given RNG.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code: String = (0..CODE_LENGTH)
            .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
            .collect();
        Self(code)
    }

    /// Validates an existing code string.
    pub fn try_new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = raw.as_ref();
        if raw.len() != CODE_LENGTH {
            return Err(ValidationError::invalid_format(
                "invitation_code",
                format!("must be exactly {} characters", CODE_LENGTH),
            ));
        }
        if !raw.bytes().all(|b| CODE_CHARSET.contains(&b)) {
            return Err(ValidationError::invalid_format(
                "invitation_code",
                "must contain only A-Z and 0-9",
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvitationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InvitationCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s)
    }
}
