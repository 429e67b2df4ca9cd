//! Session codes: five uppercase alphanumeric characters that address a
//! party on the relay.
//!
//! Codes are generated locally and never coordinated, so two parties can
//! draw the same code. Nothing here tries to prevent that.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CODE_LEN: usize = 5;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Why a string was rejected as a session code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("code must be 5 characters, got {0}")]
    Length(usize),
    #[error("code may only contain letters and digits, found '{0}'")]
    Character(char),
    #[error("code '{0}' is not uppercase")]
    NotCanonical(String),
}

/// A validated code matching `^[A-Z0-9]{5}$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionCode(String);

impl SessionCode {
    /// Trims and uppercases `input`, then checks the code format.
    pub fn parse(input: &str) -> Result<Self, CodeError> {
        let normalized = input.trim().to_ascii_uppercase();
        let len = normalized.chars().count();
        if len != CODE_LEN {
            return Err(CodeError::Length(len));
        }
        if let Some(bad) = normalized.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(CodeError::Character(bad));
        }
        Ok(SessionCode(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SessionCode {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let code = SessionCode::parse(&value)?;
        // Wire codes must already be canonical.
        if code.0 != value {
            return Err(CodeError::NotCanonical(value));
        }
        Ok(code)
    }
}

impl From<SessionCode> for String {
    fn from(code: SessionCode) -> Self {
        code.0
    }
}

/// `true` when `input` is a valid code after trimming and uppercasing.
pub fn is_valid_code(input: &str) -> bool {
    SessionCode::parse(input).is_ok()
}

/// Source of fresh session codes.
pub trait CodeGenerator {
    fn generate(&mut self) -> SessionCode;
}

/// Draws each character uniformly from `A-Z0-9`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodes;

impl CodeGenerator for RandomCodes {
    fn generate(&mut self) -> SessionCode {
        let mut rng = rand::thread_rng();
        let code = (0..CODE_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        SessionCode(code)
    }
}
