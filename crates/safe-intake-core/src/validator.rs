// SPDX-License-Identifier: Apache-2.0

//! Console name input with allowlist validation.
//!
//! A name is accepted only when the whole trimmed line matches
//! `[A-Za-z[:space:]'-]{1,64}`. Anything else is rejected, and the rejected
//! text is dropped without being logged or carried in the error.

use std::io::{BufRead, ErrorKind, Write};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{IntakeError, InvalidInput, Rejection};

/// Prompt written before the name is read.
pub const NAME_PROMPT: &str = "Enter your name: ";

/// Maximum accepted name length, in characters.
pub const MAX_NAME_LEN: usize = 64;

/// Full-string allowlist: ASCII letters, ASCII whitespace, hyphen, apostrophe.
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z[:space:]'\-]{1,64}$").expect("name allowlist pattern is valid")
});

/// A name that passed the allowlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Returns the validated name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the validated name.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Validates a raw line as a name.
///
/// Leading and trailing characters up to U+0020 (ASCII space and control
/// characters) are trimmed before matching. Unicode whitespace is left in
/// place and fails the allowlist.
pub fn validate_name(raw: &str) -> Result<UserName, InvalidInput> {
    let trimmed = raw.trim_matches(|c: char| c <= ' ');

    if NAME_PATTERN.is_match(trimmed) {
        return Ok(UserName(trimmed.to_string()));
    }

    let length = trimmed.chars().count();
    let reason = if length == 0 {
        Rejection::Empty
    } else if length > MAX_NAME_LEN {
        Rejection::TooLong { length }
    } else {
        Rejection::DisallowedCharacters
    };

    debug!(%reason, "Rejected name input");
    Err(InvalidInput::new(reason))
}

/// Prompts for and reads exactly one line, then validates it.
///
/// The reader is consumed and released when this returns. End of input reads
/// as an empty line; bytes that are not UTF-8 are rejected as disallowed
/// characters.
///
/// # Arguments
///
/// * `input` - Source of the line (stdin in the binary)
/// * `prompt` - Where [`NAME_PROMPT`] is written (stdout in the binary)
pub fn read_validated_name<R, W>(mut input: R, mut prompt: W) -> crate::Result<UserName>
where
    R: BufRead,
    W: Write,
{
    prompt
        .write_all(NAME_PROMPT.as_bytes())
        .and_then(|()| prompt.flush())
        .map_err(IntakeError::Console)?;

    let mut raw = String::new();
    match input.read_line(&mut raw) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            return Err(InvalidInput::new(Rejection::DisallowedCharacters).into());
        }
        Err(e) => return Err(IntakeError::Console(e)),
    }

    Ok(validate_name(&raw)?)
}
