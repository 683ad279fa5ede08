//! Line-oriented persistence codec.
//!
//! # Responsibility
//! - Define the delimiter, escape, and flag rules shared by every persisted
//!   entity line.
//! - Report malformed lines as recoverable `DecodeError` values.
//!
//! # Invariants
//! - One record per line, fields joined by `FIELD_DELIMITER`, no header.
//! - Encoded free text never contains `FIELD_DELIMITER`, `\n` or `\r`.
//! - Escaping is lossy: `FIELD_DELIMITER` is replaced by `DELIMITER_SUBSTITUTE`
//!   and line terminators by `LINE_BREAK_SUBSTITUTE`; neither can be recovered.
//!   Text that already contains a substitute does not round-trip
//!   distinguishably.
//! - Decoding never fails because of escaped text.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Separator between fields of one persisted record.
pub const FIELD_DELIMITER: char = '|';

/// Character written in place of `FIELD_DELIMITER` inside free text.
pub const DELIMITER_SUBSTITUTE: char = '/';

/// Character written in place of `\n` and `\r` inside free text.
pub const LINE_BREAK_SUBSTITUTE: char = ' ';

const FLAG_SET: &str = "1";
const FLAG_CLEAR: &str = "0";

/// Recoverable failure decoding one persisted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    MissingFields {
        expected: usize,
        found: usize,
    },
    InvalidNumber {
        field: &'static str,
        value: String,
    },
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            Self::InvalidNumber { field, value } => {
                write!(f, "field `{field}` is not a valid number: `{value}`")
            }
        }
    }
}

impl Error for DecodeError {}

/// Replaces every delimiter and line terminator in `text` with its substitute.
pub fn escape_field(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            FIELD_DELIMITER => DELIMITER_SUBSTITUTE,
            '\n' | '\r' => LINE_BREAK_SUBSTITUTE,
            other => other,
        })
        .collect()
}

/// Joins already-escaped fields into one record line (without newline).
pub fn join_fields(fields: &[&str]) -> String {
    fields.join(&FIELD_DELIMITER.to_string())
}

/// Splits one record line into raw fields.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(FIELD_DELIMITER).collect()
}

/// Fails with `MissingFields` when fewer than `expected` fields are present.
///
/// Extra trailing fields are tolerated and left to the caller to ignore.
pub fn require_fields(fields: &[&str], expected: usize) -> Result<(), DecodeError> {
    if fields.len() < expected {
        return Err(DecodeError::MissingFields {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

/// Parses a base-10 numeric field, surrounding whitespace allowed.
pub fn parse_number<N: FromStr>(field: &'static str, raw: &str) -> Result<N, DecodeError> {
    raw.trim()
        .parse::<N>()
        .map_err(|_| DecodeError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

pub fn encode_flag(value: bool) -> &'static str {
    if value {
        FLAG_SET
    } else {
        FLAG_CLEAR
    }
}

/// Only the exact set marker reads as `true`; anything else is `false`.
pub fn decode_flag(raw: &str) -> bool {
    raw.trim() == FLAG_SET
}
