// Copyright 2023 Datafuse Labs.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

/// The fixed set of syntax violations the parser can report.
///
/// Every failed parse maps to exactly one of these kinds. The kind alone is
/// enough for programmatic matching; [`ParseError`] adds the position and
/// the source text for the human-facing diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorCode {
    /// A value was expected but the bytes at the cursor do not start one.
    InvalidValue,
    /// The number literal is valid but converts to an infinite double.
    NumberTooBig,
    /// Non-whitespace bytes remain after a complete top-level value.
    RedundantChars,
    /// A raw control character, an unknown escape, or invalid UTF-8 inside
    /// a string literal.
    InvalidStringChar,
    /// A malformed `\u` escape, or a surrogate half without its partner.
    InvalidUnicodeChar,
    /// End of input before the closing quote of a string literal.
    MissStringEndEscape,
    /// An array element was not followed by `,` or `]`.
    MissCommaOrSquareBracket,
    /// An object entry does not start with a quoted key.
    MissKey,
    /// An object key was not followed by `:`.
    MissColon,
    /// An object entry was not followed by `,` or `}`.
    MissCommaOrCurlyBracket,
    /// A `,` directly followed by the container close or end of input.
    RedundantComma,
}

impl Display for ParseErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ParseErrorCode::InvalidValue => "invalid value",
            ParseErrorCode::NumberTooBig => "number too big",
            ParseErrorCode::RedundantChars => "redundant chars",
            ParseErrorCode::InvalidStringChar => "invalid string char",
            ParseErrorCode::InvalidUnicodeChar => "invalid unicode char",
            ParseErrorCode::MissStringEndEscape => "miss string end escape",
            ParseErrorCode::MissCommaOrSquareBracket => "miss comma or square bracket",
            ParseErrorCode::MissKey => "miss key",
            ParseErrorCode::MissColon => "miss colon",
            ParseErrorCode::MissCommaOrCurlyBracket => "miss comma or curly bracket",
            ParseErrorCode::RedundantComma => "redundant comma",
        };
        write!(f, "{}", msg)
    }
}

/// A positioned parse failure.
///
/// Carries the error kind, the byte offset where the violation was detected
/// and a copy of the full source text. `Display` renders the source followed
/// by a caret line pointing at the offset, so the failure can be located by
/// eye rather than by counting bytes:
///
/// ```text
/// miss colon, pos 5, which near:
/// {"a" 1}
///      ^
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    code: ParseErrorCode,
    pos: usize,
    text: String,
}

impl ParseError {
    pub(crate) fn new(code: ParseErrorCode, pos: usize, text: String) -> ParseError {
        ParseError { code, pos, text }
    }

    /// The kind of syntax violation.
    pub fn code(&self) -> ParseErrorCode {
        self.code
    }

    /// Byte offset into the source text where the violation was detected.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The full source text the failed parse was given.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}, pos {}, which near:", self.code, self.pos)?;
        writeln!(f, "{}", self.text)?;
        // The caret counts characters from the start of the source line
        // holding the offset, so multi-byte characters and embedded
        // newlines before it do not misalign the caret.
        let bytes = self.text.as_bytes();
        let pos = self.pos.min(bytes.len());
        let line_start = bytes[..pos]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let column = String::from_utf8_lossy(&bytes[line_start..pos]).chars().count();
        write!(f, "{:width$}^", "", width = column)
    }
}

impl std::error::Error for ParseError {}

/// Failures raised by the typed accessors and container operations of
/// [`Value`](crate::Value).
///
/// These are call-site errors on an already parsed tree and are kept apart
/// from the parse-time taxonomy on purpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The value is not of the requested variant.
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    /// An array index at or past the end.
    IndexOutOfBounds { index: usize, len: usize },
    /// An object lookup for a key with no entry.
    KeyNotFound(String),
}

impl Display for AccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessError::TypeMismatch { expected, actual } => {
                write!(f, "type mismatch, expected {}, found {}", expected, actual)
            }
            AccessError::IndexOutOfBounds { index, len } => {
                write!(f, "index {} out of bounds, array length {}", index, len)
            }
            AccessError::KeyNotFound(key) => {
                write!(f, "key {:?} not found", key)
            }
        }
    }
}

impl std::error::Error for AccessError {}
