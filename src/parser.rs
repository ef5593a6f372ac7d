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

use super::constants::*;
use super::error::ParseError;
use super::error::ParseErrorCode;
use super::util::decode_hex4;
use super::value::Object;
use super::value::Value;

/// Parse JSON text into an owned [`Value`] tree.
///
/// Succeeds only when the whole input, leading and trailing whitespace
/// aside, is a single valid JSON value. Any grammar violation aborts the
/// parse with a positioned [`ParseError`], there is no partial result.
///
/// Recursion depth equals the nesting depth of the input, no explicit
/// limit is imposed. Callers feeding adversarial input should bound the
/// nesting themselves or run with a sufficient stack.
pub fn parse_value(buf: &[u8]) -> Result<Value, ParseError> {
    let mut parser = Parser::new(buf);
    parser.parse()
}

struct Parser<'a> {
    buf: &'a [u8],
    idx: usize,
    // Scratch storage for decoded string bytes, reused across string
    // parses within one call. Logically empty between sibling strings.
    str_buf: Vec<u8>,
}

impl<'a> Parser<'a> {
    fn new(buf: &'a [u8]) -> Parser<'a> {
        Self {
            buf,
            idx: 0,
            str_buf: Vec::with_capacity(64),
        }
    }

    fn parse(&mut self) -> Result<Value, ParseError> {
        self.skip_whitespace();
        let val = self.parse_json_value()?;
        self.skip_whitespace();
        if self.idx < self.buf.len() {
            return Err(self.error(ParseErrorCode::RedundantChars));
        }
        Ok(val)
    }

    // Callers skip leading whitespace before dispatching here.
    fn parse_json_value(&mut self) -> Result<Value, ParseError> {
        match self.buf.get(self.idx) {
            Some(b'n') => self.parse_json_null(),
            Some(b't') => self.parse_json_true(),
            Some(b'f') => self.parse_json_false(),
            Some(b'"') => self.parse_json_string(),
            Some(b'[') => self.parse_json_array(),
            Some(b'{') => self.parse_json_object(),
            // Anything else is attempted as a number, the number grammar
            // reports invalid value for bytes that cannot start one.
            _ => self.parse_json_number(),
        }
    }

    #[inline]
    fn step(&mut self) {
        self.idx += 1;
    }

    #[inline]
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.buf.get(self.idx) {
            if !matches!(c, b' ' | b'\t' | b'\n' | b'\r') {
                break;
            }
            self.idx += 1;
        }
    }

    fn error(&self, code: ParseErrorCode) -> ParseError {
        self.error_at(code, self.idx)
    }

    fn error_at(&self, code: ParseErrorCode, pos: usize) -> ParseError {
        let text = String::from_utf8_lossy(self.buf).into_owned();
        ParseError::new(code, pos, text)
    }

    // Exact keyword match at the cursor, errors point at the keyword start.
    fn must_keyword(&mut self, keyword: &'static [u8]) -> Result<(), ParseError> {
        match self.buf.get(self.idx..self.idx + keyword.len()) {
            Some(data) if data == keyword => {
                self.idx += keyword.len();
                Ok(())
            }
            _ => Err(self.error(ParseErrorCode::InvalidValue)),
        }
    }

    fn parse_json_null(&mut self) -> Result<Value, ParseError> {
        self.must_keyword(b"null")?;
        Ok(Value::Null)
    }

    fn parse_json_true(&mut self) -> Result<Value, ParseError> {
        self.must_keyword(b"true")?;
        Ok(Value::Bool(true))
    }

    fn parse_json_false(&mut self) -> Result<Value, ParseError> {
        self.must_keyword(b"false")?;
        Ok(Value::Bool(false))
    }

    /// Parse a JSON number in two phases. The literal shape is validated
    /// against the number grammar first without consuming, then the
    /// validated slice converts to a double in one go.
    ///
    /// Overflow to an infinity is a `NumberTooBig` error rather than a
    /// clamped value, underflow quietly becomes `0.0`.
    fn parse_json_number(&mut self) -> Result<Value, ParseError> {
        let start_idx = self.idx;
        let mut p = self.idx;

        if self.buf.get(p) == Some(&b'-') {
            p += 1;
        }
        // Integer part is a lone `0` or a nonzero digit followed by digits.
        match self.buf.get(p) {
            Some(b'0') => p += 1,
            Some(c) if c.is_ascii_digit() => {
                while self.buf.get(p).is_some_and(|c| c.is_ascii_digit()) {
                    p += 1;
                }
            }
            _ => return Err(self.error_at(ParseErrorCode::InvalidValue, p)),
        }
        if self.buf.get(p) == Some(&b'.') {
            p += 1;
            if !self.buf.get(p).is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error_at(ParseErrorCode::InvalidValue, p));
            }
            while self.buf.get(p).is_some_and(|c| c.is_ascii_digit()) {
                p += 1;
            }
        }
        if matches!(self.buf.get(p), Some(b'e') | Some(b'E')) {
            p += 1;
            if matches!(self.buf.get(p), Some(b'+') | Some(b'-')) {
                p += 1;
            }
            if !self.buf.get(p).is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error_at(ParseErrorCode::InvalidValue, p));
            }
            while self.buf.get(p).is_some_and(|c| c.is_ascii_digit()) {
                p += 1;
            }
        }

        // The validated range contains only ASCII digits, signs, `.` and
        // `e`, so it is valid UTF-8.
        let s = unsafe { std::str::from_utf8_unchecked(&self.buf[start_idx..p]) };
        match fast_float2::parse::<f64, _>(s) {
            Ok(n) if n.is_infinite() => Err(self.error_at(ParseErrorCode::NumberTooBig, start_idx)),
            Ok(n) => {
                self.idx = p;
                Ok(Value::Number(n))
            }
            Err(_) => Err(self.error_at(ParseErrorCode::InvalidValue, start_idx)),
        }
    }

    fn parse_json_string(&mut self) -> Result<Value, ParseError> {
        let s = self.parse_string_raw()?;
        Ok(Value::String(s))
    }

    /// Parse a string literal at the cursor into decoded text.
    ///
    /// Bytes accumulate in the scratch buffer, the decoded tail is split
    /// out at string end so the buffer is back to its pre-call length and
    /// sibling strings start clean.
    fn parse_string_raw(&mut self) -> Result<String, ParseError> {
        let start_idx = self.idx;
        // Caller guarantees the opening quote.
        self.step();
        let buf_start = self.str_buf.len();

        loop {
            match self.buf.get(self.idx) {
                None => return Err(self.error(ParseErrorCode::MissStringEndEscape)),
                Some(&QU) => {
                    self.step();
                    break;
                }
                Some(&BS) => {
                    self.step();
                    self.parse_escaped()?;
                }
                Some(&c) if c < 0x20 => {
                    return Err(self.error(ParseErrorCode::InvalidStringChar));
                }
                Some(&c) => {
                    self.str_buf.push(c);
                    self.step();
                }
            }
        }

        let data = self.str_buf.split_off(buf_start);
        match String::from_utf8(data) {
            Ok(s) => Ok(s),
            // Raw bytes that are not valid UTF-8, point at the literal.
            Err(_) => Err(self.error_at(ParseErrorCode::InvalidStringChar, start_idx)),
        }
    }

    // Cursor sits one past the backslash.
    fn parse_escaped(&mut self) -> Result<(), ParseError> {
        let c = match self.buf.get(self.idx) {
            Some(c) => *c,
            None => return Err(self.error(ParseErrorCode::InvalidStringChar)),
        };
        self.step();
        match c {
            QU => self.str_buf.push(QU),
            BS => self.str_buf.push(BS),
            SD => self.str_buf.push(SD),
            b'b' => self.str_buf.push(BB),
            b'f' => self.str_buf.push(FF),
            b'n' => self.str_buf.push(NN),
            b'r' => self.str_buf.push(RR),
            b't' => self.str_buf.push(TT),
            b'u' => {
                let hi = self.parse_hex4()?;
                let cp = if (0xD800..=0xDBFF).contains(&hi) {
                    // A high surrogate must pair with a following low
                    // surrogate escape.
                    if self.buf.get(self.idx) == Some(&BS)
                        && self.buf.get(self.idx + 1) == Some(&b'u')
                    {
                        self.idx += 2;
                    } else {
                        return Err(self.error(ParseErrorCode::InvalidUnicodeChar));
                    }
                    let lo = self.parse_hex4()?;
                    if !(0xDC00..=0xDFFF).contains(&lo) {
                        return Err(self.error(ParseErrorCode::InvalidUnicodeChar));
                    }
                    0x1_0000 + ((((hi - 0xD800) as u32) << 10) | (lo - 0xDC00) as u32)
                } else {
                    hi as u32
                };
                match char::from_u32(cp) {
                    Some(ch) => {
                        let mut utf8_buf = [0u8; 4];
                        self.str_buf
                            .extend_from_slice(ch.encode_utf8(&mut utf8_buf).as_bytes());
                    }
                    // Unpaired low surrogates land here.
                    None => return Err(self.error(ParseErrorCode::InvalidUnicodeChar)),
                }
            }
            _ => return Err(self.error_at(ParseErrorCode::InvalidStringChar, self.idx - 1)),
        }
        Ok(())
    }

    fn parse_hex4(&mut self) -> Result<u16, ParseError> {
        match self.buf.get(self.idx..self.idx + UNICODE_LEN) {
            Some(digits) => match decode_hex4(digits) {
                Some(n) => {
                    self.idx += UNICODE_LEN;
                    Ok(n)
                }
                None => Err(self.error(ParseErrorCode::InvalidUnicodeChar)),
            },
            None => Err(self.error(ParseErrorCode::InvalidUnicodeChar)),
        }
    }

    fn parse_json_array(&mut self) -> Result<Value, ParseError> {
        // Caller guarantees the opening bracket.
        self.step();
        self.skip_whitespace();

        let mut values = Vec::new();
        if self.buf.get(self.idx) == Some(&b']') {
            self.step();
            return Ok(Value::Array(values));
        }
        loop {
            let value = self.parse_json_value()?;
            values.push(value);
            self.skip_whitespace();
            match self.buf.get(self.idx) {
                Some(b',') => {
                    self.step();
                    self.skip_whitespace();
                    // Trailing commas are rejected up front rather than
                    // falling through to a value parse.
                    if matches!(self.buf.get(self.idx), None | Some(b']')) {
                        return Err(self.error(ParseErrorCode::RedundantComma));
                    }
                }
                Some(b']') => {
                    self.step();
                    break;
                }
                _ => return Err(self.error(ParseErrorCode::MissCommaOrSquareBracket)),
            }
        }
        Ok(Value::Array(values))
    }

    fn parse_json_object(&mut self) -> Result<Value, ParseError> {
        // Caller guarantees the opening brace.
        self.step();
        self.skip_whitespace();

        let mut obj = Object::new();
        if self.buf.get(self.idx) == Some(&b'}') {
            self.step();
            return Ok(Value::Object(obj));
        }
        loop {
            if self.buf.get(self.idx) != Some(&QU) {
                return Err(self.error(ParseErrorCode::MissKey));
            }
            let key = self.parse_string_raw()?;
            self.skip_whitespace();
            if self.buf.get(self.idx) != Some(&b':') {
                return Err(self.error(ParseErrorCode::MissColon));
            }
            self.step();
            self.skip_whitespace();
            let value = self.parse_json_value()?;
            // Duplicate keys stay as separate entries in source order.
            obj.insert(key, value);
            self.skip_whitespace();
            match self.buf.get(self.idx) {
                Some(b',') => {
                    self.step();
                    self.skip_whitespace();
                    if matches!(self.buf.get(self.idx), None | Some(b'}')) {
                        return Err(self.error(ParseErrorCode::RedundantComma));
                    }
                }
                Some(b'}') => {
                    self.step();
                    break;
                }
                _ => return Err(self.error(ParseErrorCode::MissCommaOrCurlyBracket)),
            }
        }
        Ok(Value::Object(obj))
    }
}
