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

//! `jsondom` parses JSON text into an owned in-memory tree of typed values
//! and serializes such trees back to JSON text.
//!
//! ## Features
//!
//! - Single-pass recursive-descent parsing with no tokenizer stage: the
//!   grammar functions validate and build the tree directly from the byte
//!   buffer.
//! - Precise diagnostics: every failed parse reports one of a fixed set of
//!   error kinds together with the byte offset and a caret line rendering
//!   the position inside the source text.
//! - Faithful document model: objects are insertion-order-preserving
//!   multi-maps, duplicate keys stay as separate entries and lookup
//!   returns the first match.
//! - Full string decoding at parse time, including `\uXXXX` escapes and
//!   surrogate-pair combination into UTF-8.
//!
//! ## Example
//!
//! ```
//! use jsondom::parse_value;
//!
//! let value = parse_value(br#"{"name":"box","sizes":[1,2.5]}"#).unwrap();
//! assert_eq!(value.object_get("name").unwrap().get_str().unwrap(), "box");
//! assert_eq!(value.to_json(), r#"{"name":"box","sizes":[1.0,2.5]}"#);
//! ```

#![allow(clippy::uninlined_format_args)]

mod constants;
mod error;
mod from;
mod parser;
mod util;
mod value;

pub use error::AccessError;
pub use error::ParseError;
pub use error::ParseErrorCode;
pub use parser::parse_value;
pub use value::Object;
pub use value::Value;
pub use value::ValueType;
