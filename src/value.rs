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

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::mem::discriminant;

use ordered_float::OrderedFloat;
use rand::distr::Alphanumeric;
use rand::distr::SampleString;
use rand::rng;
use rand::Rng;

use crate::constants::*;
use crate::error::AccessError;
use crate::util::write_escaped_string;

/// An insertion-order-preserving multi-map from string keys to [`Value`]s.
///
/// JSON objects may carry the same key more than once, the parser keeps
/// every entry in source order rather than deduplicating. Lookup by key
/// returns the first entry in insertion order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Object {
    entries: Vec<(String, Value)>,
}

impl Object {
    pub fn new() -> Object {
        Object::default()
    }

    pub fn with_capacity(capacity: usize) -> Object {
        Object {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Number of entries, duplicate keys counted separately.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// The first entry for `key` in insertion order.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// All entries for `key` in insertion order.
    pub fn get_all<'a, 'b>(&'a self, key: &'b str) -> impl Iterator<Item = &'a Value> + 'b
    where
        'a: 'b,
    {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Append an entry. Existing entries with the same key are kept.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Object {
        Object {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Debug for Object {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("Object(")?;
        formatter.debug_list().entries(self.entries.iter()).finish()?;
        formatter.write_str(")")
    }
}

/// The variant tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Null => TYPE_NULL,
            ValueType::Boolean => TYPE_BOOLEAN,
            ValueType::Number => TYPE_NUMBER,
            ValueType::String => TYPE_STRING,
            ValueType::Array => TYPE_ARRAY,
            ValueType::Object => TYPE_OBJECT,
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Represents a parsed JSON value.
///
/// A tree of `Value`s is plain owned data, each array element and object
/// entry is owned exclusively by its parent container, so the tree is
/// always acyclic and drops with the root. After a successful parse every
/// `Number` holds a finite double and every `String` holds fully decoded
/// UTF-8 with no raw control characters.
#[derive(Clone, Default)]
pub enum Value {
    /// Represents a JSON null value
    #[default]
    Null,
    /// Represents a JSON boolean value (true or false)
    Bool(bool),
    /// Represents a JSON number value as an IEEE-754 double
    Number(f64),
    /// Represents a JSON string value, escapes already resolved
    String(String),
    /// Represents a JSON array of values
    Array(Vec<Value>),
    /// Represents a JSON object as key-value pairs
    Object(Object),
}

impl Eq for Value {}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let result = self.cmp(other);
        result == Ordering::Equal
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        let self_level = self.compare_level();
        let other_level = other.compare_level();
        if self_level != other_level {
            return self_level.cmp(&other_level);
        }

        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(v1), Value::Bool(v2)) => v1.cmp(v2),
            (Value::Number(v1), Value::Number(v2)) => {
                OrderedFloat(*v1).cmp(&OrderedFloat(*v2))
            }
            (Value::String(v1), Value::String(v2)) => v1.cmp(v2),
            (Value::Array(arr1), Value::Array(arr2)) => {
                for (v1, v2) in arr1.iter().zip(arr2.iter()) {
                    let ord = v1.cmp(v2);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                arr1.len().cmp(&arr2.len())
            }
            (Value::Object(obj1), Value::Object(obj2)) => {
                for ((k1, v1), (k2, v2)) in obj1.iter().zip(obj2.iter()) {
                    let ord = k1.cmp(k2);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                    let ord = v1.cmp(v2);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                obj1.len().cmp(&obj2.len())
            }
            (_, _) => Ordering::Equal,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        match *self {
            Value::Null => formatter.debug_tuple("Null").finish(),
            Value::Bool(v) => formatter.debug_tuple("Bool").field(&v).finish(),
            Value::Number(v) => formatter.debug_tuple("Number").field(&v).finish(),
            Value::String(ref v) => formatter.debug_tuple("String").field(v).finish(),
            Value::Array(ref v) => {
                formatter.write_str("Array(")?;
                Debug::fmt(v, formatter)?;
                formatter.write_str(")")
            }
            Value::Object(ref v) => Debug::fmt(v, formatter),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => {
                if *v {
                    write!(f, "true")
                } else {
                    write!(f, "false")
                }
            }
            Value::Number(v) => {
                let mut buffer = ryu::Buffer::new();
                let s = buffer.format(*v);
                write!(f, "{}", s)
            }
            Value::String(ref v) => {
                write!(f, "\"")?;
                write_escaped_string(f, v)?;
                write!(f, "\"")
            }
            Value::Array(ref vs) => {
                write!(f, "[")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Object(ref vs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "\"")?;
                    write_escaped_string(f, k)?;
                    write!(f, "\"")?;
                    write!(f, ":")?;
                    write!(f, "{v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Value {
    /// The variant tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Boolean,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// Serialize the subtree back to JSON text.
    ///
    /// Objects emit entries in insertion order without deduplication,
    /// strings are re-escaped, numbers use the shortest form that parses
    /// back to the identical double. The output carries no whitespace.
    pub fn to_json(&self) -> String {
        self.to_string()
    }

    pub fn is_scalar(&self) -> bool {
        !self.is_array() && !self.is_object()
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_v))
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(ref obj) => Some(obj),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_v))
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(ref array) => Some(array),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Bool(_v))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_null(&self) -> Option<()> {
        match self {
            Value::Null => Some(()),
            _ => None,
        }
    }

    /// The string payload, or a type-mismatch error.
    pub fn get_str(&self) -> Result<&str, AccessError> {
        self.as_str().ok_or_else(|| self.type_mismatch(TYPE_STRING))
    }

    /// The numeric payload, or a type-mismatch error.
    pub fn get_f64(&self) -> Result<f64, AccessError> {
        self.as_f64().ok_or_else(|| self.type_mismatch(TYPE_NUMBER))
    }

    /// The boolean payload, or a type-mismatch error. Succeeds for both
    /// truth values and fails for every other variant.
    pub fn get_bool(&self) -> Result<bool, AccessError> {
        self.as_bool()
            .ok_or_else(|| self.type_mismatch(TYPE_BOOLEAN))
    }

    pub fn get_array(&self) -> Result<&Vec<Value>, AccessError> {
        self.as_array()
            .ok_or_else(|| self.type_mismatch(TYPE_ARRAY))
    }

    pub fn get_array_mut(&mut self) -> Result<&mut Vec<Value>, AccessError> {
        match self {
            Value::Array(ref mut array) => Ok(array),
            other => Err(other.type_mismatch(TYPE_ARRAY)),
        }
    }

    pub fn get_object(&self) -> Result<&Object, AccessError> {
        self.as_object()
            .ok_or_else(|| self.type_mismatch(TYPE_OBJECT))
    }

    pub fn get_object_mut(&mut self) -> Result<&mut Object, AccessError> {
        match self {
            Value::Object(ref mut obj) => Ok(obj),
            other => Err(other.type_mismatch(TYPE_OBJECT)),
        }
    }

    pub fn array_length(&self) -> Option<usize> {
        match self {
            Value::Array(arr) => Some(arr.len()),
            _ => None,
        }
    }

    /// Bounds-checked element access.
    pub fn array_get(&self, index: usize) -> Result<&Value, AccessError> {
        let arr = self.get_array()?;
        arr.get(index).ok_or(AccessError::IndexOutOfBounds {
            index,
            len: arr.len(),
        })
    }

    /// Replace the element at `index`. Sibling elements are untouched.
    pub fn array_set(&mut self, index: usize, value: impl Into<Value>) -> Result<(), AccessError> {
        let arr = self.get_array_mut()?;
        let len = arr.len();
        match arr.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(AccessError::IndexOutOfBounds { index, len }),
        }
    }

    /// Remove and return the element at `index`, shifting the rest left.
    pub fn array_remove(&mut self, index: usize) -> Result<Value, AccessError> {
        let arr = self.get_array_mut()?;
        if index >= arr.len() {
            return Err(AccessError::IndexOutOfBounds {
                index,
                len: arr.len(),
            });
        }
        Ok(arr.remove(index))
    }

    /// Append an element to an array value.
    pub fn array_push(&mut self, value: impl Into<Value>) -> Result<(), AccessError> {
        let arr = self.get_array_mut()?;
        arr.push(value.into());
        Ok(())
    }

    pub fn object_length(&self) -> Option<usize> {
        match self {
            Value::Object(obj) => Some(obj.len()),
            _ => None,
        }
    }

    pub fn object_contains_key(&self, key: &str) -> bool {
        match self {
            Value::Object(obj) => obj.contains_key(key),
            _ => false,
        }
    }

    /// The first entry for `key`, or a key-not-found error.
    pub fn object_get(&self, key: &str) -> Result<&Value, AccessError> {
        self.get_object()?
            .get(key)
            .ok_or_else(|| AccessError::KeyNotFound(key.to_string()))
    }

    /// Every entry for `key` in insertion order, or a key-not-found error
    /// when the object has none.
    pub fn object_get_all(&self, key: &str) -> Result<Vec<&Value>, AccessError> {
        let values: Vec<&Value> = self.get_object()?.get_all(key).collect();
        if values.is_empty() {
            return Err(AccessError::KeyNotFound(key.to_string()));
        }
        Ok(values)
    }

    /// Append an entry to an object value, keeping existing entries with
    /// the same key.
    pub fn object_insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), AccessError> {
        let obj = self.get_object_mut()?;
        obj.insert(key, value);
        Ok(())
    }

    pub fn object_keys(&self) -> Option<Value> {
        match self {
            Value::Object(obj) => {
                let mut keys = Vec::with_capacity(obj.len());
                for k in obj.keys() {
                    keys.push(k.into());
                }
                Some(Value::Array(keys))
            }
            _ => None,
        }
    }

    pub fn eq_variant(&self, other: &Value) -> bool {
        discriminant(self) == discriminant(other)
    }

    fn type_mismatch(&self, expected: &'static str) -> AccessError {
        AccessError::TypeMismatch {
            expected,
            actual: self.value_type().name(),
        }
    }

    fn compare_level(&self) -> u8 {
        match self {
            Value::Null => NULL_LEVEL,
            Value::Bool(_) => BOOLEAN_LEVEL,
            Value::Number(_) => NUMBER_LEVEL,
            Value::String(_) => STRING_LEVEL,
            Value::Array(_) => ARRAY_LEVEL,
            Value::Object(_) => OBJECT_LEVEL,
        }
    }

    /// generate random JSON value
    pub fn rand_value() -> Value {
        let mut rng = rng();
        let val = match rng.random_range(0..=2) {
            0 => {
                let len = rng.random_range(0..=5);
                let mut values = Vec::with_capacity(len);
                for _ in 0..len {
                    values.push(Self::rand_scalar_value());
                }
                Value::Array(values)
            }
            1 => {
                let len = rng.random_range(0..=5);
                let mut obj = Object::new();
                for _ in 0..len {
                    let k = Alphanumeric.sample_string(&mut rng, 5);
                    let v = Self::rand_scalar_value();
                    obj.insert(k, v);
                }
                Value::Object(obj)
            }
            _ => Self::rand_scalar_value(),
        };
        val
    }

    fn rand_scalar_value() -> Value {
        let mut rng = rng();
        let val = match rng.random_range(0..=3) {
            0 => {
                let v = rng.random_bool(0.5);
                Value::Bool(v)
            }
            1 => {
                let s = Alphanumeric.sample_string(&mut rng, 5);
                Value::String(s)
            }
            2 => match rng.random_range(0..=2) {
                0 => {
                    let n: u32 = rng.random_range(0..=100000);
                    Value::Number(n as f64)
                }
                1 => {
                    let n: i32 = rng.random_range(-100000..=100000);
                    Value::Number(n as f64)
                }
                _ => {
                    let n: f64 = rng.random_range(-4000.0..1.3e5);
                    Value::Number(n)
                }
            },
            _ => Value::Null,
        };
        val
    }
}
