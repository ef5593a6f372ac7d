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

use ordered_float::OrderedFloat;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

use crate::value::Object;
use crate::value::Value;

macro_rules! from_integer {
    ($($ty:ident)*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

macro_rules! from_float {
    ($($ty:ident)*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

from_integer! {
    i8 i16 i32 i64 isize u8 u16 u32 u64 usize
}

from_float! {
    f32 f64
}

impl From<OrderedFloat<f32>> for Value {
    fn from(f: OrderedFloat<f32>) -> Self {
        Value::Number(f.0 as f64)
    }
}

impl From<OrderedFloat<f64>> for Value {
    fn from(f: OrderedFloat<f64>) -> Self {
        Value::Number(f.0)
    }
}

impl From<bool> for Value {
    fn from(f: bool) -> Self {
        Value::Bool(f)
    }
}

impl From<String> for Value {
    fn from(f: String) -> Self {
        Value::String(f)
    }
}

impl From<&str> for Value {
    fn from(f: &str) -> Self {
        Value::String(f.to_string())
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(f: Vec<T>) -> Self {
        Value::Array(f.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(f: &[T]) -> Self {
        Value::Array(f.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

impl From<&JsonValue> for Value {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(v) => Value::Bool(*v),
            JsonValue::Number(v) => {
                // Integers beyond 2^53 lose precision, the model only has
                // doubles. NaN or Infinity fall back to NULL.
                match v.as_f64() {
                    Some(n) if n.is_finite() => Value::Number(n),
                    _ => Value::Null,
                }
            }
            JsonValue::String(v) => Value::String(v.clone()),
            JsonValue::Array(arr) => Value::Array(arr.iter().map(Into::into).collect()),
            JsonValue::Object(obj) => {
                let mut object = Object::with_capacity(obj.len());
                for (k, v) in obj.iter() {
                    object.insert(k.clone(), Value::from(v));
                }
                Value::Object(object)
            }
        }
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        Value::from(&value)
    }
}

impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(v) => JsonValue::Bool(*v),
            Value::Number(v) => match serde_json::Number::from_f64(*v) {
                Some(n) => JsonValue::Number(n),
                None => JsonValue::Null,
            },
            Value::String(v) => JsonValue::String(v.clone()),
            Value::Array(arr) => JsonValue::Array(arr.iter().map(Into::into).collect()),
            Value::Object(obj) => {
                let mut map = JsonMap::with_capacity(obj.len());
                for (k, v) in obj.iter() {
                    // Duplicate keys collapse to the first entry, matching
                    // the first-match lookup policy.
                    if !map.contains_key(k) {
                        map.insert(k.to_string(), JsonValue::from(v));
                    }
                }
                JsonValue::Object(map)
            }
        }
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        JsonValue::from(&value)
    }
}
