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

use jsondom::{parse_value, Object, Value};

#[test]
fn test_from_primitives() {
    assert_eq!(Value::from(()), Value::Null);
    assert_eq!(Value::from(true), Value::Bool(true));
    assert_eq!(Value::from(3_i32), Value::Number(3.0));
    assert_eq!(Value::from(3_u64), Value::Number(3.0));
    assert_eq!(Value::from(1.5_f32), Value::Number(1.5));
    assert_eq!(Value::from(1.5_f64), Value::Number(1.5));
    assert_eq!(Value::from("s"), Value::String("s".to_string()));
    assert_eq!(Value::from("s".to_string()), Value::String("s".to_string()));
}

#[test]
fn test_from_collections() {
    let arr = Value::from(vec![1, 2, 3]);
    assert_eq!(arr.to_json(), "[1.0,2.0,3.0]");

    let arr: Value = ["a", "b"].into_iter().collect();
    assert_eq!(arr.to_json(), r#"["a","b"]"#);

    let obj: Value = vec![("a", 1.0), ("b", 2.0)].into_iter().collect();
    assert_eq!(obj.to_json(), r#"{"a":1.0,"b":2.0}"#);

    let mut inner = Object::new();
    inner.insert("k", Value::Null);
    let obj = Value::from(inner);
    assert_eq!(obj.to_json(), r#"{"k":null}"#);
}

#[test]
fn test_model_round_trip() {
    // Trees built from the model API survive toJson + parse.
    let val: Value = vec![
        ("nums", Value::from(vec![1.5, 2.5])),
        ("flag", Value::from(false)),
        ("name", Value::from("demo \"quoted\"")),
        ("nothing", Value::Null),
    ]
    .into_iter()
    .collect();

    let text = val.to_json();
    assert_eq!(parse_value(text.as_bytes()).unwrap(), val);
}

#[test]
fn test_serde_json_interop() {
    let source = r#"{"a":[1.5,null,"x"],"b":{"c":true}}"#;
    let ours = parse_value(source.as_bytes()).unwrap();
    let theirs: serde_json::Value = serde_json::from_str(source).unwrap();

    // Converting the serde_json tree yields the same DOM the parser built.
    assert_eq!(Value::from(&theirs), ours);

    // And back again.
    let converted: serde_json::Value = (&ours).into();
    assert_eq!(converted, theirs);
}

#[test]
fn test_serde_json_duplicate_keys_collapse_first() {
    let val = parse_value(br#"{"a":1,"a":2}"#).unwrap();
    let converted: serde_json::Value = val.into();
    // serde_json maps hold one entry per key, the first one wins to match
    // the first-match lookup policy.
    assert_eq!(converted, serde_json::json!({"a": 1.0}));
}

#[test]
fn test_serde_json_nonfinite_number() {
    let theirs = serde_json::json!({"n": 1.0});
    let mut ours = Value::from(&theirs);
    assert_eq!(ours.object_get("n").unwrap(), &Value::Number(1.0));

    // A non-finite double cannot be represented in JSON text output.
    ours.object_insert("bad", Value::Number(f64::NAN)).unwrap();
    let back: serde_json::Value = (&ours).into();
    assert_eq!(back, serde_json::json!({"n": 1.0, "bad": null}));
}
