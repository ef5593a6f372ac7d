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

use jsondom::{parse_value, Object, ParseErrorCode, Value};

fn test_parse_err(errors: &[(&str, ParseErrorCode, usize)]) {
    for &(s, code, pos) in errors {
        let res = parse_value(s.as_bytes());
        let err = res.expect_err(&format!("input should fail: {s}"));
        assert_eq!(err.code(), code, "input: {s}");
        assert_eq!(err.pos(), pos, "input: {s}");
    }
}

fn test_parse_ok(tests: Vec<(&str, Value)>) {
    for (s, val) in tests {
        assert_eq!(parse_value(s.as_bytes()).unwrap(), val, "input: {s}");
    }
}

fn object_from(entries: Vec<(&str, Value)>) -> Value {
    let mut obj = Object::new();
    for (k, v) in entries {
        obj.insert(k, v);
    }
    Value::Object(obj)
}

#[test]
fn test_parse_literals() {
    test_parse_ok(vec![
        ("null", Value::Null),
        (" null ", Value::Null),
        ("true", Value::Bool(true)),
        ("\t\r\n false \n", Value::Bool(false)),
    ]);

    test_parse_err(&[
        ("n", ParseErrorCode::InvalidValue, 0),
        ("nul", ParseErrorCode::InvalidValue, 0),
        ("nULL", ParseErrorCode::InvalidValue, 0),
        ("truz", ParseErrorCode::InvalidValue, 0),
        ("fals", ParseErrorCode::InvalidValue, 0),
        ("nulla", ParseErrorCode::RedundantChars, 4),
        ("truea", ParseErrorCode::RedundantChars, 4),
        ("true false", ParseErrorCode::RedundantChars, 5),
        ("", ParseErrorCode::InvalidValue, 0),
        ("   ", ParseErrorCode::InvalidValue, 3),
    ]);
}

#[test]
fn test_parse_number() {
    test_parse_ok(vec![
        ("0", Value::Number(0.0)),
        ("-0", Value::Number(0.0)),
        ("1", Value::Number(1.0)),
        ("-1", Value::Number(-1.0)),
        ("3.1416", Value::Number(3.1416)),
        ("1E10", Value::Number(1e10)),
        ("1e-10", Value::Number(1e-10)),
        ("-1.5e3", Value::Number(-1500.0)),
        ("1.0000000000000002", Value::Number(1.000_000_000_000_000_2)),
        // Underflow quietly becomes zero rather than an error.
        ("1e-10000", Value::Number(0.0)),
        ("2.2250738585072014e-308", Value::Number(2.2250738585072014e-308)),
        ("1.7976931348623157e308", Value::Number(f64::MAX)),
    ]);

    test_parse_err(&[
        ("+", ParseErrorCode::InvalidValue, 0),
        ("-", ParseErrorCode::InvalidValue, 1),
        (".", ParseErrorCode::InvalidValue, 0),
        (".5", ParseErrorCode::InvalidValue, 0),
        ("+1", ParseErrorCode::InvalidValue, 0),
        ("1.", ParseErrorCode::InvalidValue, 2),
        ("1e", ParseErrorCode::InvalidValue, 2),
        ("1e+", ParseErrorCode::InvalidValue, 3),
        ("INF", ParseErrorCode::InvalidValue, 0),
        ("nan", ParseErrorCode::InvalidValue, 0),
        // Leading zeros stop the literal after the first `0`.
        ("0123", ParseErrorCode::RedundantChars, 1),
        ("1a", ParseErrorCode::RedundantChars, 1),
        // Overflow to infinity is rejected, not clamped.
        ("1e309", ParseErrorCode::NumberTooBig, 0),
        ("-1e309", ParseErrorCode::NumberTooBig, 0),
        ("1e1000", ParseErrorCode::NumberTooBig, 0),
    ]);
}

#[test]
fn test_parse_string() {
    test_parse_ok(vec![
        (r#""""#, Value::String(String::new())),
        (r#""hello""#, Value::String("hello".to_string())),
        (
            r#""\" \\ \/ \b \f \n \r \t""#,
            Value::String("\" \\ / \u{8} \u{c} \n \r \t".to_string()),
        ),
        (r#""ABC""#, Value::String("ABC".to_string())),
        (r#""中文""#, Value::String("中文".to_string())),
        // Surrogate pair combines into one code point above U+FFFF.
        (r#""𝄞""#, Value::String("\u{1D11E}".to_string())),
        ("\"中文\"", Value::String("中文".to_string())),
    ]);

    assert_eq!(
        parse_value(r#""𝄞""#.as_bytes())
            .unwrap()
            .get_str()
            .unwrap()
            .as_bytes(),
        [0xF0, 0x9D, 0x84, 0x9E]
    );

    test_parse_err(&[
        (r#"""#, ParseErrorCode::MissStringEndEscape, 1),
        (r#""hello"#, ParseErrorCode::MissStringEndEscape, 6),
        ("\"a\u{1}b\"", ParseErrorCode::InvalidStringChar, 2),
        ("\"a\tb\"", ParseErrorCode::InvalidStringChar, 2),
        (r#""\z""#, ParseErrorCode::InvalidStringChar, 2),
        (r#""\x41""#, ParseErrorCode::InvalidStringChar, 2),
        (r#""\"#, ParseErrorCode::InvalidStringChar, 2),
        (r#""\uZZZZ""#, ParseErrorCode::InvalidUnicodeChar, 3),
        (r#""\u12G4""#, ParseErrorCode::InvalidUnicodeChar, 3),
        (r#""\u12"#, ParseErrorCode::InvalidUnicodeChar, 3),
        // Lone high surrogate with no following low-surrogate escape.
        (r#""\uD834""#, ParseErrorCode::InvalidUnicodeChar, 7),
        (r#""\uD834\n""#, ParseErrorCode::InvalidUnicodeChar, 7),
        (r#""\uD8340""#, ParseErrorCode::InvalidUnicodeChar, 7),
        // Lone low surrogate cannot become a code point.
        (r#""\uDD1E""#, ParseErrorCode::InvalidUnicodeChar, 7),
    ]);
}

#[test]
fn test_parse_string_invalid_utf8() {
    // Raw bytes above 0x1F pass the character scan but must still form
    // valid UTF-8 once the literal ends.
    let err = parse_value(b"\"\xFF\"").unwrap_err();
    assert_eq!(err.code(), ParseErrorCode::InvalidStringChar);
    assert_eq!(err.pos(), 0);

    // Truncated multi-byte sequence.
    let err = parse_value(b"\"\xE4\xB8\"").unwrap_err();
    assert_eq!(err.code(), ParseErrorCode::InvalidStringChar);
    assert_eq!(err.pos(), 0);

    // The literal start is reported even for a nested string.
    let err = parse_value(b"[1,\"\xC0\"]").unwrap_err();
    assert_eq!(err.code(), ParseErrorCode::InvalidStringChar);
    assert_eq!(err.pos(), 3);
}

#[test]
fn test_parse_array() {
    test_parse_ok(vec![
        ("[]", Value::Array(vec![])),
        ("[ ]", Value::Array(vec![])),
        (
            "[1,2]",
            Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]),
        ),
        (
            "[null,true,\"x\",[0]]",
            Value::Array(vec![
                Value::Null,
                Value::Bool(true),
                Value::String("x".to_string()),
                Value::Array(vec![Value::Number(0.0)]),
            ]),
        ),
    ]);

    // Whitespace between tokens never changes the tree.
    assert_eq!(
        parse_value(b" [ 1 , 2 ] ").unwrap(),
        parse_value(b"[1,2]").unwrap()
    );

    test_parse_err(&[
        ("[", ParseErrorCode::InvalidValue, 1),
        ("[1", ParseErrorCode::MissCommaOrSquareBracket, 2),
        ("[1 2]", ParseErrorCode::MissCommaOrSquareBracket, 3),
        ("[1;2]", ParseErrorCode::MissCommaOrSquareBracket, 2),
        ("[1,]", ParseErrorCode::RedundantComma, 3),
        ("[1,2,]", ParseErrorCode::RedundantComma, 5),
        ("[1,2,", ParseErrorCode::RedundantComma, 5),
        ("[1,2] []", ParseErrorCode::RedundantChars, 6),
    ]);
}

#[test]
fn test_parse_object() {
    test_parse_ok(vec![
        ("{}", object_from(vec![])),
        ("{ }", object_from(vec![])),
        (
            r#"{"a":1,"b":[true]}"#,
            object_from(vec![
                ("a", Value::Number(1.0)),
                ("b", Value::Array(vec![Value::Bool(true)])),
            ]),
        ),
        (
            r#" { "a" : 1 } "#,
            object_from(vec![("a", Value::Number(1.0))]),
        ),
    ]);

    test_parse_err(&[
        ("{", ParseErrorCode::MissKey, 1),
        ("{1:2}", ParseErrorCode::MissKey, 1),
        ("{null:2}", ParseErrorCode::MissKey, 1),
        (r#"{"a"}"#, ParseErrorCode::MissColon, 4),
        (r#"{"a" 1}"#, ParseErrorCode::MissColon, 5),
        (r#"{"a":}"#, ParseErrorCode::InvalidValue, 5),
        (r#"{"a":1"#, ParseErrorCode::MissCommaOrCurlyBracket, 6),
        (r#"{"a":1 "b":2}"#, ParseErrorCode::MissCommaOrCurlyBracket, 7),
        (r#"{"a":1,}"#, ParseErrorCode::RedundantComma, 7),
        (r#"{"a":1,"#, ParseErrorCode::RedundantComma, 7),
    ]);
}

#[test]
fn test_duplicate_keys_preserved() {
    let val = parse_value(br#"{"a":1,"a":2}"#).unwrap();
    let obj = val.as_object().unwrap();
    assert_eq!(obj.len(), 2);
    // First-match policy for lookup.
    assert_eq!(obj.get("a"), Some(&Value::Number(1.0)));
    let all: Vec<_> = obj.get_all("a").collect();
    assert_eq!(all, [&Value::Number(1.0), &Value::Number(2.0)]);
    assert_eq!(val.to_json(), r#"{"a":1.0,"a":2.0}"#);
}

#[test]
fn test_caret_diagnostic() {
    let err = parse_value(br#"{"a" 1}"#).unwrap_err();
    assert_eq!(
        err.to_string(),
        "miss colon, pos 5, which near:\n{\"a\" 1}\n     ^"
    );
    assert_eq!(err.text(), r#"{"a" 1}"#);

    let err = parse_value(b"[1,2,]").unwrap_err();
    assert_eq!(
        err.to_string(),
        "redundant comma, pos 5, which near:\n[1,2,]\n     ^"
    );

    // Multi-byte characters before the offset count as one caret column.
    let err = parse_value("[\"中\",]".as_bytes()).unwrap_err();
    assert_eq!(err.pos(), 7);
    assert_eq!(
        err.to_string(),
        "redundant comma, pos 7, which near:\n[\"中\",]\n     ^"
    );

    // The caret lines up under the source line holding the offset.
    let err = parse_value(b"{\"a\"\n1}").unwrap_err();
    assert_eq!(err.pos(), 5);
    assert_eq!(
        err.to_string(),
        "miss colon, pos 5, which near:\n{\"a\"\n1}\n^"
    );
}

#[test]
fn test_round_trip() {
    let sources = [
        r#"{"a":[1.5,{"b":null}],"c":"\n","d":[[],{}]}"#,
        r#"[true,false,null,-0.5,"𝄞"]"#,
        r#"{"k":"a\"b\\c","nums":[1e-10,2.5e10]}"#,
    ];
    for source in sources {
        let val = parse_value(source.as_bytes()).unwrap();
        let text = val.to_json();
        // toJson is deterministic and stable under reparse.
        assert_eq!(parse_value(text.as_bytes()).unwrap(), val, "source: {source}");
        assert_eq!(val.to_json(), text);
    }
}

#[test]
fn test_rand_value_round_trip() {
    for _ in 0..100 {
        let val = jsondom::Value::rand_value();
        let text = val.to_json();
        let reparsed = parse_value(text.as_bytes()).unwrap();
        assert_eq!(reparsed, val, "text: {text}");
    }
}
