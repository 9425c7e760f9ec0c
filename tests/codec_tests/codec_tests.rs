//! Tests for value codecs
//!
//! These tests verify:
//! - Envelope layout ($type + $value)
//! - Static-type round trips through JsonCodec, including enums and Option
//! - Tag checks on decode
//! - Concrete-type round trips of trait objects through RegistryCodec
//! - Rejection of unregistered tags on both encode and decode
//! - Exact round trips of 128-bit integers, extreme floats and escaped text
//! - Refusal of NaN and infinity at encode time

use std::fmt::Debug;

use fdict::codec::{peek_type_tag, JsonCodec, RegistryCodec, TypeTagged, ValueCodec};
use fdict::{type_tagged, FdictError};
use serde::{Deserialize, Serialize};

// =============================================================================
// Test Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Reading {
    sensor: String,
    value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Event {
    Started { at: u64 },
    Message(String),
    Stopped,
}

trait Shape: TypeTagged + Debug {
    fn area(&self) -> f64;
    fn name(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Circle {
    radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Rect {
    width: f64,
    height: f64,
}

type_tagged!(Circle, "circle");
type_tagged!(Rect, "rect");

impl Shape for Circle {
    fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    fn name(&self) -> String {
        format!("circle r={}", self.radius)
    }
}

impl Shape for Rect {
    fn area(&self) -> f64 {
        self.width * self.height
    }

    fn name(&self) -> String {
        format!("rect {}x{}", self.width, self.height)
    }
}

fn shape_codec() -> RegistryCodec<dyn Shape> {
    RegistryCodec::new()
        .with("circle", |c: Circle| -> Box<dyn Shape> { Box::new(c) })
        .with("rect", |r: Rect| -> Box<dyn Shape> { Box::new(r) })
}

// =============================================================================
// JsonCodec Tests
// =============================================================================

#[test]
fn test_envelope_layout() {
    let codec = JsonCodec::<Point>::with_tag("point");

    let text = codec.encode(&Point { x: 1, y: -2 }).unwrap();

    assert_eq!(text, r#"{"$type":"point","$value":{"x":1,"y":-2}}"#);
}

#[test]
fn test_default_tag_is_type_name() {
    let codec = JsonCodec::<i32>::new();

    assert_eq!(codec.tag(), "i32");
    let text = codec.encode(&42).unwrap();
    assert_eq!(peek_type_tag(&text).unwrap(), "i32");
}

#[test]
fn test_struct_round_trip() {
    let codec = JsonCodec::<Point>::new();
    let point = Point { x: 7, y: 9 };

    let text = codec.encode(&point).unwrap();

    assert_eq!(codec.decode(&text).unwrap(), point);
}

#[test]
fn test_enum_preserves_variant() {
    let codec = JsonCodec::<Event>::new();
    let events = vec![
        Event::Started { at: 12 },
        Event::Message("hi".to_string()),
        Event::Stopped,
    ];

    for event in events {
        let text = codec.encode(&event).unwrap();
        assert_eq!(codec.decode(&text).unwrap(), event);
    }
}

#[test]
fn test_none_round_trips_as_null() {
    let codec = JsonCodec::<Option<String>>::with_tag("maybe-string");

    let text = codec.encode(&None).unwrap();

    assert!(text.contains(r#""$value":null"#));
    assert_eq!(codec.decode(&text).unwrap(), None);
}

#[test]
fn test_decode_rejects_other_tag() {
    let writer = JsonCodec::<i32>::with_tag("count");
    let reader = JsonCodec::<i32>::with_tag("total");
    let text = writer.encode(&5).unwrap();

    let err = reader.decode(&text).unwrap_err();

    match err {
        FdictError::TypeMismatch { expected, found } => {
            assert_eq!(expected, "total");
            assert_eq!(found, "count");
        }
        other => panic!("expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_decode_rejects_wrong_payload_shape() {
    let codec = JsonCodec::<Point>::with_tag("point");

    let result = codec.decode(r#"{"$type":"point","$value":"not a point"}"#);

    assert!(matches!(result, Err(FdictError::Serialization(_))));
}

#[test]
fn test_decode_rejects_non_envelope() {
    let codec = JsonCodec::<i32>::new();

    assert!(matches!(
        codec.decode("42"),
        Err(FdictError::Serialization(_))
    ));
    assert!(matches!(
        codec.decode("{not json"),
        Err(FdictError::Serialization(_))
    ));
}

// =============================================================================
// Boundary Value Tests
// =============================================================================

fn round_trip<T>(value: T) -> T
where
    T: Serialize + serde::de::DeserializeOwned,
{
    let codec = JsonCodec::<T>::new();
    let text = codec.encode(&value).unwrap();
    codec.decode(&text).unwrap()
}

#[test]
fn test_wide_integers_round_trip_exactly() {
    assert_eq!(round_trip(u128::MAX), u128::MAX);
    assert_eq!(round_trip(i128::MIN), i128::MIN);
    assert_eq!(round_trip(i128::MAX), i128::MAX);
    assert_eq!(round_trip(u64::MAX), u64::MAX);
    assert_eq!(round_trip(i64::MIN), i64::MIN);
    assert_eq!(round_trip(vec![u128::MAX, 0, 1]), vec![u128::MAX, 0, 1]);
}

#[test]
fn test_extreme_floats_round_trip_exactly() {
    let values = [
        f64::MAX,
        f64::MIN,
        f64::MIN_POSITIVE,
        f64::EPSILON,
        0.1,
        -0.0,
        1e-310,
    ];

    for value in values {
        let back = round_trip(value);
        assert_eq!(back.to_bits(), value.to_bits(), "{:e}", value);
    }

    assert_eq!(round_trip(f32::MAX), f32::MAX);
    assert_eq!(round_trip(f32::MIN_POSITIVE), f32::MIN_POSITIVE);
}

#[test]
fn test_awkward_strings_round_trip_exactly() {
    let values = [
        String::new(),
        "say \"hi\"".to_string(),
        "C:\\temp\\file".to_string(),
        "line\nbreak\ttab\r".to_string(),
        "nul\u{0}unit\u{1F}del\u{7F}".to_string(),
        "\u{1F980} crab, \u{00E9}t\u{00E9}".to_string(),
        "{\"$type\":\"fake\",\"$value\":1}".to_string(),
    ];

    for value in values {
        assert_eq!(round_trip(value.clone()), value);
    }
}

#[test]
fn test_non_finite_floats_are_refused() {
    let codec = JsonCodec::<f64>::new();

    for value in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
        assert!(matches!(
            codec.encode(&value),
            Err(FdictError::Serialization(_))
        ));
    }
}

#[test]
fn test_nested_non_finite_floats_are_refused() {
    let optional = JsonCodec::<Option<f64>>::new();
    let reading = JsonCodec::<Reading>::new();
    let list = JsonCodec::<Vec<f32>>::new();

    assert!(optional.encode(&Some(f64::NAN)).is_err());
    assert!(reading
        .encode(&Reading {
            sensor: "t1".to_string(),
            value: f64::INFINITY,
        })
        .is_err());
    assert!(list.encode(&vec![1.0, f32::NEG_INFINITY]).is_err());

    // None is still a legitimate null
    assert_eq!(optional.decode(&optional.encode(&None).unwrap()).unwrap(), None);
}

// =============================================================================
// RegistryCodec Tests
// =============================================================================

#[test]
fn test_registry_writes_concrete_tag() {
    let codec = shape_codec();
    let shape: Box<dyn Shape> = Box::new(Circle { radius: 2.0 });

    let text = codec.encode(&shape).unwrap();

    assert_eq!(peek_type_tag(&text).unwrap(), "circle");
}

#[test]
fn test_registry_round_trip_keeps_concrete_type() {
    let codec = shape_codec();
    let shapes: Vec<Box<dyn Shape>> = vec![
        Box::new(Circle { radius: 1.5 }),
        Box::new(Rect {
            width: 2.0,
            height: 3.0,
        }),
    ];

    for shape in &shapes {
        let text = codec.encode(shape).unwrap();
        let decoded = codec.decode(&text).unwrap();

        assert_eq!(decoded.type_tag(), shape.type_tag());
        assert_eq!(decoded.name(), shape.name());
        assert_eq!(decoded.area(), shape.area());
    }
}

#[test]
fn test_registry_refuses_to_encode_unregistered_type() {
    let codec = RegistryCodec::<dyn Shape>::new()
        .with("circle", |c: Circle| -> Box<dyn Shape> { Box::new(c) });
    let shape: Box<dyn Shape> = Box::new(Rect {
        width: 1.0,
        height: 1.0,
    });

    let result = codec.encode(&shape);

    assert!(matches!(result, Err(FdictError::UnknownType(tag)) if tag == "rect"));
}

#[test]
fn test_registry_refuses_to_decode_unknown_tag() {
    let codec = shape_codec();

    let result = codec.decode(r#"{"$type":"std::process::Command","$value":{}}"#);

    assert!(
        matches!(result, Err(FdictError::UnknownType(tag)) if tag == "std::process::Command")
    );
}

#[test]
fn test_registry_refuses_non_finite_payload() {
    let codec = shape_codec();
    let shape: Box<dyn Shape> = Box::new(Rect {
        width: f64::NAN,
        height: 1.0,
    });

    assert!(matches!(
        codec.encode(&shape),
        Err(FdictError::Serialization(_))
    ));
}

#[test]
fn test_registry_keeps_extreme_floats_exact() {
    let codec = shape_codec();
    let shape: Box<dyn Shape> = Box::new(Rect {
        width: f64::MAX,
        height: f64::MIN_POSITIVE,
    });

    let decoded = codec.decode(&codec.encode(&shape).unwrap()).unwrap();

    assert_eq!(decoded.name(), shape.name());
    assert_eq!(decoded.area().to_bits(), shape.area().to_bits());
}

#[test]
fn test_registry_tags() {
    let codec = shape_codec();

    assert_eq!(codec.tags(), vec!["circle", "rect"]);
    assert!(codec.is_registered("rect"));
    assert!(!codec.is_registered("triangle"));
}
