use mnet_rs::{typed_value::{decode_multi, decode_typed_value, Value}, MnetError};

#[test]
fn signed_8_negative_value() {
    let bytes = [0x01, 0x00, 0x00, 0x00, 0x01, 0xFB];
    let (value, _) = decode_typed_value(&bytes, 0x0001).unwrap();
    assert_eq!(value, Value::Integer(-5));
}

#[test]
fn alias_signed_8_data_types_agree() {
    let a = decode_typed_value(&[0x01, 0x00, 0x00, 0x00, 0x01, 0xFB], 1).unwrap().0;
    let b = decode_typed_value(&[0x0A, 0x00, 0x00, 0x00, 0x01, 0xFB], 1).unwrap().0;
    assert_eq!(a, b);
}

#[test]
fn unsigned_16_divide_by_power_of_ten() {
    let bytes = [0x04, 0x01, 0x00, 0x02, 0x02, 0x04, 0xD2];
    let (value, _) = decode_typed_value(&bytes, 1).unwrap();
    match value {
        Value::Float(f) => assert!((f - 12.34).abs() < 1e-9),
        other => panic!("expected Float, got {other:?}"),
    }
}

#[test]
fn timestamp_normalizes_to_instant() {
    let bytes = [0x06, 0x00, 0x00, 0x00, 0x04, 0x00, 0x01, 0x51, 0x80];
    let (value, _) = decode_typed_value(&bytes, 1).unwrap();
    assert_eq!(value, Value::Instant("1980-01-02T00:00:00Z".parse().unwrap()));
}

#[test]
fn deny_listed_main_ids_stay_numeric() {
    let bytes = [0x06, 0x00, 0x00, 0x00, 0x04, 0x00, 0x01, 0x51, 0x80];
    for main_id in [0x9CAE, 0xC739, 0xC79D, 0xC73A, 0xC79E] {
        let (value, _) = decode_typed_value(&bytes, main_id).unwrap();
        assert_eq!(value, Value::Integer(86400), "main_id 0x{main_id:04x}");
    }
}

#[test]
fn ascii_string_strips_trailing_nuls() {
    let mut bytes = vec![0x09, 0x00, 0x00, 0x00, 0x06];
    bytes.extend_from_slice(b"AB\0\0\0\0");
    let (value, consumed) = decode_typed_value(&bytes, 1).unwrap();
    assert_eq!(value, Value::Text("AB".to_string()));
    assert_eq!(consumed, 11);
}

#[test]
fn unknown_data_type_is_decode_error() {
    let bytes = [0xEE, 0x00, 0x00, 0x00, 0x00];
    assert!(decode_typed_value(&bytes, 1).is_err());
}

#[test]
fn multi_element_decode_preserves_order() {
    let mut bytes = vec![0x02u8];
    bytes.extend_from_slice(&0x9C43u16.to_be_bytes());
    bytes.extend_from_slice(&0x0000u16.to_be_bytes());
    bytes.extend_from_slice(&[0x04, 0x00, 0x00, 0x00, 0x02, 0x00, 0x0A]);
    bytes.extend_from_slice(&0x9CACu16.to_be_bytes());
    bytes.extend_from_slice(&0x0000u16.to_be_bytes());
    bytes.extend_from_slice(&[0x04, 0x01, 0x00, 0x01, 0x02, 0x05, 0xDC]);

    let elements = decode_multi(&bytes).unwrap();
    assert_eq!(elements[0].main_id, 0x9C43);
    assert_eq!(elements[1].main_id, 0x9CAC);
}

#[test]
fn multi_element_empty_count_is_empty() {
    assert_eq!(decode_multi(&[0x00]).unwrap().len(), 0);
}

#[test]
fn body_overrunning_declared_length_is_a_framing_error() {
    // length byte claims 4 bytes of body but only 1 remains
    let bytes = [0x04, 0x00, 0x00, 0x00, 0x04, 0x00];
    let err = decode_typed_value(&bytes, 1).unwrap_err();
    assert!(matches!(err, MnetError::FramingError(_)), "expected FramingError, got {err:?}");
}

#[test]
fn multi_element_truncated_tail_stops_cleanly() {
    let mut bytes = vec![0x02u8];
    bytes.extend_from_slice(&0x9C43u16.to_be_bytes());
    bytes.extend_from_slice(&0x0000u16.to_be_bytes());
    bytes.extend_from_slice(&[0x04, 0x00, 0x00, 0x00, 0x02, 0x00, 0x0A]);
    // second element declared but absent from the body
    let elements = decode_multi(&bytes).unwrap();
    assert_eq!(elements.len(), 1);
}
