//! End-to-end codec properties
//!
//! Exercises the public surface the way two independently-versioned
//! endpoints would: encode a heterogeneous value list under either byte
//! order, ship the bytes, decode them back, and dump them through the
//! incremental decoder.

use tagwire::{
    decode, encode, encoded_size, ByteOrder, Matrix, Quantity, QuantityArray, QuantityMatrix,
    StreamDecoder, TypeTag, UnitTag, Value, WireError, MONEY,
};

/// One representative value per registered field type
fn sample_values() -> Vec<Value> {
    vec![
        Value::I8(i8::MIN),
        Value::I16(i16::MAX),
        Value::I32(-1),
        Value::I64(i64::MIN),
        Value::F32(f32::MIN_POSITIVE),
        Value::F64(-0.0),
        Value::Bool(true),
        Value::Char8('\u{00fc}'),
        Value::Char16('\u{20ac}'),
        Value::Str8(String::new()),
        Value::Str16("na\u{00ef}ve \u{4e2d}\u{6587}".into()),
        Value::I8Array(vec![-1, 0, 1]),
        Value::I16Array(vec![i16::MIN, i16::MAX]),
        Value::I32Array(vec![7]),
        Value::I64Array(vec![1, -2, 3]),
        Value::F32Array(vec![f32::INFINITY, -0.5]),
        Value::F64Array(vec![1.5, -2.25]),
        Value::I8Matrix(Matrix::from_rows(vec![vec![1], vec![2]]).unwrap()),
        Value::I16Matrix(Matrix::from_rows(vec![vec![-5, 5]]).unwrap()),
        Value::I32Matrix(Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap()),
        Value::I64Matrix(Matrix::from_rows(vec![vec![i64::MAX]]).unwrap()),
        Value::F32Matrix(Matrix::from_rows(vec![vec![0.25, -0.25]]).unwrap()),
        Value::F64Matrix(Matrix::from_rows(vec![vec![9.0, 8.0], vec![7.0, 6.0]]).unwrap()),
        Value::Quantity(Quantity::new(UnitTag::new(3, 12), 299_792_458.0)),
        Value::QuantityArray(
            QuantityArray::new(
                vec![UnitTag::new(1, 2), UnitTag::new(MONEY, 840)],
                vec![1.5, 19.99],
            )
            .unwrap(),
        ),
        Value::QuantityMatrix(
            QuantityMatrix::new(
                vec![UnitTag::new(1, 2), UnitTag::new(MONEY, 978)],
                Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap(),
            )
            .unwrap(),
        ),
    ]
}

#[test]
fn every_type_roundtrips_under_both_orders() {
    let values = sample_values();
    for order in [ByteOrder::Big, ByteOrder::Little] {
        let buf = encode(order, &values).unwrap();
        let back = decode(&buf).unwrap();
        assert_eq!(back, values, "round-trip failed under {order:?}");
    }
}

#[test]
fn every_tag_has_a_sample() {
    let tags: Vec<TypeTag> = sample_values().iter().map(Value::field_type).collect();
    assert_eq!(tags, TypeTag::ALL.to_vec());
}

#[test]
fn nan_and_infinity_roundtrip_bit_for_bit() {
    let nan64 = f64::from_bits(0x7FF8_0000_0000_1234);
    let nan32 = f32::from_bits(0xFFC0_0001);
    let values = vec![
        Value::F64(nan64),
        Value::F32(nan32),
        Value::F64(f64::NEG_INFINITY),
        Value::F64Array(vec![f64::NAN, f64::INFINITY]),
    ];
    for order in [ByteOrder::Big, ByteOrder::Little] {
        let buf = encode(order, &values).unwrap();
        let back = decode(&buf).unwrap();
        match (&back[0], &back[1], &back[2], &back[3]) {
            (Value::F64(a), Value::F32(b), Value::F64(c), Value::F64Array(d)) => {
                assert_eq!(a.to_bits(), nan64.to_bits());
                assert_eq!(b.to_bits(), nan32.to_bits());
                assert_eq!(*c, f64::NEG_INFINITY);
                assert_eq!(d[0].to_bits(), f64::NAN.to_bits());
                assert_eq!(d[1], f64::INFINITY);
            }
            other => panic!("unexpected shapes {other:?}"),
        }
    }
}

#[test]
fn encoded_length_matches_declared_size_exactly() {
    for value in sample_values() {
        let declared = encoded_size(&value).unwrap();
        for order in [ByteOrder::Big, ByteOrder::Little] {
            let buf = encode(order, std::slice::from_ref(&value)).unwrap();
            assert_eq!(buf.len(), declared, "size drifted for {:?}", value.field_type());
        }
    }
}

#[test]
fn opposite_orders_differ_only_in_byte_order() {
    let values = sample_values();
    let be = encode(ByteOrder::Big, &values).unwrap();
    let le = encode(ByteOrder::Little, &values).unwrap();
    // Identical length, identical field count and order, same logical values
    assert_eq!(be.len(), le.len());
    assert_eq!(decode(&be).unwrap(), decode(&le).unwrap());
    // But the streams themselves differ wherever a multi-byte field sits
    assert_ne!(be, le);
}

#[test]
fn tag_mirroring_across_the_whole_space() {
    for tag in TypeTag::ALL {
        let be = tag.wire(ByteOrder::Big);
        let le = tag.wire(ByteOrder::Little);
        assert_eq!(le as i16, be as i16 - 128);
    }
}

#[test]
fn single_byte_records_are_order_invariant() {
    // For one-byte bodies the two mirrored tags frame identical content
    let be = encode(ByteOrder::Big, &[Value::I8(-5)]).unwrap();
    let le = encode(ByteOrder::Little, &[Value::I8(-5)]).unwrap();
    assert_eq!(be[1..], le[1..]);
    assert_eq!(decode(&be).unwrap(), decode(&le).unwrap());
}

#[test]
fn jagged_matrix_never_reaches_the_wire() {
    let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
    assert!(matches!(err, WireError::ShapeViolation { .. }));
}

#[test]
fn zero_length_array_refused_with_no_output() {
    let err = encode(ByteOrder::Big, &[Value::I32(1), Value::F64Array(vec![])]).unwrap_err();
    assert!(matches!(err, WireError::ShapeViolation { .. }));
}

/// Printable units one record contributes to a stream dump: a shape or
/// scalar line, one line per unit descriptor, one line per element
fn dump_lines_for(value: &Value) -> usize {
    match value {
        Value::I8(_)
        | Value::I16(_)
        | Value::I32(_)
        | Value::I64(_)
        | Value::F32(_)
        | Value::F64(_)
        | Value::Bool(_)
        | Value::Char8(_)
        | Value::Char16(_) => 1,
        Value::Str8(s) => 1 + s.chars().count(),
        Value::Str16(s) => 1 + s.encode_utf16().count(),
        Value::I8Array(v) => 1 + v.len(),
        Value::I16Array(v) => 1 + v.len(),
        Value::I32Array(v) => 1 + v.len(),
        Value::I64Array(v) => 1 + v.len(),
        Value::F32Array(v) => 1 + v.len(),
        Value::F64Array(v) => 1 + v.len(),
        Value::I8Matrix(m) => 1 + m.rows() * m.cols(),
        Value::I16Matrix(m) => 1 + m.rows() * m.cols(),
        Value::I32Matrix(m) => 1 + m.rows() * m.cols(),
        Value::I64Matrix(m) => 1 + m.rows() * m.cols(),
        Value::F32Matrix(m) => 1 + m.rows() * m.cols(),
        Value::F64Matrix(m) => 1 + m.rows() * m.cols(),
        Value::Quantity(_) => 2,
        Value::QuantityArray(a) => 1 + 2 * a.len(),
        Value::QuantityMatrix(m) => 1 + m.units().len() + m.data().rows() * m.data().cols(),
    }
}

#[test]
fn incremental_decoder_matches_one_shot_decode() {
    let values = sample_values();
    for order in [ByteOrder::Big, ByteOrder::Little] {
        let buf = encode(order, &values).unwrap();

        let mut byte_at_a_time = StreamDecoder::new();
        let mut lines = Vec::new();
        for b in buf.iter() {
            if let Some(line) = byte_at_a_time.push(*b) {
                lines.push(line);
            }
        }

        // Chunking must not change the output
        let whole = StreamDecoder::new().feed(&buf);
        assert_eq!(lines, whole);

        // And the dump must account for exactly the records the
        // one-shot decode sees: same count of printable units, no
        // resynchronization noise
        let decoded = decode(&buf).unwrap();
        assert_eq!(decoded, values);
        let expected: usize = decoded.iter().map(dump_lines_for).sum();
        assert_eq!(lines.len(), expected, "dump drifted from decode under {order:?}");
        assert!(lines.iter().all(|l| !l.starts_with("!!")));
    }
}

#[test]
fn chunked_feeding_resumes_saved_state() {
    let values = vec![Value::Str16("chunky".into()), Value::I64Matrix(
        Matrix::from_rows(vec![vec![10, 20], vec![30, 40]]).unwrap(),
    )];
    let buf = encode(ByteOrder::Big, &values).unwrap();

    let expected = vec![
        "str16[6]", "'c'", "'h'", "'u'", "'n'", "'k'", "'y'",
        "i64[2x2]", "[0,0] 10", "[0,1] 20", "[1,0] 30", "[1,1] 40",
    ];
    for chunk_size in [1, 2, 3, 5, 7] {
        let mut decoder = StreamDecoder::new();
        let mut lines = Vec::new();
        for chunk in buf.chunks(chunk_size) {
            lines.extend(decoder.feed(chunk));
        }
        assert_eq!(lines, expected, "chunk size {chunk_size} diverged");
    }
}

#[test]
fn decode_reports_unknown_tag_with_context() {
    let mut buf = encode(ByteOrder::Big, &[Value::I16(1)]).unwrap().to_vec();
    buf.push(0x5A);
    match decode(&buf).unwrap_err() {
        WireError::UnknownFieldType { tag, offset } => {
            assert_eq!(tag, 0x5A);
            assert_eq!(offset, 3);
        }
        other => panic!("unexpected error {other:?}"),
    }
}
