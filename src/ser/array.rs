//! Length-prefixed primitive array serializers
//!
//! Wire format:
//! ```text
//! count: u32
//! elements[count]   # fixed width per element, no padding
//! ```
//!
//! Zero-length arrays are refused before any byte is written; a field
//! with nothing in it has no business on the wire.

use bytes::BytesMut;

use crate::cursor::Cursor;
use crate::error::{Result, WireError};
use crate::order::ByteOrder;
use crate::tag::TypeTag;
use crate::value::Value;

use super::{check_remaining, wrong_shape, Serializer};

pub(crate) struct ArrayCodec {
    tag: TypeTag,
}

impl ArrayCodec {
    pub(crate) const fn new(tag: TypeTag) -> Self {
        Self { tag }
    }

    fn len_of(&self, value: &Value) -> Result<usize> {
        let len = match (self.tag, value) {
            (TypeTag::Int8Array, Value::I8Array(v)) => v.len(),
            (TypeTag::Int16Array, Value::I16Array(v)) => v.len(),
            (TypeTag::Int32Array, Value::I32Array(v)) => v.len(),
            (TypeTag::Int64Array, Value::I64Array(v)) => v.len(),
            (TypeTag::Float32Array, Value::F32Array(v)) => v.len(),
            (TypeTag::Float64Array, Value::F64Array(v)) => v.len(),
            _ => return Err(wrong_shape(self.tag, value)),
        };
        if len == 0 {
            return Err(WireError::shape("zero-length array"));
        }
        if len > u32::MAX as usize {
            return Err(WireError::constraint(format!(
                "array of {} elements overflows the u32 count field",
                len
            )));
        }
        Ok(len)
    }
}

impl Serializer for ArrayCodec {
    fn field_type(&self) -> TypeTag {
        self.tag
    }

    fn size(&self, value: &Value) -> Result<usize> {
        Ok(4 + self.tag.element_size() * self.len_of(value)?)
    }

    fn serialize(
        &self,
        value: &Value,
        buf: &mut BytesMut,
        order: ByteOrder,
        cursor: &mut Cursor,
    ) -> Result<()> {
        let len = self.len_of(value)?;
        order.put_u32(buf, len as u32);
        cursor.advance(4);

        match (self.tag, value) {
            (TypeTag::Int8Array, Value::I8Array(v)) => {
                for x in v {
                    order.put_i8(buf, *x);
                }
            }
            (TypeTag::Int16Array, Value::I16Array(v)) => {
                for x in v {
                    order.put_i16(buf, *x);
                }
            }
            (TypeTag::Int32Array, Value::I32Array(v)) => {
                for x in v {
                    order.put_i32(buf, *x);
                }
            }
            (TypeTag::Int64Array, Value::I64Array(v)) => {
                for x in v {
                    order.put_i64(buf, *x);
                }
            }
            (TypeTag::Float32Array, Value::F32Array(v)) => {
                for x in v {
                    order.put_f32(buf, *x);
                }
            }
            (TypeTag::Float64Array, Value::F64Array(v)) => {
                for x in v {
                    order.put_f64(buf, *x);
                }
            }
            _ => return Err(wrong_shape(self.tag, value)),
        }
        cursor.advance(self.tag.element_size() * len);
        Ok(())
    }

    fn deserialize(&self, buf: &mut &[u8], order: ByteOrder, cursor: &mut Cursor) -> Result<Value> {
        check_remaining(buf, 4)?;
        let count = order.get_u32(buf) as usize;
        cursor.advance(4);
        if count == 0 {
            return Err(WireError::shape("zero-length array on the wire"));
        }
        let body = count
            .checked_mul(self.tag.element_size())
            .ok_or_else(|| WireError::constraint("array body size overflows usize".to_string()))?;
        check_remaining(buf, body)?;

        let value = match self.tag {
            TypeTag::Int8Array => {
                Value::I8Array((0..count).map(|_| order.get_i8(buf)).collect())
            }
            TypeTag::Int16Array => {
                Value::I16Array((0..count).map(|_| order.get_i16(buf)).collect())
            }
            TypeTag::Int32Array => {
                Value::I32Array((0..count).map(|_| order.get_i32(buf)).collect())
            }
            TypeTag::Int64Array => {
                Value::I64Array((0..count).map(|_| order.get_i64(buf)).collect())
            }
            TypeTag::Float32Array => {
                Value::F32Array((0..count).map(|_| order.get_f32(buf)).collect())
            }
            TypeTag::Float64Array => {
                Value::F64Array((0..count).map(|_| order.get_f64(buf)).collect())
            }
            other => return Err(wrong_shape(other, &Value::I8(0))),
        };
        cursor.advance(body);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(codec: &ArrayCodec, value: Value, order: ByteOrder) -> Value {
        let mut buf = BytesMut::new();
        let mut cursor = Cursor::new();
        codec.serialize(&value, &mut buf, order, &mut cursor).unwrap();
        assert_eq!(cursor.position(), codec.size(&value).unwrap());

        let frozen = buf.freeze();
        let mut reader: &[u8] = &frozen;
        let mut cursor = Cursor::new();
        codec.deserialize(&mut reader, order, &mut cursor).unwrap()
    }

    #[test]
    fn test_single_element_array() {
        let codec = ArrayCodec::new(TypeTag::Int32Array);
        let v = Value::I32Array(vec![-7]);
        assert_eq!(codec.size(&v).unwrap(), 4 + 4);
        assert_eq!(roundtrip(&codec, v.clone(), ByteOrder::Little), v);
    }

    #[test]
    fn test_f64_array_both_orders() {
        let codec = ArrayCodec::new(TypeTag::Float64Array);
        let v = Value::F64Array(vec![1.5, -2.25, 0.0]);
        for order in [ByteOrder::Big, ByteOrder::Little] {
            assert_eq!(roundtrip(&codec, v.clone(), order), v);
        }
    }

    #[test]
    fn test_empty_array_refused() {
        let codec = ArrayCodec::new(TypeTag::Int16Array);
        let mut buf = BytesMut::new();
        let mut cursor = Cursor::new();
        let err = codec
            .serialize(&Value::I16Array(vec![]), &mut buf, ByteOrder::Big, &mut cursor)
            .unwrap_err();
        assert!(matches!(err, WireError::ShapeViolation { .. }));
        // Nothing was written
        assert!(buf.is_empty());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_truncated_elements_underflow() {
        let codec = ArrayCodec::new(TypeTag::Int32Array);
        // count says 2, body holds 1
        let mut reader: &[u8] = &[0, 0, 0, 2, 0, 0, 0, 1];
        let mut cursor = Cursor::new();
        let err = codec.deserialize(&mut reader, ByteOrder::Big, &mut cursor).unwrap_err();
        assert!(matches!(err, WireError::BufferUnderflow { .. }));
    }
}
