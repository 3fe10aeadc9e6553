//! Fixed-width scalar serializers
//!
//! One codec per scalar tag; the body size is known from the tag alone,
//! so `size` ignores its argument. Booleans travel as a single byte
//! (0x00 = false, anything else = true). `Char8` is restricted to
//! U+0000..=U+00FF and `Char16` to characters representable as one
//! UTF-16 code unit; anything wider fails the encoding constraint.

use bytes::{Buf, BytesMut};

use crate::cursor::Cursor;
use crate::error::{Result, WireError};
use crate::order::ByteOrder;
use crate::tag::TypeTag;
use crate::value::Value;

use super::{check_remaining, wrong_shape, Serializer};

pub(crate) struct ScalarCodec {
    tag: TypeTag,
}

impl ScalarCodec {
    pub(crate) const fn new(tag: TypeTag) -> Self {
        Self { tag }
    }
}

impl Serializer for ScalarCodec {
    fn field_type(&self) -> TypeTag {
        self.tag
    }

    fn size(&self, _value: &Value) -> Result<usize> {
        Ok(self.tag.fixed_body_size())
    }

    fn serialize(
        &self,
        value: &Value,
        buf: &mut BytesMut,
        order: ByteOrder,
        cursor: &mut Cursor,
    ) -> Result<()> {
        match (self.tag, value) {
            (TypeTag::Int8, Value::I8(v)) => order.put_i8(buf, *v),
            (TypeTag::Int16, Value::I16(v)) => order.put_i16(buf, *v),
            (TypeTag::Int32, Value::I32(v)) => order.put_i32(buf, *v),
            (TypeTag::Int64, Value::I64(v)) => order.put_i64(buf, *v),
            (TypeTag::Float32, Value::F32(v)) => order.put_f32(buf, *v),
            (TypeTag::Float64, Value::F64(v)) => order.put_f64(buf, *v),
            (TypeTag::Bool, Value::Bool(v)) => order.put_u8(buf, u8::from(*v)),
            (TypeTag::Char8, Value::Char8(c)) => {
                let code = *c as u32;
                if code > 0xFF {
                    return Err(WireError::constraint(format!(
                        "character {:?} outside the 8-bit range",
                        c
                    )));
                }
                order.put_u8(buf, code as u8);
            }
            (TypeTag::Char16, Value::Char16(c)) => {
                let mut units = [0u16; 2];
                let encoded = c.encode_utf16(&mut units);
                if encoded.len() != 1 {
                    return Err(WireError::constraint(format!(
                        "character {:?} needs a surrogate pair, not one UTF-16 unit",
                        c
                    )));
                }
                order.put_u16(buf, encoded[0]);
            }
            _ => return Err(wrong_shape(self.tag, value)),
        }
        cursor.advance(self.tag.fixed_body_size());
        Ok(())
    }

    fn deserialize(&self, buf: &mut &[u8], order: ByteOrder, cursor: &mut Cursor) -> Result<Value> {
        let width = self.tag.fixed_body_size();
        check_remaining(buf, width)?;
        let value = match self.tag {
            TypeTag::Int8 => Value::I8(order.get_i8(buf)),
            TypeTag::Int16 => Value::I16(order.get_i16(buf)),
            TypeTag::Int32 => Value::I32(order.get_i32(buf)),
            TypeTag::Int64 => Value::I64(order.get_i64(buf)),
            TypeTag::Float32 => Value::F32(order.get_f32(buf)),
            TypeTag::Float64 => Value::F64(order.get_f64(buf)),
            TypeTag::Bool => Value::Bool(buf.get_u8() != 0),
            TypeTag::Char8 => Value::Char8(char::from(buf.get_u8())),
            TypeTag::Char16 => {
                let unit = order.get_u16(buf);
                let c = char::from_u32(unit as u32).ok_or_else(|| {
                    WireError::constraint(format!("lone UTF-16 surrogate {:#06x}", unit))
                })?;
                Value::Char16(c)
            }
            // Registry never routes a non-scalar tag here
            other => return Err(wrong_shape(other, &Value::I8(0))),
        };
        cursor.advance(width);
        Ok(value)
    }
}
