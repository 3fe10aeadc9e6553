//! Length-prefixed string serializers
//!
//! Wire format:
//! ```text
//! length: u32      # byte count, not character count
//! bytes[length]    # one byte per char (Str8) or UTF-16 units (Str16)
//! ```
//!
//! `Str8` stores each character as a single byte and therefore only
//! accepts characters up to U+00FF; `Str16` stores UTF-16 code units, so
//! the byte count is always even. Empty strings are legal (length 0).

use bytes::{Buf, BytesMut};

use crate::cursor::Cursor;
use crate::error::{Result, WireError};
use crate::order::ByteOrder;
use crate::tag::TypeTag;
use crate::value::Value;

use super::{check_remaining, wrong_shape, Serializer};

pub(crate) struct StringCodec {
    tag: TypeTag,
}

impl StringCodec {
    pub(crate) const fn new(tag: TypeTag) -> Self {
        Self { tag }
    }

    fn byte_len(&self, s: &str) -> Result<usize> {
        let len = match self.tag {
            TypeTag::Str8 => s.chars().count(),
            _ => s.encode_utf16().count() * 2,
        };
        if len > u32::MAX as usize {
            return Err(WireError::constraint(format!(
                "string of {} bytes overflows the u32 length field",
                len
            )));
        }
        Ok(len)
    }
}

impl Serializer for StringCodec {
    fn field_type(&self) -> TypeTag {
        self.tag
    }

    fn size(&self, value: &Value) -> Result<usize> {
        let s = match (self.tag, value) {
            (TypeTag::Str8, Value::Str8(s)) | (TypeTag::Str16, Value::Str16(s)) => s,
            _ => return Err(wrong_shape(self.tag, value)),
        };
        Ok(4 + self.byte_len(s)?)
    }

    fn serialize(
        &self,
        value: &Value,
        buf: &mut BytesMut,
        order: ByteOrder,
        cursor: &mut Cursor,
    ) -> Result<()> {
        let s = match (self.tag, value) {
            (TypeTag::Str8, Value::Str8(s)) | (TypeTag::Str16, Value::Str16(s)) => s,
            _ => return Err(wrong_shape(self.tag, value)),
        };
        let byte_len = self.byte_len(s)?;
        order.put_u32(buf, byte_len as u32);
        cursor.advance(4);

        match self.tag {
            TypeTag::Str8 => {
                for c in s.chars() {
                    let code = c as u32;
                    if code > 0xFF {
                        return Err(WireError::constraint(format!(
                            "character {:?} outside the 8-bit string range",
                            c
                        )));
                    }
                    order.put_u8(buf, code as u8);
                }
            }
            _ => {
                for unit in s.encode_utf16() {
                    order.put_u16(buf, unit);
                }
            }
        }
        cursor.advance(byte_len);
        Ok(())
    }

    fn deserialize(&self, buf: &mut &[u8], order: ByteOrder, cursor: &mut Cursor) -> Result<Value> {
        check_remaining(buf, 4)?;
        let byte_len = order.get_u32(buf) as usize;
        cursor.advance(4);
        check_remaining(buf, byte_len)?;

        let value = match self.tag {
            TypeTag::Str8 => {
                let mut s = String::with_capacity(byte_len);
                for _ in 0..byte_len {
                    s.push(char::from(buf.get_u8()));
                }
                Value::Str8(s)
            }
            _ => {
                if byte_len % 2 != 0 {
                    return Err(WireError::constraint(format!(
                        "double-byte string body of {} bytes is not a whole number of units",
                        byte_len
                    )));
                }
                let mut units = Vec::with_capacity(byte_len / 2);
                for _ in 0..byte_len / 2 {
                    units.push(order.get_u16(buf));
                }
                let s = char::decode_utf16(units).collect::<std::result::Result<String, _>>()?;
                Value::Str16(s)
            }
        };
        cursor.advance(byte_len);
        Ok(value)
    }
}
