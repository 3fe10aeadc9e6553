//! Byte-order abstraction
//!
//! Every multi-byte primitive on the wire is written in the byte order
//! selected for the record, so all put/get helpers dispatch on a
//! [`ByteOrder`] flag. The two implementations are bitwise inverses of
//! each other over the full representable range, including NaN and
//! Infinity bit patterns for floats.

use bytes::{Buf, BufMut};

/// Byte order of a record body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    /// Whether this is the little-endian order
    #[inline]
    pub fn is_little(self) -> bool {
        matches!(self, ByteOrder::Little)
    }

    // Primitive encoding methods

    #[inline]
    pub fn put_u8<B: BufMut>(self, buf: &mut B, value: u8) {
        buf.put_u8(value);
    }

    #[inline]
    pub fn put_i8<B: BufMut>(self, buf: &mut B, value: i8) {
        buf.put_i8(value);
    }

    #[inline]
    pub fn put_u16<B: BufMut>(self, buf: &mut B, value: u16) {
        match self {
            ByteOrder::Big => buf.put_u16(value),
            ByteOrder::Little => buf.put_u16_le(value),
        }
    }

    #[inline]
    pub fn put_i16<B: BufMut>(self, buf: &mut B, value: i16) {
        match self {
            ByteOrder::Big => buf.put_i16(value),
            ByteOrder::Little => buf.put_i16_le(value),
        }
    }

    #[inline]
    pub fn put_u32<B: BufMut>(self, buf: &mut B, value: u32) {
        match self {
            ByteOrder::Big => buf.put_u32(value),
            ByteOrder::Little => buf.put_u32_le(value),
        }
    }

    #[inline]
    pub fn put_i32<B: BufMut>(self, buf: &mut B, value: i32) {
        match self {
            ByteOrder::Big => buf.put_i32(value),
            ByteOrder::Little => buf.put_i32_le(value),
        }
    }

    #[inline]
    pub fn put_i64<B: BufMut>(self, buf: &mut B, value: i64) {
        match self {
            ByteOrder::Big => buf.put_i64(value),
            ByteOrder::Little => buf.put_i64_le(value),
        }
    }

    /// Floats travel as their raw bit pattern so NaN payloads survive
    #[inline]
    pub fn put_f32<B: BufMut>(self, buf: &mut B, value: f32) {
        self.put_u32(buf, value.to_bits());
    }

    #[inline]
    pub fn put_f64<B: BufMut>(self, buf: &mut B, value: f64) {
        match self {
            ByteOrder::Big => buf.put_u64(value.to_bits()),
            ByteOrder::Little => buf.put_u64_le(value.to_bits()),
        }
    }

    // Primitive decoding methods

    #[inline]
    pub fn get_u8<B: Buf>(self, buf: &mut B) -> u8 {
        buf.get_u8()
    }

    #[inline]
    pub fn get_i8<B: Buf>(self, buf: &mut B) -> i8 {
        buf.get_i8()
    }

    #[inline]
    pub fn get_u16<B: Buf>(self, buf: &mut B) -> u16 {
        match self {
            ByteOrder::Big => buf.get_u16(),
            ByteOrder::Little => buf.get_u16_le(),
        }
    }

    #[inline]
    pub fn get_i16<B: Buf>(self, buf: &mut B) -> i16 {
        match self {
            ByteOrder::Big => buf.get_i16(),
            ByteOrder::Little => buf.get_i16_le(),
        }
    }

    #[inline]
    pub fn get_u32<B: Buf>(self, buf: &mut B) -> u32 {
        match self {
            ByteOrder::Big => buf.get_u32(),
            ByteOrder::Little => buf.get_u32_le(),
        }
    }

    #[inline]
    pub fn get_i32<B: Buf>(self, buf: &mut B) -> i32 {
        match self {
            ByteOrder::Big => buf.get_i32(),
            ByteOrder::Little => buf.get_i32_le(),
        }
    }

    #[inline]
    pub fn get_i64<B: Buf>(self, buf: &mut B) -> i64 {
        match self {
            ByteOrder::Big => buf.get_i64(),
            ByteOrder::Little => buf.get_i64_le(),
        }
    }

    #[inline]
    pub fn get_f32<B: Buf>(self, buf: &mut B) -> f32 {
        f32::from_bits(self.get_u32(buf))
    }

    #[inline]
    pub fn get_f64<B: Buf>(self, buf: &mut B) -> f64 {
        let bits = match self {
            ByteOrder::Big => buf.get_u64(),
            ByteOrder::Little => buf.get_u64_le(),
        };
        f64::from_bits(bits)
    }
}
