//! Serializer family
//!
//! One serializer per [`TypeTag`], each implementing the same contract:
//! exact body sizing, tag-prefixed or bare writing, and body reading.
//! Serializers are stateless process-lifetime singletons; the two lookup
//! tables (by tag for decode, by runtime value shape for encode) are
//! plain exhaustive matches over `static` codecs, so the registry is
//! immutable and freely shareable across threads.

mod array;
mod matrix;
mod quantity;
mod scalar;
mod string;

use bytes::{BufMut, BytesMut};

use crate::cursor::Cursor;
use crate::error::{Result, WireError};
use crate::order::ByteOrder;
use crate::tag::TypeTag;
use crate::value::Value;

use array::ArrayCodec;
use matrix::MatrixCodec;
use quantity::{QuantityArrayCodec, QuantityCodec, QuantityMatrixCodec};
use scalar::ScalarCodec;
use string::StringCodec;

/// Per-type codec contract
///
/// Invariant: for every value a serializer accepts, `size(v)` computed
/// before writing equals the bytes actually consumed by `serialize`;
/// a disagreement is an internal defect surfaced as
/// [`WireError::SizeMismatch`] by the orchestrator, never recovered.
pub trait Serializer: Send + Sync {
    /// The tag this serializer owns
    fn field_type(&self) -> TypeTag;

    /// Shape dimensions of the payload: 0 scalar, 1 array/string,
    /// 2 matrix. Consumed by the incremental decoder to know whether a
    /// length/shape header precedes the payload.
    fn dimensions(&self) -> u8 {
        self.field_type().dimensions()
    }

    /// Exact byte count of `value`'s body, tag byte excluded
    fn size(&self, value: &Value) -> Result<usize>;

    /// Body size plus the one-byte tag prefix
    fn size_with_prefix(&self, value: &Value) -> Result<usize> {
        Ok(1 + self.size(value)?)
    }

    /// Write the body only, advancing the shared cursor
    fn serialize(
        &self,
        value: &Value,
        buf: &mut BytesMut,
        order: ByteOrder,
        cursor: &mut Cursor,
    ) -> Result<()>;

    /// Write the tag byte, then the body
    fn serialize_with_prefix(
        &self,
        value: &Value,
        buf: &mut BytesMut,
        order: ByteOrder,
        cursor: &mut Cursor,
    ) -> Result<()> {
        buf.put_i8(self.field_type().wire(order));
        cursor.advance(1);
        self.serialize(value, buf, order, cursor)
    }

    /// Read one body; the cursor is already past the tag byte
    fn deserialize(&self, buf: &mut &[u8], order: ByteOrder, cursor: &mut Cursor) -> Result<Value>;
}

/// The serializer was handed a value of a shape it does not own. Cannot
/// happen through [`for_value`] resolution; surfaced as a constraint
/// error rather than a panic.
pub(crate) fn wrong_shape(expected: TypeTag, got: &Value) -> WireError {
    WireError::constraint(format!(
        "serializer for {:?} given a {:?} value",
        expected,
        got.field_type()
    ))
}

pub(crate) fn check_remaining(buf: &[u8], needed: usize) -> Result<()> {
    if buf.len() < needed {
        return Err(WireError::BufferUnderflow { needed, have: buf.len() });
    }
    Ok(())
}

static INT8: ScalarCodec = ScalarCodec::new(TypeTag::Int8);
static INT16: ScalarCodec = ScalarCodec::new(TypeTag::Int16);
static INT32: ScalarCodec = ScalarCodec::new(TypeTag::Int32);
static INT64: ScalarCodec = ScalarCodec::new(TypeTag::Int64);
static FLOAT32: ScalarCodec = ScalarCodec::new(TypeTag::Float32);
static FLOAT64: ScalarCodec = ScalarCodec::new(TypeTag::Float64);
static BOOL: ScalarCodec = ScalarCodec::new(TypeTag::Bool);
static CHAR8: ScalarCodec = ScalarCodec::new(TypeTag::Char8);
static CHAR16: ScalarCodec = ScalarCodec::new(TypeTag::Char16);
static STR8: StringCodec = StringCodec::new(TypeTag::Str8);
static STR16: StringCodec = StringCodec::new(TypeTag::Str16);
static INT8_ARRAY: ArrayCodec = ArrayCodec::new(TypeTag::Int8Array);
static INT16_ARRAY: ArrayCodec = ArrayCodec::new(TypeTag::Int16Array);
static INT32_ARRAY: ArrayCodec = ArrayCodec::new(TypeTag::Int32Array);
static INT64_ARRAY: ArrayCodec = ArrayCodec::new(TypeTag::Int64Array);
static FLOAT32_ARRAY: ArrayCodec = ArrayCodec::new(TypeTag::Float32Array);
static FLOAT64_ARRAY: ArrayCodec = ArrayCodec::new(TypeTag::Float64Array);
static INT8_MATRIX: MatrixCodec = MatrixCodec::new(TypeTag::Int8Matrix);
static INT16_MATRIX: MatrixCodec = MatrixCodec::new(TypeTag::Int16Matrix);
static INT32_MATRIX: MatrixCodec = MatrixCodec::new(TypeTag::Int32Matrix);
static INT64_MATRIX: MatrixCodec = MatrixCodec::new(TypeTag::Int64Matrix);
static FLOAT32_MATRIX: MatrixCodec = MatrixCodec::new(TypeTag::Float32Matrix);
static FLOAT64_MATRIX: MatrixCodec = MatrixCodec::new(TypeTag::Float64Matrix);
static QUANTITY: QuantityCodec = QuantityCodec;
static QUANTITY_ARRAY: QuantityArrayCodec = QuantityArrayCodec;
static QUANTITY_MATRIX: QuantityMatrixCodec = QuantityMatrixCodec;

/// Decode-side lookup: tag to serializer
pub(crate) fn for_tag(tag: TypeTag) -> &'static dyn Serializer {
    match tag {
        TypeTag::Int8 => &INT8,
        TypeTag::Int16 => &INT16,
        TypeTag::Int32 => &INT32,
        TypeTag::Int64 => &INT64,
        TypeTag::Float32 => &FLOAT32,
        TypeTag::Float64 => &FLOAT64,
        TypeTag::Bool => &BOOL,
        TypeTag::Char8 => &CHAR8,
        TypeTag::Char16 => &CHAR16,
        TypeTag::Str8 => &STR8,
        TypeTag::Str16 => &STR16,
        TypeTag::Int8Array => &INT8_ARRAY,
        TypeTag::Int16Array => &INT16_ARRAY,
        TypeTag::Int32Array => &INT32_ARRAY,
        TypeTag::Int64Array => &INT64_ARRAY,
        TypeTag::Float32Array => &FLOAT32_ARRAY,
        TypeTag::Float64Array => &FLOAT64_ARRAY,
        TypeTag::Int8Matrix => &INT8_MATRIX,
        TypeTag::Int16Matrix => &INT16_MATRIX,
        TypeTag::Int32Matrix => &INT32_MATRIX,
        TypeTag::Int64Matrix => &INT64_MATRIX,
        TypeTag::Float32Matrix => &FLOAT32_MATRIX,
        TypeTag::Float64Matrix => &FLOAT64_MATRIX,
        TypeTag::Quantity => &QUANTITY,
        TypeTag::QuantityArray => &QUANTITY_ARRAY,
        TypeTag::QuantityMatrix => &QUANTITY_MATRIX,
    }
}

/// Encode-side lookup: runtime value shape to serializer. Unambiguous
/// because every `Value` variant maps to exactly one tag.
pub(crate) fn for_value(value: &Value) -> &'static dyn Serializer {
    for_tag(value.field_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_total_and_consistent() {
        for tag in TypeTag::ALL {
            let ser = for_tag(tag);
            assert_eq!(ser.field_type(), tag);
            assert_eq!(ser.dimensions(), tag.dimensions());
        }
    }

    #[test]
    fn test_value_resolution_matches_tag_resolution() {
        let v = Value::F64Array(vec![1.0, 2.0]);
        assert_eq!(for_value(&v).field_type(), TypeTag::Float64Array);
    }
}
