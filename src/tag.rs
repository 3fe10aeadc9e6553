//! The type-tag space
//!
//! One byte identifies both a field's logical type and its byte order:
//! the base value (>= 0) means the big-endian encoding, and the mirrored
//! value `base - 128` means the little-endian encoding of the same
//! logical type. The tag space is a closed, hand-assigned enumeration;
//! an unregistered byte fails decoding rather than being guessed at.

use crate::error::{Result, WireError};
use crate::order::ByteOrder;

/// Offset between a big-endian tag and its little-endian mirror
const LITTLE_ENDIAN_OFFSET: i16 = 128;

/// Logical field type, identified by the base (big-endian) tag value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum TypeTag {
    Int8 = 0,
    Int16 = 1,
    Int32 = 2,
    Int64 = 3,
    Float32 = 4,
    Float64 = 5,
    Bool = 6,
    Char8 = 7,
    Char16 = 8,
    Str8 = 9,
    Str16 = 10,
    Int8Array = 11,
    Int16Array = 12,
    Int32Array = 13,
    Int64Array = 14,
    Float32Array = 15,
    Float64Array = 16,
    Int8Matrix = 17,
    Int16Matrix = 18,
    Int32Matrix = 19,
    Int64Matrix = 20,
    Float32Matrix = 21,
    Float64Matrix = 22,
    Quantity = 23,
    QuantityArray = 24,
    QuantityMatrix = 25,
}

impl TypeTag {
    /// Every registered tag, in base-value order
    pub const ALL: [TypeTag; 26] = [
        TypeTag::Int8,
        TypeTag::Int16,
        TypeTag::Int32,
        TypeTag::Int64,
        TypeTag::Float32,
        TypeTag::Float64,
        TypeTag::Bool,
        TypeTag::Char8,
        TypeTag::Char16,
        TypeTag::Str8,
        TypeTag::Str16,
        TypeTag::Int8Array,
        TypeTag::Int16Array,
        TypeTag::Int32Array,
        TypeTag::Int64Array,
        TypeTag::Float32Array,
        TypeTag::Float64Array,
        TypeTag::Int8Matrix,
        TypeTag::Int16Matrix,
        TypeTag::Int32Matrix,
        TypeTag::Int64Matrix,
        TypeTag::Float32Matrix,
        TypeTag::Float64Matrix,
        TypeTag::Quantity,
        TypeTag::QuantityArray,
        TypeTag::QuantityMatrix,
    ];

    /// Base (big-endian) tag value
    #[inline]
    pub fn base(self) -> i8 {
        self as i8
    }

    /// Wire byte for this tag under the given byte order
    #[inline]
    pub fn wire(self, order: ByteOrder) -> i8 {
        match order {
            ByteOrder::Big => self.base(),
            ByteOrder::Little => (self.base() as i16 - LITTLE_ENDIAN_OFFSET) as i8,
        }
    }

    /// Resolve a wire byte into its logical tag and byte order.
    ///
    /// Fails on bytes outside the registered enumeration; the caller owns
    /// the buffer offset and folds it into the error it surfaces.
    pub fn from_wire(raw: i8) -> Result<(TypeTag, ByteOrder)> {
        let (base, order) = if raw >= 0 {
            (raw as i16, ByteOrder::Big)
        } else {
            (raw as i16 + LITTLE_ENDIAN_OFFSET, ByteOrder::Little)
        };
        let tag = match base {
            0 => TypeTag::Int8,
            1 => TypeTag::Int16,
            2 => TypeTag::Int32,
            3 => TypeTag::Int64,
            4 => TypeTag::Float32,
            5 => TypeTag::Float64,
            6 => TypeTag::Bool,
            7 => TypeTag::Char8,
            8 => TypeTag::Char16,
            9 => TypeTag::Str8,
            10 => TypeTag::Str16,
            11 => TypeTag::Int8Array,
            12 => TypeTag::Int16Array,
            13 => TypeTag::Int32Array,
            14 => TypeTag::Int64Array,
            15 => TypeTag::Float32Array,
            16 => TypeTag::Float64Array,
            17 => TypeTag::Int8Matrix,
            18 => TypeTag::Int16Matrix,
            19 => TypeTag::Int32Matrix,
            20 => TypeTag::Int64Matrix,
            21 => TypeTag::Float32Matrix,
            22 => TypeTag::Float64Matrix,
            23 => TypeTag::Quantity,
            24 => TypeTag::QuantityArray,
            25 => TypeTag::QuantityMatrix,
            _ => return Err(WireError::UnknownFieldType { tag: raw, offset: 0 }),
        };
        Ok((tag, order))
    }

    /// Number of shape dimensions: 0 for scalars, 1 for strings/arrays,
    /// 2 for matrices. Drives whether a length/shape header precedes the
    /// payload.
    pub fn dimensions(self) -> u8 {
        match self {
            TypeTag::Int8
            | TypeTag::Int16
            | TypeTag::Int32
            | TypeTag::Int64
            | TypeTag::Float32
            | TypeTag::Float64
            | TypeTag::Bool
            | TypeTag::Char8
            | TypeTag::Char16
            | TypeTag::Quantity => 0,
            TypeTag::Str8
            | TypeTag::Str16
            | TypeTag::Int8Array
            | TypeTag::Int16Array
            | TypeTag::Int32Array
            | TypeTag::Int64Array
            | TypeTag::Float32Array
            | TypeTag::Float64Array
            | TypeTag::QuantityArray => 1,
            TypeTag::Int8Matrix
            | TypeTag::Int16Matrix
            | TypeTag::Int32Matrix
            | TypeTag::Int64Matrix
            | TypeTag::Float32Matrix
            | TypeTag::Float64Matrix
            | TypeTag::QuantityMatrix => 2,
        }
    }

    /// Element width in bytes for tags whose payload is a homogeneous
    /// run of fixed-width elements (strings, arrays, matrices, and the
    /// quantity composites, whose elements are always doubles).
    pub fn element_size(self) -> usize {
        match self {
            TypeTag::Str8 | TypeTag::Int8Array | TypeTag::Int8Matrix => 1,
            TypeTag::Str16 | TypeTag::Int16Array | TypeTag::Int16Matrix => 2,
            TypeTag::Int32Array | TypeTag::Int32Matrix => 4,
            TypeTag::Float32Array | TypeTag::Float32Matrix => 4,
            TypeTag::Int64Array | TypeTag::Int64Matrix => 8,
            TypeTag::Float64Array | TypeTag::Float64Matrix => 8,
            TypeTag::QuantityArray | TypeTag::QuantityMatrix => 8,
            // Scalars: the element is the whole fixed body
            other => other.fixed_body_size(),
        }
    }

    /// Body size of a 0-dimension primitive tag. `Quantity` has no fixed
    /// body (its unit descriptor is variable width) and reports 0; the
    /// incremental decoder special-cases it.
    pub fn fixed_body_size(self) -> usize {
        match self {
            TypeTag::Int8 | TypeTag::Bool | TypeTag::Char8 => 1,
            TypeTag::Int16 | TypeTag::Char16 => 2,
            TypeTag::Int32 | TypeTag::Float32 => 4,
            TypeTag::Int64 | TypeTag::Float64 => 8,
            _ => 0,
        }
    }
}
