//! Codec error types

use thiserror::Error;

/// Wire encoding/decoding errors
#[derive(Debug, Error)]
pub enum WireError {
    /// Zero-sized or jagged array/matrix presented for encoding.
    /// Detected before any byte is written.
    #[error("shape violation: {what}")]
    ShapeViolation { what: String },

    /// A decode met a tag byte with no registered serializer
    #[error("unknown field type {tag:#04x} at offset {offset}")]
    UnknownFieldType { tag: i8, offset: usize },

    /// The computed size and the actually written size disagree.
    /// Indicates an internal serializer defect; not recoverable.
    #[error("size mismatch: computed {computed} bytes, wrote {written}")]
    SizeMismatch { computed: usize, written: usize },

    /// A value cannot satisfy a declared wire limit (length field
    /// overflow, character outside an 8-bit string codec's range, ...)
    #[error("encoding constraint: {what}")]
    EncodingConstraint { what: String },

    /// Buffer underflow - not enough data to finish a decode
    #[error("buffer underflow: needed {needed} bytes, have {have}")]
    BufferUnderflow { needed: usize, have: usize },

    /// UTF-16 decoding error in a double-byte string body
    #[error("UTF-16 error: {0}")]
    Utf16Error(#[from] std::char::DecodeUtf16Error),
}

impl WireError {
    pub(crate) fn shape(what: impl Into<String>) -> Self {
        Self::ShapeViolation { what: what.into() }
    }

    pub(crate) fn constraint(what: impl Into<String>) -> Self {
        Self::EncodingConstraint { what: what.into() }
    }
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, WireError>;
