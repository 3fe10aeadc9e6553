//! Self-describing tagged binary wire format
//!
//! Every encoded field is prefixed with a one-byte type tag, so a message
//! is a flat sequence of self-identifying records with no overall length
//! prefix or terminator:
//!
//! ```text
//! record  := tag:int8, body:bytes
//! message := record*
//! ```
//!
//! Key characteristics:
//! - Tags `>= 0` mean the record body is big-endian; the mirrored tag
//!   `tag - 128` means the little-endian encoding of the same type
//! - Strings and arrays carry a `u32` length prefix, matrices a
//!   `rows:u32, cols:u32` shape prefix, row-major, no padding
//! - Unit-tagged quantities carry `(quantity, display)` unit codes ahead
//!   of the payload; values are always stored in the canonical unit
//!
//! [`codec::encode`]/[`codec::decode`] convert between a value list and a
//! byte buffer in one pass; [`stream::StreamDecoder`] reproduces a
//! readable dump of a stream one input byte at a time.

mod codec;
mod cursor;
mod error;
mod order;
mod ser;
mod stream;
mod tag;
mod unit;
mod value;

pub use codec::{decode, encode, encoded_size};
pub use cursor::Cursor;
pub use error::{Result, WireError};
pub use order::ByteOrder;
pub use ser::Serializer;
pub use stream::StreamDecoder;
pub use tag::TypeTag;
pub use unit::{UnitCatalog, UnitDescriptor, UnitTag, MONEY};
pub use value::{Matrix, Quantity, QuantityArray, QuantityMatrix, Value};

/// Re-export bytes for convenience
pub use bytes::{Buf, BufMut, Bytes, BytesMut};
