//! Encode/decode orchestrator
//!
//! [`encode`] walks a heterogeneous value list twice: a sizing pass that
//! sums every record's tag-prefixed size, then a write pass into a
//! buffer allocated to exactly that length. The shared [`Cursor`] lets
//! the two passes be compared record by record; any disagreement means a
//! serializer defect and is surfaced as a fatal [`WireError::SizeMismatch`],
//! never truncated or padded away.
//!
//! [`decode`] consumes tagged records until the buffer is exhausted. The
//! record count is implied, not declared; each record's byte order comes
//! from its own tag byte, so buffers from big- and little-endian peers
//! decode alike.

use bytes::{Buf, Bytes, BytesMut};
use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::error::{Result, WireError};
use crate::order::ByteOrder;
use crate::ser;
use crate::tag::TypeTag;
use crate::value::Value;

/// Tag-prefixed wire size of a single value, without encoding it
pub fn encoded_size(value: &Value) -> Result<usize> {
    ser::for_value(value).size_with_prefix(value)
}

/// Encode a value list into one tag-prefixed byte buffer
pub fn encode(order: ByteOrder, values: &[Value]) -> Result<Bytes> {
    let mut total = 0usize;
    for value in values {
        total += ser::for_value(value).size_with_prefix(value)?;
    }
    debug!(records = values.len(), bytes = total, ?order, "encoding message");

    let mut buf = BytesMut::with_capacity(total);
    let mut cursor = Cursor::new();
    for value in values {
        let serializer = ser::for_value(value);
        let expected = serializer.size_with_prefix(value)?;
        let start = cursor.position();
        serializer.serialize_with_prefix(value, &mut buf, order, &mut cursor)?;
        let written = cursor.position() - start;
        if written != expected {
            return Err(WireError::SizeMismatch { computed: expected, written });
        }
        trace!(tag = ?serializer.field_type(), bytes = written, "wrote record");
    }

    if cursor.position() != total || buf.len() != total {
        return Err(WireError::SizeMismatch { computed: total, written: buf.len() });
    }
    Ok(buf.freeze())
}

/// Decode a byte buffer back into its ordered value list
pub fn decode(bytes: &[u8]) -> Result<Vec<Value>> {
    let mut reader = bytes;
    let mut cursor = Cursor::new();
    let mut values = Vec::new();

    while reader.has_remaining() {
        let offset = cursor.position();
        let raw = reader.get_i8();
        cursor.advance(1);
        let (tag, order) = TypeTag::from_wire(raw)
            .map_err(|_| WireError::UnknownFieldType { tag: raw, offset })?;
        trace!(?tag, ?order, offset, "reading record");
        let value = ser::for_tag(tag).deserialize(&mut reader, order, &mut cursor)?;
        values.push(value);
    }

    debug!(records = values.len(), bytes = bytes.len(), "decoded message");
    Ok(values)
}
