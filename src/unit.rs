//! Unit catalog interface
//!
//! The codec copies `(quantity, display)` unit codes through the wire
//! verbatim and never interprets their numeric meaning; the full catalog
//! of named quantities and display units lives outside this crate and is
//! reached through the [`UnitCatalog`] trait. The one wire-level fact the
//! codec does own: money display codes are 16-bit, everything else fits
//! in one byte.

use bytes::{Buf, BufMut};

use crate::error::{Result, WireError};
use crate::order::ByteOrder;

/// Quantity-kind code reserved for money units. Money display codes are
/// ISO-4217 numeric codes and need two bytes on the wire.
pub const MONEY: u8 = 0x7F;

/// The `(quantity, display)` code pair carried ahead of a unit-tagged
/// payload. The payload itself is always stored in the quantity's
/// canonical unit; the display code only tells a consumer how to
/// re-render the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitTag {
    /// Physical quantity kind (length, mass, money, ...)
    pub quantity: u8,
    /// Display unit within the quantity
    pub display: u16,
}

impl UnitTag {
    pub fn new(quantity: u8, display: u16) -> Self {
        Self { quantity, display }
    }

    /// Bytes this descriptor occupies on the wire
    #[inline]
    pub fn wire_size(&self) -> usize {
        if self.quantity == MONEY {
            3
        } else {
            2
        }
    }

    pub(crate) fn encode<B: BufMut>(&self, buf: &mut B, order: ByteOrder) -> Result<()> {
        buf.put_u8(self.quantity);
        if self.quantity == MONEY {
            order.put_u16(buf, self.display);
        } else {
            if self.display > u8::MAX as u16 {
                return Err(WireError::constraint(format!(
                    "display code {} exceeds one byte for quantity {}",
                    self.display, self.quantity
                )));
            }
            buf.put_u8(self.display as u8);
        }
        Ok(())
    }

    pub(crate) fn decode<B: Buf>(buf: &mut B, order: ByteOrder) -> Result<Self> {
        if buf.remaining() < 2 {
            return Err(WireError::BufferUnderflow { needed: 2, have: buf.remaining() });
        }
        let quantity = buf.get_u8();
        let display = if quantity == MONEY {
            if buf.remaining() < 2 {
                return Err(WireError::BufferUnderflow { needed: 2, have: buf.remaining() });
            }
            order.get_u16(buf)
        } else {
            buf.get_u8() as u16
        };
        Ok(Self { quantity, display })
    }
}

/// What a catalog knows about one display unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDescriptor {
    pub quantity: u8,
    pub display: u16,
    /// Human-readable abbreviation, e.g. "km" or "USD"
    pub abbrev: String,
}

/// Read-only registry mapping unit codes to descriptors and back.
///
/// Populated once at process start and never mutated afterward, so it
/// may be shared freely across threads.
pub trait UnitCatalog: Send + Sync {
    /// Resolve a `(quantity, display)` code pair
    fn lookup(&self, quantity: u8, display: u16) -> Option<UnitDescriptor>;

    /// Reverse lookup by abbreviation
    fn code_of(&self, abbrev: &str) -> Option<UnitTag>;
}
