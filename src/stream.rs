//! Incremental stream decoder
//!
//! A byte-at-a-time state machine that reproduces a readable dump of an
//! encoded stream without random access or the full buffer in memory,
//! for tooling that taps a live byte stream:
//!
//! ```text
//! AwaitingTag -> (FixedBody | ShapeHeader) -> [UnitPairs] -> Element* -> AwaitingTag
//! ```
//!
//! The machine never looks ahead past the bytes it has been given and
//! never rewinds; at most the current field's accumulator is held. Each
//! completed printable unit is handed back as one line so callers can
//! stream the output.
//!
//! An unknown tag byte emits a resynchronization warning and drops back
//! to `AwaitingTag` at the very next byte. This recovery is lossy: byte
//! alignment with record boundaries is not guaranteed to be regained,
//! and subsequent bytes will usually be misread until a tag happens to
//! line up again.

use std::sync::Arc;

use bytes::Buf;
use tracing::warn;

use crate::order::ByteOrder;
use crate::tag::TypeTag;
use crate::unit::{UnitCatalog, UnitTag, MONEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingTag,
    FixedBody,
    ShapeHeader,
    UnitPairs,
    Element,
}

/// Per-field decoding state, reset at every tag byte
struct Field {
    tag: TypeTag,
    order: ByteOrder,
    acc: Vec<u8>,
    /// Bytes the current accumulator must reach
    need: usize,
    rows: u32,
    cols: u32,
    units_read: u32,
    /// Elements consumed so far, row-major
    index: u64,
    total: u64,
}

impl Field {
    fn new(tag: TypeTag, order: ByteOrder) -> Self {
        Self {
            tag,
            order,
            acc: Vec::new(),
            need: 0,
            rows: 1,
            cols: 1,
            units_read: 0,
            index: 0,
            total: 0,
        }
    }
}

/// Byte-at-a-time diagnostic decoder
pub struct StreamDecoder {
    phase: Phase,
    field: Field,
    catalog: Option<Arc<dyn UnitCatalog>>,
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self {
            phase: Phase::AwaitingTag,
            field: Field::new(TypeTag::Int8, ByteOrder::Big),
            catalog: None,
        }
    }

    /// Attach a unit catalog so unit descriptors print their
    /// abbreviations instead of raw code pairs
    pub fn with_catalog(catalog: Arc<dyn UnitCatalog>) -> Self {
        Self { catalog: Some(catalog), ..Self::new() }
    }

    /// Consume one input byte; returns a completed printable line, if
    /// this byte finished one
    pub fn push(&mut self, byte: u8) -> Option<String> {
        match self.phase {
            Phase::AwaitingTag => self.on_tag(byte),
            Phase::FixedBody => self.on_fixed_body(byte),
            Phase::ShapeHeader => self.on_shape_header(byte),
            Phase::UnitPairs => self.on_unit_pair(byte),
            Phase::Element => self.on_element(byte),
        }
    }

    /// Convenience: push every byte of `bytes`, collecting the lines
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        bytes.iter().filter_map(|b| self.push(*b)).collect()
    }

    fn on_tag(&mut self, byte: u8) -> Option<String> {
        match TypeTag::from_wire(byte as i8) {
            Err(_) => {
                warn!(tag = byte, "unknown field type in stream, resynchronizing at next byte");
                Some(format!("!! unknown tag {:#04x}, resynchronizing", byte))
            }
            Ok((tag, order)) => {
                self.field = Field::new(tag, order);
                match tag.dimensions() {
                    0 if tag == TypeTag::Quantity => {
                        self.field.total = 1;
                        self.phase = Phase::UnitPairs;
                    }
                    0 => {
                        self.field.need = tag.fixed_body_size();
                        self.phase = Phase::FixedBody;
                    }
                    d => {
                        self.field.need = 4 * d as usize;
                        self.phase = Phase::ShapeHeader;
                    }
                }
                None
            }
        }
    }

    fn on_fixed_body(&mut self, byte: u8) -> Option<String> {
        self.field.acc.push(byte);
        if self.field.acc.len() < self.field.need {
            return None;
        }
        let line = format!(
            "{} {}",
            base_name(self.field.tag),
            render_fixed(self.field.tag, self.field.order, &self.field.acc)
        );
        self.phase = Phase::AwaitingTag;
        Some(line)
    }

    fn on_shape_header(&mut self, byte: u8) -> Option<String> {
        self.field.acc.push(byte);
        if self.field.acc.len() < self.field.need {
            return None;
        }
        let mut rd: &[u8] = &self.field.acc;
        let line = if self.field.tag.dimensions() == 1 {
            let count = self.field.order.get_u32(&mut rd);
            // String headers carry a byte count, not an element count
            self.field.cols = match self.field.tag {
                TypeTag::Str16 => {
                    if count % 2 != 0 {
                        warn!(
                            bytes = count,
                            "double-byte string body is not a whole number of units, resynchronizing"
                        );
                        self.field.acc.clear();
                        self.phase = Phase::AwaitingTag;
                        return Some(format!(
                            "!! str16 body of {} bytes is not a whole number of units, resynchronizing",
                            count
                        ));
                    }
                    count / 2
                }
                _ => count,
            };
            format!("{}[{}]", base_name(self.field.tag), self.field.cols)
        } else {
            self.field.rows = self.field.order.get_u32(&mut rd);
            self.field.cols = self.field.order.get_u32(&mut rd);
            format!("{}[{}x{}]", base_name(self.field.tag), self.field.rows, self.field.cols)
        };
        self.field.total = self.field.rows as u64 * self.field.cols as u64;
        self.field.acc.clear();

        if self.field.total == 0 {
            // Nothing follows a degenerate shape
            self.phase = Phase::AwaitingTag;
        } else if matches!(self.field.tag, TypeTag::QuantityArray | TypeTag::QuantityMatrix) {
            self.phase = Phase::UnitPairs;
        } else {
            self.field.need = self.field.tag.element_size();
            self.phase = Phase::Element;
        }
        Some(line)
    }

    fn on_unit_pair(&mut self, byte: u8) -> Option<String> {
        self.field.acc.push(byte);
        if self.field.acc.len() == 1 {
            // Money display codes take two bytes
            self.field.need = if byte == MONEY { 3 } else { 2 };
            return None;
        }
        if self.field.acc.len() < self.field.need {
            return None;
        }

        let quantity = self.field.acc[0];
        let display = if quantity == MONEY {
            let mut rd: &[u8] = &self.field.acc[1..];
            self.field.order.get_u16(&mut rd)
        } else {
            self.field.acc[1] as u16
        };
        let unit = UnitTag::new(quantity, display);
        let line = if self.field.tag == TypeTag::Quantity {
            format!("unit {}", self.render_unit(unit))
        } else {
            format!("col {} unit {}", self.field.units_read, self.render_unit(unit))
        };
        self.field.acc.clear();
        self.field.units_read += 1;

        let wanted = if self.field.tag == TypeTag::Quantity { 1 } else { self.field.cols };
        if self.field.units_read == wanted {
            // Quantity payloads are always doubles
            self.field.need = 8;
            self.phase = Phase::Element;
        }
        Some(line)
    }

    fn on_element(&mut self, byte: u8) -> Option<String> {
        self.field.acc.push(byte);
        if self.field.acc.len() < self.field.need {
            return None;
        }
        let rendered = render_element(self.field.tag, self.field.order, &self.field.acc);
        let line = if self.field.tag.dimensions() == 2 {
            let r = self.field.index / self.field.cols as u64;
            let c = self.field.index % self.field.cols as u64;
            format!("[{},{}] {}", r, c, rendered)
        } else {
            rendered
        };
        self.field.acc.clear();
        self.field.index += 1;
        if self.field.index == self.field.total {
            self.phase = Phase::AwaitingTag;
        }
        Some(line)
    }

    fn render_unit(&self, unit: UnitTag) -> String {
        if let Some(catalog) = &self.catalog {
            if let Some(desc) = catalog.lookup(unit.quantity, unit.display) {
                return desc.abbrev;
            }
        }
        format!("q{}:u{}", unit.quantity, unit.display)
    }
}

fn base_name(tag: TypeTag) -> &'static str {
    match tag {
        TypeTag::Int8 | TypeTag::Int8Array | TypeTag::Int8Matrix => "i8",
        TypeTag::Int16 | TypeTag::Int16Array | TypeTag::Int16Matrix => "i16",
        TypeTag::Int32 | TypeTag::Int32Array | TypeTag::Int32Matrix => "i32",
        TypeTag::Int64 | TypeTag::Int64Array | TypeTag::Int64Matrix => "i64",
        TypeTag::Float32 | TypeTag::Float32Array | TypeTag::Float32Matrix => "f32",
        TypeTag::Float64 | TypeTag::Float64Array | TypeTag::Float64Matrix => "f64",
        TypeTag::Bool => "bool",
        TypeTag::Char8 => "char8",
        TypeTag::Char16 => "char16",
        TypeTag::Str8 => "str8",
        TypeTag::Str16 => "str16",
        TypeTag::Quantity | TypeTag::QuantityArray | TypeTag::QuantityMatrix => "quantity",
    }
}

/// Print a completed fixed-width scalar body
fn render_fixed(tag: TypeTag, order: ByteOrder, bytes: &[u8]) -> String {
    let mut rd = bytes;
    match tag {
        TypeTag::Int8 => order.get_i8(&mut rd).to_string(),
        TypeTag::Int16 => order.get_i16(&mut rd).to_string(),
        TypeTag::Int32 => order.get_i32(&mut rd).to_string(),
        TypeTag::Int64 => order.get_i64(&mut rd).to_string(),
        TypeTag::Float32 => order.get_f32(&mut rd).to_string(),
        TypeTag::Float64 => order.get_f64(&mut rd).to_string(),
        TypeTag::Bool => (rd.get_u8() != 0).to_string(),
        TypeTag::Char8 => format!("{:?}", char::from(rd.get_u8())),
        TypeTag::Char16 => {
            let unit = order.get_u16(&mut rd);
            match char::from_u32(unit as u32) {
                Some(c) => format!("{:?}", c),
                None => format!("<invalid {:#06x}>", unit),
            }
        }
        // Only 0-dimension primitive tags reach this path
        _ => String::new(),
    }
}

/// Print one completed element of a string, array, or matrix payload
fn render_element(tag: TypeTag, order: ByteOrder, bytes: &[u8]) -> String {
    let mut rd = bytes;
    match tag {
        TypeTag::Str8 => format!("{:?}", char::from(rd.get_u8())),
        TypeTag::Str16 => {
            let unit = order.get_u16(&mut rd);
            match char::from_u32(unit as u32) {
                Some(c) => format!("{:?}", c),
                None => format!("<invalid {:#06x}>", unit),
            }
        }
        TypeTag::Int8Array | TypeTag::Int8Matrix => order.get_i8(&mut rd).to_string(),
        TypeTag::Int16Array | TypeTag::Int16Matrix => order.get_i16(&mut rd).to_string(),
        TypeTag::Int32Array | TypeTag::Int32Matrix => order.get_i32(&mut rd).to_string(),
        TypeTag::Int64Array | TypeTag::Int64Matrix => order.get_i64(&mut rd).to_string(),
        TypeTag::Float32Array | TypeTag::Float32Matrix => order.get_f32(&mut rd).to_string(),
        TypeTag::Float64Array | TypeTag::Float64Matrix => order.get_f64(&mut rd).to_string(),
        TypeTag::Quantity | TypeTag::QuantityArray | TypeTag::QuantityMatrix => {
            order.get_f64(&mut rd).to_string()
        }
        _ => String::new(),
    }
}
