//! Unit-tagged quantity serializers
//!
//! A quantity payload is always a double stored in the quantity's
//! canonical unit; what travels with it is the `(quantity, display)`
//! code pair saying how a consumer should re-render the number.
//!
//! Wire formats:
//! ```text
//! scalar:  unit_pair, value:f64
//! array:   count:u32, unit_pair[count], values[count]:f64
//! matrix:  rows:u32, cols:u32, unit_pair[cols], values[rows*cols]:f64
//! ```
//!
//! For composites the unit pairs come once per column ahead of the data
//! block, never once per element: every value in a column shares one
//! physical unit. An array is a single row, so each position is its own
//! column.

use bytes::BytesMut;

use crate::cursor::Cursor;
use crate::error::{Result, WireError};
use crate::order::ByteOrder;
use crate::tag::TypeTag;
use crate::unit::UnitTag;
use crate::value::{Matrix, Quantity, QuantityArray, QuantityMatrix, Value};

use super::{check_remaining, wrong_shape, Serializer};

fn units_wire_size(units: &[UnitTag]) -> usize {
    units.iter().map(UnitTag::wire_size).sum()
}

fn read_units(buf: &mut &[u8], order: ByteOrder, count: usize, cursor: &mut Cursor) -> Result<Vec<UnitTag>> {
    let mut units = Vec::with_capacity(count);
    for _ in 0..count {
        let unit = UnitTag::decode(buf, order)?;
        cursor.advance(unit.wire_size());
        units.push(unit);
    }
    Ok(units)
}

fn read_doubles(buf: &mut &[u8], order: ByteOrder, count: usize, cursor: &mut Cursor) -> Result<Vec<f64>> {
    check_remaining(buf, count * 8)?;
    let values = (0..count).map(|_| order.get_f64(buf)).collect();
    cursor.advance(count * 8);
    Ok(values)
}

/// Unit-tagged scalar
pub(crate) struct QuantityCodec;

impl Serializer for QuantityCodec {
    fn field_type(&self) -> TypeTag {
        TypeTag::Quantity
    }

    fn size(&self, value: &Value) -> Result<usize> {
        match value {
            Value::Quantity(q) => Ok(q.unit.wire_size() + 8),
            _ => Err(wrong_shape(TypeTag::Quantity, value)),
        }
    }

    fn serialize(
        &self,
        value: &Value,
        buf: &mut BytesMut,
        order: ByteOrder,
        cursor: &mut Cursor,
    ) -> Result<()> {
        let q = match value {
            Value::Quantity(q) => q,
            _ => return Err(wrong_shape(TypeTag::Quantity, value)),
        };
        q.unit.encode(buf, order)?;
        cursor.advance(q.unit.wire_size());
        order.put_f64(buf, q.value);
        cursor.advance(8);
        Ok(())
    }

    fn deserialize(&self, buf: &mut &[u8], order: ByteOrder, cursor: &mut Cursor) -> Result<Value> {
        let unit = UnitTag::decode(buf, order)?;
        cursor.advance(unit.wire_size());
        check_remaining(buf, 8)?;
        let value = order.get_f64(buf);
        cursor.advance(8);
        Ok(Value::Quantity(Quantity::new(unit, value)))
    }
}

/// Unit-tagged array with one unit pair per column
pub(crate) struct QuantityArrayCodec;

impl Serializer for QuantityArrayCodec {
    fn field_type(&self) -> TypeTag {
        TypeTag::QuantityArray
    }

    fn size(&self, value: &Value) -> Result<usize> {
        match value {
            Value::QuantityArray(a) => Ok(4 + units_wire_size(a.units()) + 8 * a.len()),
            _ => Err(wrong_shape(TypeTag::QuantityArray, value)),
        }
    }

    fn serialize(
        &self,
        value: &Value,
        buf: &mut BytesMut,
        order: ByteOrder,
        cursor: &mut Cursor,
    ) -> Result<()> {
        let a = match value {
            Value::QuantityArray(a) => a,
            _ => return Err(wrong_shape(TypeTag::QuantityArray, value)),
        };
        if a.len() > u32::MAX as usize {
            return Err(WireError::constraint(
                "quantity array count overflows the u32 field".to_string(),
            ));
        }
        order.put_u32(buf, a.len() as u32);
        cursor.advance(4);
        for unit in a.units() {
            unit.encode(buf, order)?;
            cursor.advance(unit.wire_size());
        }
        for v in a.values() {
            order.put_f64(buf, *v);
        }
        cursor.advance(8 * a.len());
        Ok(())
    }

    fn deserialize(&self, buf: &mut &[u8], order: ByteOrder, cursor: &mut Cursor) -> Result<Value> {
        check_remaining(buf, 4)?;
        let count = order.get_u32(buf) as usize;
        cursor.advance(4);
        if count == 0 {
            return Err(WireError::shape("zero-length quantity array on the wire"));
        }
        let units = read_units(buf, order, count, cursor)?;
        let values = read_doubles(buf, order, count, cursor)?;
        Ok(Value::QuantityArray(QuantityArray::new(units, values)?))
    }
}

/// Unit-tagged matrix with one unit pair per column
pub(crate) struct QuantityMatrixCodec;

impl Serializer for QuantityMatrixCodec {
    fn field_type(&self) -> TypeTag {
        TypeTag::QuantityMatrix
    }

    fn size(&self, value: &Value) -> Result<usize> {
        match value {
            Value::QuantityMatrix(m) => {
                Ok(8 + units_wire_size(m.units()) + 8 * m.data().rows() * m.data().cols())
            }
            _ => Err(wrong_shape(TypeTag::QuantityMatrix, value)),
        }
    }

    fn serialize(
        &self,
        value: &Value,
        buf: &mut BytesMut,
        order: ByteOrder,
        cursor: &mut Cursor,
    ) -> Result<()> {
        let m = match value {
            Value::QuantityMatrix(m) => m,
            _ => return Err(wrong_shape(TypeTag::QuantityMatrix, value)),
        };
        let (rows, cols) = (m.data().rows(), m.data().cols());
        if rows > u32::MAX as usize || cols > u32::MAX as usize {
            return Err(WireError::constraint(
                "quantity matrix shape overflows the u32 header fields".to_string(),
            ));
        }
        order.put_u32(buf, rows as u32);
        order.put_u32(buf, cols as u32);
        cursor.advance(8);
        for unit in m.units() {
            unit.encode(buf, order)?;
            cursor.advance(unit.wire_size());
        }
        for v in m.data().data() {
            order.put_f64(buf, *v);
        }
        cursor.advance(8 * rows * cols);
        Ok(())
    }

    fn deserialize(&self, buf: &mut &[u8], order: ByteOrder, cursor: &mut Cursor) -> Result<Value> {
        check_remaining(buf, 8)?;
        let rows = order.get_u32(buf) as usize;
        let cols = order.get_u32(buf) as usize;
        cursor.advance(8);
        if rows == 0 || cols == 0 {
            return Err(WireError::shape(format!(
                "degenerate quantity matrix shape {}x{}",
                rows, cols
            )));
        }
        let count = rows
            .checked_mul(cols)
            .ok_or_else(|| WireError::constraint("matrix element count overflows usize".to_string()))?;
        let units = read_units(buf, order, cols, cursor)?;
        let values = read_doubles(buf, order, count, cursor)?;
        let data = Matrix::from_flat(rows, cols, values)?;
        Ok(Value::QuantityMatrix(QuantityMatrix::new(units, data)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::MONEY;

    fn roundtrip(codec: &dyn Serializer, value: Value, order: ByteOrder) -> Value {
        let mut buf = BytesMut::new();
        let mut cursor = Cursor::new();
        codec.serialize(&value, &mut buf, order, &mut cursor).unwrap();
        assert_eq!(cursor.position(), codec.size(&value).unwrap());

        let frozen = buf.freeze();
        let mut reader: &[u8] = &frozen;
        let mut cursor = Cursor::new();
        codec.deserialize(&mut reader, order, &mut cursor).unwrap()
    }

    #[test]
    fn test_quantity_scalar_roundtrip() {
        let v = Value::Quantity(Quantity::new(UnitTag::new(3, 12), 9.81));
        for order in [ByteOrder::Big, ByteOrder::Little] {
            assert_eq!(roundtrip(&QuantityCodec, v.clone(), order), v);
        }
    }

    #[test]
    fn test_money_quantity_is_wider() {
        let plain = Value::Quantity(Quantity::new(UnitTag::new(3, 12), 1.0));
        let money = Value::Quantity(Quantity::new(UnitTag::new(MONEY, 978), 1.0));
        assert_eq!(QuantityCodec.size(&plain).unwrap(), 2 + 8);
        assert_eq!(QuantityCodec.size(&money).unwrap(), 3 + 8);
        assert_eq!(roundtrip(&QuantityCodec, money.clone(), ByteOrder::Little), money);
    }

    #[test]
    fn test_quantity_array_units_precede_data() {
        let units = vec![UnitTag::new(1, 2), UnitTag::new(MONEY, 840)];
        let a = QuantityArray::new(units, vec![1.5, 2.5]).unwrap();
        let v = Value::QuantityArray(a);

        let mut buf = BytesMut::new();
        let mut cursor = Cursor::new();
        QuantityArrayCodec.serialize(&v, &mut buf, ByteOrder::Big, &mut cursor).unwrap();
        // count + (2-byte unit, 3-byte money unit) + two doubles
        assert_eq!(buf.len(), 4 + 2 + 3 + 16);
        assert_eq!(&buf[..9], &[0, 0, 0, 2, 1, 2, MONEY, 0x03, 0x48]);

        assert_eq!(roundtrip(&QuantityArrayCodec, v.clone(), ByteOrder::Big), v);
    }

    #[test]
    fn test_quantity_matrix_one_unit_per_column() {
        let units = vec![UnitTag::new(1, 2), UnitTag::new(4, 7), UnitTag::new(MONEY, 840)];
        let data = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let v = Value::QuantityMatrix(QuantityMatrix::new(units, data).unwrap());

        let size = QuantityMatrixCodec.size(&v).unwrap();
        // header + (2 + 2 + 3) unit bytes + 6 doubles
        assert_eq!(size, 8 + 7 + 48);
        for order in [ByteOrder::Big, ByteOrder::Little] {
            assert_eq!(roundtrip(&QuantityMatrixCodec, v.clone(), order), v);
        }
    }
}
