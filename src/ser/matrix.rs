//! Shape-prefixed primitive matrix serializers
//!
//! Wire format:
//! ```text
//! rows: u32
//! cols: u32
//! elements[rows * cols]   # row-major, no padding
//! ```
//!
//! Matrices are rectangular by construction ([`Matrix`] cannot be built
//! jagged); zero rows or columns are still re-checked here so nothing is
//! written for a degenerate shape arriving from the wire either.

use bytes::BytesMut;

use crate::cursor::Cursor;
use crate::error::{Result, WireError};
use crate::order::ByteOrder;
use crate::tag::TypeTag;
use crate::value::{Matrix, Value};

use super::{check_remaining, wrong_shape, Serializer};

pub(crate) struct MatrixCodec {
    tag: TypeTag,
}

impl MatrixCodec {
    pub(crate) const fn new(tag: TypeTag) -> Self {
        Self { tag }
    }

    fn shape_of(&self, value: &Value) -> Result<(usize, usize)> {
        let (rows, cols) = match (self.tag, value) {
            (TypeTag::Int8Matrix, Value::I8Matrix(m)) => (m.rows(), m.cols()),
            (TypeTag::Int16Matrix, Value::I16Matrix(m)) => (m.rows(), m.cols()),
            (TypeTag::Int32Matrix, Value::I32Matrix(m)) => (m.rows(), m.cols()),
            (TypeTag::Int64Matrix, Value::I64Matrix(m)) => (m.rows(), m.cols()),
            (TypeTag::Float32Matrix, Value::F32Matrix(m)) => (m.rows(), m.cols()),
            (TypeTag::Float64Matrix, Value::F64Matrix(m)) => (m.rows(), m.cols()),
            _ => return Err(wrong_shape(self.tag, value)),
        };
        if rows == 0 || cols == 0 {
            return Err(WireError::shape(format!("degenerate matrix shape {}x{}", rows, cols)));
        }
        if rows > u32::MAX as usize || cols > u32::MAX as usize {
            return Err(WireError::constraint(
                "matrix shape overflows the u32 header fields".to_string(),
            ));
        }
        Ok((rows, cols))
    }
}

impl Serializer for MatrixCodec {
    fn field_type(&self) -> TypeTag {
        self.tag
    }

    fn size(&self, value: &Value) -> Result<usize> {
        let (rows, cols) = self.shape_of(value)?;
        Ok(8 + self.tag.element_size() * rows * cols)
    }

    fn serialize(
        &self,
        value: &Value,
        buf: &mut BytesMut,
        order: ByteOrder,
        cursor: &mut Cursor,
    ) -> Result<()> {
        let (rows, cols) = self.shape_of(value)?;
        order.put_u32(buf, rows as u32);
        order.put_u32(buf, cols as u32);
        cursor.advance(8);

        match (self.tag, value) {
            (TypeTag::Int8Matrix, Value::I8Matrix(m)) => {
                for x in m.data() {
                    order.put_i8(buf, *x);
                }
            }
            (TypeTag::Int16Matrix, Value::I16Matrix(m)) => {
                for x in m.data() {
                    order.put_i16(buf, *x);
                }
            }
            (TypeTag::Int32Matrix, Value::I32Matrix(m)) => {
                for x in m.data() {
                    order.put_i32(buf, *x);
                }
            }
            (TypeTag::Int64Matrix, Value::I64Matrix(m)) => {
                for x in m.data() {
                    order.put_i64(buf, *x);
                }
            }
            (TypeTag::Float32Matrix, Value::F32Matrix(m)) => {
                for x in m.data() {
                    order.put_f32(buf, *x);
                }
            }
            (TypeTag::Float64Matrix, Value::F64Matrix(m)) => {
                for x in m.data() {
                    order.put_f64(buf, *x);
                }
            }
            _ => return Err(wrong_shape(self.tag, value)),
        }
        cursor.advance(self.tag.element_size() * rows * cols);
        Ok(())
    }

    fn deserialize(&self, buf: &mut &[u8], order: ByteOrder, cursor: &mut Cursor) -> Result<Value> {
        check_remaining(buf, 8)?;
        let rows = order.get_u32(buf) as usize;
        let cols = order.get_u32(buf) as usize;
        cursor.advance(8);
        if rows == 0 || cols == 0 {
            return Err(WireError::shape(format!("degenerate matrix shape {}x{}", rows, cols)));
        }
        let count = rows
            .checked_mul(cols)
            .ok_or_else(|| WireError::constraint("matrix element count overflows usize".to_string()))?;
        let body = count
            .checked_mul(self.tag.element_size())
            .ok_or_else(|| WireError::constraint("matrix body size overflows usize".to_string()))?;
        check_remaining(buf, body)?;

        let value = match self.tag {
            TypeTag::Int8Matrix => Value::I8Matrix(Matrix::from_flat(
                rows,
                cols,
                (0..count).map(|_| order.get_i8(buf)).collect(),
            )?),
            TypeTag::Int16Matrix => Value::I16Matrix(Matrix::from_flat(
                rows,
                cols,
                (0..count).map(|_| order.get_i16(buf)).collect(),
            )?),
            TypeTag::Int32Matrix => Value::I32Matrix(Matrix::from_flat(
                rows,
                cols,
                (0..count).map(|_| order.get_i32(buf)).collect(),
            )?),
            TypeTag::Int64Matrix => Value::I64Matrix(Matrix::from_flat(
                rows,
                cols,
                (0..count).map(|_| order.get_i64(buf)).collect(),
            )?),
            TypeTag::Float32Matrix => Value::F32Matrix(Matrix::from_flat(
                rows,
                cols,
                (0..count).map(|_| order.get_f32(buf)).collect(),
            )?),
            TypeTag::Float64Matrix => Value::F64Matrix(Matrix::from_flat(
                rows,
                cols,
                (0..count).map(|_| order.get_f64(buf)).collect(),
            )?),
            other => return Err(wrong_shape(other, &Value::I8(0))),
        };
        cursor.advance(body);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(codec: &MatrixCodec, value: Value, order: ByteOrder) -> Value {
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
    fn test_1x1_matrix() {
        let codec = MatrixCodec::new(TypeTag::Float64Matrix);
        let v = Value::F64Matrix(Matrix::from_rows(vec![vec![4.25]]).unwrap());
        assert_eq!(codec.size(&v).unwrap(), 8 + 8);
        assert_eq!(roundtrip(&codec, v.clone(), ByteOrder::Big), v);
    }

    #[test]
    fn test_rectangular_roundtrip_both_orders() {
        let codec = MatrixCodec::new(TypeTag::Int32Matrix);
        let v = Value::I32Matrix(Matrix::from_rows(vec![vec![1, 2, 3], vec![-4, -5, -6]]).unwrap());
        for order in [ByteOrder::Big, ByteOrder::Little] {
            assert_eq!(roundtrip(&codec, v.clone(), order), v);
        }
    }

    #[test]
    fn test_zero_shape_from_wire_rejected() {
        let codec = MatrixCodec::new(TypeTag::Int32Matrix);
        let mut reader: &[u8] = &[0, 0, 0, 0, 0, 0, 0, 3];
        let mut cursor = Cursor::new();
        let err = codec.deserialize(&mut reader, ByteOrder::Big, &mut cursor).unwrap_err();
        assert!(matches!(err, WireError::ShapeViolation { .. }));
    }
}
