//! Decoded-value model
//!
//! [`Value`] is a closed tagged union with exactly one variant per
//! [`TypeTag`], so the encode-side lookup (runtime shape to serializer)
//! is unambiguous and the decode side can reconstruct any field without
//! knowing element types ahead of time.
//!
//! Shape rules are enforced at construction: a [`Matrix`] is rectangular
//! by representation (row-major flat storage) and cannot be built with
//! zero rows, zero columns, or jagged input, so a shape violation is
//! caught before a single byte is written.

use crate::error::{Result, WireError};
use crate::tag::TypeTag;
use crate::unit::UnitTag;

/// Rectangular row-major matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Matrix<T> {
    /// Build from nested rows, rejecting empty or jagged input
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(WireError::shape("matrix with zero rows"));
        }
        let cols = rows[0].len();
        if cols == 0 {
            return Err(WireError::shape("matrix with zero columns"));
        }
        let mut data = Vec::with_capacity(rows.len() * cols);
        let row_count = rows.len();
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(WireError::shape(format!(
                    "jagged matrix: row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend(row);
        }
        Ok(Self { rows: row_count, cols, data })
    }

    /// Build from row-major flat storage
    pub fn from_flat(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if rows == 0 {
            return Err(WireError::shape("matrix with zero rows"));
        }
        if cols == 0 {
            return Err(WireError::shape("matrix with zero columns"));
        }
        if data.len() != rows * cols {
            return Err(WireError::shape(format!(
                "flat storage holds {} elements, shape {}x{} needs {}",
                data.len(),
                rows,
                cols,
                rows * cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major element slice
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn row(&self, r: usize) -> &[T] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn get(&self, r: usize, c: usize) -> &T {
        &self.data[r * self.cols + c]
    }
}

/// Unit-tagged scalar: a double stored in its canonical unit plus the
/// code pair saying how to re-render it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    pub unit: UnitTag,
    pub value: f64,
}

impl Quantity {
    pub fn new(unit: UnitTag, value: f64) -> Self {
        Self { unit, value }
    }
}

/// Unit-tagged array: every position is its own column with its own
/// unit descriptor, written once ahead of the element block
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityArray {
    units: Vec<UnitTag>,
    values: Vec<f64>,
}

impl QuantityArray {
    pub fn new(units: Vec<UnitTag>, values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(WireError::shape("zero-length quantity array"));
        }
        if units.len() != values.len() {
            return Err(WireError::shape(format!(
                "{} unit descriptors for {} columns",
                units.len(),
                values.len()
            )));
        }
        Ok(Self { units, values })
    }

    pub fn units(&self) -> &[UnitTag] {
        &self.units
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Unit-tagged matrix: one unit descriptor per column, shared by every
/// row in that column
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityMatrix {
    units: Vec<UnitTag>,
    data: Matrix<f64>,
}

impl QuantityMatrix {
    pub fn new(units: Vec<UnitTag>, data: Matrix<f64>) -> Result<Self> {
        if units.len() != data.cols() {
            return Err(WireError::shape(format!(
                "{} unit descriptors for {} columns",
                units.len(),
                data.cols()
            )));
        }
        Ok(Self { units, data })
    }

    pub fn units(&self) -> &[UnitTag] {
        &self.units
    }

    pub fn data(&self) -> &Matrix<f64> {
        &self.data
    }
}

/// One decoded (or to-be-encoded) field
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Char8(char),
    Char16(char),
    Str8(String),
    Str16(String),
    I8Array(Vec<i8>),
    I16Array(Vec<i16>),
    I32Array(Vec<i32>),
    I64Array(Vec<i64>),
    F32Array(Vec<f32>),
    F64Array(Vec<f64>),
    I8Matrix(Matrix<i8>),
    I16Matrix(Matrix<i16>),
    I32Matrix(Matrix<i32>),
    I64Matrix(Matrix<i64>),
    F32Matrix(Matrix<f32>),
    F64Matrix(Matrix<f64>),
    Quantity(Quantity),
    QuantityArray(QuantityArray),
    QuantityMatrix(QuantityMatrix),
}

impl Value {
    /// The tag owning this value's runtime shape. Exactly one tag per
    /// variant, so encode-side serializer resolution is unambiguous.
    pub fn field_type(&self) -> TypeTag {
        match self {
            Value::I8(_) => TypeTag::Int8,
            Value::I16(_) => TypeTag::Int16,
            Value::I32(_) => TypeTag::Int32,
            Value::I64(_) => TypeTag::Int64,
            Value::F32(_) => TypeTag::Float32,
            Value::F64(_) => TypeTag::Float64,
            Value::Bool(_) => TypeTag::Bool,
            Value::Char8(_) => TypeTag::Char8,
            Value::Char16(_) => TypeTag::Char16,
            Value::Str8(_) => TypeTag::Str8,
            Value::Str16(_) => TypeTag::Str16,
            Value::I8Array(_) => TypeTag::Int8Array,
            Value::I16Array(_) => TypeTag::Int16Array,
            Value::I32Array(_) => TypeTag::Int32Array,
            Value::I64Array(_) => TypeTag::Int64Array,
            Value::F32Array(_) => TypeTag::Float32Array,
            Value::F64Array(_) => TypeTag::Float64Array,
            Value::I8Matrix(_) => TypeTag::Int8Matrix,
            Value::I16Matrix(_) => TypeTag::Int16Matrix,
            Value::I32Matrix(_) => TypeTag::Int32Matrix,
            Value::I64Matrix(_) => TypeTag::Int64Matrix,
            Value::F32Matrix(_) => TypeTag::Float32Matrix,
            Value::F64Matrix(_) => TypeTag::Float64Matrix,
            Value::Quantity(_) => TypeTag::Quantity,
            Value::QuantityArray(_) => TypeTag::QuantityArray,
            Value::QuantityMatrix(_) => TypeTag::QuantityMatrix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_from_rows() {
        let m = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.row(1), &[4, 5, 6]);
        assert_eq!(*m.get(0, 2), 3);
    }

    #[test]
    fn test_jagged_matrix_rejected() {
        let err = Matrix::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(err, WireError::ShapeViolation { .. }));
    }

    #[test]
    fn test_zero_shapes_rejected() {
        assert!(Matrix::<i32>::from_rows(vec![]).is_err());
        assert!(Matrix::from_rows(vec![Vec::<i32>::new()]).is_err());
        assert!(Matrix::<f64>::from_flat(0, 3, vec![]).is_err());
        assert!(Matrix::<f64>::from_flat(3, 0, vec![]).is_err());
    }

    #[test]
    fn test_quantity_array_column_count() {
        use crate::unit::UnitTag;
        let units = vec![UnitTag::new(1, 2)];
        assert!(QuantityArray::new(units, vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn test_field_type_is_total() {
        assert_eq!(Value::I32(5).field_type(), TypeTag::Int32);
        assert_eq!(Value::Str8("x".into()).field_type(), TypeTag::Str8);
        assert_eq!(Value::F64Array(vec![1.0]).field_type(), TypeTag::Float64Array);
    }
}
