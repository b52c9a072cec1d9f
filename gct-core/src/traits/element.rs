//! Matrix element type constraints for the GCTX store layout
//!
//! This module defines the trait that constrains what types can be
//! stored as matrix cells.

use crate::format::DataType;

/// Trait for types that can be stored as matrix cells
///
/// Cells are read in their stored type and widened to `f64` for the dense
/// output matrix.
pub trait MatrixElement: Copy + PartialEq {
    /// Get the DataType tag for this element type
    fn data_type() -> DataType;

    /// Convert to f64 for the output matrix
    fn to_f64(self) -> f64;
}

macro_rules! impl_matrix_element {
    ($type:ty, $variant:ident) => {
        impl MatrixElement for $type {
            fn data_type() -> DataType {
                DataType::$variant
            }

            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_matrix_element!(f32, F32);
impl_matrix_element!(f64, F64);
impl_matrix_element!(i32, I32);
impl_matrix_element!(i64, I64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_f64() {
        assert_eq!(2.5f32.to_f64(), 2.5);
        assert_eq!((-7i64).to_f64(), -7.0);
        assert_eq!(i32::MAX.to_f64(), 2147483647.0);
    }

    #[test]
    fn test_data_types() {
        assert_eq!(f32::data_type(), DataType::F32);
        assert_eq!(f64::data_type(), DataType::F64);
        assert_eq!(i32::data_type(), DataType::I32);
        assert_eq!(i64::data_type(), DataType::I64);
    }
}
