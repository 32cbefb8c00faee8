//! Scalar types storable in a compressed sparse matrix
//!
//! The compressed formats store boolean, 32/64-bit float and 32/64-bit
//! complex values. Reduction kernels operate on a float64 projection of the
//! stored values; complex values have no such projection, so reductions on
//! complex matrices report an unsupported-type error instead.

use num_complex::Complex;

/// Tag describing the element type of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    /// Boolean entries
    Bool,
    /// 32-bit floating point
    Float32,
    /// 64-bit floating point
    Float64,
    /// Complex with 32-bit components
    Complex64,
    /// Complex with 64-bit components
    Complex128,
}

impl DType {
    /// Whether the dtype is one of the complex types
    pub fn is_complex(self) -> bool {
        matches!(self, DType::Complex64 | DType::Complex128)
    }

    /// Whether the dtype is a real floating point type
    pub fn is_float(self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }
}

/// A scalar value storable in a compressed sparse matrix
///
/// Implemented for `bool`, `f32`, `f64`, `Complex<f32>` and `Complex<f64>`.
/// The trait carries the additive identity (the implicit-zero value), the
/// summation used when duplicate entries are combined, and the float64
/// projection used by the reduction kernels.
pub trait Scalar: Copy + PartialEq + Send + Sync + std::fmt::Debug + 'static {
    /// The runtime dtype tag for this scalar type
    const DTYPE: DType;

    /// The additive identity (the value of an implicit zero)
    fn zero() -> Self;

    /// Sum of two stored values, used when duplicates are combined
    fn combine(self, other: Self) -> Self;

    /// Projection to `f64` for the reduction kernels; `None` for complex
    fn to_real(self) -> Option<f64>;

    /// Whether the value equals the additive identity
    fn is_zero(self) -> bool {
        self == Self::zero()
    }
}

impl Scalar for bool {
    const DTYPE: DType = DType::Bool;

    fn zero() -> Self {
        false
    }

    fn combine(self, other: Self) -> Self {
        self | other
    }

    fn to_real(self) -> Option<f64> {
        Some(if self { 1.0 } else { 0.0 })
    }
}

macro_rules! impl_float_scalar {
    ($ty:ty, $dtype:expr) => {
        impl Scalar for $ty {
            const DTYPE: DType = $dtype;

            fn zero() -> Self {
                0.0
            }

            fn combine(self, other: Self) -> Self {
                self + other
            }

            fn to_real(self) -> Option<f64> {
                Some(self as f64)
            }
        }
    };
}

impl_float_scalar!(f32, DType::Float32);
impl_float_scalar!(f64, DType::Float64);

macro_rules! impl_complex_scalar {
    ($ty:ty, $dtype:expr) => {
        impl Scalar for Complex<$ty> {
            const DTYPE: DType = $dtype;

            fn zero() -> Self {
                Complex::new(0.0, 0.0)
            }

            fn combine(self, other: Self) -> Self {
                self + other
            }

            fn to_real(self) -> Option<f64> {
                None
            }
        }
    };
}

impl_complex_scalar!(f32, DType::Complex64);
impl_complex_scalar!(f64, DType::Complex128);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_predicates() {
        assert!(DType::Complex64.is_complex());
        assert!(DType::Complex128.is_complex());
        assert!(!DType::Float32.is_complex());
        assert!(DType::Float64.is_float());
        assert!(!DType::Bool.is_float());
    }

    #[test]
    fn test_bool_combine_is_or() {
        assert_eq!(true.combine(false), true);
        assert_eq!(false.combine(false), false);
    }

    #[test]
    fn test_real_projection() {
        assert_eq!(true.to_real(), Some(1.0));
        assert_eq!(2.5f32.to_real(), Some(2.5));
        assert_eq!(Complex::<f64>::new(1.0, 2.0).to_real(), None);
    }
}
