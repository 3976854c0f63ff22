use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

#[cfg(feature = "complex")]
use num_complex::Complex;

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for real floating-point matrix elements.
///
/// Implies `LinalgScalar<Real = Self>` since real floats are their own real type.
pub trait FloatScalar: Scalar + Float + LinalgScalar<Real = Self> {}

impl<T: Scalar + Float + LinalgScalar<Real = T>> FloatScalar for T {}

/// Arithmetic capability required by the decompositions.
///
/// Covers both real floats (`f32`, `f64`) and complex numbers (`Complex<f32>`,
/// `Complex<f64>`). Every algorithm in [`crate::linalg`] is written once
/// against this trait; supporting another scalar type (a fixed-point decimal,
/// say) only takes one more impl.
pub trait LinalgScalar: Scalar + Send + Sync {
    /// The real component type (`Self` for reals, `T` for `Complex<T>`).
    type Real: FloatScalar;

    /// Absolute value / modulus: `|z|` for complex, `.abs()` for real.
    fn modulus(self) -> Self::Real;

    /// Complex conjugate (identity for reals).
    fn conj(self) -> Self;

    /// Real part.
    fn re(self) -> Self::Real;

    /// Square root.
    fn lsqrt(self) -> Self;

    /// Natural logarithm.
    fn lln(self) -> Self;

    /// Machine epsilon of the underlying real type.
    fn lepsilon() -> Self::Real;

    /// Promote a real value into `Self`.
    fn from_real(r: Self::Real) -> Self;

    /// Squared modulus, `z * conj(z)`, without the square root.
    #[inline]
    fn modulus_sqr(self) -> Self::Real {
        (self * self.conj()).re()
    }
}

macro_rules! impl_linalg_scalar_real {
    ($($t:ty),*) => {
        $(
            impl LinalgScalar for $t {
                type Real = $t;

                #[inline] fn modulus(self) -> $t { Float::abs(self) }
                #[inline] fn conj(self) -> $t { self }
                #[inline] fn re(self) -> $t { self }
                #[inline] fn lsqrt(self) -> $t { Float::sqrt(self) }
                #[inline] fn lln(self) -> $t { Float::ln(self) }
                #[inline] fn lepsilon() -> $t { <$t as Float>::epsilon() }
                #[inline] fn from_real(r: $t) -> $t { r }
                #[inline] fn modulus_sqr(self) -> $t { self * self }
            }
        )*
    };
}

impl_linalg_scalar_real!(f32, f64);

#[cfg(feature = "complex")]
impl<T: FloatScalar> LinalgScalar for Complex<T> {
    type Real = T;

    #[inline]
    fn modulus(self) -> T {
        self.norm()
    }

    #[inline]
    fn conj(self) -> Self {
        Complex::conj(&self)
    }

    #[inline]
    fn re(self) -> T {
        self.re
    }

    #[inline]
    fn lsqrt(self) -> Self {
        self.sqrt()
    }

    #[inline]
    fn lln(self) -> Self {
        self.ln()
    }

    #[inline]
    fn lepsilon() -> T {
        T::epsilon()
    }

    #[inline]
    fn from_real(r: T) -> Self {
        Complex::new(r, T::zero())
    }

    #[inline]
    fn modulus_sqr(self) -> T {
        self.norm_sqr()
    }
}

/// Read-only access to a matrix-like type.
///
/// The factorization kernels are written against this trait so they work on
/// any storage, not only [`DynMatrix`](crate::DynMatrix).
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling
/// in-place algorithms (Cholesky, LU, Gram-Schmidt) to work generically.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// The whole matrix as one contiguous column-major buffer, if the storage
    /// has one. Kernels that split the buffer across threads need this.
    #[inline]
    fn col_major_mut(&mut self) -> Option<&mut [T]> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_modulus_and_conj() {
        assert_eq!((-3.0_f64).modulus(), 3.0);
        assert_eq!(2.5_f32.conj(), 2.5);
        assert_eq!((-4.0_f64).modulus_sqr(), 16.0);
        assert_eq!(9.0_f64.lsqrt(), 3.0);
    }

    #[cfg(feature = "complex")]
    #[test]
    fn complex_modulus_and_conj() {
        let z = Complex::new(3.0_f64, 4.0);
        assert_eq!(z.modulus(), 5.0);
        assert_eq!(z.modulus_sqr(), 25.0);
        assert_eq!(LinalgScalar::conj(z), Complex::new(3.0, -4.0));
        assert_eq!(LinalgScalar::re(z), 3.0);
        assert_eq!(<Complex<f64> as LinalgScalar>::from_real(2.0), Complex::new(2.0, 0.0));
    }
}
