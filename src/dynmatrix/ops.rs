use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Add, Mul, Neg, Sub};

use crate::traits::Scalar;

use super::{DynMatrix, DynVector};

// ── Element-wise addition / subtraction ─────────────────────────────

macro_rules! impl_elementwise {
    ($trait:ident, $method:ident, $op:tt, $sym:literal) => {
        impl<T: Scalar> $trait<&DynMatrix<T>> for &DynMatrix<T> {
            type Output = DynMatrix<T>;

            fn $method(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
                assert_eq!(
                    (self.nrows, self.ncols),
                    (rhs.nrows, rhs.ncols),
                    "dimension mismatch: {}x{} {} {}x{}",
                    self.nrows, self.ncols, $sym, rhs.nrows, rhs.ncols,
                );
                let data = self
                    .data
                    .iter()
                    .zip(rhs.data.iter())
                    .map(|(&a, &b)| a $op b)
                    .collect();
                DynMatrix {
                    data,
                    nrows: self.nrows,
                    ncols: self.ncols,
                }
            }
        }

        impl<T: Scalar> $trait for DynMatrix<T> {
            type Output = DynMatrix<T>;

            fn $method(self, rhs: DynMatrix<T>) -> DynMatrix<T> {
                &self $op &rhs
            }
        }
    };
}

impl_elementwise!(Add, add, +, "+");
impl_elementwise!(Sub, sub, -, "-");

impl<T: Scalar> Neg for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn neg(self) -> DynMatrix<T> {
        let data = self.data.iter().map(|&a| T::zero() - a).collect();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

// ── Matrix multiplication: (M×N) * (N×P) → (M×P) ──────────────────

impl<T: Scalar> Mul<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(
            self.ncols, rhs.nrows,
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let m = self.nrows;
        let n = self.ncols;
        let p = rhs.ncols;
        let mut data = vec![T::zero(); m * p];
        // Column-major jki loop: the inner update walks contiguous columns.
        for j in 0..p {
            let out = &mut data[j * m..(j + 1) * m];
            for k in 0..n {
                let b_kj = rhs.data[j * n + k];
                let a_col = &self.data[k * m..(k + 1) * m];
                for (o, &a) in out.iter_mut().zip(a_col) {
                    *o = *o + a * b_kj;
                }
            }
        }
        DynMatrix {
            data,
            nrows: m,
            ncols: p,
        }
    }
}

impl<T: Scalar> Mul for DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: DynMatrix<T>) -> DynMatrix<T> {
        &self * &rhs
    }
}

impl<T: Scalar> Mul<&DynVector<T>> for &DynMatrix<T> {
    type Output = DynVector<T>;

    fn mul(self, rhs: &DynVector<T>) -> DynVector<T> {
        assert_eq!(
            self.ncols,
            rhs.len(),
            "dimension mismatch: {}x{} * {}",
            self.nrows,
            self.ncols,
            rhs.len(),
        );
        let mut out: Vec<T> = vec![T::zero(); self.nrows];
        for k in 0..self.ncols {
            let x = rhs[k];
            for (o, &a) in out.iter_mut().zip(self.col_slice(k)) {
                *o = *o + a * x;
            }
        }
        DynVector::from_vec(out)
    }
}

impl<T: Scalar> Mul<T> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: T) -> DynMatrix<T> {
        let data = self.data.iter().map(|&a| a * rhs).collect();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}
