use crate::linalg::{CholeskyDecomposition, LinalgError, LuDecomposition, QrDecomposition};
use crate::traits::LinalgScalar;

use super::vector::DynVector;
use super::DynMatrix;

/// Convenience methods: factorize with default parameters.
impl<T: LinalgScalar> DynMatrix<T> {
    /// LU decomposition with partial pivoting.
    ///
    /// Only fails on shape (`nrows < ncols`); a singular matrix yields a
    /// decomposition whose [`is_nonsingular`](LuDecomposition::is_nonsingular)
    /// is `false`.
    pub fn lu(&self) -> Result<LuDecomposition<T>, LinalgError> {
        LuDecomposition::new(self)
    }

    /// Cholesky decomposition (`A = L * L^H`).
    ///
    /// For real matrices, this is the standard `A = L * L^T`.
    ///
    /// ```
    /// use dense_factor::DynMatrix;
    /// let spd = DynMatrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 3.0]);
    /// let chol = spd.cholesky().unwrap();
    /// let l = chol.l();
    /// let reconstructed = l * &l.transpose();
    /// assert!((reconstructed[(0, 0)] - 4.0).abs() < 1e-12);
    /// assert!((reconstructed[(1, 0)] - 2.0).abs() < 1e-12);
    /// ```
    pub fn cholesky(&self) -> Result<CholeskyDecomposition<T>, LinalgError> {
        CholeskyDecomposition::new(self)
    }

    /// QR decomposition by modified Gram-Schmidt (`nrows >= ncols`).
    pub fn qr(&self) -> Result<QrDecomposition<T>, LinalgError> {
        QrDecomposition::new(self)
    }

    /// Solve `Ax = b` for `x` via LU decomposition.
    ///
    /// ```
    /// use dense_factor::{DynMatrix, DynVector};
    /// let a = DynMatrix::from_rows(3, 3, &[
    ///     2.0_f64, 1.0, -1.0,
    ///     -3.0, -1.0, 2.0,
    ///     -2.0, 1.0, 2.0,
    /// ]);
    /// let b = DynVector::from_slice(&[8.0, -11.0, -3.0]);
    /// let x = a.solve(&b).unwrap();
    /// assert!((x[0] - 2.0).abs() < 1e-12);
    /// assert!((x[1] - 3.0).abs() < 1e-12);
    /// assert!((x[2] - (-1.0)).abs() < 1e-12);
    /// ```
    pub fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        self.lu()?.solve(b)
    }

    /// Matrix inverse via LU decomposition.
    ///
    /// ```
    /// use dense_factor::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 7.0, 2.0, 6.0]);
    /// let id = &a * &a.inverse().unwrap();
    /// assert!((id[(0, 0)] - 1.0).abs() < 1e-12);
    /// assert!(id[(0, 1)].abs() < 1e-12);
    /// ```
    pub fn inverse(&self) -> Result<Self, LinalgError> {
        self.lu()?.inverse()
    }

    /// Determinant via LU decomposition.
    pub fn det(&self) -> Result<T, LinalgError> {
        self.lu()?.det()
    }
}
