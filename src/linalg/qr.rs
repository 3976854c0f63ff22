use alloc::vec::Vec;

use num_traits::{NumCast, One, Zero};

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::solver::{SolveCore, Solver};
use crate::linalg::{ensure_square, LinalgError};
use crate::traits::{LinalgScalar, MatrixMut};

/// Thin QR decomposition by modified Gram-Schmidt, in place.
///
/// `q` enters holding the m×n input (`m >= n`) and leaves holding Q with
/// orthonormal columns. `r` (n×n) receives the upper-triangular R. Each
/// column is normalized as soon as it is reached and immediately projected
/// out of every later column.
///
/// For complex matrices the projections use `Q[:,k]^H * Q[:,j]`, so Q is
/// unitary in the thin sense (`Q^H * Q = I`).
///
/// Returns [`LinalgError::RankDeficient`] when a column's remaining norm is
/// exactly zero; `q` and `r` then hold a partial result.
pub fn mgs_in_place<T: LinalgScalar>(
    q: &mut impl MatrixMut<T>,
    r: &mut impl MatrixMut<T>,
) -> Result<(), LinalgError> {
    let m = q.nrows();
    let n = q.ncols();
    if m < n {
        return Err(LinalgError::DimensionMismatch {
            expected: (n, n),
            got: (m, n),
        });
    }
    assert!(
        r.nrows() == n && r.ncols() == n,
        "R must be {}x{}, got {}x{}",
        n,
        n,
        r.nrows(),
        r.ncols()
    );

    for j in 0..n {
        for i in 0..n {
            *r.get_mut(i, j) = T::zero();
        }
    }

    for k in 0..n {
        let mut norm_sq = <T::Real as Zero>::zero();
        for i in 0..m {
            norm_sq = norm_sq + q.get(i, k).modulus_sqr();
        }
        if norm_sq == <T::Real as Zero>::zero() {
            log::debug!(target: "dense_factor", "Gram-Schmidt column {} has zero norm", k);
            return Err(LinalgError::RankDeficient { column: k });
        }

        let norm = T::from_real(norm_sq.lsqrt());
        *r.get_mut(k, k) = norm;
        for i in 0..m {
            let v = *q.get(i, k) / norm;
            *q.get_mut(i, k) = v;
        }

        for j in (k + 1)..n {
            let mut dot = T::zero();
            for i in 0..m {
                dot = dot + q.get(i, k).conj() * *q.get(i, j);
            }
            *r.get_mut(k, j) = dot;
            for i in 0..m {
                let v = *q.get(i, j) - dot * *q.get(i, k);
                *q.get_mut(i, j) = v;
            }
        }
    }

    Ok(())
}

/// QR decomposition of a dynamically-sized matrix (M >= N).
///
/// Holds the thin Q (M × N) and the upper-triangular R (N × N). Solving with
/// a tall matrix gives the least-squares solution.
///
/// # Example
///
/// ```
/// use dense_factor::{DynMatrix, DynVector};
///
/// // Least-squares fit: y = c0 + c1*x to points (0,1), (1,2), (2,4)
/// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 0.0, 1.0, 1.0, 1.0, 2.0]);
/// let b = DynVector::from_slice(&[1.0, 2.0, 4.0]);
/// let x = a.qr().unwrap().solve(&b).unwrap();
/// assert!((x[0] - 5.0 / 6.0).abs() < 1e-10);
/// assert!((x[1] - 3.0 / 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct QrDecomposition<T> {
    q: DynMatrix<T>,
    r: DynMatrix<T>,
}

impl<T: LinalgScalar> QrDecomposition<T> {
    /// Decompose a matrix with at least as many rows as columns.
    pub fn new(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        check_tall(a)?;
        Self::from_owned(a.clone())
    }

    /// Decompose `a`, reusing its storage for Q.
    pub fn from_owned(mut a: DynMatrix<T>) -> Result<Self, LinalgError> {
        check_tall(&a)?;
        let n = a.ncols();
        let mut r = DynMatrix::zeros(n, n, T::zero());
        mgs_in_place(&mut a, &mut r)?;
        Ok(Self { q: a, r })
    }

    /// Re-run the factorization on a matrix of the same shape.
    ///
    /// On failure the previous factors are kept.
    pub fn factorize(&mut self, a: &DynMatrix<T>) -> Result<(), LinalgError> {
        if a.shape() != self.q.shape() {
            return Err(LinalgError::DimensionMismatch {
                expected: self.q.shape(),
                got: a.shape(),
            });
        }
        let mut q = a.clone();
        let mut r = DynMatrix::zeros(self.r.nrows(), self.r.ncols(), T::zero());
        mgs_in_place(&mut q, &mut r)?;
        self.q = q;
        self.r = r;
        Ok(())
    }

    /// The thin Q factor (M × N, orthonormal columns).
    #[inline]
    pub fn q(&self) -> &DynMatrix<T> {
        &self.q
    }

    /// The upper-triangular R factor (N × N).
    #[inline]
    pub fn r(&self) -> &DynMatrix<T> {
        &self.r
    }

    /// Product of `|R[i,i]|`: `|det(A)|` for square A, the volume spanned by
    /// the columns otherwise.
    pub fn abs_det(&self) -> T::Real {
        let mut prod = <T::Real as One>::one();
        for i in 0..self.r.nrows() {
            prod = prod * self.r[(i, i)].modulus();
        }
        prod
    }

    /// Whether every `|R[i,i]|` exceeds `max(m, n) * eps * max |R[i,i]|`.
    pub fn is_full_rank(&self) -> bool {
        let n = self.r.nrows();
        let diag: Vec<T::Real> = (0..n).map(|i| self.r[(i, i)].modulus()).collect();
        let largest = diag
            .iter()
            .copied()
            .fold(<T::Real as Zero>::zero(), |acc, d| if d > acc { d } else { acc });
        let dim = <T::Real as NumCast>::from(self.q.nrows().max(n))
            .unwrap_or_else(<T::Real as One>::one);
        let tol = dim * T::lepsilon() * largest;
        diag.iter().all(|&d| d > tol)
    }

    /// Borrowed solver over the stored factors.
    #[inline]
    pub fn solver(&self) -> Solver<'_, T, Self> {
        Solver::new(self)
    }

    /// Solve `A x = b`, in the least-squares sense when A is tall.
    pub fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        self.solver().solve(b)
    }

    /// Solve `A X = B` column by column, in the least-squares sense when A is tall.
    pub fn solve_matrix(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>, LinalgError> {
        self.solver().solve_matrix(b)
    }

    /// Solve `X A = B` for square A.
    pub fn solve_transpose(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>, LinalgError> {
        self.solver().solve_transpose(b)
    }

    /// Inverse of a square A.
    pub fn inverse(&self) -> Result<DynMatrix<T>, LinalgError> {
        self.solver().inverse()
    }

    /// `Q * R`.
    pub fn reconstruct(&self) -> DynMatrix<T> {
        &self.q * &self.r
    }
}

fn check_tall<T>(a: &DynMatrix<T>) -> Result<(), LinalgError> {
    let (m, n) = a.shape();
    if m < n {
        return Err(LinalgError::DimensionMismatch {
            expected: (n, n),
            got: (m, n),
        });
    }
    Ok(())
}

impl<T: LinalgScalar> SolveCore<T> for QrDecomposition<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.q.nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.q.ncols()
    }

    fn solve_in_place(&self, rhs: &mut [T]) -> Result<(), LinalgError> {
        let n = self.q.ncols();
        debug_assert_eq!(rhs.len(), self.q.nrows());

        // y = Q^H b
        let y: Vec<T> = (0..n)
            .map(|k| {
                self.q
                    .col_slice(k)
                    .iter()
                    .zip(rhs.iter())
                    .fold(T::zero(), |acc, (&qi, &bi)| acc + qi.conj() * bi)
            })
            .collect();
        rhs[..n].copy_from_slice(&y);

        // R x = y
        for col in (0..n).rev() {
            let r_col = self.r.col_slice(col);
            rhs[col] = rhs[col] / r_col[col];
            let x = rhs[col];
            for i in 0..col {
                rhs[i] = rhs[i] - r_col[i] * x;
            }
        }

        Ok(())
    }

    fn solve_transpose_in_place(&self, rhs: &mut [T]) -> Result<(), LinalgError> {
        let n = self.q.ncols();
        ensure_square(self.q.nrows(), n)?;
        debug_assert_eq!(rhs.len(), n);

        // A^T = R^T Q^T: forward through R^T, then x = conj(Q) z.
        for i in 0..n {
            let r_col = self.r.col_slice(i);
            let mut sum = rhs[i];
            for k in 0..i {
                sum = sum - r_col[k] * rhs[k];
            }
            rhs[i] = sum / r_col[i];
        }

        let x: Vec<T> = (0..n)
            .map(|i| {
                (0..n).fold(T::zero(), |acc, k| acc + self.q[(i, k)].conj() * rhs[k])
            })
            .collect();
        rhs.copy_from_slice(&x);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: &DynMatrix<f64>, b: &DynMatrix<f64>, tol: f64) {
        let diff = a.max_abs_diff(b);
        assert!(diff < tol, "max difference {} exceeds {}", diff, tol);
    }

    fn classic() -> DynMatrix<f64> {
        DynMatrix::from_rows(3, 3, &[12.0, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0])
    }

    #[test]
    fn gram_schmidt_classic_example() {
        let qr = classic().qr().unwrap();
        let expected_r =
            DynMatrix::from_rows(3, 3, &[14.0, 21.0, -14.0, 0.0, 175.0, -70.0, 0.0, 0.0, 35.0]);
        assert_near(qr.r(), &expected_r, 1e-10);

        let q = qr.q();
        assert!((q[(0, 0)] - 6.0 / 7.0).abs() < 1e-12);
        assert!((q[(2, 2)] - (-33.0 / 35.0)).abs() < 1e-12);
    }

    #[test]
    fn orthonormal_and_reconstructs() {
        let a = DynMatrix::from_rows(
            4,
            3,
            &[1.0, 2.0, 0.5, 3.0, -1.0, 2.0, 0.0, 4.0, 1.0, 2.0, 1.0, -3.0],
        );
        let qr = a.qr().unwrap();
        let q = qr.q();
        let r = qr.r();

        assert_near(&(&q.transpose() * q), &DynMatrix::eye(3, 0.0), 1e-12);
        assert_near(&qr.reconstruct(), &a, 1e-12);
        for i in 0..3 {
            assert!(r[(i, i)] > 0.0);
            for j in 0..i {
                assert_eq!(r[(i, j)], 0.0);
            }
        }
        assert!(qr.is_full_rank());
    }

    #[test]
    fn zero_column_is_rank_deficient() {
        let a = DynMatrix::from_rows(3, 2, &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(
            a.qr().unwrap_err(),
            LinalgError::RankDeficient { column: 0 }
        );
    }

    #[test]
    fn dependent_column_is_rank_deficient() {
        let a = DynMatrix::from_rows(4, 2, &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
        assert_eq!(
            a.qr().unwrap_err(),
            LinalgError::RankDeficient { column: 1 }
        );
    }

    #[test]
    fn nearly_dependent_is_not_full_rank() {
        let eps = f64::EPSILON;
        let a = DynMatrix::from_rows(4, 2, &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0 + eps]);
        let qr = a.qr().unwrap();
        assert!(!qr.is_full_rank());
        assert!((qr.abs_det() - 2.0 * eps).abs() < 1e-30);
    }

    #[test]
    fn wide_is_rejected_before_work() {
        let a = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(
            QrDecomposition::new(&a).unwrap_err(),
            LinalgError::DimensionMismatch {
                expected: (3, 3),
                got: (2, 3)
            }
        );
    }

    #[test]
    fn abs_det_matches_lu() {
        let a = classic();
        let qr = a.qr().unwrap();
        let det = a.det().unwrap();
        assert!((qr.abs_det() - det.abs()).abs() < 1e-6 * det.abs());
        assert!((qr.abs_det() - 85750.0).abs() < 1e-6);
    }

    #[test]
    fn square_solve_inverse_and_transpose() {
        let a = classic();
        let qr = a.qr().unwrap();

        let b = DynVector::from_slice(&[1.0, -2.0, 3.0]);
        let x = qr.solve(&b).unwrap();
        let ax = &a * &x;
        for i in 0..3 {
            assert!((ax[i] - b[i]).abs() < 1e-10, "residual[{}] = {}", i, ax[i] - b[i]);
        }

        let inv = qr.inverse().unwrap();
        assert_near(&(&a * &inv), &DynMatrix::eye(3, 0.0), 1e-10);

        let bt = DynMatrix::from_rows(1, 3, &[1.0, 2.0, 3.0]);
        let xt = qr.solve_transpose(&bt).unwrap();
        assert_near(&(&xt * &a), &bt, 1e-10);
    }

    #[test]
    fn tall_inverse_is_not_square() {
        let a = DynMatrix::from_rows(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        assert_eq!(
            a.qr().unwrap().inverse().unwrap_err(),
            LinalgError::NotSquare { nrows: 3, ncols: 2 }
        );
    }

    #[test]
    fn factorize_reuses_shape() {
        let mut qr = classic().qr().unwrap();
        let a = DynMatrix::from_rows(3, 3, &[2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0]);
        qr.factorize(&a).unwrap();
        assert_near(qr.q(), &DynMatrix::eye(3, 0.0), 1e-15);
        assert_near(qr.r(), &a, 1e-15);

        let zero = DynMatrix::zeros(3, 3, 0.0);
        assert!(qr.factorize(&zero).is_err());
        assert_near(qr.r(), &a, 1e-15);
    }
}
