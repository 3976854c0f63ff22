use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::{ensure_square, LinalgError};
use crate::traits::LinalgScalar;

/// Substitution kernels a factorization provides to [`Solver`].
///
/// Implementors only solve a single right-hand side held in a slice; the
/// vector, matrix, transpose and inverse entry points are layered on top by
/// [`Solver`] so every decomposition shares the same shape checks and
/// column/row iteration.
pub trait SolveCore<T: LinalgScalar> {
    /// Rows of the factored matrix.
    fn nrows(&self) -> usize;

    /// Columns of the factored matrix.
    fn ncols(&self) -> usize;

    /// Solve `A x = b`.
    ///
    /// `rhs` holds `b` (length `nrows`) on entry; on success its first `ncols`
    /// entries hold `x`.
    fn solve_in_place(&self, rhs: &mut [T]) -> Result<(), LinalgError>;

    /// Solve `Aᵀ x = b` for a square `A`. `rhs` holds `b` on entry and `x` on
    /// success.
    fn solve_transpose_in_place(&self, rhs: &mut [T]) -> Result<(), LinalgError>;
}

/// Borrowed view over a factorization that solves against its stored factors.
///
/// A `Solver` owns nothing: it is a `Copy` handle around `&S`, so it cannot
/// outlive the decomposition, and it is `Send + Sync` whenever the
/// decomposition is `Sync`. Any number of threads may solve through it at
/// once; re-factorizing needs `&mut` and therefore waits for every view to be
/// dropped.
///
/// ```
/// use dense_factor::{DynMatrix, DynVector};
///
/// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 3.0]);
/// let chol = a.cholesky().unwrap();
/// let solver = chol.solver();
///
/// let x = solver.solve(&DynVector::from_slice(&[8.0, 7.0])).unwrap();
/// let ax = &a * &x;
/// assert!((ax[0] - 8.0).abs() < 1e-12);
/// assert!((ax[1] - 7.0).abs() < 1e-12);
/// ```
pub struct Solver<'a, T, S: ?Sized> {
    inner: &'a S,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S: ?Sized> Clone for Solver<'_, T, S> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S: ?Sized> Copy for Solver<'_, T, S> {}

impl<T, S: ?Sized + core::fmt::Debug> core::fmt::Debug for Solver<'_, T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Solver").field("inner", &self.inner).finish()
    }
}

impl<'a, T: LinalgScalar, S: SolveCore<T> + ?Sized> Solver<'a, T, S> {
    #[inline]
    pub fn new(inner: &'a S) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Solve `A x = b` for a single right-hand side.
    pub fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        let (m, n) = (self.inner.nrows(), self.inner.ncols());
        if b.len() != m {
            return Err(LinalgError::DimensionMismatch {
                expected: (m, 1),
                got: (b.len(), 1),
            });
        }
        let mut x = b.as_slice().to_vec();
        self.inner.solve_in_place(&mut x)?;
        x.truncate(n);
        Ok(DynVector::from_vec(x))
    }

    /// Solve `A X = B`, one column of `B` at a time.
    pub fn solve_matrix(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>, LinalgError> {
        let (m, n) = (self.inner.nrows(), self.inner.ncols());
        if b.nrows() != m {
            return Err(LinalgError::DimensionMismatch {
                expected: (m, b.ncols()),
                got: b.shape(),
            });
        }
        let mut out = DynMatrix::zeros(n, b.ncols(), T::zero());
        let mut buf = Vec::with_capacity(m);
        for j in 0..b.ncols() {
            buf.clear();
            buf.extend_from_slice(b.col_slice(j));
            self.inner.solve_in_place(&mut buf)?;
            out.col_slice_mut(j).copy_from_slice(&buf[..n]);
        }
        Ok(out)
    }

    /// Solve `X A = B`, one row of `B` at a time.
    pub fn solve_transpose(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>, LinalgError> {
        let (m, n) = (self.inner.nrows(), self.inner.ncols());
        ensure_square(m, n)?;
        if b.ncols() != n {
            return Err(LinalgError::DimensionMismatch {
                expected: (b.nrows(), n),
                got: b.shape(),
            });
        }
        let mut out = DynMatrix::zeros(b.nrows(), n, T::zero());
        let mut buf = Vec::with_capacity(n);
        for i in 0..b.nrows() {
            buf.clear();
            buf.extend((0..n).map(|j| b[(i, j)]));
            self.inner.solve_transpose_in_place(&mut buf)?;
            for (j, &v) in buf.iter().enumerate() {
                out[(i, j)] = v;
            }
        }
        Ok(out)
    }

    /// `A⁻¹`, by solving against the identity.
    pub fn inverse(&self) -> Result<DynMatrix<T>, LinalgError> {
        let n = self.inner.nrows();
        ensure_square(n, self.inner.ncols())?;
        self.solve_matrix(&DynMatrix::eye(n, T::zero()))
    }
}
