use alloc::vec;

use num_traits::Zero;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::par::{self, Parallelism};
use crate::linalg::solver::{SolveCore, Solver};
use crate::linalg::{ensure_square, LinalgError};
use crate::traits::{LinalgScalar, MatrixMut};

/// Trailing updates narrower than this many columns never fork.
const PARALLEL_MIN_WIDTH: usize = 200;

/// Cholesky decomposition in place: A = L * L^H.
///
/// For real matrices, L^H = L^T (standard Cholesky).
/// For complex matrices, this is the Hermitian Cholesky decomposition.
///
/// Left-looking over the pivots; after each pivot column is scaled, the
/// trailing lower triangle receives a rank-1 update that is split over
/// `parallelism`. On return the lower triangle of `a` holds L and the strict
/// upper triangle is zero.
///
/// The split needs the whole matrix as one column-major buffer
/// ([`MatrixMut::col_major_mut`]); other storage fails with
/// [`LinalgError::Unsupported`]. Use [`cholesky_in_place_generic`] for it.
pub fn cholesky_in_place<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
    parallelism: Parallelism,
) -> Result<(), LinalgError> {
    let n = a.nrows();
    ensure_square(n, a.ncols())?;
    let Some(data) = a.col_major_mut() else {
        return Err(LinalgError::Unsupported(
            "Cholesky rank-1 update needs contiguous column-major storage",
        ));
    };
    debug_assert_eq!(data.len(), n * n);

    let cores = parallelism.degree();
    let mut multipliers = vec![T::zero(); n];

    for ij in 0..n {
        let diag = data[ij * n + ij].re();
        if diag <= <T::Real as Zero>::zero() {
            log::debug!(target: "dense_factor", "Cholesky pivot {} is not positive", ij);
            return Err(LinalgError::NotPositiveDefinite { pivot: ij });
        }

        let l_jj = T::from_real(diag.lsqrt());
        data[ij * n + ij] = l_jj;
        multipliers[ij] = l_jj;
        for i in (ij + 1)..n {
            let v = data[ij * n + i] / l_jj;
            data[ij * n + i] = v;
            multipliers[i] = v;
        }

        let (_, trailing) = data.split_at_mut((ij + 1) * n);
        rank_one_update(trailing, n, ij + 1, n, &multipliers, cores);

        for i in (ij + 1)..n {
            data[i * n + ij] = T::zero();
        }
    }

    Ok(())
}

/// Where a trailing update over columns `first..limit` forks: the split
/// column and the core budget of each half, or `None` to run sequentially.
///
/// Forks only with more than one core and more than [`PARALLEL_MIN_WIDTH`]
/// columns. The cut sits one third of the way in and each half gets
/// `cores / 2`.
fn split_point(first: usize, limit: usize, cores: usize) -> Option<(usize, usize)> {
    let width = limit - first;
    if cores > 1 && width > PARALLEL_MIN_WIDTH {
        Some((first + width / 3, cores / 2))
    } else {
        None
    }
}

/// `A[i, j] -= m[i] * conj(m[j])` for `j` in `first..limit`, `i >= j`.
///
/// `block` holds exactly columns `first..limit` of an `n`-row column-major
/// matrix. The range is cut by [`split_point`] and both parts run
/// concurrently on disjoint sub-slices, so the join is the only
/// synchronization.
fn rank_one_update<T: LinalgScalar>(
    block: &mut [T],
    n: usize,
    first: usize,
    limit: usize,
    m: &[T],
    cores: usize,
) {
    if let Some((split, half)) = split_point(first, limit, cores) {
        log::trace!(
            target: "dense_factor",
            "rank-1 update split {}..{}..{} over {} cores",
            first,
            split,
            limit,
            cores
        );
        let (left, right) = block.split_at_mut((split - first) * n);
        par::join(
            || rank_one_update(left, n, first, split, m, half),
            || rank_one_update(right, n, split, limit, m, half),
        );
        return;
    }

    for (col, j) in block.chunks_exact_mut(n).zip(first..limit) {
        let mj = m[j].conj();
        for i in j..n {
            col[i] = col[i] - m[i] * mj;
        }
    }
}

/// Sequential Cholesky through [`MatrixMut`] element access only.
///
/// Same result as [`cholesky_in_place`] for any storage, including storage
/// that cannot expose a column-major buffer.
pub fn cholesky_in_place_generic<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
) -> Result<(), LinalgError> {
    let n = a.nrows();
    ensure_square(n, a.ncols())?;

    for ij in 0..n {
        let diag = a.get(ij, ij).re();
        if diag <= <T::Real as Zero>::zero() {
            log::debug!(target: "dense_factor", "Cholesky pivot {} is not positive", ij);
            return Err(LinalgError::NotPositiveDefinite { pivot: ij });
        }
        let l_jj = T::from_real(diag.lsqrt());
        *a.get_mut(ij, ij) = l_jj;
        for i in (ij + 1)..n {
            let v = *a.get(i, ij) / l_jj;
            *a.get_mut(i, ij) = v;
        }

        for j in (ij + 1)..n {
            let mj = a.get(j, ij).conj();
            for i in j..n {
                let v = *a.get(i, j) - *a.get(i, ij) * mj;
                *a.get_mut(i, j) = v;
            }
            *a.get_mut(ij, j) = T::zero();
        }
    }

    Ok(())
}

/// Options for [`CholeskyDecomposition::with_params`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CholeskyParams {
    /// Core budget for the trailing rank-1 updates.
    pub parallelism: Parallelism,
}

/// Cholesky decomposition of a dynamically-sized (Hermitian) positive-definite matrix.
///
/// Stores the lower triangular factor L where `A = L * L^H`.
///
/// # Example
///
/// ```
/// use dense_factor::{DynMatrix, DynVector};
///
/// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 3.0]);
/// let chol = a.cholesky().unwrap();
///
/// let b = DynVector::from_slice(&[8.0, 7.0]);
/// let x = chol.solve(&b).unwrap();
/// assert!((x[0] - 1.25).abs() < 1e-12);
/// assert!((x[1] - 1.5).abs() < 1e-12);
/// assert!((chol.det() - 8.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition<T> {
    l: DynMatrix<T>,
    params: CholeskyParams,
}

impl<T: LinalgScalar> CholeskyDecomposition<T> {
    /// Decompose a (Hermitian) positive-definite matrix.
    pub fn new(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        Self::with_params(a, CholeskyParams::default())
    }

    /// Decompose a private copy of `a`.
    pub fn with_params(a: &DynMatrix<T>, params: CholeskyParams) -> Result<Self, LinalgError> {
        Self::from_owned(a.clone(), params)
    }

    /// Decompose `a`, reusing its storage for the factor.
    pub fn from_owned(mut a: DynMatrix<T>, params: CholeskyParams) -> Result<Self, LinalgError> {
        cholesky_in_place(&mut a, params.parallelism)?;
        Ok(Self { l: a, params })
    }

    /// Re-run the factorization on a matrix of the same size.
    ///
    /// On failure the previous factor is kept.
    pub fn factorize(&mut self, a: &DynMatrix<T>) -> Result<(), LinalgError> {
        if a.shape() != self.l.shape() {
            return Err(LinalgError::DimensionMismatch {
                expected: self.l.shape(),
                got: a.shape(),
            });
        }
        let mut l = a.clone();
        cholesky_in_place(&mut l, self.params.parallelism)?;
        self.l = l;
        Ok(())
    }

    /// The lower triangular factor (zeros above the diagonal).
    #[inline]
    pub fn l(&self) -> &DynMatrix<T> {
        &self.l
    }

    /// Borrowed solver over the stored factor.
    #[inline]
    pub fn solver(&self) -> Solver<'_, T, Self> {
        Solver::new(self)
    }

    /// Solve A*x = b for x, where A = L*L^H.
    pub fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        self.solver().solve(b)
    }

    /// Solve `A X = B`.
    pub fn solve_matrix(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>, LinalgError> {
        self.solver().solve_matrix(b)
    }

    /// Solve `X A = B`.
    pub fn solve_transpose(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>, LinalgError> {
        self.solver().solve_transpose(b)
    }

    /// Matrix inverse using the Cholesky factorization.
    pub fn inverse(&self) -> Result<DynMatrix<T>, LinalgError> {
        self.solver().inverse()
    }

    /// Determinant: det(A) = product(L\[i\]\[i\])^2.
    pub fn det(&self) -> T {
        let mut prod = T::one();
        for i in 0..self.l.nrows() {
            prod = prod * self.l[(i, i)];
        }
        prod * prod
    }

    /// Log-determinant: ln(det(A)) = 2 * sum(ln(L\[i\]\[i\])).
    pub fn ln_det(&self) -> T {
        let mut sum = T::zero();
        for i in 0..self.l.nrows() {
            sum = sum + self.l[(i, i)].lln();
        }
        sum + sum
    }

    /// `L * L^H`.
    pub fn reconstruct(&self) -> DynMatrix<T> {
        &self.l * &self.l.adjoint()
    }
}

impl<T: LinalgScalar> SolveCore<T> for CholeskyDecomposition<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.l.nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.l.ncols()
    }

    fn solve_in_place(&self, rhs: &mut [T]) -> Result<(), LinalgError> {
        let n = self.l.nrows();
        debug_assert_eq!(rhs.len(), n);

        // L y = b
        for k in 0..n {
            let col = self.l.col_slice(k);
            let y = rhs[k] / col[k];
            rhs[k] = y;
            for i in (k + 1)..n {
                rhs[i] = rhs[i] - col[i] * y;
            }
        }

        // L^H x = y
        for i in (0..n).rev() {
            let col = self.l.col_slice(i);
            let mut sum = rhs[i];
            for k in (i + 1)..n {
                sum = sum - col[k].conj() * rhs[k];
            }
            rhs[i] = sum / col[i].conj();
        }

        Ok(())
    }

    fn solve_transpose_in_place(&self, rhs: &mut [T]) -> Result<(), LinalgError> {
        // A^T = conj(A) for Hermitian A.
        for x in rhs.iter_mut() {
            *x = x.conj();
        }
        self.solve_in_place(rhs)?;
        for x in rhs.iter_mut() {
            *x = x.conj();
        }
        Ok(())
    }
}
