use alloc::vec;
use alloc::vec::Vec;

use num_traits::{NumCast, Zero};

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::solver::{SolveCore, Solver};
use crate::linalg::{ensure_square, LinalgError};
use crate::traits::{LinalgScalar, MatrixMut};

/// Pivots with modulus below this are treated as zero.
pub const DEFAULT_SINGULARITY_THRESHOLD: f64 = 1e-12;

/// LU decomposition with partial pivoting, Crout column sweep, in place.
///
/// `a` is m×n with `m >= n`. On return it holds both factors packed together:
/// - Upper triangle (including diagonal): U
/// - Strict lower part: L (diagonal of L is implicitly 1)
///
/// `perm` (length m) receives the row permutation: row `i` of `L·U` is row
/// `perm[i]` of the input. Returns `true` if the number of row swaps was even.
///
/// The pivot of each column is the first row with the largest modulus. If
/// that modulus is below `threshold` the sweep stops and
/// [`LinalgError::Singular`] is returned; `a` and `perm` then hold the partial
/// factorization.
pub fn lu_crout_in_place<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
    perm: &mut [usize],
    threshold: T::Real,
) -> Result<bool, LinalgError> {
    let m = a.nrows();
    let n = a.ncols();
    if m < n {
        return Err(LinalgError::DimensionMismatch {
            expected: (n, n),
            got: (m, n),
        });
    }
    assert_eq!(m, perm.len(), "permutation slice length must match row count");

    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }

    let mut even = true;

    for col in 0..n {
        // Upper part of the column: the U entries above the diagonal.
        for row in 0..col {
            let mut sum = *a.get(row, col);
            for i in 0..row {
                sum = sum - *a.get(row, i) * *a.get(i, col);
            }
            *a.get_mut(row, col) = sum;
        }

        // Lower part, tracking the first row of largest modulus.
        let mut max = col;
        let mut largest = <T::Real as Zero>::zero();
        for row in col..m {
            let mut sum = *a.get(row, col);
            for i in 0..col {
                sum = sum - *a.get(row, i) * *a.get(i, col);
            }
            *a.get_mut(row, col) = sum;

            let magnitude = sum.modulus();
            if magnitude > largest {
                largest = magnitude;
                max = row;
            }
        }

        if a.get(max, col).modulus() < threshold {
            log::debug!(
                target: "dense_factor",
                "LU pivot below threshold at column {} of {}x{}",
                col,
                m,
                n
            );
            return Err(LinalgError::Singular);
        }

        if max != col {
            for j in 0..n {
                let tmp = *a.get(max, j);
                *a.get_mut(max, j) = *a.get(col, j);
                *a.get_mut(col, j) = tmp;
            }
            perm.swap(max, col);
            even = !even;
        }

        let diag = *a.get(col, col);
        for row in (col + 1)..m {
            let scaled = *a.get(row, col) / diag;
            *a.get_mut(row, col) = scaled;
        }
    }

    Ok(even)
}

/// Options for [`LuDecomposition::with_params`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuParams {
    /// Pivots whose modulus falls below this mark the matrix singular.
    pub singularity_threshold: f64,
    /// Factorize `Aᵀ` instead of `A`.
    ///
    /// The decomposition then describes `M = Aᵀ` throughout: `l`, `u`, `p`,
    /// `det`, every solve, `inverse`, `reconstruct` and `information_matrix`
    /// all refer to `M`. Only the constructors and
    /// [`factorize`](LuDecomposition::factorize) take `A` itself. Use it to
    /// factor a wide matrix, or to reuse one instance for `Aᵀ x = b` solves.
    pub transpose: bool,
}

impl Default for LuParams {
    fn default() -> Self {
        Self {
            singularity_threshold: DEFAULT_SINGULARITY_THRESHOLD,
            transpose: false,
        }
    }
}

/// LU decomposition of a dynamically-sized matrix (`m >= n`).
///
/// Stores the packed L/U factors of the factored matrix `M`, the pivot vector
/// and its parity. `M` is the input `A`, or `Aᵀ` when
/// [`LuParams::transpose`] is set.
///
/// A singular pivot does not fail construction: it is recorded, after which
/// `pivot()`, `l()`, `u()` and `p()` return `None` and every solve, inverse
/// and determinant call returns [`LinalgError::Singular`].
///
/// # Example
///
/// ```
/// use dense_factor::{DynMatrix, DynVector};
///
/// let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 5.0, 3.0]);
/// let lu = a.lu().unwrap();
/// assert!(lu.is_nonsingular());
///
/// let b = DynVector::from_slice(&[4.0, 11.0]);
/// let x = lu.solve(&b).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
///
/// assert!((lu.det().unwrap() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LuDecomposition<T> {
    lu: DynMatrix<T>,
    pivot: Vec<usize>,
    even: bool,
    singular: bool,
    params: LuParams,
}

impl<T: LinalgScalar> LuDecomposition<T> {
    /// Decompose `a` with default parameters.
    pub fn new(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        Self::with_params(a, LuParams::default())
    }

    /// Decompose a private copy of `a` (or of `aᵀ` when `params.transpose`).
    ///
    /// Fails only if the matrix to factorize has fewer rows than columns.
    pub fn with_params(a: &DynMatrix<T>, params: LuParams) -> Result<Self, LinalgError> {
        let lu = if params.transpose {
            a.transpose()
        } else {
            a.clone()
        };
        Self::factor_owned(lu, params)
    }

    /// Decompose `a`, reusing its storage for the factors.
    pub fn from_owned(a: DynMatrix<T>, params: LuParams) -> Result<Self, LinalgError> {
        let lu = if params.transpose { a.transpose() } else { a };
        Self::factor_owned(lu, params)
    }

    fn factor_owned(lu: DynMatrix<T>, params: LuParams) -> Result<Self, LinalgError> {
        let mut out = Self {
            pivot: vec![0; lu.nrows()],
            lu,
            even: true,
            singular: false,
            params,
        };
        out.run()?;
        Ok(out)
    }

    fn run(&mut self) -> Result<(), LinalgError> {
        let threshold = <T::Real as NumCast>::from(self.params.singularity_threshold)
            .unwrap_or_else(T::lepsilon);
        match lu_crout_in_place(&mut self.lu, &mut self.pivot, threshold) {
            Ok(even) => {
                self.even = even;
                self.singular = false;
                Ok(())
            }
            Err(LinalgError::Singular) => {
                self.singular = true;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Re-run the factorization on `a`, reusing this instance's storage.
    ///
    /// `a` must have the shape of the constructor's input; it is transposed
    /// again when `params.transpose` is set.
    pub fn factorize(&mut self, a: &DynMatrix<T>) -> Result<(), LinalgError> {
        let expected = self.input_shape();
        if a.shape() != expected {
            return Err(LinalgError::DimensionMismatch {
                expected,
                got: a.shape(),
            });
        }
        if self.params.transpose {
            for j in 0..self.lu.ncols() {
                for i in 0..self.lu.nrows() {
                    self.lu[(i, j)] = a[(j, i)];
                }
            }
        } else {
            self.lu.as_mut_slice().copy_from_slice(a.as_slice());
        }
        self.run()
    }

    fn input_shape(&self) -> (usize, usize) {
        let (m, n) = self.lu.shape();
        if self.params.transpose {
            (n, m)
        } else {
            (m, n)
        }
    }

    /// Whether every pivot cleared the singularity threshold.
    #[inline]
    pub fn is_nonsingular(&self) -> bool {
        !self.singular
    }

    /// Row permutation: row `i` of `L·U` is row `pivot()[i]` of `M`.
    ///
    /// `None` if singular; the sweep stopped early and the permutation is partial.
    #[inline]
    pub fn pivot(&self) -> Option<&[usize]> {
        if self.singular {
            None
        } else {
            Some(&self.pivot)
        }
    }

    /// `+1` for an even number of row swaps, `-1` for an odd number.
    #[inline]
    pub fn pivot_sign(&self) -> T {
        if self.even {
            T::one()
        } else {
            T::zero() - T::one()
        }
    }

    /// Unit lower-triangular factor (m×n), or `None` if singular.
    pub fn l(&self) -> Option<DynMatrix<T>> {
        if self.singular {
            return None;
        }
        let (m, n) = self.lu.shape();
        Some(DynMatrix::from_fn(m, n, |i, j| {
            if i > j {
                self.lu[(i, j)]
            } else if i == j {
                T::one()
            } else {
                T::zero()
            }
        }))
    }

    /// Upper-triangular factor (n×n), or `None` if singular.
    pub fn u(&self) -> Option<DynMatrix<T>> {
        if self.singular {
            return None;
        }
        let n = self.lu.ncols();
        Some(DynMatrix::from_fn(n, n, |i, j| {
            if i <= j {
                self.lu[(i, j)]
            } else {
                T::zero()
            }
        }))
    }

    /// Permutation matrix `P` (m×m) with `P·A = L·U`, or `None` if singular.
    pub fn p(&self) -> Option<DynMatrix<T>> {
        if self.singular {
            return None;
        }
        let m = self.pivot.len();
        let mut p = DynMatrix::zeros(m, m, T::zero());
        for (i, &src) in self.pivot.iter().enumerate() {
            p[(i, src)] = T::one();
        }
        Some(p)
    }

    /// Determinant: pivot sign times the product of U's diagonal.
    pub fn det(&self) -> Result<T, LinalgError> {
        let (m, n) = self.lu.shape();
        ensure_square(m, n)?;
        if self.singular {
            return Err(LinalgError::Singular);
        }
        let mut d = self.pivot_sign();
        for i in 0..n {
            d = d * self.lu[(i, i)];
        }
        Ok(d)
    }

    /// Borrowed solver over the stored factors.
    #[inline]
    pub fn solver(&self) -> Solver<'_, T, Self> {
        Solver::new(self)
    }

    /// Solve `M x = b`.
    pub fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        self.solver().solve(b)
    }

    /// Solve `M X = B`.
    pub fn solve_matrix(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>, LinalgError> {
        self.solver().solve_matrix(b)
    }

    /// Solve `X M = B`.
    pub fn solve_transpose(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>, LinalgError> {
        self.solver().solve_transpose(b)
    }

    /// `M⁻¹`.
    pub fn inverse(&self) -> Result<DynMatrix<T>, LinalgError> {
        self.solver().inverse()
    }

    /// Rebuild `M` from `L`, `U` and the pivot vector.
    pub fn reconstruct(&self) -> Result<DynMatrix<T>, LinalgError> {
        let (Some(l), Some(u)) = (self.l(), self.u()) else {
            return Err(LinalgError::Singular);
        };
        let lu = &l * &u;
        let mut a = DynMatrix::zeros(lu.nrows(), lu.ncols(), T::zero());
        for (i, &src) in self.pivot.iter().enumerate() {
            for j in 0..lu.ncols() {
                a[(src, j)] = lu[(i, j)];
            }
        }
        Ok(a)
    }

    /// `(Mᴴ·M)⁻¹`, with `M` rebuilt from the factors.
    ///
    /// For a regression design matrix this is the unscaled covariance of the
    /// fitted coefficients.
    pub fn information_matrix(&self) -> Result<DynMatrix<T>, LinalgError> {
        let m = self.reconstruct()?;
        let mhm = &m.adjoint() * &m;
        LuDecomposition::with_params(
            &mhm,
            LuParams {
                transpose: false,
                ..self.params
            },
        )?
        .inverse()
    }
}

impl<T: LinalgScalar> SolveCore<T> for LuDecomposition<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.lu.nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.lu.ncols()
    }

    fn solve_in_place(&self, rhs: &mut [T]) -> Result<(), LinalgError> {
        let (m, n) = self.lu.shape();
        ensure_square(m, n)?;
        if self.singular {
            return Err(LinalgError::Singular);
        }
        debug_assert_eq!(rhs.len(), n);

        let permuted: Vec<T> = self.pivot.iter().map(|&p| rhs[p]).collect();
        rhs.copy_from_slice(&permuted);

        // Forward substitution through unit L, column by column.
        for col in 0..n {
            let x = rhs[col];
            let l_col = self.lu.col_slice(col);
            for i in (col + 1)..n {
                rhs[i] = rhs[i] - x * l_col[i];
            }
        }

        // Back substitution through U.
        for col in (0..n).rev() {
            let u_col = self.lu.col_slice(col);
            rhs[col] = rhs[col] / u_col[col];
            let x = rhs[col];
            for i in 0..col {
                rhs[i] = rhs[i] - x * u_col[i];
            }
        }

        Ok(())
    }

    fn solve_transpose_in_place(&self, rhs: &mut [T]) -> Result<(), LinalgError> {
        let (m, n) = self.lu.shape();
        ensure_square(m, n)?;
        if self.singular {
            return Err(LinalgError::Singular);
        }
        debug_assert_eq!(rhs.len(), n);

        // Aᵀ = Uᵀ·Lᵀ·P: forward through Uᵀ, back through Lᵀ, then undo P.
        for i in 0..n {
            let u_col = self.lu.col_slice(i);
            let mut sum = rhs[i];
            for k in 0..i {
                sum = sum - u_col[k] * rhs[k];
            }
            rhs[i] = sum / u_col[i];
        }

        for i in (0..n).rev() {
            let l_col = self.lu.col_slice(i);
            let mut sum = rhs[i];
            for k in (i + 1)..n {
                sum = sum - l_col[k] * rhs[k];
            }
            rhs[i] = sum;
        }

        let mut x = vec![T::zero(); n];
        for (i, &p) in self.pivot.iter().enumerate() {
            x[p] = rhs[i];
        }
        rhs.copy_from_slice(&x);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: &DynMatrix<f64>, b: &DynMatrix<f64>, tol: f64) {
        assert_eq!(a.shape(), b.shape());
        for i in 0..a.nrows() {
            for j in 0..a.ncols() {
                assert!(
                    (a[(i, j)] - b[(i, j)]).abs() < tol,
                    "mismatch at ({},{}): {} vs {}",
                    i,
                    j,
                    a[(i, j)],
                    b[(i, j)]
                );
            }
        }
    }

    fn sample_4x4() -> DynMatrix<f64> {
        DynMatrix::from_rows(
            4,
            4,
            &[
                1.0_f64, 2.0, 3.0, 4.0, //
                5.0, 6.0, 7.0, 8.0, //
                2.0, 6.0, 4.0, 1.0, //
                3.0, 1.0, 9.0, 2.0,
            ],
        )
    }

    #[test]
    fn lu_solve_3x3() {
        let a = DynMatrix::from_rows(3, 3, &[2.0_f64, 1.0, -1.0, -3.0, -1.0, 2.0, -2.0, 1.0, 2.0]);
        let b = DynVector::from_slice(&[8.0, -11.0, -3.0]);

        let x = a.lu().unwrap().solve(&b).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
        assert!((x[2] - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn reconstruction_matches_permuted_input() {
        let a = sample_4x4();
        let lu = a.lu().unwrap();
        let l = lu.l().unwrap();
        let u = lu.u().unwrap();
        let p = lu.p().unwrap();

        assert_near(&(&l * &u), &(&p * &a), 1e-9);
        assert_near(&(&l * &u), &a.select_rows(lu.pivot().unwrap()), 1e-9);
        assert_near(&lu.reconstruct().unwrap(), &a, 1e-9);

        for i in 0..4 {
            assert_eq!(l[(i, i)], 1.0);
            for j in (i + 1)..4 {
                assert_eq!(l[(i, j)], 0.0);
                assert_eq!(u[(j, i)], 0.0);
            }
        }
    }

    #[test]
    fn lu_det() {
        let a = DynMatrix::from_rows(2, 2, &[3.0_f64, 8.0, 4.0, 6.0]);
        assert!((a.lu().unwrap().det().unwrap() - (-14.0)).abs() < 1e-12);

        let b = DynMatrix::from_rows(3, 3, &[6.0_f64, 1.0, 1.0, 4.0, -2.0, 5.0, 2.0, 8.0, 7.0]);
        assert!((b.lu().unwrap().det().unwrap() - (-306.0)).abs() < 1e-10);
    }

    #[test]
    fn det_sign_after_single_swap() {
        // Column 0 pivots on row 1; no later swaps.
        let a = DynMatrix::from_rows(3, 3, &[2.0_f64, 1.0, 1.0, 4.0, 3.0, 3.0, 0.0, 0.0, 5.0]);
        let lu = a.lu().unwrap();
        assert_eq!(lu.pivot(), Some(&[1, 0, 2][..]));
        assert_eq!(lu.pivot_sign(), -1.0);

        let u = lu.u().unwrap();
        let diag_product = u[(0, 0)] * u[(1, 1)] * u[(2, 2)];
        assert!((diag_product - (-10.0)).abs() < 1e-12);
        assert!((lu.det().unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn tie_keeps_first_row() {
        let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, -1.0, 3.0]);
        let lu = a.lu().unwrap();
        assert_eq!(lu.pivot(), Some(&[0, 1][..]));
        assert_eq!(lu.pivot_sign(), 1.0);
    }

    #[test]
    fn singular_is_recorded_not_raised() {
        let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
        let lu = a.lu().unwrap();
        assert!(!lu.is_nonsingular());
        assert!(lu.pivot().is_none());
        assert!(lu.l().is_none());
        assert!(lu.u().is_none());
        assert!(lu.p().is_none());

        let b = DynVector::from_slice(&[1.0, 2.0]);
        assert_eq!(lu.solve(&b).unwrap_err(), LinalgError::Singular);
        assert_eq!(lu.inverse().unwrap_err(), LinalgError::Singular);
        assert_eq!(lu.det().unwrap_err(), LinalgError::Singular);
        assert_eq!(lu.reconstruct().unwrap_err(), LinalgError::Singular);
    }

    #[test]
    fn singularity_threshold_is_configurable() {
        let a = DynMatrix::from_rows(2, 2, &[1e-13_f64, 0.0, 0.0, 1e-13]);
        assert!(!a.lu().unwrap().is_nonsingular());

        let params = LuParams {
            singularity_threshold: 1e-15,
            ..LuParams::default()
        };
        let lu = LuDecomposition::with_params(&a, params).unwrap();
        assert!(lu.is_nonsingular());
        assert!((lu.det().unwrap() - 1e-26).abs() < 1e-36);
    }

    #[test]
    fn rectangular_tall() {
        let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let lu = a.lu().unwrap();
        let l = lu.l().unwrap();
        let u = lu.u().unwrap();
        assert_eq!(l.shape(), (3, 2));
        assert_eq!(u.shape(), (2, 2));
        assert_near(&(&l * &u), &a.select_rows(lu.pivot().unwrap()), 1e-12);

        assert_eq!(
            lu.det().unwrap_err(),
            LinalgError::NotSquare { nrows: 3, ncols: 2 }
        );
        let b = DynVector::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(
            lu.solve(&b).unwrap_err(),
            LinalgError::NotSquare { nrows: 3, ncols: 2 }
        );
    }

    #[test]
    fn wide_needs_transpose() {
        let a = DynMatrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(matches!(
            LuDecomposition::new(&a),
            Err(LinalgError::DimensionMismatch { .. })
        ));

        let params = LuParams {
            transpose: true,
            ..LuParams::default()
        };
        let lu = LuDecomposition::with_params(&a, params).unwrap();
        assert_eq!(lu.l().unwrap().shape(), (3, 2));
        assert_near(&lu.reconstruct().unwrap(), &a.transpose(), 1e-12);
    }

    #[test]
    fn transpose_flag_factors_a_transpose_everywhere() {
        let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 0.0, 1.0]);
        let at = a.transpose();
        let params = LuParams {
            transpose: true,
            ..LuParams::default()
        };
        let lu = LuDecomposition::with_params(&a, params).unwrap();

        assert_near(&lu.reconstruct().unwrap(), &at, 1e-12);

        // Aᵀ x = b
        let b = DynVector::from_slice(&[5.0, 1.0]);
        let x = lu.solve(&b).unwrap();
        let atx = &at * &x;
        assert!((atx[0] - 5.0).abs() < 1e-12);
        assert!((atx[1] - 1.0).abs() < 1e-12);

        let inv = lu.inverse().unwrap();
        assert_near(&(&at * &inv), &DynMatrix::eye(2, 0.0), 1e-12);
        assert!((lu.det().unwrap() - 1.0).abs() < 1e-12);

        // X Aᵀ = B
        let bt = DynMatrix::from_rows(1, 2, &[5.0_f64, 1.0]);
        let xt = lu.solve_transpose(&bt).unwrap();
        assert_near(&(&xt * &at), &bt, 1e-12);

        let info = lu.information_matrix().unwrap();
        assert_near(&(&info * &(&a * &at)), &DynMatrix::eye(2, 0.0), 1e-10);
    }

    #[test]
    fn solve_transpose_xa_eq_b() {
        let a = sample_4x4();
        let b = DynMatrix::from_rows(2, 4, &[1.0_f64, 0.0, 2.0, -1.0, 3.0, 1.0, 0.0, 4.0]);
        let x = a.lu().unwrap().solve_transpose(&b).unwrap();
        assert_eq!(x.shape(), (2, 4));
        assert_near(&(&x * &a), &b, 1e-10);
    }

    #[test]
    fn solve_matrix_and_inverse() {
        let a = DynMatrix::from_rows(3, 3, &[1.0_f64, 2.0, 3.0, 0.0, 1.0, 4.0, 5.0, 6.0, 0.0]);
        let lu = a.lu().unwrap();
        let inv = lu.inverse().unwrap();
        assert_near(&(&a * &inv), &DynMatrix::eye(3, 0.0), 1e-10);

        let b = DynMatrix::from_rows(3, 2, &[1.0_f64, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let x = lu.solve_matrix(&b).unwrap();
        assert_near(&(&a * &x), &b, 1e-10);
    }

    #[test]
    fn information_matrix() {
        let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 0.0, 0.0, 3.0]);
        let info = a.lu().unwrap().information_matrix().unwrap();
        assert_near(
            &info,
            &DynMatrix::from_rows(2, 2, &[0.25_f64, 0.0, 0.0, 1.0 / 9.0]),
            1e-12,
        );

        let a = sample_4x4();
        let info = a.lu().unwrap().information_matrix().unwrap();
        let ata = &a.transpose() * &a;
        assert_near(&(&info * &ata), &DynMatrix::eye(4, 0.0), 1e-8);
    }

    #[test]
    fn factorize_reuses_instance() {
        let singular = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
        let mut lu = singular.lu().unwrap();
        assert!(!lu.is_nonsingular());

        let a = DynMatrix::from_rows(2, 2, &[3.0_f64, 8.0, 4.0, 6.0]);
        lu.factorize(&a).unwrap();
        assert!(lu.is_nonsingular());
        assert!((lu.det().unwrap() - (-14.0)).abs() < 1e-12);

        let wrong = DynMatrix::zeros(3, 3, 0.0);
        assert_eq!(
            lu.factorize(&wrong).unwrap_err(),
            LinalgError::DimensionMismatch {
                expected: (2, 2),
                got: (3, 3)
            }
        );
    }

    #[test]
    fn from_owned_matches_clone() {
        let a = sample_4x4();
        let owned = LuDecomposition::from_owned(a.clone(), LuParams::default()).unwrap();
        let cloned = a.lu().unwrap();
        assert_eq!(owned.pivot(), cloned.pivot());
        assert!(owned.pivot().is_some());
        assert_eq!(owned.u(), cloned.u());
    }

    #[test]
    fn crout_in_place_generic() {
        let mut a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
        let mut perm = [0usize; 2];
        assert_eq!(
            lu_crout_in_place(&mut a, &mut perm, 1e-12),
            Err(LinalgError::Singular)
        );

        let mut b = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 4.0, 3.0]);
        let even = lu_crout_in_place(&mut b, &mut perm, 1e-12).unwrap();
        assert!(!even);
        assert_eq!(perm, [1, 0]);
    }
}
