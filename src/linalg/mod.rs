pub(crate) mod cholesky;
pub(crate) mod lu;
pub mod par;
pub(crate) mod qr;
pub(crate) mod solver;

pub use cholesky::{
    cholesky_in_place, cholesky_in_place_generic, CholeskyDecomposition, CholeskyParams,
};
pub use lu::{lu_crout_in_place, LuDecomposition, LuParams, DEFAULT_SINGULARITY_THRESHOLD};
pub use par::Parallelism;
pub use qr::{mgs_in_place, QrDecomposition};
pub use solver::{SolveCore, Solver};

/// Errors from linear algebra operations.
///
/// Returned by decomposition constructors, `factorize`, and every solve,
/// inverse and determinant entry point.
///
/// ```
/// use dense_factor::DynMatrix;
/// use dense_factor::linalg::LinalgError;
///
/// let not_pd = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 1.0]);
/// assert_eq!(
///     not_pd.cholesky().unwrap_err(),
///     LinalgError::NotPositiveDefinite { pivot: 1 },
/// );
///
/// let wide = DynMatrix::zeros(2, 3, 0.0_f64);
/// assert!(matches!(wide.qr(), Err(LinalgError::DimensionMismatch { .. })));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// Matrix is singular or nearly singular.
    Singular,
    /// A Cholesky pivot was not strictly positive.
    NotPositiveDefinite {
        /// Index of the failing diagonal entry.
        pivot: usize,
    },
    /// A Gram-Schmidt column collapsed to zero norm.
    RankDeficient {
        /// Index of the column with zero norm.
        column: usize,
    },
    /// An operand's shape does not fit the operation.
    DimensionMismatch {
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Got `(rows, cols)`.
        got: (usize, usize),
    },
    /// The operation needs a square matrix.
    NotSquare { nrows: usize, ncols: usize },
    /// The storage cannot serve the requested kernel.
    Unsupported(&'static str),
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::Singular => write!(f, "matrix is singular"),
            LinalgError::NotPositiveDefinite { pivot } => {
                write!(f, "matrix is not positive definite (pivot {})", pivot)
            }
            LinalgError::RankDeficient { column } => {
                write!(f, "matrix is rank deficient (column {})", column)
            }
            LinalgError::DimensionMismatch { expected, got } => write!(
                f,
                "dimension mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, got.0, got.1
            ),
            LinalgError::NotSquare { nrows, ncols } => {
                write!(f, "matrix must be square, got {}x{}", nrows, ncols)
            }
            LinalgError::Unsupported(what) => write!(f, "not supported: {}", what),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}

/// Fail with [`LinalgError::NotSquare`] unless `nrows == ncols`.
#[inline]
pub(crate) fn ensure_square(nrows: usize, ncols: usize) -> Result<(), LinalgError> {
    if nrows != ncols {
        return Err(LinalgError::NotSquare { nrows, ncols });
    }
    Ok(())
}
