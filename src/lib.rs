//! # dense-factor
//!
//! Dense matrix factorizations in pure Rust: LU with partial pivoting,
//! Cholesky with a parallel trailing update, and QR by modified
//! Gram-Schmidt, plus the solves, inverses and determinants built on them.
//!
//! ## Quick start
//!
//! ```
//! use dense_factor::{DynMatrix, DynVector};
//!
//! // Solve a linear system Ax = b
//! let a = DynMatrix::from_rows(3, 3, &[
//!     2.0_f64, 1.0, -1.0,
//!     -3.0, -1.0, 2.0,
//!     -2.0, 1.0, 2.0,
//! ]);
//! let b = DynVector::from_slice(&[8.0, -11.0, -3.0]);
//! let x = a.solve(&b).unwrap(); // x = [2, 3, -1]
//! assert!((x[1] - 3.0).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`dynmatrix`]: Heap-allocated `DynMatrix<T>` with runtime dimensions,
//!   column-major `Vec<T>` storage, and [`DynVector<T>`]. Convenience
//!   methods `a.lu()`, `a.cholesky()`, `a.qr()`, `a.solve(&b)`,
//!   `a.inverse()`, `a.det()`.
//!
//! - [`linalg`]: The decompositions:
//!   - [`LuDecomposition`]: Crout sweep with a configurable singularity
//!     threshold. A singular pivot is recorded rather than raised; solves
//!     and determinants then report [`LinalgError::Singular`].
//!   - [`CholeskyDecomposition`]: `A = L·Lᴴ`; the rank-1 update after each
//!     pivot is split across cores (see [`Parallelism`]).
//!   - [`QrDecomposition`]: thin `A = Q·R` for `m >= n`, least-squares solves.
//!
//!   Each offers `solve`, `solve_matrix`, `solve_transpose`, `inverse`,
//!   `reconstruct` and a borrowed [`Solver`](linalg::Solver) view. The
//!   in-place kernels (`lu_crout_in_place`, `cholesky_in_place`,
//!   `mgs_in_place`) operate on any [`MatrixMut`].
//!
//! - [`traits`]: Element trait hierarchy:
//!   - [`Scalar`]: all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`]: real floats
//!   - [`LinalgScalar`]: real floats and complex numbers, used by every decomposition
//!   - [`MatrixRef`] / [`MatrixMut`]: generic read/write access for algorithms
//!
//! ## Complex matrices
//!
//! Enable the `complex` feature to use decompositions with `Complex<f32>` /
//! `Complex<f64>`. Cholesky generalizes to Hermitian (A = LL^H) and QR
//! projects with conjugated inner products.
//!
//! ## Cargo features
//!
//! | Feature   | Default  | Description |
//! |-----------|----------|-------------|
//! | `std`     | yes      | `std::error::Error` for [`LinalgError`]; hardware FPU via system libm |
//! | `rayon`   | yes      | Parallel Cholesky update on the rayon pool (implies `std`) |
//! | `libm`    | no       | Pure-Rust software float fallback for `no_std` |
//! | `complex` | no       | `Complex<f32>` / `Complex<f64>` support via `num-complex` |
//! | `all`     | no       | `std` + `rayon` + `complex` |
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade under the
//! `dense_factor` target: singular pivots, failed Cholesky pivots and
//! zero-norm Gram-Schmidt columns at `debug`, parallel splits at `trace`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod dynmatrix;
pub mod linalg;
pub mod traits;

pub use dynmatrix::{DynMatrix, DynVector};
pub use linalg::{
    CholeskyDecomposition, CholeskyParams, LinalgError, LuDecomposition, LuParams, Parallelism,
    QrDecomposition,
};
pub use traits::{FloatScalar, LinalgScalar, MatrixMut, MatrixRef, Scalar};

#[cfg(feature = "complex")]
pub use num_complex::Complex;
