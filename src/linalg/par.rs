//! Core budget for the parallel kernels.
//!
//! Only the Cholesky trailing update forks work today. It consumes the budget
//! as a core count and halves it at every split.

/// How many threads a kernel may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parallelism {
    /// Run on the calling thread.
    None,
    /// Fork onto the rayon pool with at most `n` threads; `0` means
    /// [`rayon::current_num_threads`].
    #[cfg(feature = "rayon")]
    Rayon(usize),
}

impl Parallelism {
    /// Number of cores the budget resolves to. Never zero.
    #[inline]
    pub fn degree(self) -> usize {
        match self {
            Parallelism::None => 1,
            #[cfg(feature = "rayon")]
            Parallelism::Rayon(0) => rayon::current_num_threads().max(1),
            #[cfg(feature = "rayon")]
            Parallelism::Rayon(n) => n,
        }
    }
}

impl Default for Parallelism {
    #[inline]
    fn default() -> Self {
        #[cfg(feature = "rayon")]
        {
            Parallelism::Rayon(0)
        }
        #[cfg(not(feature = "rayon"))]
        {
            Parallelism::None
        }
    }
}

/// Run both closures and return once both have finished, on the rayon pool
/// when the `rayon` feature is enabled and on the calling thread otherwise.
#[inline]
pub(crate) fn join(op_a: impl Send + FnOnce(), op_b: impl Send + FnOnce()) {
    #[cfg(feature = "rayon")]
    rayon::join(op_a, op_b);
    #[cfg(not(feature = "rayon"))]
    {
        op_a();
        op_b();
    }
}
