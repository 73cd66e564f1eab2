//! Extends an orthonormal basis by one vector.
//!
//! Given a basis `Q` with orthonormal columns and a vector `v`, the routines in
//! this crate overwrite `v` with the normalized component of `v` orthogonal to
//! `Q`, write the coefficients `r = Qᴴv` into a caller-supplied buffer, and
//! return the norm of the orthogonal component, so that
//! `v_original = Q·r + norm·v_new`. This is the step performed once per
//! iteration by Arnoldi-type eigensolvers and by GMRES.
//!
//! Three methods are provided, trading speed for numerical stability:
//!
//! + [`Classical`] Gram Schmidt, two matrix-vector products;
//! + [`Modified`] Gram Schmidt, one scaled vector update per basis vector;
//! + [`Repeated`] classical Gram Schmidt with the DGKS stopping criterion,
//!   which also reports whether `v` could be separated from the span of `Q`.
//!
//! None of the methods allocate, so a single set of buffers can be reused
//! across solver iterations.
//!
//! ```
//! use gramschmidt_update::{orthogonalize_and_normalize, Repeated};
//! use ndarray::{arr1, arr2, Array1};
//!
//! let q = arr2(&[[1.0, 0.0],
//!                [0.0, 1.0],
//!                [0.0, 0.0]]);
//! let mut v = arr1(&[3.0, 4.0, 12.0]);
//! let mut r = Array1::zeros(2);
//! let mut dgks = Repeated::new(2);
//!
//! let (norm, success) = orthogonalize_and_normalize(&q, &mut v, &mut r, &mut dgks).unwrap();
//!
//! assert!(success);
//! assert_eq!(norm, 12.0);
//! assert_eq!(r, arr1(&[3.0, 4.0]));
//! assert_eq!(v, arr1(&[0.0, 0.0, 1.0]));
//! ```

#[cfg(feature = "openblas")]
extern crate blas_src;

use ndarray::prelude::*;
use ndarray::{Data, DataMut};
use thiserror::Error;

#[cfg(test)]
#[macro_use]
mod test_macros;


mod basis;
#[cfg(feature = "openblas")]
mod blas;
mod cgs;
mod dgks;
mod mgs;
mod scalar;
mod utils;

pub use basis::Basis;
pub use cgs::Classical;
pub use dgks::{DEFAULT_STEPS, Repeated};
pub use mgs::Modified;
pub use scalar::Scalar;
pub use utils::{dotc, norm2};

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("basis vectors have length {basis}, but the target vector has length {target}")]
    TargetLength { basis: usize, target: usize },

    #[error("basis vector {index} has length {got}, expected {expected}")]
    VectorLength { index: usize, expected: usize, got: usize },

    #[error("coefficient buffer has length {got}, but the basis holds {expected} vectors")]
    CoefficientLength { expected: usize, got: usize },

    #[error("work vector has length {got}, but the basis holds {expected} vectors")]
    WorkspaceTooSmall { expected: usize, got: usize },

    #[error("the number of orthogonalization passes must be positive")]
    ZeroSteps,

    #[error("cannot normalize by residual norm {norm}")]
    DegenerateNorm { norm: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;

/// What to do when the orthogonal component has zero norm.
///
/// This happens when the target vector lies in the span of the basis. The
/// default, [`Unguarded`](NormGuard::Unguarded), divides anyway and leaves
/// non-finite values in the target vector; it is up to the caller to check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NormGuard {
    #[default]
    Unguarded,

    /// Return [`Error::DegenerateNorm`] instead of dividing by a zero or
    /// non-finite norm. The target vector then holds the unnormalized residual.
    Strict,
}

/// An orthogonalization method.
///
/// Implementors overwrite `v` with the normalized part of `v` orthogonal to the
/// columns of `basis`, and `r` with the coefficients `basisᴴ·v` of the original
/// `v`. The columns of `basis` are assumed to be orthonormal; this is not
/// checked.
pub trait Orthogonalize<A: Scalar> {
    /// The norm of the orthogonal component, possibly with extra diagnostics.
    type Output;

    fn orthogonalize_and_normalize<S1, S2, S3>(
        &mut self,
        basis: &ArrayBase<S1, Ix2>,
        v: &mut ArrayBase<S2, Ix1>,
        r: &mut ArrayBase<S3, Ix1>,
    ) -> Result<Self::Output>
        where S1: Data<Elem = A>,
              S2: DataMut<Elem = A>,
              S3: DataMut<Elem = A>;
}

/// Orthogonalizes `v` against the columns of `basis` and normalizes it, using
/// `method`.
///
/// Fails if `v` and the columns of `basis` differ in length, or if `r` does not
/// hold exactly one entry per column.
pub fn orthogonalize_and_normalize<A, M, S1, S2, S3>(
    basis: &ArrayBase<S1, Ix2>,
    v: &mut ArrayBase<S2, Ix1>,
    r: &mut ArrayBase<S3, Ix1>,
    method: &mut M,
) -> Result<M::Output>
    where A: Scalar,
          M: Orthogonalize<A>,
          S1: Data<Elem = A>,
          S2: DataMut<Elem = A>,
          S3: DataMut<Elem = A>,
{
    method.orthogonalize_and_normalize(basis, v, r)
}
