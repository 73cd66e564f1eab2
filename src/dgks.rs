use log::{debug, trace};
use ndarray::prelude::*;
use ndarray::{Data, DataMut};
use num_traits::{Float, One, Zero};

use crate::{
    Error,
    NormGuard,
    Orthogonalize,
    Result,
    Scalar,
    utils::{
        check_matrix_shapes,
        norm2,
        normalize,
        project_into,
        subtract_projection,
    },
};

/// Number of classical Gram Schmidt passes [`Repeated::new`] allows.
pub const DEFAULT_STEPS: usize = 2;

/// Classical Gram Schmidt, repeated until the orthogonal component stops shrinking, following
/// Daniel, Gragg, Kaufman and Stewart ([DGKS]).
///
/// Every pass projects out of `v` whatever component along `Q` is left, and adds the removed
/// coefficients to `r`. After a pass the new norm is compared against the norm before it: if `v`
/// kept more than `1/√2` of its length, it was not mostly rounding error, and the step stops with
/// success. Otherwise another pass follows, up to [`steps`](Repeated::steps) in total. If no pass
/// succeeds, `v` is indistinguishable from a vector in the span of `Q`. It is still normalized,
/// but the returned flag is `false` and the caller should discard the direction, for example by
/// restarting with a random vector.
///
/// The struct owns the work vector holding the coefficients of each pass, so that repeated calls
/// do not allocate. The work vector may be longer than the basis; only its leading entries are
/// used. One instance can thus serve a basis that grows by a column per iteration.
///
/// [DGKS]: https://doi.org/10.1090/S0025-5718-1976-0431641-8
#[derive(Clone, Debug)]
pub struct Repeated<A> {
    work_vector: Array1<A>,
    steps: usize,
    guard: NormGuard,
}

impl<A: Scalar> Repeated<A> {
    /// Reserves a work vector for bases of up to `capacity` vectors, allowing [`DEFAULT_STEPS`]
    /// passes.
    pub fn new(capacity: usize) -> Self {
        Self {
            work_vector: Array1::zeros(capacity),
            steps: DEFAULT_STEPS,
            guard: NormGuard::Unguarded,
        }
    }

    /// Like [`Repeated::new`], allowing up to `steps` passes. Fails if `steps` is zero.
    pub fn with_steps(capacity: usize, steps: usize) -> Result<Self> {
        Self::from_work_vector(Array1::zeros(capacity), steps)
    }

    /// Uses an existing array as work vector. Its contents are overwritten on every call.
    pub fn from_work_vector(work_vector: Array1<A>, steps: usize) -> Result<Self> {
        if steps == 0 {
            return Err(Error::ZeroSteps);
        }
        Ok(Self {
            work_vector,
            steps,
            guard: NormGuard::Unguarded,
        })
    }

    /// Fail with [`Error::DegenerateNorm`] instead of dividing by a vanishing norm. This is
    /// independent of the success flag.
    pub fn strict(mut self) -> Self {
        self.guard = NormGuard::Strict;
        self
    }

    pub fn guard(&self) -> NormGuard {
        self.guard
    }

    /// Maximum number of passes.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Largest number of basis vectors the work vector accommodates.
    pub fn capacity(&self) -> usize {
        self.work_vector.len()
    }

    /// Gives the work vector back, e.g. one passed to [`Repeated::from_work_vector`].
    pub fn into_work_vector(self) -> Array1<A> {
        self.work_vector
    }
}

impl<A: Scalar> Orthogonalize<A> for Repeated<A> {
    /// The norm of the orthogonal component, and whether it was reliably separated from the
    /// span of the basis.
    type Output = (A::Real, bool);

    fn orthogonalize_and_normalize<S1, S2, S3>(
        &mut self,
        basis: &ArrayBase<S1, Ix2>,
        v: &mut ArrayBase<S2, Ix1>,
        r: &mut ArrayBase<S3, Ix1>,
    ) -> Result<(A::Real, bool)>
        where S1: Data<Elem = A>,
              S2: DataMut<Elem = A>,
              S3: DataMut<Elem = A>,
    {
        check_matrix_shapes(basis, v.len(), r.len())?;

        let n_vectors = basis.ncols();
        if self.work_vector.len() < n_vectors {
            return Err(Error::WorkspaceTooSmall {
                expected: n_vectors,
                got: self.work_vector.len(),
            });
        }
        let mut work = self.work_vector.slice_mut(s![..n_vectors]);

        let one = A::Real::one();
        let eta = (one + one).sqrt().recip();

        let mut norm = norm2(v);
        r.fill(A::zero());

        for pass in 0..self.steps {
            project_into(basis, v, &mut work);
            subtract_projection(basis, &work, v);
            r.scaled_add(A::one(), &work);

            let previous_norm = norm;
            norm = norm2(v);
            trace!("pass {}: residual norm {:?} -> {:?}", pass + 1, previous_norm, norm);

            if norm > eta * previous_norm {
                normalize(v, norm, self.guard)?;
                return Ok((norm, true));
            }
        }

        debug!(
            "orthogonal component did not stabilize after {} passes, residual norm {:?}",
            self.steps,
            norm
        );
        normalize(v, norm, self.guard)?;
        Ok((norm, false))
    }
}

#[cfg(test)]
generate_tests!(repeated_f64, f64, Repeated::new(3));

#[cfg(test)]
generate_tests!(repeated_f32, f32, Repeated::new(3));

#[cfg(test)]
generate_tests!(repeated_c64, num_complex::Complex64, Repeated::new(3));

#[cfg(test)]
generate_tests!(repeated_c32, num_complex::Complex32, Repeated::new(3));
