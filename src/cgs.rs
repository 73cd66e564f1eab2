use ndarray::prelude::*;
use ndarray::{Data, DataMut};

use crate::{
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

/// A classical Gram Schmidt step. See the [Gram Schmidt Wikipedia entry] for more information.
///
/// The projection `r = Qᴴ·v` and its removal `v - Q·r` are two matrix-vector products, which
/// makes this the fastest of the methods. It is also the least stable one: when `v` is close to
/// the span of `Q`, rounding errors in `r` are never corrected and the result can be far from
/// orthogonal to `Q`. Use [`Repeated`](crate::Repeated) in that case.
///
/// Use this struct via the [`Orthogonalize` trait].
///
/// [Gram Schmidt Wikipedia entry]: https://en.wikipedia.org/wiki/Gram-Schmidt_process
/// [`Orthogonalize` trait]: Orthogonalize
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Classical {
    guard: NormGuard,
}

impl Classical {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`Error::DegenerateNorm`](crate::Error::DegenerateNorm) instead of dividing by
    /// a vanishing norm.
    pub fn strict(mut self) -> Self {
        self.guard = NormGuard::Strict;
        self
    }

    pub fn guard(&self) -> NormGuard {
        self.guard
    }
}

impl<A: Scalar> Orthogonalize<A> for Classical {
    type Output = A::Real;

    fn orthogonalize_and_normalize<S1, S2, S3>(
        &mut self,
        basis: &ArrayBase<S1, Ix2>,
        v: &mut ArrayBase<S2, Ix1>,
        r: &mut ArrayBase<S3, Ix1>,
    ) -> Result<A::Real>
        where S1: Data<Elem = A>,
              S2: DataMut<Elem = A>,
              S3: DataMut<Elem = A>,
    {
        check_matrix_shapes(basis, v.len(), r.len())?;

        // r = Qᴴ·v, then v = v - Q·r.
        project_into(basis, v, r);
        subtract_projection(basis, r, v);

        let norm = norm2(v);
        normalize(v, norm, self.guard)?;
        Ok(norm)
    }
}

#[cfg(test)]
generate_tests!(classical_f64, f64, Classical::new());

#[cfg(test)]
generate_tests!(classical_f32, f32, Classical::new());

#[cfg(test)]
generate_tests!(classical_c64, num_complex::Complex64, Classical::new());

#[cfg(test)]
generate_tests!(classical_c32, num_complex::Complex32, Classical::new());
