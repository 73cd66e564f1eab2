use ndarray::prelude::*;
use ndarray::{Data, DataMut};

use crate::{
    Basis,
    NormGuard,
    Orthogonalize,
    Result,
    Scalar,
    utils::{
        dotc_unchecked,
        norm2,
        normalize,
    },
};

/// A modified Gram Schmidt step.
///
/// Each coefficient is computed against the already updated `v` rather than the original one,
/// so errors made while removing earlier basis vectors are partially removed by later ones. This
/// is more stable than [`Classical`](crate::Classical) at the same cost, but is carried out as a
/// sequence of vector updates and still loses orthogonality for ill-conditioned bases.
///
/// Besides a matrix, the basis can be any [`Basis`], such as a slice of vectors; see
/// [`Modified::orthogonalize_against`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modified {
    guard: NormGuard,
}

impl Modified {
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

    /// Orthogonalizes `v` against the vectors of `basis` in order and normalizes it, writing
    /// the coefficients into `r`. Returns the norm of the orthogonal component.
    ///
    /// ```
    /// use gramschmidt_update::Modified;
    /// use ndarray::{arr1, Array1};
    ///
    /// let basis = vec![arr1(&[1.0, 0.0, 0.0]), arr1(&[0.0, 0.0, 1.0])];
    /// let mut v = arr1(&[2.0, 5.0, -1.0]);
    /// let mut r = Array1::zeros(2);
    ///
    /// let norm = Modified::new().orthogonalize_against(&basis, &mut v, &mut r).unwrap();
    ///
    /// assert_eq!(norm, 5.0);
    /// assert_eq!(r, arr1(&[2.0, -1.0]));
    /// assert_eq!(v, arr1(&[0.0, 1.0, 0.0]));
    /// ```
    pub fn orthogonalize_against<A, B, S1, S2>(
        &self,
        basis: &B,
        v: &mut ArrayBase<S1, Ix1>,
        r: &mut ArrayBase<S2, Ix1>,
    ) -> Result<A::Real>
        where A: Scalar,
              B: Basis<A> + ?Sized,
              S1: DataMut<Elem = A>,
              S2: DataMut<Elem = A>,
    {
        let n_vectors = basis.n_vectors();
        if r.len() != n_vectors {
            return Err(crate::Error::CoefficientLength { expected: n_vectors, got: r.len() });
        }
        basis.check_lengths(v.len())?;

        for (i, coefficient) in r.iter_mut().enumerate() {
            let q = basis.vector(i);
            // Projection onto the current, partially orthogonalized v.
            let projection_factor = dotc_unchecked(&q, v);
            *coefficient = projection_factor;
            v.scaled_add(-projection_factor, &q);
        }

        let norm = norm2(v);
        normalize(v, norm, self.guard)?;
        Ok(norm)
    }
}

impl<A: Scalar> Orthogonalize<A> for Modified {
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
        self.orthogonalize_against(basis, v, r)
    }
}

#[cfg(test)]
generate_tests!(modified_f64, f64, Modified::new());

#[cfg(test)]
generate_tests!(modified_f32, f32, Modified::new());

#[cfg(test)]
generate_tests!(modified_c64, num_complex::Complex64, Modified::new());

#[cfg(test)]
generate_tests!(modified_c32, num_complex::Complex32, Modified::new());
