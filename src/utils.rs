use log::debug;
use ndarray::linalg::general_mat_vec_mul;
use ndarray::prelude::*;
use ndarray::{Data, DataMut, Zip};
use num_traits::{Float, One, ToPrimitive, Zero};

#[cfg(feature = "openblas")]
use crate::blas;
use crate::{Error, NormGuard, Result, Scalar};

/// Conjugated dot product `Σ conj(xᵢ)·yᵢ`.
///
/// The first argument is the one conjugated, so that `dotc(q, v)` is the
/// coefficient of `v` along the unit vector `q`. Fails with
/// [`Error::TargetLength`] if `x` and `y` differ in length.
///
/// ```
/// use gramschmidt_update::{dotc, Error};
/// use ndarray::arr1;
///
/// assert_eq!(dotc(&arr1(&[1.0, 2.0]), &arr1(&[3.0, 4.0])), Ok(11.0));
/// assert_eq!(
///     dotc(&arr1(&[1.0, 2.0]), &arr1(&[1.0, 2.0, 3.0])),
///     Err(Error::TargetLength { basis: 2, target: 3 })
/// );
/// ```
pub fn dotc<A, S1, S2>(x: &ArrayBase<S1, Ix1>, y: &ArrayBase<S2, Ix1>) -> Result<A>
    where A: Scalar,
          S1: Data<Elem = A>,
          S2: Data<Elem = A>,
{
    if x.len() != y.len() {
        return Err(Error::TargetLength { basis: x.len(), target: y.len() });
    }
    Ok(dotc_unchecked(x, y))
}

/// [`dotc`] for operands whose lengths the caller has already matched.
pub(crate) fn dotc_unchecked<A, S1, S2>(x: &ArrayBase<S1, Ix1>, y: &ArrayBase<S2, Ix1>) -> A
    where A: Scalar,
          S1: Data<Elem = A>,
          S2: Data<Elem = A>,
{
    if A::IS_COMPLEX {
        Zip::from(x)
            .and(y)
            .fold(A::zero(), |acc, &xi, &yi| acc + xi.conj() * yi)
    } else {
        x.dot(y)
    }
}

/// Euclidean norm of `x`.
///
/// With the `openblas` feature this is BLAS `?nrm2`. Otherwise a scaled sum
/// of squares is accumulated like the reference `nrm2`, so neither tiny nor
/// huge entries over- or underflow on the way. Real and imaginary parts enter
/// as separate terms.
pub fn norm2<A, S>(x: &ArrayBase<S, Ix1>) -> A::Real
    where A: Scalar,
          S: Data<Elem = A>,
{
    #[cfg(feature = "openblas")]
    {
        if let Some(norm) = blas::nrm2(x) {
            return norm;
        }
    }
    scaled_norm2(x)
}

pub(crate) fn scaled_norm2<A, S>(x: &ArrayBase<S, Ix1>) -> A::Real
    where A: Scalar,
          S: Data<Elem = A>,
{
    let zero = A::Real::zero();
    let one = A::Real::one();

    let mut scale = zero;
    let mut ssq = one;

    let mut accumulate = |part: A::Real| {
        if part != zero {
            let absxi = part.abs();
            if scale < absxi {
                ssq = one + ssq * (scale / absxi).powi(2);
                scale = absxi;
            } else {
                ssq = ssq + (absxi / scale).powi(2);
            }
        }
    };

    for &elem in x.iter() {
        accumulate(elem.re());
        if A::IS_COMPLEX {
            accumulate(elem.im());
        }
    }

    scale * ssq.sqrt()
}

/// `r ← Qᴴ·v`
pub(crate) fn project_into<A, S1, S2, S3>(
    basis: &ArrayBase<S1, Ix2>,
    v: &ArrayBase<S2, Ix1>,
    r: &mut ArrayBase<S3, Ix1>,
)
    where A: Scalar,
          S1: Data<Elem = A>,
          S2: Data<Elem = A>,
          S3: DataMut<Elem = A>,
{
    #[cfg(feature = "openblas")]
    {
        if blas::gemv(cblas::Transpose::Conjugate, A::one(), basis, v, A::zero(), r) {
            return;
        }
    }

    if A::IS_COMPLEX {
        // ndarray's gemv has no conjugate-transpose mode.
        Zip::from(r)
            .and(basis.columns())
            .for_each(|rj, qj| *rj = dotc_unchecked(&qj, v));
    } else {
        general_mat_vec_mul(A::one(), &basis.t(), v, A::zero(), r);
    }
}

/// `v ← v − Q·c`
pub(crate) fn subtract_projection<A, S1, S2, S3>(
    basis: &ArrayBase<S1, Ix2>,
    coefficients: &ArrayBase<S2, Ix1>,
    v: &mut ArrayBase<S3, Ix1>,
)
    where A: Scalar,
          S1: Data<Elem = A>,
          S2: Data<Elem = A>,
          S3: DataMut<Elem = A>,
{
    #[cfg(feature = "openblas")]
    {
        if blas::gemv(cblas::Transpose::None, -A::one(), basis, coefficients, A::one(), v) {
            return;
        }
    }

    general_mat_vec_mul(-A::one(), basis, coefficients, A::one(), v);
}

/// `v ← v / norm`, subject to `guard`.
///
/// Under [`NormGuard::Strict`] a zero or non-finite `norm` is rejected and `v`
/// is left untouched.
pub(crate) fn normalize<A, S>(v: &mut ArrayBase<S, Ix1>, norm: A::Real, guard: NormGuard) -> Result<()>
    where A: Scalar,
          S: DataMut<Elem = A>,
{
    if guard == NormGuard::Strict && !(norm > A::Real::zero() && norm.is_finite()) {
        let norm = norm.to_f64().unwrap_or(f64::NAN);
        debug!("refusing to normalize by residual norm {}", norm);
        return Err(Error::DegenerateNorm { norm });
    }

    v.mapv_inplace(|x| x.div_real(norm));
    Ok(())
}

/// Checks a matrix-form basis against the target and coefficient lengths.
pub(crate) fn check_matrix_shapes<A, S>(basis: &ArrayBase<S, Ix2>, target: usize, coefficients: usize) -> Result<()>
    where S: Data<Elem = A>,
{
    let (n_rows, n_cols) = basis.dim();

    if coefficients != n_cols {
        return Err(Error::CoefficientLength { expected: n_cols, got: coefficients });
    }

    if target != n_rows {
        return Err(Error::TargetLength { basis: n_rows, target });
    }

    Ok(())
}
