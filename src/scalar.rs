#[cfg(feature = "openblas")]
use cblas::{Layout, Transpose};
use ndarray::{LinalgScalar, NdFloat, ScalarOperand};
use num_complex::Complex;
use std::fmt::Debug;
use std::ops::Neg;

/// Element type of the basis, target and coefficient vectors.
///
/// Implemented for `f32`, `f64` and their complex counterparts. Norms and the
/// stopping rule of [`Repeated`](crate::Repeated) are evaluated in the
/// associated [`Real`](Scalar::Real) type, even for complex vectors.
pub trait Scalar: LinalgScalar + ScalarOperand + Neg<Output = Self> + Debug + Send + Sync {
    /// The real type carrying magnitudes, e.g. `f64` for `Complex<f64>`.
    type Real: NdFloat + Scalar<Real = Self::Real>;

    /// `true` for complex element types.
    const IS_COMPLEX: bool;

    /// Complex conjugate; the identity for real types.
    fn conj(self) -> Self;

    /// Real part.
    fn re(self) -> Self::Real;

    /// Imaginary part; zero for real types.
    fn im(self) -> Self::Real;

    fn from_real(re: Self::Real) -> Self;

    /// Squared magnitude `|x|²`.
    fn abs_sqr(self) -> Self::Real;

    /// Divides by a real scalar without promoting the divisor to `Self`.
    fn div_real(self, divisor: Self::Real) -> Self;

    /// BLAS `?nrm2` for this type.
    ///
    /// # Safety
    ///
    /// `x` must hold `n` elements spaced `incx` apart.
    #[doc(hidden)]
    #[cfg(feature = "openblas")]
    unsafe fn nrm2(n: i32, x: &[Self], incx: i32) -> Self::Real;

    /// BLAS `?gemv` for this type: `y ← α·op(A)·x + β·y` for an `m × n` matrix `A`.
    ///
    /// # Safety
    ///
    /// `a`, `x` and `y` must cover the elements the dimensions, leading dimension and
    /// increments address.
    #[doc(hidden)]
    #[cfg(feature = "openblas")]
    #[allow(clippy::too_many_arguments)]
    unsafe fn gemv(
        layout: Layout,
        trans: Transpose,
        m: i32,
        n: i32,
        alpha: Self,
        a: &[Self],
        lda: i32,
        x: &[Self],
        incx: i32,
        beta: Self,
        y: &mut [Self],
        incy: i32,
    );
}

// The BLAS hooks only forward; callers in `blas` vouch for the slice extents.
macro_rules! impl_blas {
    ($nrm2:ident, $gemv:ident) => {
        #[cfg(feature = "openblas")]
        #[inline]
        unsafe fn nrm2(n: i32, x: &[Self], incx: i32) -> Self::Real {
            cblas::$nrm2(n, x, incx)
        }

        #[cfg(feature = "openblas")]
        #[inline]
        unsafe fn gemv(
            layout: Layout,
            trans: Transpose,
            m: i32,
            n: i32,
            alpha: Self,
            a: &[Self],
            lda: i32,
            x: &[Self],
            incx: i32,
            beta: Self,
            y: &mut [Self],
            incy: i32,
        ) {
            cblas::$gemv(layout, trans, m, n, alpha, a, lda, x, incx, beta, y, incy)
        }
    };
}

macro_rules! impl_real {
    ($real:ty, $nrm2:ident, $gemv:ident) => {
        impl Scalar for $real {
            type Real = $real;

            const IS_COMPLEX: bool = false;

            #[inline]
            fn conj(self) -> Self {
                self
            }

            #[inline]
            fn re(self) -> $real {
                self
            }

            #[inline]
            fn im(self) -> $real {
                0.0
            }

            #[inline]
            fn from_real(re: $real) -> Self {
                re
            }

            #[inline]
            fn abs_sqr(self) -> $real {
                self * self
            }

            #[inline]
            fn div_real(self, divisor: $real) -> Self {
                self / divisor
            }

            impl_blas!($nrm2, $gemv);
        }
    };
}

macro_rules! impl_complex {
    ($real:ty, $nrm2:ident, $gemv:ident) => {
        impl Scalar for Complex<$real> {
            type Real = $real;

            const IS_COMPLEX: bool = true;

            #[inline]
            fn conj(self) -> Self {
                Complex::new(self.re, -self.im)
            }

            #[inline]
            fn re(self) -> $real {
                self.re
            }

            #[inline]
            fn im(self) -> $real {
                self.im
            }

            #[inline]
            fn from_real(re: $real) -> Self {
                Complex::new(re, 0.0)
            }

            #[inline]
            fn abs_sqr(self) -> $real {
                self.re * self.re + self.im * self.im
            }

            #[inline]
            fn div_real(self, divisor: $real) -> Self {
                Complex::new(self.re / divisor, self.im / divisor)
            }

            impl_blas!($nrm2, $gemv);
        }
    };
}

impl_real!(f32, snrm2, sgemv);
impl_real!(f64, dnrm2, dgemv);
impl_complex!(f32, scnrm2, cgemv);
impl_complex!(f64, dznrm2, zgemv);
