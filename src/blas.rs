//! Hands arrays to CBLAS.
//!
//! BLAS addresses a matrix through a base pointer, a layout and a leading dimension, and a
//! vector through a base pointer and an increment. Views whose strides fit that scheme are passed
//! through as slices over the memory they span; anything else (negative or non-unit inner
//! strides, empty arrays) is refused so that the caller can take the Rust path.

use std::slice;

use cblas::{Layout, Transpose};
use ndarray::prelude::*;
use ndarray::{Data, DataMut};

use crate::Scalar;

/// How BLAS addresses a matrix view.
struct MatrixLayout {
    layout: Layout,
    rows: i32,
    cols: i32,
    leading_dim: i32,
    /// Elements between the first and last one, inclusive.
    extent: usize,
}

fn matrix_layout<A, S>(a: &ArrayBase<S, Ix2>) -> Option<MatrixLayout>
    where S: Data<Elem = A>,
{
    let (n_rows, n_cols) = a.dim();
    if n_rows == 0 || n_cols == 0 {
        return None;
    }
    let row_stride = a.strides()[0];
    let col_stride = a.strides()[1];

    let (layout, leading_dim, extent) = if col_stride == 1 && (n_rows == 1 || row_stride >= n_cols as isize) {
        let leading_dim = if n_rows == 1 { n_cols } else { row_stride as usize };
        (Layout::RowMajor, leading_dim, (n_rows - 1) * leading_dim + n_cols)
    } else if row_stride == 1 && (n_cols == 1 || col_stride >= n_rows as isize) {
        let leading_dim = if n_cols == 1 { n_rows } else { col_stride as usize };
        (Layout::ColumnMajor, leading_dim, (n_cols - 1) * leading_dim + n_rows)
    } else {
        return None;
    };

    Some(MatrixLayout {
        layout,
        rows: i32::try_from(n_rows).ok()?,
        cols: i32::try_from(n_cols).ok()?,
        leading_dim: i32::try_from(leading_dim).ok()?,
        extent,
    })
}

/// Length, increment and extent of a vector BLAS can address.
fn vector_layout<A, S>(x: &ArrayBase<S, Ix1>) -> Option<(i32, i32, usize)>
    where S: Data<Elem = A>,
{
    let n = x.len();
    let stride = x.strides()[0];
    if n == 0 || (n > 1 && stride < 1) {
        return None;
    }
    let inc = if n == 1 { 1 } else { stride as usize };
    Some((i32::try_from(n).ok()?, i32::try_from(inc).ok()?, (n - 1) * inc + 1))
}

fn address_range<A>(first: *const A, extent: usize) -> std::ops::Range<usize> {
    let start = first as usize;
    start..start + extent * std::mem::size_of::<A>()
}

fn disjoint(a: &std::ops::Range<usize>, b: &std::ops::Range<usize>) -> bool {
    a.end <= b.start || b.end <= a.start
}

/// `‖x‖₂` through `?nrm2`, or `None` if `x` cannot be handed to BLAS.
pub(crate) fn nrm2<A, S>(x: &ArrayBase<S, Ix1>) -> Option<A::Real>
    where A: Scalar,
          S: Data<Elem = A>,
{
    let (n, inc, extent) = vector_layout(x)?;
    // A positive stride view reaches exactly `extent` elements from its first one.
    let data = unsafe { slice::from_raw_parts(x.as_ptr(), extent) };
    Some(unsafe { A::nrm2(n, data, inc) })
}

/// `y ← α·op(A)·x + β·y` through `?gemv`.
///
/// Returns `false` without touching `y` if an operand cannot be handed to BLAS, or if the memory
/// spanned by `y` interleaves with that of `A` or `x`, as it does for neighbouring columns of a
/// row-major matrix. The caller has already checked that the lengths of `x` and `y` agree with
/// `op(A)`.
pub(crate) fn gemv<A, S1, S2, S3>(
    trans: Transpose,
    alpha: A,
    a: &ArrayBase<S1, Ix2>,
    x: &ArrayBase<S2, Ix1>,
    beta: A,
    y: &mut ArrayBase<S3, Ix1>,
) -> bool
    where A: Scalar,
          S1: Data<Elem = A>,
          S2: Data<Elem = A>,
          S3: DataMut<Elem = A>,
{
    let (Some(a_layout), Some((_, incx, x_extent)), Some((_, incy, y_extent))) =
        (matrix_layout(a), vector_layout(x), vector_layout(y))
    else {
        return false;
    };

    let y_range = address_range(y.as_ptr(), y_extent);
    if !disjoint(&y_range, &address_range(a.as_ptr(), a_layout.extent))
        || !disjoint(&y_range, &address_range(x.as_ptr(), x_extent))
    {
        return false;
    }

    // Each slice covers exactly the elements its view reaches, and the mutable one overlaps
    // neither of the others.
    unsafe {
        let a_data = slice::from_raw_parts(a.as_ptr(), a_layout.extent);
        let x_data = slice::from_raw_parts(x.as_ptr(), x_extent);
        let y_data = slice::from_raw_parts_mut(y.as_mut_ptr(), y_extent);

        A::gemv(
            a_layout.layout,
            trans,
            a_layout.rows,
            a_layout.cols,
            alpha,
            a_data,
            a_layout.leading_dim,
            x_data,
            incx,
            beta,
            y_data,
            incy,
        );
    }
    true
}
