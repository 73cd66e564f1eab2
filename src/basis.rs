use ndarray::prelude::*;
use ndarray::Data;

use crate::{Error, Result, Scalar};

/// An ordered collection of equally long vectors, accessed by view.
///
/// Implemented for matrices, whose columns are the basis vectors, and for
/// slices or vectors of one-dimensional arrays. [`Modified`](crate::Modified)
/// runs the same loop over either form.
pub trait Basis<A: Scalar> {
    /// Number of basis vectors.
    fn n_vectors(&self) -> usize;

    /// A view of the `index`-th basis vector.
    fn vector(&self, index: usize) -> ArrayView1<'_, A>;

    /// Verifies that every basis vector has length `target`.
    fn check_lengths(&self, target: usize) -> Result<()> {
        for index in 0..self.n_vectors() {
            let got = self.vector(index).len();
            if got != target {
                return Err(Error::VectorLength { index, expected: target, got });
            }
        }
        Ok(())
    }
}

impl<A, S> Basis<A> for ArrayBase<S, Ix2>
    where A: Scalar,
          S: Data<Elem = A>,
{
    fn n_vectors(&self) -> usize {
        self.ncols()
    }

    fn vector(&self, index: usize) -> ArrayView1<'_, A> {
        self.column(index)
    }

    fn check_lengths(&self, target: usize) -> Result<()> {
        // All columns share the row count.
        if self.nrows() != target {
            return Err(Error::TargetLength { basis: self.nrows(), target });
        }
        Ok(())
    }
}

impl<A, S> Basis<A> for [ArrayBase<S, Ix1>]
    where A: Scalar,
          S: Data<Elem = A>,
{
    fn n_vectors(&self) -> usize {
        self.len()
    }

    fn vector(&self, index: usize) -> ArrayView1<'_, A> {
        self[index].view()
    }
}

impl<A, S> Basis<A> for Vec<ArrayBase<S, Ix1>>
    where A: Scalar,
          S: Data<Elem = A>,
{
    fn n_vectors(&self) -> usize {
        self.len()
    }

    fn vector(&self, index: usize) -> ArrayView1<'_, A> {
        self[index].view()
    }
}
