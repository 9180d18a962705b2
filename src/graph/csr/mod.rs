//! A mutable CSR (compressed sparse row) adjacency matrix.
//!
//! The matrix stores a directed weighted graph on `n` vertices as three
//! parallel sequences:
//!
//! - `rows[i]` — one past the last index in `cols`/`coefs` of row `i`'s
//!   stored entries (a prefix sum over per-row counts),
//! - `cols[k]` — the column of stored entry `k`, strictly increasing within
//!   each row,
//! - `coefs[k]` — its weight, finite and non-negative.
//!
//! A stored zero coefficient is *logically absent*: lookups report it as a
//! missing edge and the neighbour cursors skip it, but nothing is physically
//! removed. That is what lets the reducers zero out sub-threshold edges in
//! place without invalidating the row structure.
//!
//! The row-end array is a plain contiguous sequence; the column/coefficient
//! arrays are sectioned so edge insertion shifts one section instead of the
//! whole payload.

use crate::alloc::{Allocator, Global};
use crate::collections::{lower_bound, ArraySeq, SectionedSeq, Sequence};
use crate::error::{Error, Result};

mod iter;
#[cfg(test)]
mod tests;

pub use iter::{Neighbours, NeighboursMut};

/// A directed weighted graph in CSR form.
pub struct CsrMatrix<A: Allocator + Clone = Global> {
    pub(super) rows: ArraySeq<usize, A>,
    pub(super) cols: SectionedSeq<usize, A>,
    pub(super) coefs: SectionedSeq<f64, A>,
}

impl<A: Allocator + Clone> CsrMatrix<A> {
    /// Assembles a matrix from its three backing sequences, validating the
    /// CSR invariants.
    ///
    /// `rows` must be a non-decreasing row-end array whose last entry equals
    /// the length of `cols` and `coefs`; columns must be strictly increasing
    /// within each row and in `[0, n)`; coefficients must be finite and
    /// non-negative.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if any invariant fails.
    pub fn from_parts(
        rows: ArraySeq<usize, A>,
        cols: SectionedSeq<usize, A>,
        coefs: SectionedSeq<f64, A>,
    ) -> Result<Self> {
        let n = rows.len();
        let stored = cols.len();
        if coefs.len() != stored {
            return Err(Error::InvalidArgument);
        }
        let last = if n == 0 { 0 } else { *rows.get(n - 1)? };
        if last != stored {
            return Err(Error::InvalidArgument);
        }
        let mut start = 0usize;
        for i in 0..n {
            let end = *rows.get(i)?;
            if end < start {
                return Err(Error::InvalidArgument);
            }
            let mut prev_col = None;
            for k in start..end {
                let col = *cols.get(k)?;
                if col >= n || prev_col.is_some_and(|p| col <= p) {
                    return Err(Error::InvalidArgument);
                }
                prev_col = Some(col);
                let coef = *coefs.get(k)?;
                if !coef.is_finite() || coef < 0.0 {
                    return Err(Error::InvalidArgument);
                }
            }
            start = end;
        }
        Ok(Self { rows, cols, coefs })
    }

    /// Disassembles the matrix, returning its backing sequences to the caller.
    pub fn into_parts(
        self,
    ) -> (
        ArraySeq<usize, A>,
        SectionedSeq<usize, A>,
        SectionedSeq<f64, A>,
    ) {
        (self.rows, self.cols, self.coefs)
    }

    /// Number of vertices.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Number of stored entries, including logically absent zeros.
    pub fn stored_entries(&self) -> usize {
        self.cols.len()
    }

    /// Half-open index range of row `from` in `cols`/`coefs`.
    pub(crate) fn row_bounds(&self, from: usize) -> (usize, usize) {
        debug_assert!(from < self.rows.len());
        let rows = self.rows.as_slice();
        let start = if from == 0 { 0 } else { rows[from - 1] };
        (start, rows[from])
    }

    /// Locates `to` within row `from`: the entry index if the edge is stored,
    /// otherwise the position where it would be inserted.
    fn locate(&self, from: usize, to: usize) -> Result<(usize, bool)> {
        let (start, end) = self.row_bounds(from);
        let idx = lower_bound(&self.cols, start, end, |&c| c < to)?;
        let found = idx < end && *self.cols.get(idx)? == to;
        Ok((idx, found))
    }

    /// The coefficient of edge `(from, to)`, or `0.0` when the edge is not
    /// stored.
    ///
    /// # Errors
    /// [`Error::InvalidIndex`] if either vertex is out of range.
    pub fn coef(&self, from: usize, to: usize) -> Result<f64> {
        let n = self.size();
        if from >= n || to >= n {
            return Err(Error::InvalidIndex);
        }
        let (idx, found) = self.locate(from, to)?;
        if found {
            Ok(*self.coefs.get(idx)?)
        } else {
            Ok(0.0)
        }
    }

    /// Sets the coefficient of edge `(from, to)`, returning the previous
    /// value.
    ///
    /// A stored entry is overwritten in place, including with zero, which
    /// leaves it logically absent but physically present. A missing entry is
    /// inserted at its sorted position and every later row end is bumped;
    /// writing zero to a missing entry is a no-op.
    ///
    /// # Errors
    /// [`Error::InvalidIndex`] for out-of-range vertices,
    /// [`Error::InvalidArgument`] for a non-finite or negative value.
    pub fn set(&mut self, from: usize, to: usize, value: f64) -> Result<f64> {
        let n = self.size();
        if from >= n || to >= n {
            return Err(Error::InvalidIndex);
        }
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidArgument);
        }
        let (idx, found) = self.locate(from, to)?;
        if found {
            return self.coefs.replace(idx, value);
        }
        if value == 0.0 {
            return Ok(0.0);
        }
        self.cols.insert(idx, to)?;
        self.coefs.insert(idx, value)?;
        for end in &mut self.rows.as_mut_slice()[from..] {
            *end += 1;
        }
        Ok(0.0)
    }

    /// Creates a cursor over the stored, non-zero out-edges of `from`,
    /// positioned at the first entry with column `>= starting_to` (stopped if
    /// there is none).
    ///
    /// Any number of cursors may be live at once; they borrow the matrix
    /// shared, so edge structure cannot change underneath them.
    ///
    /// # Errors
    /// [`Error::InvalidIndex`] if either vertex is out of range.
    pub fn neighbours(&self, from: usize, starting_to: usize) -> Result<Neighbours<'_, A>> {
        Neighbours::seek(self, from, starting_to)
    }

    /// Like [`neighbours`](Self::neighbours), but the cursor can write
    /// coefficients in place. Exactly one may be live at a time.
    ///
    /// # Errors
    /// [`Error::InvalidIndex`] if either vertex is out of range.
    pub fn neighbours_mut(&mut self, from: usize, starting_to: usize) -> Result<NeighboursMut<'_, A>> {
        NeighboursMut::seek(self, from, starting_to)
    }
}

impl<A: Allocator + Clone> core::fmt::Debug for CsrMatrix<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CsrMatrix")
            .field("size", &self.size())
            .field("stored_entries", &self.stored_entries())
            .finish()
    }
}
