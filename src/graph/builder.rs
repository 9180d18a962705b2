//! Row-at-a-time CSR construction.
//!
//! The host hands over one dense row per vertex, in ascending order; the
//! builder keeps per-row non-zero counts and turns them into canonical
//! row-end offsets with a single prefix sum at finalization. Rows never
//! handed over stay all-zero.

use crate::alloc::{Allocator, Global};
use crate::collections::{ArraySeq, SectionedSeq, Sequence};
use crate::error::{Error, Result};
use crate::graph::csr::CsrMatrix;

/// Builds a [`CsrMatrix`] from dense rows.
///
/// `finalize` consumes the builder, so adding rows to a finalized matrix is
/// unrepresentable in the typed API; the engine facade re-surfaces such
/// misuse as [`Error::InvalidState`] at the host boundary.
pub struct CsrBuilder<A: Allocator + Clone = Global> {
    /// Per-row non-zero counts until `finalize` prefix-sums them.
    rows: ArraySeq<usize, A>,
    cols: SectionedSeq<usize, A>,
    coefs: SectionedSeq<f64, A>,
    next_row: usize,
}

impl CsrBuilder<Global> {
    /// Creates a builder for an `n`-vertex matrix on the process allocator.
    pub fn new(n: usize) -> Result<Self> {
        Self::new_in(n, Global)
    }
}

impl<A: Allocator + Clone> CsrBuilder<A> {
    /// Creates a builder for an `n`-vertex matrix backed by `alloc`.
    pub fn new_in(n: usize, alloc: A) -> Result<Self> {
        Ok(Self {
            rows: ArraySeq::filled(n, 0, alloc.clone())?,
            cols: SectionedSeq::new(alloc.clone())?,
            coefs: SectionedSeq::new(alloc)?,
            next_row: 0,
        })
    }

    /// Number of vertices of the matrix under construction.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Index of the next row that may be added.
    pub fn next_row(&self) -> usize {
        self.next_row
    }

    /// Records the dense row of vertex `row_index`.
    ///
    /// Rows must be added in strictly ascending index order, each at most
    /// once; skipped indices are treated as all-zero rows.
    ///
    /// # Errors
    /// [`Error::InvalidIndex`] if `row_index` is out of range;
    /// [`Error::InvalidArgument`] if the row length differs from the vertex
    /// count, the row order is violated, or an entry is non-finite or
    /// negative.
    pub fn add_row(&mut self, row_index: usize, dense_row: &[f64]) -> Result<()> {
        let n = self.size();
        if row_index >= n {
            return Err(Error::InvalidIndex);
        }
        if dense_row.len() != n || row_index < self.next_row {
            return Err(Error::InvalidArgument);
        }
        for &value in dense_row {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidArgument);
            }
        }

        let mut stored = 0usize;
        for (col, &value) in dense_row.iter().enumerate() {
            if value != 0.0 {
                self.cols.push(col)?;
                self.coefs.push(value)?;
                stored += 1;
            }
        }
        self.rows.set(row_index, stored)?;
        self.next_row = row_index + 1;
        Ok(())
    }

    /// Converts the per-row counts into canonical row-end offsets and
    /// assembles the matrix.
    pub fn finalize(mut self) -> CsrMatrix<A> {
        let mut running = 0usize;
        for end in self.rows.as_mut_slice() {
            running += *end;
            *end = running;
        }
        debug_assert_eq!(running, self.cols.len());
        CsrMatrix {
            rows: self.rows,
            cols: self.cols,
            coefs: self.coefs,
        }
    }
}
