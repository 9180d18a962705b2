//! Neighbour cursors.
//!
//! A cursor walks the stored entries of one row, presenting only the
//! logically present (non-zero) edges. It stays valid across coefficient
//! writes, including writes through the cursor itself, because it tracks a
//! position, not a snapshot; zeroed entries are skipped on the next move.
//! Edge insertion or removal on the row is ruled out while a cursor is live
//! by the borrow it holds on the matrix.

use crate::alloc::{Allocator, Global};
use crate::collections::{lower_bound, Sequence};
use crate::error::Result;
use crate::graph::csr::CsrMatrix;

/// Cursor state shared by both cursor flavours: the owning row, the current
/// entry index, and whether the cursor has walked off the live entries.
#[derive(Clone, Copy)]
struct Cursor {
    from: usize,
    idx: usize,
    stopped: bool,
}

/// Positions a cursor at the first stored entry of `from` with column
/// `>= starting_to` and a non-zero coefficient.
fn seek_row<A: Allocator + Clone>(
    matrix: &CsrMatrix<A>,
    from: usize,
    starting_to: usize,
) -> Result<Cursor> {
    let n = matrix.size();
    if from >= n || starting_to >= n {
        return Err(crate::error::Error::InvalidIndex);
    }
    let (start, end) = matrix.row_bounds(from);
    let mut idx = lower_bound(&matrix.cols, start, end, |&c| c < starting_to)?;
    while idx < end && *matrix.coefs.get(idx)? == 0.0 {
        idx += 1;
    }
    Ok(Cursor {
        from,
        idx,
        stopped: idx == end,
    })
}

impl Cursor {
    fn advance<A: Allocator + Clone>(&mut self, matrix: &CsrMatrix<A>) {
        let (start, end) = matrix.row_bounds(self.from);
        if self.idx >= end {
            self.stopped = true;
            return;
        }
        // A cursor stopped at the row start by a retreat resumes in place
        // once its entry is live again.
        if self.idx == start && self.stopped && coef_at(matrix, self.idx) != 0.0 {
            self.stopped = false;
            return;
        }
        loop {
            self.idx += 1;
            if self.idx >= end {
                self.stopped = true;
                return;
            }
            if coef_at(matrix, self.idx) != 0.0 {
                self.stopped = false;
                return;
            }
        }
    }

    fn retreat<A: Allocator + Clone>(&mut self, matrix: &CsrMatrix<A>) {
        let (start, _) = matrix.row_bounds(self.from);
        while self.idx > start {
            self.idx -= 1;
            if coef_at(matrix, self.idx) != 0.0 {
                self.stopped = false;
                return;
            }
        }
        self.stopped = true;
    }
}

fn coef_at<A: Allocator + Clone>(matrix: &CsrMatrix<A>, idx: usize) -> f64 {
    // SAFETY: callers only pass indices inside the cursor's row bounds, which
    // lie within the coefficient sequence.
    unsafe { *matrix.coefs.get_unchecked(idx) }
}

fn col_at<A: Allocator + Clone>(matrix: &CsrMatrix<A>, idx: usize) -> usize {
    // SAFETY: as for `coef_at`.
    unsafe { *matrix.cols.get_unchecked(idx) }
}

/// A read-only cursor over the out-edges of one vertex.
pub struct Neighbours<'m, A: Allocator + Clone = Global> {
    matrix: &'m CsrMatrix<A>,
    cursor: Cursor,
}

impl<'m, A: Allocator + Clone> Neighbours<'m, A> {
    pub(super) fn seek(matrix: &'m CsrMatrix<A>, from: usize, starting_to: usize) -> Result<Self> {
        Ok(Self {
            cursor: seek_row(matrix, from, starting_to)?,
            matrix,
        })
    }

    /// Returns `true` once the cursor has walked past the live entries.
    pub fn stopped(&self) -> bool {
        self.cursor.stopped
    }

    /// The vertex whose out-edges are being walked.
    pub fn from(&self) -> usize {
        self.cursor.from
    }

    /// The current neighbour.
    ///
    /// # Panics
    /// Panics if the cursor is stopped.
    pub fn to(&self) -> usize {
        assert!(!self.cursor.stopped, "cursor is stopped");
        col_at(self.matrix, self.cursor.idx)
    }

    /// The current edge weight.
    ///
    /// # Panics
    /// Panics if the cursor is stopped.
    pub fn coef(&self) -> f64 {
        assert!(!self.cursor.stopped, "cursor is stopped");
        coef_at(self.matrix, self.cursor.idx)
    }

    /// Moves to the next live entry of the row, or stops at its end.
    pub fn advance(&mut self) {
        self.cursor.advance(self.matrix);
    }

    /// Moves to the previous live entry of the row, or stops at its start.
    pub fn retreat(&mut self) {
        self.cursor.retreat(self.matrix);
    }

    /// Re-targets this cursor in place, as if freshly created with
    /// [`CsrMatrix::neighbours`]. Lets hot loops reuse one cursor per row
    /// instead of constructing a new one.
    ///
    /// # Errors
    /// [`crate::Error::InvalidIndex`] if either vertex is out of range.
    pub fn reseat(&mut self, from: usize, starting_to: usize) -> Result<()> {
        self.cursor = seek_row(self.matrix, from, starting_to)?;
        Ok(())
    }
}

/// A cursor over the out-edges of one vertex that can write coefficients.
///
/// Holds the matrix exclusively, so only one may be live at a time.
pub struct NeighboursMut<'m, A: Allocator + Clone = Global> {
    matrix: &'m mut CsrMatrix<A>,
    cursor: Cursor,
}

impl<'m, A: Allocator + Clone> NeighboursMut<'m, A> {
    pub(super) fn seek(
        matrix: &'m mut CsrMatrix<A>,
        from: usize,
        starting_to: usize,
    ) -> Result<Self> {
        Ok(Self {
            cursor: seek_row(matrix, from, starting_to)?,
            matrix,
        })
    }

    /// Returns `true` once the cursor has walked past the live entries.
    pub fn stopped(&self) -> bool {
        self.cursor.stopped
    }

    /// The vertex whose out-edges are being walked.
    pub fn from(&self) -> usize {
        self.cursor.from
    }

    /// The current neighbour.
    ///
    /// # Panics
    /// Panics if the cursor is stopped.
    pub fn to(&self) -> usize {
        assert!(!self.cursor.stopped, "cursor is stopped");
        col_at(self.matrix, self.cursor.idx)
    }

    /// The current edge weight.
    ///
    /// # Panics
    /// Panics if the cursor is stopped.
    pub fn coef(&self) -> f64 {
        assert!(!self.cursor.stopped, "cursor is stopped");
        coef_at(self.matrix, self.cursor.idx)
    }

    /// Overwrites the current edge weight in place, returning the previous
    /// value. Writing `0.0` makes the entry logically absent; the cursor
    /// transitions to stopped on its next move unless a later live entry
    /// exists.
    ///
    /// # Panics
    /// Panics if the cursor is stopped; debug-panics on a non-finite or
    /// negative value.
    pub fn set_coef(&mut self, value: f64) -> f64 {
        assert!(!self.cursor.stopped, "cursor is stopped");
        debug_assert!(
            value.is_finite() && value >= 0.0,
            "coefficients are finite and non-negative"
        );
        let idx = self.cursor.idx;
        // SAFETY: the active cursor index lies inside the row, hence inside
        // the coefficient sequence.
        let slot = unsafe { self.matrix.coefs.get_unchecked_mut(idx) };
        core::mem::replace(slot, value)
    }

    /// Moves to the next live entry of the row, or stops at its end.
    pub fn advance(&mut self) {
        self.cursor.advance(self.matrix);
    }

    /// Moves to the previous live entry of the row, or stops at its start.
    pub fn retreat(&mut self) {
        self.cursor.retreat(self.matrix);
    }

    /// Re-targets this cursor in place, as if freshly created with
    /// [`CsrMatrix::neighbours_mut`].
    ///
    /// # Errors
    /// [`crate::Error::InvalidIndex`] if either vertex is out of range.
    pub fn reseat(&mut self, from: usize, starting_to: usize) -> Result<()> {
        self.cursor = seek_row(self.matrix, from, starting_to)?;
        Ok(())
    }
}
