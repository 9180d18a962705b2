//! Path flux analysis.
//!
//! The host builds the PFA interaction matrix out of first- and
//! second-generation production/consumption fluxes; on the engine side the
//! sweep is the same best-first skeleton as DRGEP, differing only in how a
//! path weight absorbs the next edge. That accumulation is exposed as a
//! parameter so hosts can match whichever PFA variant their matrix encodes;
//! the default multiplies like DRGEP.

use tracing::debug;

use crate::alloc::Allocator;
use crate::collections::Bitmap;
use crate::error::Result;
use crate::graph::CsrMatrix;
use crate::reduce::best_first::best_first;

/// Runs path flux analysis with the default multiplicative accumulation.
///
/// # Errors
/// [`crate::Error::InvalidIndex`] if a source is out of range.
pub fn pfa<A: Allocator + Clone>(
    matrix: &CsrMatrix<A>,
    sources: &[usize],
    threshold: f64,
    alloc: A,
) -> Result<Bitmap<A>> {
    pfa_with(matrix, sources, threshold, alloc, |along, coef| along * coef)
}

/// Runs path flux analysis with a caller-supplied accumulation.
///
/// `accumulate(along, coef)` folds the weight of the path so far with the
/// coefficient of the edge being crossed; it must be monotonically
/// non-increasing in practice for the best-first expansion to finalize
/// vertices on first pop.
///
/// # Errors
/// [`crate::Error::InvalidIndex`] if a source is out of range.
pub fn pfa_with<A, F>(
    matrix: &CsrMatrix<A>,
    sources: &[usize],
    threshold: f64,
    alloc: A,
    accumulate: F,
) -> Result<Bitmap<A>>
where
    A: Allocator + Clone,
    F: Fn(f64, f64) -> f64,
{
    debug!(
        n = matrix.size(),
        threshold,
        sources = sources.len(),
        "running PFA"
    );
    let retained = best_first(matrix, sources, threshold, alloc, accumulate)?;
    debug!(retained = retained.count(true), "PFA finished");
    Ok(retained)
}
