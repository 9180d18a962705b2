//! DRG with error propagation.

use tracing::debug;

use crate::alloc::Allocator;
use crate::collections::Bitmap;
use crate::error::Result;
use crate::graph::CsrMatrix;
use crate::reduce::best_first::best_first;

/// Retains every vertex whose maximum-product path weight from some source
/// reaches `threshold`.
///
/// Each source contributes weight 1 to itself; following an edge multiplies
/// the weight by the edge coefficient, and a vertex keeps the best weight any
/// path offers it. The matrix is not modified.
///
/// # Errors
/// [`crate::Error::InvalidIndex`] if a source is out of range.
pub fn drgep<A: Allocator + Clone>(
    matrix: &CsrMatrix<A>,
    sources: &[usize],
    threshold: f64,
    alloc: A,
) -> Result<Bitmap<A>> {
    debug!(
        n = matrix.size(),
        threshold,
        sources = sources.len(),
        "running DRGEP"
    );
    let retained = best_first(matrix, sources, threshold, alloc, |along, coef| {
        along * coef
    })?;
    debug!(retained = retained.count(true), "DRGEP finished");
    Ok(retained)
}
