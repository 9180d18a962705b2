//! Directed relation graph reduction.

use core::alloc::Layout;

use tracing::debug;

use crate::alloc::{Allocator, ArenaBox, SlotArena};
use crate::collections::{ArraySeq, Bitmap, Sequence};
use crate::error::{Error, Result};
use crate::graph::{CsrMatrix, Neighbours};
use crate::reduce::prune_below;

/// One suspended row walk: the vertex being expanded and its cursor.
type Frame<'ar, 'm, A> = (usize, ArenaBox<'ar, Neighbours<'m, A>, A>);

/// Prunes every edge below `threshold`, then marks the vertices reachable
/// from `sources` along the surviving edges.
///
/// The traversal is an iterative depth-first search over an explicit stack of
/// at most `n` frames; the cursors themselves live in a fixed-slot arena so
/// the walk performs no per-frame heap traffic.
///
/// # Errors
/// [`Error::InvalidIndex`] if a source is out of range; allocation failures
/// propagate as [`Error::OutOfMemory`].
pub fn drg<A: Allocator + Clone>(
    matrix: &mut CsrMatrix<A>,
    sources: &[usize],
    threshold: f64,
    alloc: A,
) -> Result<Bitmap<A>> {
    let n = matrix.size();
    debug!(n, threshold, sources = sources.len(), "running DRG");

    prune_below(matrix, threshold)?;
    let matrix: &CsrMatrix<A> = matrix;

    let mut reachable = Bitmap::filled(n, false, alloc.clone())?;
    let arena = SlotArena::new(Layout::new::<Neighbours<'_, A>>(), n, alloc.clone())?;
    let mut stack: ArraySeq<Frame<'_, '_, A>, A> = ArraySeq::new(n, alloc)?;

    for &source in sources {
        if source >= n {
            return Err(Error::InvalidIndex);
        }
        if reachable.get(source)? {
            continue;
        }
        reachable.set(source, true)?;
        stack.push((source, arena.boxed(matrix.neighbours(source, 0)?)?))?;
        walk(matrix, &arena, &mut stack, &mut reachable)?;
    }

    debug!(retained = reachable.count(true), "DRG finished");
    Ok(reachable)
}

/// Drains the stack: scans the top frame's cursor for the first unvisited
/// neighbour, descends into it, and pops the frame once the row is exhausted.
fn walk<'ar, 'm, A: Allocator + Clone>(
    matrix: &'m CsrMatrix<A>,
    arena: &'ar SlotArena<A>,
    stack: &mut ArraySeq<Frame<'ar, 'm, A>, A>,
    reachable: &mut Bitmap<A>,
) -> Result<()> {
    while !stack.is_empty() {
        let mut descend = None;
        let frame = stack.get_mut(stack.len() - 1)?;
        let cursor = &mut frame.1;
        while !cursor.stopped() {
            let to = cursor.to();
            if !reachable.get(to)? {
                descend = Some(to);
                break;
            }
            cursor.advance();
        }
        match descend {
            Some(vertex) => {
                reachable.set(vertex, true)?;
                stack.push((vertex, arena.boxed(matrix.neighbours(vertex, 0)?)?))?;
            }
            None => {
                stack.remove(stack.len() - 1)?;
            }
        }
    }
    Ok(())
}
