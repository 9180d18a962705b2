//! Best-first propagation of path weights, shared by DRGEP and PFA.
//!
//! Per source, the engine grows a frontier ordered by current path weight
//! (ties broken by vertex index) and always expands the heaviest entry.
//! Edge weights lie in `[0, 1]` in practice, so path weights only decay along
//! a walk; expanding best-first means a vertex is finalized the first time it
//! is popped, and everything falling below the threshold is never enqueued at
//! all.
//!
//! The worklist is a sorted array with binary-search insertion, popped from
//! the tail. Improving an already-queued vertex relocates its slot with a
//! block shift: the stale position is found with the *old* key before the new
//! one is written, then the insert position is computed with the new key.

use crate::alloc::Allocator;
use crate::collections::{lower_bound, ArraySeq, Bitmap, Sequence};
use crate::error::{Error, Result};
use crate::graph::CsrMatrix;

/// Runs the best-first sweep from every source and returns the union of the
/// per-source retained sets.
pub(crate) fn best_first<A, F>(
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
    let n = matrix.size();
    let mut result = Bitmap::filled(n, false, alloc.clone())?;
    let mut queue: ArraySeq<usize, A> = ArraySeq::new(n, alloc.clone())?;
    let mut paths: ArraySeq<f64, A> = ArraySeq::filled(n, 0.0, alloc)?;

    for (i, &source) in sources.iter().enumerate() {
        if source >= n {
            return Err(Error::InvalidIndex);
        }
        expand(matrix, source, threshold, &mut queue, &mut paths, &accumulate)?;
        for (vertex, &weight) in paths.as_slice().iter().enumerate() {
            if weight >= threshold {
                result.set(vertex, true)?;
            }
        }
        // The queue drained inside `expand`; only the weights need resetting.
        if i + 1 < sources.len() {
            paths.fill(0.0);
        }
    }
    Ok(result)
}

/// Computes into `paths` the maximum accumulated weight from `source` to
/// every vertex it reaches above `threshold`.
fn expand<A, F>(
    matrix: &CsrMatrix<A>,
    source: usize,
    threshold: f64,
    queue: &mut ArraySeq<usize, A>,
    paths: &mut ArraySeq<f64, A>,
    accumulate: &F,
) -> Result<()>
where
    A: Allocator + Clone,
    F: Fn(f64, f64) -> f64,
{
    queue.push(source)?;
    paths.set(source, 1.0)?;

    let mut edges = matrix.neighbours(source, 0)?;
    while !queue.is_empty() {
        let vertex = queue.remove(queue.len() - 1)?;
        let along = *paths.get(vertex)?;
        edges.reseat(vertex, 0)?;
        while !edges.stopped() {
            let to = edges.to();
            let offered = accumulate(along, edges.coef());
            let current = *paths.get(to)?;
            if offered > current && offered >= threshold {
                if current == 0.0 {
                    let at = slot_for(queue, paths.as_slice(), to, offered)?;
                    queue.insert(at, to)?;
                } else {
                    reprioritize(queue, paths.as_slice(), to, current, offered)?;
                }
                paths.set(to, offered)?;
            }
            edges.advance();
        }
    }
    Ok(())
}

/// The insertion slot keeping the queue sorted by `(weight, vertex)`
/// ascending, where `vertex` is keyed by `key` rather than its stale entry in
/// `paths`.
fn slot_for<A: Allocator + Clone>(
    queue: &ArraySeq<usize, A>,
    paths: &[f64],
    vertex: usize,
    key: f64,
) -> Result<usize> {
    lower_bound(queue, 0, queue.len(), |&q| {
        let qk = if q == vertex { key } else { paths[q] };
        qk < key || (qk == key && q <= vertex)
    })
}

/// Moves an already-queued vertex to the slot its improved weight calls for.
///
/// The stale slot is located with `old_key`, the value still in `paths`;
/// everything between it and the new slot shifts down one place.
fn reprioritize<A: Allocator + Clone>(
    queue: &mut ArraySeq<usize, A>,
    paths: &[f64],
    vertex: usize,
    old_key: f64,
    new_key: f64,
) -> Result<()> {
    let stale = lower_bound(queue, 0, queue.len(), |&q| {
        let qk = paths[q];
        qk < old_key || (qk == old_key && q < vertex)
    })?;
    if stale >= queue.len() || *queue.get(stale)? != vertex {
        return Err(Error::InvalidArgument);
    }
    let target = slot_for(queue, paths, vertex, new_key)?;
    debug_assert!(target > stale, "weights only improve");
    if stale + 1 != target {
        let slots = queue.as_mut_slice();
        slots.copy_within(stale + 1..target, stale);
        slots[target - 1] = vertex;
    }
    Ok(())
}
