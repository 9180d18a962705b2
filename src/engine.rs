//! The embeddable host-facing surface.
//!
//! A host bridge drives one [`ReductionEngine`] per reduction: build the
//! matrix row by row, finalize it, then run reductions against it. The
//! typed builder/matrix split underneath makes lifecycle misuse
//! unrepresentable inside the crate; this facade re-introduces the dynamic
//! checks a foreign caller needs and maps them onto [`Error::InvalidState`].

use tracing::debug;

use crate::alloc::{Allocator, Global};
use crate::error::{Error, Result};
use crate::graph::{CsrBuilder, CsrMatrix};
use crate::reduce::{drg, drgep, pfa, Method};

enum Stage<A: Allocator + Clone> {
    Building(CsrBuilder<A>),
    Ready(CsrMatrix<A>),
}

/// Builder protocol plus reduction dispatch over one adjacency matrix.
pub struct ReductionEngine<A: Allocator + Clone = Global> {
    stage: Stage<A>,
    alloc: A,
}

impl ReductionEngine<Global> {
    /// Creates an engine for an `n`-vertex matrix on the process allocator.
    pub fn new(n: usize) -> Result<Self> {
        Self::new_in(n, Global)
    }
}

impl<A: Allocator + Clone> ReductionEngine<A> {
    /// Creates an engine for an `n`-vertex matrix backed by `alloc`.
    pub fn new_in(n: usize, alloc: A) -> Result<Self> {
        Ok(Self {
            stage: Stage::Building(CsrBuilder::new_in(n, alloc.clone())?),
            alloc,
        })
    }

    /// Number of vertices.
    pub fn size(&self) -> usize {
        match &self.stage {
            Stage::Building(builder) => builder.size(),
            Stage::Ready(matrix) => matrix.size(),
        }
    }

    /// Returns `true` once [`finalize`](Self::finalize) has run.
    pub fn is_finalized(&self) -> bool {
        matches!(self.stage, Stage::Ready(_))
    }

    /// Records the dense row of vertex `row_index`; see
    /// [`CsrBuilder::add_row`] for the row contract.
    ///
    /// # Errors
    /// [`Error::InvalidState`] after finalization; otherwise as the builder.
    pub fn add_row(&mut self, row_index: usize, dense_row: &[f64]) -> Result<()> {
        match &mut self.stage {
            Stage::Building(builder) => builder.add_row(row_index, dense_row),
            Stage::Ready(_) => Err(Error::InvalidState),
        }
    }

    /// Converts the accumulated rows into canonical CSR form.
    ///
    /// # Errors
    /// [`Error::InvalidState`] if already finalized.
    pub fn finalize(&mut self) -> Result<()> {
        // The builder is consumed by value; a placeholder keeps the engine
        // whole if anything goes wrong mid-swap.
        match core::mem::replace(
            &mut self.stage,
            Stage::Building(CsrBuilder::new_in(0, self.alloc.clone())?),
        ) {
            Stage::Building(builder) => {
                debug!(n = builder.size(), "finalizing matrix");
                self.stage = Stage::Ready(builder.finalize());
                Ok(())
            }
            ready @ Stage::Ready(_) => {
                self.stage = ready;
                Err(Error::InvalidState)
            }
        }
    }

    /// Runs a reduction and returns the sorted indices of retained vertices.
    ///
    /// DRG prunes the stored matrix in place, exactly as the in-process
    /// callers see it; subsequent runs observe the pruned coefficients.
    ///
    /// # Errors
    /// [`Error::InvalidState`] before finalization;
    /// [`Error::InvalidArgument`] for a non-finite or negative threshold or
    /// an out-of-range source.
    pub fn run_reducing(
        &mut self,
        method: Method,
        threshold: f64,
        sources: &[usize],
    ) -> Result<Vec<usize>> {
        let matrix = match &mut self.stage {
            Stage::Ready(matrix) => matrix,
            Stage::Building(_) => return Err(Error::InvalidState),
        };
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::InvalidArgument);
        }
        if sources.iter().any(|&s| s >= matrix.size()) {
            return Err(Error::InvalidArgument);
        }
        debug!(%method, threshold, sources = sources.len(), "run_reducing");

        let retained = match method {
            Method::Drg => drg(matrix, sources, threshold, self.alloc.clone())?,
            Method::Drgep => drgep(matrix, sources, threshold, self.alloc.clone())?,
            Method::Pfa => pfa(matrix, sources, threshold, self.alloc.clone())?,
        };
        let indices: Vec<usize> = retained.ones().collect();
        debug!(retained = indices.len(), "run_reducing finished");
        Ok(indices)
    }

    /// Shared access to the finalized matrix.
    ///
    /// # Errors
    /// [`Error::InvalidState`] before finalization.
    pub fn matrix(&self) -> Result<&CsrMatrix<A>> {
        match &self.stage {
            Stage::Ready(matrix) => Ok(matrix),
            Stage::Building(_) => Err(Error::InvalidState),
        }
    }
}
