//! # `skelred` - skeletal reduction of weighted directed graphs
//!
//! A single-threaded engine that prunes a large sparse weighted digraph down
//! to the vertices that matter from a set of *source* vertices, under one of
//! three reduction policies: DRG (threshold pruning plus reachability),
//! DRGEP (best-first maximum-product path weights) and PFA (the same
//! skeleton with a swappable accumulation). It is built to sit behind a host
//! bridge performing chemical-kinetics mechanism reduction, where the graph
//! is a species interaction matrix with tens of thousands to low millions of
//! vertices.
//!
//! ## Architecture
//!
//! The crate is layered bottom-up:
//!
//! 1. **Allocation** ([`alloc`]): an [`Allocator`] handle injected into every
//!    container, with [`Global`] as the default and [`SlotArena`] as a
//!    bounded fixed-slot arena for reducer-scoped objects.
//! 2. **Sequences** ([`collections`]): one [`Sequence`] contract over
//!    [`ArraySeq`] (contiguous, fixed capacity) and [`SectionedSeq`]
//!    (fixed-size sections, bounded-cost edits), plus the bit-packed
//!    [`Bitmap`].
//! 3. **Graph** ([`graph`]): a mutable CSR adjacency matrix with in-place
//!    coefficient updates, sorted edge insertion, and zero-skipping neighbour
//!    cursors that stay valid across coefficient writes.
//! 4. **Reduction** ([`reduce`]): the three policies over the layers below.
//! 5. **Engine** ([`engine`]): the row-by-row builder protocol and method
//!    dispatch a host bridge embeds.
//!
//! ## Example
//!
//! ```rust
//! use skelred::{Method, ReductionEngine};
//!
//! # fn main() -> Result<(), skelred::Error> {
//! // A 3-vertex cycle with one weak edge.
//! let mut engine = ReductionEngine::new(3)?;
//! engine.add_row(0, &[0.0, 0.9, 0.0])?;
//! engine.add_row(1, &[0.0, 0.0, 0.8])?;
//! engine.add_row(2, &[0.7, 0.0, 0.0])?;
//! engine.finalize()?;
//!
//! // Everything is reachable from vertex 0 above weight 0.5 ...
//! let retained = engine.run_reducing(Method::Drg, 0.5, &[0])?;
//! assert_eq!(retained, vec![0, 1, 2]);
//!
//! // ... but a stricter threshold severs the chain after vertex 1.
//! let retained = engine.run_reducing(Method::Drg, 0.85, &[0])?;
//! assert_eq!(retained, vec![0, 1]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Scope
//!
//! Everything runs to completion on the caller's thread: no locks, no I/O,
//! no internal threading. The vertex count is fixed once a matrix is
//! finalized. Coefficients are finite, non-negative `f64`; a stored zero is
//! treated as an absent edge everywhere.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod alloc;
pub mod collections;
pub mod engine;
mod error;
pub mod graph;
pub mod reduce;

pub use alloc::{Allocator, Global, SlotArena};
pub use collections::{ArraySeq, Bitmap, SectionedSeq, Sequence};
pub use engine::ReductionEngine;
pub use error::{Error, Result};
pub use graph::{CsrBuilder, CsrMatrix, Neighbours, NeighboursMut};
pub use reduce::{drg, drgep, pfa, pfa_with, Method};
