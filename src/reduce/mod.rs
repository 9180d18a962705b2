//! Skeletal-reduction algorithms.
//!
//! All three reducers take `(matrix, sources, threshold, allocator)` and
//! return a bitmap marking the retained vertices:
//!
//! - [`drg`] prunes every edge below the threshold, then keeps exactly the
//!   vertices reachable from the sources.
//! - [`drgep`] keeps the vertices whose maximum-product path weight from some
//!   source reaches the threshold.
//! - [`pfa`] shares the best-first skeleton of DRGEP with a swappable
//!   per-edge accumulation; see [`pfa_with`].

use core::fmt;
use core::str::FromStr;

use crate::alloc::Allocator;
use crate::error::{Error, Result};
use crate::graph::CsrMatrix;

mod best_first;
mod drg;
mod drgep;
mod pfa;

pub use drg::drg;
pub use drgep::drgep;
pub use pfa::{pfa, pfa_with};

/// The reduction method requested by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Directed relation graph: threshold pruning plus reachability.
    Drg,
    /// DRG with error propagation: best-first maximum-product path weights.
    Drgep,
    /// Path flux analysis: the DRGEP skeleton with its own accumulation.
    Pfa,
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DRG" => Ok(Self::Drg),
            "DRGEP" => Ok(Self::Drgep),
            "PFA" => Ok(Self::Pfa),
            _ => Err(Error::InvalidArgument),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Drg => "DRG",
            Self::Drgep => "DRGEP",
            Self::Pfa => "PFA",
        })
    }
}

/// Zeroes every stored coefficient below `threshold`, in place.
///
/// Cursors opened afterwards skip the zeroed entries, so the graph behaves as
/// if the weak edges were removed without paying for physical removal.
pub fn prune_below<A: Allocator + Clone>(matrix: &mut CsrMatrix<A>, threshold: f64) -> Result<()> {
    for from in 0..matrix.size() {
        let mut edges = matrix.neighbours_mut(from, 0)?;
        while !edges.stopped() {
            if edges.coef() < threshold {
                edges.set_coef(0.0);
            }
            edges.advance();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CsrBuilder;

    #[test]
    fn method_parses_exact_names() {
        assert_eq!("DRG".parse::<Method>().unwrap(), Method::Drg);
        assert_eq!("DRGEP".parse::<Method>().unwrap(), Method::Drgep);
        assert_eq!("PFA".parse::<Method>().unwrap(), Method::Pfa);
        assert_eq!("drg".parse::<Method>(), Err(Error::InvalidArgument));
        assert_eq!("".parse::<Method>(), Err(Error::InvalidArgument));
        assert_eq!(Method::Drgep.to_string(), "DRGEP");
    }

    #[test]
    fn prune_zeroes_weak_edges_only() {
        let mut builder = CsrBuilder::new(3).unwrap();
        builder.add_row(0, &[0.0, 0.9, 0.2]).unwrap();
        builder.add_row(1, &[0.4, 0.0, 0.8]).unwrap();
        let mut matrix = builder.finalize();

        prune_below(&mut matrix, 0.5).unwrap();
        assert_eq!(matrix.coef(0, 1).unwrap(), 0.9);
        assert_eq!(matrix.coef(0, 2).unwrap(), 0.0);
        assert_eq!(matrix.coef(1, 0).unwrap(), 0.0);
        assert_eq!(matrix.coef(1, 2).unwrap(), 0.8);
        // Entries are zeroed, not removed.
        assert_eq!(matrix.stored_entries(), 4);
    }
}
