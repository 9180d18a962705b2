//! Tests for the CSR matrix and its cursors.

use super::*;
use crate::graph::CsrBuilder;

fn matrix_from_edges(n: usize, edges: &[(usize, usize, f64)]) -> CsrMatrix {
    let mut dense = vec![vec![0.0; n]; n];
    for &(from, to, coef) in edges {
        dense[from][to] = coef;
    }
    let mut builder = CsrBuilder::new(n).unwrap();
    for (i, row) in dense.iter().enumerate() {
        builder.add_row(i, row).unwrap();
    }
    builder.finalize()
}

/// Checks the CSR invariants: row ends non-decreasing and bounded, columns
/// strictly increasing per row, parallel arrays of equal length.
fn assert_well_formed(matrix: &CsrMatrix) {
    let n = matrix.size();
    assert_eq!(matrix.cols.len(), matrix.coefs.len());
    let mut start = 0;
    for from in 0..n {
        let (row_start, row_end) = matrix.row_bounds(from);
        assert_eq!(row_start, start);
        assert!(row_end >= row_start);
        assert!(row_end <= matrix.cols.len());
        let mut prev = None;
        for k in row_start..row_end {
            let col = *matrix.cols.get(k).unwrap();
            assert!(col < n);
            if let Some(p) = prev {
                assert!(col > p, "columns must be strictly increasing");
            }
            prev = Some(col);
        }
        start = row_end;
    }
    if n > 0 {
        assert_eq!(start, matrix.cols.len());
    }
}

#[test]
fn coef_reads_stored_and_absent_edges() {
    let matrix = matrix_from_edges(3, &[(0, 1, 0.9), (1, 2, 0.8), (2, 0, 0.7)]);
    assert_well_formed(&matrix);
    assert_eq!(matrix.coef(0, 1).unwrap(), 0.9);
    assert_eq!(matrix.coef(1, 2).unwrap(), 0.8);
    assert_eq!(matrix.coef(0, 2).unwrap(), 0.0);
    assert_eq!(matrix.coef(3, 0), Err(Error::InvalidIndex));
    assert_eq!(matrix.coef(0, 3), Err(Error::InvalidIndex));
}

#[test]
fn set_overwrites_in_place() {
    let mut matrix = matrix_from_edges(3, &[(0, 1, 0.9)]);
    assert_eq!(matrix.set(0, 1, 0.4).unwrap(), 0.9);
    assert_eq!(matrix.coef(0, 1).unwrap(), 0.4);
    assert_eq!(matrix.stored_entries(), 1);
    assert_well_formed(&matrix);
}

#[test]
fn set_zero_keeps_entry_but_hides_edge() {
    let mut matrix = matrix_from_edges(3, &[(0, 1, 0.9), (0, 2, 0.5)]);
    assert_eq!(matrix.set(0, 1, 0.0).unwrap(), 0.9);
    // Physically present, logically absent.
    assert_eq!(matrix.stored_entries(), 2);
    assert_eq!(matrix.coef(0, 1).unwrap(), 0.0);
    let it = matrix.neighbours(0, 0).unwrap();
    assert!(!it.stopped());
    assert_eq!(it.to(), 2);
    assert_well_formed(&matrix);
}

#[test]
fn set_inserts_missing_edge_and_bumps_row_ends() {
    let mut matrix = matrix_from_edges(4, &[(0, 3, 0.1), (2, 1, 0.2)]);
    assert_eq!(matrix.set(0, 1, 0.7).unwrap(), 0.0);
    assert_eq!(matrix.stored_entries(), 3);
    assert_eq!(matrix.coef(0, 1).unwrap(), 0.7);
    assert_eq!(matrix.coef(0, 3).unwrap(), 0.1);
    assert_eq!(matrix.coef(2, 1).unwrap(), 0.2);
    assert_well_formed(&matrix);
}

#[test]
fn set_zero_on_absent_edge_is_a_no_op() {
    let mut matrix = matrix_from_edges(3, &[(0, 1, 0.9)]);
    assert_eq!(matrix.set(1, 2, 0.0).unwrap(), 0.0);
    assert_eq!(matrix.stored_entries(), 1);
    assert_well_formed(&matrix);
}

#[test]
fn set_rejects_bad_values() {
    let mut matrix = matrix_from_edges(2, &[(0, 1, 0.9)]);
    assert_eq!(matrix.set(0, 1, -0.5), Err(Error::InvalidArgument));
    assert_eq!(matrix.set(0, 1, f64::INFINITY), Err(Error::InvalidArgument));
    assert_eq!(matrix.set(2, 0, 1.0), Err(Error::InvalidIndex));
}

#[test]
fn cursor_walks_live_entries_in_column_order() {
    let matrix = matrix_from_edges(5, &[(1, 0, 0.1), (1, 2, 0.2), (1, 4, 0.3)]);
    let mut it = matrix.neighbours(1, 0).unwrap();
    let mut seen = Vec::new();
    while !it.stopped() {
        seen.push((it.to(), it.coef()));
        it.advance();
    }
    assert_eq!(seen, vec![(0, 0.1), (2, 0.2), (4, 0.3)]);
}

#[test]
fn cursor_seek_starts_at_requested_column() {
    let matrix = matrix_from_edges(5, &[(1, 0, 0.1), (1, 2, 0.2), (1, 4, 0.3)]);
    let it = matrix.neighbours(1, 1).unwrap();
    assert_eq!(it.to(), 2);
    let it = matrix.neighbours(1, 3).unwrap();
    assert_eq!(it.to(), 4);
    let it = matrix.neighbours(2, 0).unwrap();
    assert!(it.stopped());
}

#[test]
fn cursor_skips_zeroed_entries() {
    let mut matrix = matrix_from_edges(4, &[(0, 1, 0.5), (0, 2, 0.6), (0, 3, 0.7)]);
    matrix.set(0, 2, 0.0).unwrap();
    let mut it = matrix.neighbours(0, 0).unwrap();
    assert_eq!(it.to(), 1);
    it.advance();
    assert_eq!(it.to(), 3);
    it.advance();
    assert!(it.stopped());
}

#[test]
fn cursor_stops_immediately_when_row_all_zeroed() {
    let mut matrix = matrix_from_edges(3, &[(0, 1, 0.5), (0, 2, 0.6)]);
    matrix.set(0, 1, 0.0).unwrap();
    matrix.set(0, 2, 0.0).unwrap();
    let it = matrix.neighbours(0, 0).unwrap();
    assert!(it.stopped());
}

#[test]
fn cursor_retreat_mirrors_advance() {
    let matrix = matrix_from_edges(4, &[(0, 1, 0.5), (0, 3, 0.7)]);
    let mut it = matrix.neighbours(0, 3).unwrap();
    assert_eq!(it.to(), 3);
    it.retreat();
    assert_eq!(it.to(), 1);
    it.retreat();
    assert!(it.stopped());
    // Stopped at the row start over a live entry: advance resumes in place.
    it.advance();
    assert!(!it.stopped());
    assert_eq!(it.to(), 1);
}

#[test]
fn mut_cursor_write_transitions_on_next_move() {
    let mut matrix = matrix_from_edges(3, &[(0, 1, 0.5), (0, 2, 0.6)]);
    let mut it = matrix.neighbours_mut(0, 0).unwrap();
    assert_eq!(it.set_coef(0.0), 0.5);
    // The write leaves the cursor in place; the next advance skips to the
    // surviving entry.
    it.advance();
    assert!(!it.stopped());
    assert_eq!(it.to(), 2);
    assert_eq!(it.set_coef(0.0), 0.6);
    it.advance();
    assert!(it.stopped());
    drop(it);
    assert_eq!(matrix.coef(0, 1).unwrap(), 0.0);
    assert_eq!(matrix.coef(0, 2).unwrap(), 0.0);
}

#[test]
fn cursor_reseat_reuses_the_cursor() {
    let matrix = matrix_from_edges(3, &[(0, 1, 0.5), (2, 0, 0.6)]);
    let mut it = matrix.neighbours(0, 0).unwrap();
    assert_eq!((it.from(), it.to()), (0, 1));
    it.reseat(2, 0).unwrap();
    assert_eq!((it.from(), it.to()), (2, 0));
    it.reseat(1, 0).unwrap();
    assert!(it.stopped());
    assert_eq!(it.reseat(3, 0), Err(Error::InvalidIndex));
}

#[test]
fn from_parts_validates_invariants() {
    use crate::alloc::Global;

    let rows = ArraySeq::filled(2, 1usize, Global).unwrap();
    let mut cols = SectionedSeq::new(Global).unwrap();
    let mut coefs = SectionedSeq::new(Global).unwrap();
    cols.push(1usize).unwrap();
    coefs.push(0.5f64).unwrap();
    // rows = [1, 1]: row 0 has one entry (0 -> 1), row 1 none.
    let matrix = CsrMatrix::from_parts(rows, cols, coefs).unwrap();
    assert_eq!(matrix.coef(0, 1).unwrap(), 0.5);

    // Decreasing row ends are rejected.
    let mut rows = ArraySeq::filled(2, 0usize, Global).unwrap();
    rows.set(0, 1).unwrap();
    let cols = SectionedSeq::new(Global).unwrap();
    let coefs = SectionedSeq::new(Global).unwrap();
    assert!(CsrMatrix::from_parts(rows, cols, coefs).is_err());
}

#[test]
fn into_parts_round_trips() {
    let matrix = matrix_from_edges(3, &[(0, 1, 0.9), (2, 0, 0.7)]);
    let (rows, cols, coefs) = matrix.into_parts();
    let matrix = CsrMatrix::from_parts(rows, cols, coefs).unwrap();
    assert_eq!(matrix.coef(0, 1).unwrap(), 0.9);
    assert_eq!(matrix.coef(2, 0).unwrap(), 0.7);
}
