use super::index::{neighborhood, rule_table};
use crate::Board;
use std::mem;

/// Computes the generation after `current` into `next`
///
/// Both boards must have the same dimensions. Rectangular boards are fine.
pub fn step(current: &Board, next: &mut Board) {
    debug_assert_eq!(
        (current.nrows(), current.ncols()),
        (next.nrows(), next.ncols()),
        "mismatched boards"
    );
    let table = rule_table();
    for row in 0..current.nrows() {
        for col in 0..current.ncols() {
            next.set(row, col, table[neighborhood(current, row, col)]);
        }
    }
}

/// Runs `gens_max` generations on a single thread
pub fn run(board: Board, gens_max: usize) -> Board {
    let mut current = board;
    let mut next = Board::new(current.nrows(), current.ncols());
    for _ in 0..gens_max {
        step(&current, &mut next);
        mem::swap(&mut current, &mut next);
    }
    current
}
