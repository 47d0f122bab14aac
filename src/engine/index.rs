use crate::Board;
use std::sync::OnceLock;

/// The number of permutations for a 3x3 grid of cells
const PERMUTATIONS: usize = 1 << 9;
/// Bit of the center cell in a neighborhood index
const CENTER: usize = 0b000_010_000;
type RuleTable = [bool; PERMUTATIONS];

/// Returns the shared lookup table for the Game of Life rules
pub(super) fn rule_table() -> &'static RuleTable {
    static TABLE: OnceLock<RuleTable> = OnceLock::new();
    TABLE.get_or_init(generate_rule_table)
}

/// Creates a lookup table indexed by a 9-bit 3x3 neighborhood
///
/// Bit `3 * dr + dc` is the cell at row offset `dr - 1` and column offset
/// `dc - 1`, so the center cell is [`CENTER`]. Each entry says whether the
/// center cell is alive in the next generation.
fn generate_rule_table() -> RuleTable {
    let mut table = [false; PERMUTATIONS];
    for (i, entry) in table.iter_mut().enumerate() {
        let neighbors = (i & !CENTER).count_ones();
        let alive = i & CENTER != 0;
        *entry = matches!((alive, neighbors), (true, 2) | (_, 3));
    }
    table
}

/// Packs the toroidal 3x3 neighborhood around `(row, col)` into a table index
pub(super) fn neighborhood(board: &Board, row: usize, col: usize) -> usize {
    let (nrows, ncols) = (board.nrows(), board.ncols());
    let rows = [(row + nrows - 1) % nrows, row, (row + 1) % nrows];
    let cols = [(col + ncols - 1) % ncols, col, (col + 1) % ncols];

    let mut index = 0;
    for (dr, &r) in rows.iter().enumerate() {
        for (dc, &c) in cols.iter().enumerate() {
            if board.get(r, c) {
                index |= 1 << (3 * dr + dc);
            }
        }
    }
    index
}
