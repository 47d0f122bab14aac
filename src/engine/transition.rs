use super::codec::{ReadView, WriteView};
use crate::{Cell, board::toroidal_neighbors};

/// A change in a cell's alive state between two generations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Die,
    Spawn,
}

impl Transition {
    /// Decides what happens to `cell` this generation, if anything
    #[inline]
    pub fn of(cell: Cell) -> Option<Self> {
        if cell.must_die() {
            Some(Self::Die)
        } else if cell.must_spawn() {
            Some(Self::Spawn)
        } else {
            None
        }
    }

    /// Writes this transition for `(row, col)` into `next`
    ///
    /// Besides flipping the cell itself, the neighbor counts of all 8 toroidal
    /// neighbors are adjusted. Those neighbors may belong to another slice.
    pub fn apply(self, next: &WriteView<'_>, row: usize, col: usize) {
        let size = next.size();
        let adjust: fn(&mut Cell) = match self {
            Self::Die => {
                next.update(row, col, Cell::set_dead);
                Cell::decrement_neighbor_count
            }
            Self::Spawn => {
                next.update(row, col, Cell::set_alive);
                Cell::increment_neighbor_count
            }
        };
        for (r, c) in toroidal_neighbors(row, col, size, size) {
            next.update(r, c, adjust);
        }
    }
}

/// Applies the rules to `(row, col)`, reading `current` and writing `next`
///
/// Cells that do not change are left alone; `next` already holds them since it
/// starts every generation as a copy of `current`.
#[inline]
pub(crate) fn step_cell(current: &ReadView<'_>, next: &WriteView<'_>, row: usize, col: usize) {
    if let Some(transition) = Transition::of(current.get(row, col)) {
        transition.apply(next, row, col);
    }
}
