use crate::{Board, Cell, LifeError, board::toroidal_neighbors};
use rayon::prelude::*;
use std::{
    ops::Range,
    sync::atomic::{AtomicU8, Ordering},
};

// Cross-thread ordering comes from the boundary locks and the generation
// barrier, so individual cell accesses only need to be atomic.
const ORDER: Ordering = Ordering::Relaxed;

fn into_grid(cells: &[Cell]) -> Box<[AtomicU8]> {
    cells.iter().map(|c| AtomicU8::new(c.to_bits())).collect()
}

/// The two encoded buffers shared by the workers of a run
///
/// `current` is only read while a generation is being computed and `next` is
/// the write target. Workers bring `current` up to date by copying their own
/// rows from `next` between the two barrier rendezvous of a generation.
#[derive(Debug)]
pub struct DoubleBuffer {
    size: usize,
    current: Box<[AtomicU8]>,
    next: Box<[AtomicU8]>,
}

impl DoubleBuffer {
    /// Encodes a square plain board, computing every cell's neighbor count
    pub fn encode(board: &Board) -> Result<Self, LifeError> {
        if !board.is_square() {
            return Err(LifeError::NotSquare {
                nrows: board.nrows(),
                ncols: board.ncols(),
            });
        }
        let size = board.nrows();

        let mut cells: Vec<Cell> = board.cells().iter().map(|&c| Cell::new(c != 0)).collect();
        for row in 0..size {
            for col in 0..size {
                if !cells[row * size + col].is_alive() {
                    continue;
                }
                for (r, c) in toroidal_neighbors(row, col, size, size) {
                    cells[r * size + c].increment_neighbor_count();
                }
            }
        }

        Ok(Self {
            size,
            current: into_grid(&cells),
            next: into_grid(&cells),
        })
    }

    /// Consumes the buffers, dropping the neighbor counts
    pub fn decode(self) -> Board {
        self.snapshot()
    }

    /// Decodes the current generation without consuming the buffers
    pub fn snapshot(&self) -> Board {
        let cells = self
            .current
            .par_iter()
            .map(|c| u8::from(Cell::from_bits(c.load(ORDER)).is_alive()))
            .collect();
        Board::from_bits(self.size, self.size, cells)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The encoded cell at `(row, col)` of the current generation
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.current().get(row, col)
    }

    pub fn alive_count(&self) -> usize {
        self.current
            .par_iter()
            .filter(|c| Cell::from_bits(c.load(ORDER)).is_alive())
            .count()
    }

    #[inline]
    pub(crate) fn current(&self) -> ReadView<'_> {
        ReadView {
            size: self.size,
            cells: &self.current,
        }
    }

    #[inline]
    pub(crate) fn next(&self) -> WriteView<'_> {
        WriteView {
            size: self.size,
            cells: &self.next,
        }
    }

    /// Copies `rows` of the next buffer into the current buffer
    pub(crate) fn copy_rows(&self, rows: Range<usize>) {
        let span = rows.start * self.size..rows.end * self.size;
        for (dst, src) in self.current[span.clone()].iter().zip(&self.next[span]) {
            dst.store(src.load(ORDER), ORDER);
        }
    }
}

/// Read access to the current generation
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReadView<'a> {
    size: usize,
    cells: &'a [AtomicU8],
}

impl ReadView<'_> {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        Cell::from_bits(self.cells[row * self.size + col].load(ORDER))
    }
}

/// Write access to the next generation
///
/// [`WriteView::update`] is a load followed by a store, so two threads
/// updating the same cell have to serialize through a boundary lock.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WriteView<'a> {
    size: usize,
    cells: &'a [AtomicU8],
}

impl WriteView<'_> {
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn update<F: FnOnce(&mut Cell)>(&self, row: usize, col: usize, f: F) {
        let slot = &self.cells[row * self.size + col];
        let mut cell = Cell::from_bits(slot.load(ORDER));
        f(&mut cell);
        slot.store(cell.to_bits(), ORDER);
    }

    #[cfg(test)]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        Cell::from_bits(self.cells[row * self.size + col].load(ORDER))
    }
}
