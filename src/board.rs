use crate::{LifeError, Pos2, enc::Pattern};
use std::fmt;

/// Returns the 8 toroidal neighbors of `(row, col)` on a `nrows` x `ncols` board
///
/// Order is north-west to south-east, row by row.
#[inline]
pub(crate) fn toroidal_neighbors(
    row: usize,
    col: usize,
    nrows: usize,
    ncols: usize,
) -> [(usize, usize); 8] {
    let north = (row + nrows - 1) % nrows;
    let south = (row + 1) % nrows;
    let west = (col + ncols - 1) % ncols;
    let east = (col + 1) % ncols;
    [
        (north, west),
        (north, col),
        (north, east),
        (row, west),
        (row, east),
        (south, west),
        (south, col),
        (south, east),
    ]
}

/// A plain row-major board of 0/1 cells with toroidal wraparound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    nrows: usize,
    ncols: usize,
    cells: Vec<u8>,
}

impl Board {
    /// Creates an all-dead board
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            cells: vec![0; nrows * ncols],
        }
    }

    #[inline]
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Wraps a row-major vector of cells, any nonzero value counting as alive
    pub fn from_cells(nrows: usize, ncols: usize, mut cells: Vec<u8>) -> Result<Self, LifeError> {
        let expected = nrows * ncols;
        if cells.len() != expected {
            return Err(LifeError::Dimensions {
                expected,
                found: cells.len(),
            });
        }
        for cell in cells.iter_mut() {
            *cell = u8::from(*cell != 0);
        }
        Ok(Self { nrows, ncols, cells })
    }

    /// Wraps cells already known to be 0/1 and `nrows * ncols` long
    #[inline]
    pub(crate) fn from_bits(nrows: usize, ncols: usize, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), nrows * ncols);
        Self { nrows, ncols, cells }
    }

    /// Creates a board with the given positions alive, wrapping any position off the board
    pub fn from_alive<I>(nrows: usize, ncols: usize, alive: I) -> Self
    where
        I: IntoIterator<Item = Pos2>,
    {
        let mut board = Self::new(nrows, ncols);
        for pos in alive {
            let (row, col) = pos.wrap(nrows, ncols);
            board.set(row, col, true);
        }
        board
    }

    /// Places `pattern` in the middle of a `size` x `size` board
    pub fn from_pattern(size: usize, pattern: &Pattern) -> Self {
        let offset = Pos2 {
            x: (size as i32 - pattern.width as i32) / 2,
            y: (size as i32 - pattern.height as i32) / 2,
        };
        Self::from_alive(size, size, pattern.alive.iter().map(|&pos| pos + offset))
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.ncols + col] != 0
    }
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        self.cells[row * self.ncols + col] = u8::from(alive);
    }

    /// The row-major 0/1 cells
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Alive positions in row-major order
    pub fn alive_positions(&self) -> Vec<Pos2> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != 0)
            .map(|(i, _)| Pos2 {
                x: (i % self.ncols) as i32,
                y: (i / self.ncols) as i32,
            })
            .collect()
    }

    /// Counts the alive toroidal neighbors of `(row, col)` by scanning them
    pub fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        toroidal_neighbors(row, col, self.nrows, self.ncols)
            .iter()
            .map(|&(r, c)| u8::from(self.get(r, c)))
            .sum()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ncols == 0 {
            return Ok(());
        }
        for row in self.cells.chunks(self.ncols) {
            for &cell in row {
                f.write_str(if cell != 0 { "O" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
