/// Bit holding the alive flag; the low nibble holds the neighbor count
const ALIVE_BIT: u8 = 0b1_0000;
const COUNT_MASK: u8 = 0b0_1111;
const MAX_NEIGHBORS: u8 = 8;

/// A single board position in the encoded representation
///
/// Each [`Cell`] packs whether the cell is alive together with the number of
/// alive cells among its 8 toroidal neighbors. The count is maintained
/// incrementally: every birth increments the counts around it and every death
/// decrements them, so the rules never have to scan the neighborhood.
///
/// ```rust
/// use torlife::Cell;
///
/// let mut cell = Cell::new(false);
/// for _ in 0..3 {
///     cell.increment_neighbor_count();
/// }
/// assert!(cell.must_spawn());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell(u8);

impl Cell {
    /// Creates a cell with the given alive state and a neighbor count of 0
    #[inline]
    pub fn new(alive: bool) -> Self {
        if alive { Self(ALIVE_BIT) } else { Self(0) }
    }

    #[inline]
    pub fn is_alive(self) -> bool {
        self.0 & ALIVE_BIT != 0
    }

    #[inline]
    pub fn neighbor_count(self) -> u8 {
        self.0 & COUNT_MASK
    }

    /// Alive with fewer than 2 or more than 3 alive neighbors
    #[inline]
    pub fn must_die(self) -> bool {
        self.is_alive() && !matches!(self.neighbor_count(), 2 | 3)
    }

    /// Dead with exactly 3 alive neighbors
    #[inline]
    pub fn must_spawn(self) -> bool {
        !self.is_alive() && self.neighbor_count() == 3
    }

    #[inline]
    pub fn set_alive(&mut self) {
        self.0 |= ALIVE_BIT;
    }

    #[inline]
    pub fn set_dead(&mut self) {
        self.0 &= !ALIVE_BIT;
    }

    #[inline]
    pub fn increment_neighbor_count(&mut self) {
        debug_assert!(self.neighbor_count() < MAX_NEIGHBORS, "neighbor count overflow");
        self.0 += 1;
    }

    #[inline]
    pub fn decrement_neighbor_count(&mut self) {
        debug_assert!(self.neighbor_count() > 0, "neighbor count underflow");
        self.0 -= 1;
    }

    #[inline]
    pub(crate) fn to_bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub(crate) fn from_bits(bits: u8) -> Self {
        Self(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_with(alive: bool, neighbors: u8) -> Cell {
        let mut cell = Cell::new(alive);
        for _ in 0..neighbors {
            cell.increment_neighbor_count();
        }
        cell
    }

    #[test]
    fn new_cell_has_no_neighbors() {
        assert!(Cell::new(true).is_alive());
        assert!(!Cell::new(false).is_alive());
        assert_eq!(Cell::new(true).neighbor_count(), 0);
        assert_eq!(Cell::new(false).neighbor_count(), 0);
    }

    #[test]
    fn rules_match_conway_life() {
        for n in 0..=8 {
            assert_eq!(cell_with(true, n).must_die(), n != 2 && n != 3, "alive, {n}");
            assert_eq!(cell_with(false, n).must_spawn(), n == 3, "dead, {n}");
            // the opposite predicate never fires
            assert!(!cell_with(true, n).must_spawn());
            assert!(!cell_with(false, n).must_die());
        }
    }

    #[test]
    fn alive_flag_leaves_count_untouched() {
        let mut cell = cell_with(false, 5);
        cell.set_alive();
        assert!(cell.is_alive());
        assert_eq!(cell.neighbor_count(), 5);

        cell.set_dead();
        assert!(!cell.is_alive());
        assert_eq!(cell.neighbor_count(), 5);
    }

    #[test]
    fn count_saturates_at_eight_neighbors() {
        let mut cell = cell_with(true, 8);
        assert_eq!(cell.neighbor_count(), 8);
        assert!(cell.is_alive());

        for _ in 0..8 {
            cell.decrement_neighbor_count();
        }
        assert_eq!(cell, Cell::new(true));
    }
}
