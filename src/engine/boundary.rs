use crate::LifeError;
use std::sync::{Mutex, MutexGuard};

/// The edge between two vertically adjacent slices
///
/// Both slices update the margin rows on either side of the edge, so each
/// update of those rows happens while holding [`Boundary::lock`].
#[derive(Debug)]
pub(crate) struct Boundary {
    /// Slice whose lower margin touches this edge
    pub above: usize,
    /// Slice whose upper margin touches this edge
    pub below: usize,
    lock: Mutex<()>,
}

impl Boundary {
    pub fn lock(&self) -> Result<MutexGuard<'_, ()>, LifeError> {
        self.lock
            .lock()
            .map_err(|_| LifeError::Synchronization("boundary lock poisoned"))
    }
}

/// One [`Boundary`] per pair of adjacent slices, wrapping around like the board
///
/// Boundary `k` sits on top of slice `k`, so the last slice's lower boundary
/// is the first slice's upper boundary.
#[derive(Debug)]
pub(crate) struct BoundaryRing {
    boundaries: Vec<Boundary>,
}

impl BoundaryRing {
    pub fn new(slices: usize) -> Self {
        let boundaries = (0..slices)
            .map(|below| Boundary {
                above: (below + slices - 1) % slices,
                below,
                lock: Mutex::new(()),
            })
            .collect();
        Self { boundaries }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// The boundary shared with the slice above `slice`
    #[inline]
    pub fn upper(&self, slice: usize) -> &Boundary {
        &self.boundaries[slice]
    }

    /// The boundary shared with the slice below `slice`
    #[inline]
    pub fn lower(&self, slice: usize) -> &Boundary {
        &self.boundaries[(slice + 1) % self.boundaries.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_wraps_last_slice_to_first() {
        let ring = BoundaryRing::new(4);
        assert_eq!(ring.len(), 4);

        let last_lower = ring.lower(3);
        assert!(std::ptr::eq(last_lower, ring.upper(0)));
        assert_eq!((last_lower.above, last_lower.below), (3, 0));
    }

    #[test]
    fn adjacent_slices_share_a_boundary() {
        let ring = BoundaryRing::new(3);
        for slice in 0..3 {
            let lower = ring.lower(slice);
            assert!(std::ptr::eq(lower, ring.upper((slice + 1) % 3)));
            assert_eq!(lower.above, slice);
        }
    }

    #[test]
    fn single_slice_is_its_own_neighbor() {
        let ring = BoundaryRing::new(1);
        let boundary = ring.upper(0);
        assert!(std::ptr::eq(boundary, ring.lower(0)));
        assert_eq!((boundary.above, boundary.below), (0, 0));
        assert!(boundary.lock().is_ok());
    }

    #[test]
    fn poisoned_lock_is_a_synchronization_failure() {
        let ring = BoundaryRing::new(2);
        std::thread::scope(|s| {
            let _ = s
                .spawn(|| {
                    let _guard = ring.upper(1).lock().unwrap();
                    panic!("poison the lock");
                })
                .join();
        });
        assert!(matches!(
            ring.lower(0).lock(),
            Err(LifeError::Synchronization(_))
        ));
    }
}
