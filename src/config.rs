/// Default number of worker threads for the parallel engine
pub const NUM_THREADS: usize = 4;

/// Largest supported board dimension, in either direction
pub const MAX_DIMENSION: usize = 10_000;

/// Boards with fewer rows than this run on the sequential engine
pub const SEQUENTIAL_CUTOFF: usize = 32;

/// Radius of the Moore neighborhood used by the rules
pub const NEIGHBORHOOD_RADIUS: usize = 1;

/// Rows at each edge of a slice that are updated under a boundary lock
///
/// A transition writes the counts of cells up to [`NEIGHBORHOOD_RADIUS`]
/// rows away, so the margin has to cover the rows that can reach into the
/// neighboring slice plus the rows that can reach into those. Changing the
/// radius must change this too.
pub const MARGIN_ROWS: usize = 2 * NEIGHBORHOOD_RADIUS;

/// Settings for one run of the parallel engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub threads: usize,
}

impl EngineConfig {
    #[inline]
    pub fn with_threads(threads: usize) -> Self {
        Self { threads }
    }
}

impl Default for EngineConfig {
    #[inline]
    fn default() -> Self {
        Self::with_threads(NUM_THREADS)
    }
}
