use thiserror::Error;

/// Errors returned by the engines
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifeError {
    /// Either dimension is above the supported maximum; the caller picks a smaller board
    #[error("board of {nrows}x{ncols} is not supported (max dimension {max})")]
    UnsupportedSize { nrows: usize, ncols: usize, max: usize },
    #[error("parallel engine requires a square board, got {nrows}x{ncols}")]
    NotSquare { nrows: usize, ncols: usize },
    #[error("{nrows} rows cannot be split evenly across {threads} threads")]
    UnevenSlices { nrows: usize, threads: usize },
    #[error("slices of {rows} rows are thinner than the {min} rows needed for both margins")]
    SliceTooThin { rows: usize, min: usize },
    #[error("at least one worker thread is required")]
    NoThreads,
    #[error("expected {expected} cells, found {found}")]
    Dimensions { expected: usize, found: usize },
    /// A boundary lock was poisoned or a worker aborted; the run's result is discarded
    #[error("synchronization failure: {0}")]
    Synchronization(&'static str),
}
