use crate::{LifeError, config::MARGIN_ROWS};
use std::ops::Range;

/// A contiguous band of rows owned by one worker for a whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowSlice {
    pub index: usize,
    pub rows: Range<usize>,
}

impl RowSlice {
    /// Splits `[0, nrows)` into `threads` equal slices
    ///
    /// Every slice has to hold an upper and a lower margin without them
    /// overlapping, otherwise a margin row would be processed twice.
    pub fn partition(nrows: usize, threads: usize) -> Result<Vec<Self>, LifeError> {
        if threads == 0 {
            return Err(LifeError::NoThreads);
        }
        if nrows % threads != 0 {
            return Err(LifeError::UnevenSlices { nrows, threads });
        }
        let rows = nrows / threads;
        if rows < 2 * MARGIN_ROWS {
            return Err(LifeError::SliceTooThin {
                rows,
                min: 2 * MARGIN_ROWS,
            });
        }

        Ok((0..threads)
            .map(|index| Self {
                index,
                rows: index * rows..(index + 1) * rows,
            })
            .collect())
    }

    #[inline]
    pub fn upper_margin(&self) -> Range<usize> {
        self.rows.start..self.rows.start + MARGIN_ROWS
    }
    #[inline]
    pub fn interior(&self) -> Range<usize> {
        self.rows.start + MARGIN_ROWS..self.rows.end - MARGIN_ROWS
    }
    #[inline]
    pub fn lower_margin(&self) -> Range<usize> {
        self.rows.end - MARGIN_ROWS..self.rows.end
    }
}
