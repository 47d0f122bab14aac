use super::{
    boundary::{Boundary, BoundaryRing},
    codec::{DoubleBuffer, ReadView, WriteView},
    slice::RowSlice,
    transition::{Transition, step_cell},
};
use crate::LifeError;
use std::{
    ops::Range,
    panic::{self, AssertUnwindSafe},
    sync::{
        Barrier,
        atomic::{AtomicBool, Ordering},
    },
};
use tracing::{trace, warn};

/// The synchronization primitives shared by every worker of a run
#[derive(Debug)]
pub(crate) struct Harness {
    pub ring: BoundaryRing,
    pub barrier: Barrier,
    aborted: AtomicBool,
}

impl Harness {
    pub fn new(threads: usize) -> Self {
        Self {
            ring: BoundaryRing::new(threads),
            barrier: Barrier::new(threads),
            aborted: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    #[inline]
    fn abort(&self) {
        self.aborted.store(true, Ordering::Release);
    }
}

/// Advances one [`RowSlice`] through every generation of a run
///
/// Each generation walks the slice column by column. Margin rows are updated
/// under the boundary they share with the neighboring slice, interior rows are
/// updated unlocked. Two barrier rendezvous separate the phases: all writes to
/// `next` finish before anyone copies, and all copies finish before anyone
/// reads the following generation.
pub(crate) struct Worker<'a> {
    slice: RowSlice,
    buffer: &'a DoubleBuffer,
    harness: &'a Harness,
    gens_max: usize,
}

impl<'a> Worker<'a> {
    pub fn new(
        slice: RowSlice,
        buffer: &'a DoubleBuffer,
        harness: &'a Harness,
        gens_max: usize,
    ) -> Self {
        Self {
            slice,
            buffer,
            harness,
            gens_max,
        }
    }

    pub fn run(self) -> Result<(), LifeError> {
        let index = self.slice.index;
        let upper = self.harness.ring.upper(index);
        let lower = self.harness.ring.lower(index);
        trace!(
            slice = index,
            rows = ?self.slice.rows,
            above = upper.above,
            below = lower.below,
            "worker started"
        );

        for generation in 0..self.gens_max {
            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| {
                self.process_columns(upper, lower)
            })) {
                Ok(outcome) => outcome,
                Err(payload) => {
                    // release the other workers before unwinding
                    warn!(slice = index, generation, "worker panicked, aborting run");
                    self.harness.abort();
                    self.harness.barrier.wait();
                    panic::resume_unwind(payload);
                }
            };
            if let Err(ref err) = outcome {
                warn!(slice = index, generation, %err, "aborting run");
                self.harness.abort();
            }

            // rendezvous 1: every write to `next` is done
            self.harness.barrier.wait();
            if self.harness.is_aborted() {
                return outcome;
            }

            self.buffer.copy_rows(self.slice.rows.clone());

            // rendezvous 2: every copy into `current` is done
            self.harness.barrier.wait();
        }

        trace!(slice = index, "worker finished");
        Ok(())
    }

    fn process_columns(&self, upper: &Boundary, lower: &Boundary) -> Result<(), LifeError> {
        let current = self.buffer.current();
        let next = self.buffer.next();
        for col in 0..self.buffer.size() {
            step_margin(&current, &next, upper, self.slice.upper_margin(), col)?;
            for row in self.slice.interior() {
                step_cell(&current, &next, row, col);
            }
            step_margin(&current, &next, lower, self.slice.lower_margin(), col)?;
        }
        Ok(())
    }
}

/// Applies the rules to the margin `rows` of `col`, holding `boundary` for each change
fn step_margin(
    current: &ReadView<'_>,
    next: &WriteView<'_>,
    boundary: &Boundary,
    rows: Range<usize>,
    col: usize,
) -> Result<(), LifeError> {
    for row in rows {
        if let Some(transition) = Transition::of(current.get(row, col)) {
            let _guard = boundary.lock()?;
            transition.apply(next, row, col);
        }
    }
    Ok(())
}
