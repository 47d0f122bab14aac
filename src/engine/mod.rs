mod boundary;
mod codec;
mod index;
pub mod sequential;
mod slice;
mod transition;
mod worker;

pub use self::codec::DoubleBuffer;
use self::{
    slice::RowSlice,
    worker::{Harness, Worker},
};
use crate::{
    Board, LifeError,
    config::{EngineConfig, MAX_DIMENSION, SEQUENTIAL_CUTOFF},
};
use std::{panic, thread, time::Instant};
use tracing::debug;

/// Runs `gens_max` generations, choosing an engine by board size
///
/// Boards with fewer than [`SEQUENTIAL_CUTOFF`] rows go to the sequential
/// engine. Boards with a dimension above [`MAX_DIMENSION`] are rejected with
/// [`LifeError::UnsupportedSize`]. Everything else runs on [`ParallelLife`].
pub fn game_of_life(
    board: Board,
    gens_max: usize,
    config: EngineConfig,
) -> Result<Board, LifeError> {
    let (nrows, ncols) = (board.nrows(), board.ncols());
    if nrows < SEQUENTIAL_CUTOFF {
        debug!(nrows, ncols, gens_max, "dispatching to sequential engine");
        return Ok(sequential::run(board, gens_max));
    }
    if nrows > MAX_DIMENSION || ncols > MAX_DIMENSION {
        debug!(nrows, ncols, "rejecting oversized board");
        return Err(LifeError::UnsupportedSize {
            nrows,
            ncols,
            max: MAX_DIMENSION,
        });
    }
    ParallelLife::new(config).run(board, gens_max)
}

/// The row-sliced multi-threaded engine
///
/// Runs a fixed number of threads, each owning an equal band of rows for the
/// whole run. The board has to be square and its row count divisible by the
/// thread count.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelLife {
    config: EngineConfig,
}

impl ParallelLife {
    #[inline]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Encodes `board`, runs `gens_max` generations and decodes the result
    pub fn run(&self, board: Board, gens_max: usize) -> Result<Board, LifeError> {
        let mut buffer = DoubleBuffer::encode(&board)?;
        self.advance(&mut buffer, gens_max)?;
        Ok(buffer.decode())
    }

    /// Runs `gens_max` generations on an already encoded board
    ///
    /// On error the buffer is left at the last fully completed generation.
    pub fn advance(&self, buffer: &mut DoubleBuffer, gens_max: usize) -> Result<(), LifeError> {
        let threads = self.config.threads;
        let slices = RowSlice::partition(buffer.size(), threads)?;
        if gens_max == 0 {
            return Ok(());
        }

        debug!(size = buffer.size(), threads, gens_max, "starting parallel run");
        let start = Instant::now();

        let harness = Harness::new(threads);
        debug_assert_eq!(harness.ring.len(), slices.len());
        let buffer = &*buffer;
        let results: Vec<Result<(), LifeError>> = thread::scope(|s| {
            let handles: Vec<_> = slices
                .into_iter()
                .map(|slice| {
                    let worker = Worker::new(slice, buffer, &harness, gens_max);
                    s.spawn(move || worker.run())
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|err| panic::resume_unwind(err)))
                .collect()
        });

        results.into_iter().collect::<Result<(), _>>()?;
        if harness.is_aborted() {
            return Err(LifeError::Synchronization("run aborted"));
        }
        debug!(
            elapsed = ?start.elapsed(),
            alive = buffer.alive_count(),
            "parallel run finished"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, Pos2};
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::{panic::AssertUnwindSafe, sync::mpsc, time::Duration};

    fn pos(x: i32, y: i32) -> Pos2 {
        Pos2 { x, y }
    }

    fn random_board(size: usize, seed: u64) -> Board {
        let mut rng = StdRng::seed_from_u64(seed);
        let cells = (0..size * size).map(|_| u8::from(rng.random_bool(0.35))).collect();
        Board::from_cells(size, size, cells).unwrap()
    }

    /// Recomputes every neighbor sum from scratch each generation
    fn naive_step(board: &Board) -> Board {
        let n = board.nrows();
        let mut next = Board::square(n);
        for row in 0..n {
            for col in 0..n {
                let mut count = 0;
                for dr in [n - 1, 0, 1] {
                    for dc in [n - 1, 0, 1] {
                        if (dr, dc) != (0, 0) && board.get((row + dr) % n, (col + dc) % n) {
                            count += 1;
                        }
                    }
                }
                let alive = board.get(row, col);
                next.set(row, col, count == 3 || (alive && count == 2));
            }
        }
        next
    }

    fn translate(board: &Board, offset: Pos2) -> Board {
        let n = board.nrows();
        Board::from_alive(n, n, board.alive_positions().into_iter().map(|p| p + offset))
    }

    fn engine(threads: usize) -> ParallelLife {
        ParallelLife::new(EngineConfig::with_threads(threads))
    }

    const GLIDER: [Pos2; 5] = [
        Pos2 { x: 1, y: 0 },
        Pos2 { x: 2, y: 1 },
        Pos2 { x: 0, y: 2 },
        Pos2 { x: 1, y: 2 },
        Pos2 { x: 2, y: 2 },
    ];

    #[test]
    fn matches_naive_recomputation() {
        for (size, threads) in [(8, 1), (8, 2), (32, 4), (64, 4), (64, 8), (128, 4)] {
            let mut expected = random_board(size, size as u64);
            let mut buffer = DoubleBuffer::encode(&expected).unwrap();
            for generation in 0..=12 {
                assert_eq!(
                    buffer.snapshot(),
                    expected,
                    "size {size}, threads {threads}, generation {generation}"
                );
                engine(threads).advance(&mut buffer, 1).unwrap();
                expected = naive_step(&expected);
            }
        }
    }

    #[test]
    fn neighbor_counts_stay_exact() {
        let board = random_board(64, 42);
        let mut buffer = DoubleBuffer::encode(&board).unwrap();
        for generation in 0..20 {
            engine(4).advance(&mut buffer, 1).unwrap();
            let plain = buffer.snapshot();
            for row in 0..64 {
                for col in 0..64 {
                    assert_eq!(
                        buffer.cell(row, col).neighbor_count(),
                        plain.live_neighbors(row, col),
                        "generation {generation}, ({row}, {col})"
                    );
                }
            }
        }
    }

    #[test]
    fn thread_count_does_not_change_results() {
        let board = random_board(64, 7);
        let expected = engine(1).run(board.clone(), 50).unwrap();
        for threads in [2, 4, 8, 16] {
            let result = engine(threads).run(board.clone(), 50).unwrap();
            assert_eq!(result, expected, "threads {threads}");
        }
    }

    #[test]
    fn matches_sequential_engine() {
        let board = random_board(48, 3);
        let parallel = engine(4).run(board.clone(), 30).unwrap();
        assert_eq!(parallel, sequential::run(board, 30));
    }

    #[test]
    fn empty_board_stays_empty() {
        let board = Board::square(64);
        for gens in [0, 1, 17, 100] {
            assert_eq!(engine(4).run(board.clone(), gens).unwrap(), board);
        }
    }

    #[test]
    fn wraparound_matches_interior() {
        let n = 32;
        let wrapped = Board::from_alive(n, n, [pos(0, 0), pos(0, -1), pos(-1, 0)]);
        let interior = Board::from_alive(n, n, [pos(10, 10), pos(10, 9), pos(9, 10)]);
        for gens in 0..6 {
            let wrapped_next = engine(4).run(wrapped.clone(), gens).unwrap();
            let interior_next = engine(4).run(interior.clone(), gens).unwrap();
            assert_eq!(wrapped_next, translate(&interior_next, pos(-10, -10)), "gens {gens}");
        }
        // the L closes into a block across the corner
        let block = Board::from_alive(n, n, [pos(0, 0), pos(-1, 0), pos(0, -1), pos(-1, -1)]);
        assert_eq!(engine(4).run(wrapped, 1).unwrap(), block);
    }

    #[test]
    fn glider_translates_diagonally() {
        let n = 64;
        let board = Board::from_alive(n, n, GLIDER.map(|p| p + pos(30, 30)));
        let after = engine(4).run(board.clone(), 4).unwrap();
        assert_eq!(after, translate(&board, Pos2::one()));
    }

    #[test]
    fn glider_returns_after_circling_the_torus() {
        let n = 64;
        let board = Board::from_alive(n, n, GLIDER);
        // one cell per 4 generations along both axes
        assert_eq!(engine(4).run(board.clone(), 4 * n).unwrap(), board);
        assert_ne!(engine(4).run(board.clone(), 2 * n).unwrap(), board);
    }

    #[test]
    fn advance_in_steps_matches_one_run() {
        let board = random_board(32, 11);
        let mut buffer = DoubleBuffer::encode(&board).unwrap();
        for _ in 0..5 {
            engine(2).advance(&mut buffer, 3).unwrap();
        }
        assert_eq!(buffer.decode(), engine(2).run(board, 15).unwrap());
    }

    #[test]
    #[cfg(debug_assertions)]
    fn panicking_worker_does_not_strand_the_others() {
        // a lone cell on slice 0's upper margin whose neighbor count in `next`
        // is already zero, so its death underflows under the boundary lock
        let board = Board::from_alive(8, 8, [pos(3, 1)]);
        let mut buffer = DoubleBuffer::encode(&board).unwrap();
        buffer.next().update(0, 3, Cell::decrement_neighbor_count);

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                engine(2).advance(&mut buffer, 1)
            }));
            let _ = tx.send(outcome.is_err());
        });

        let panicked = rx
            .recv_timeout(Duration::from_secs(10))
            .expect("workers stayed blocked on the barrier");
        assert!(panicked);
    }

    #[test]
    fn parallel_engine_rejects_bad_configurations() {
        assert_eq!(
            engine(4).run(Board::new(32, 40), 1),
            Err(LifeError::NotSquare { nrows: 32, ncols: 40 })
        );
        assert_eq!(
            engine(3).run(Board::square(32), 1),
            Err(LifeError::UnevenSlices { nrows: 32, threads: 3 })
        );
        assert_eq!(engine(0).run(Board::square(32), 1), Err(LifeError::NoThreads));
    }

    #[test]
    fn dispatch_uses_sequential_engine_for_small_boards() {
        // 31 rows cannot be sliced across 4 threads, only the sequential engine accepts it
        let board = Board::from_alive(31, 20, [pos(1, 2), pos(2, 2), pos(3, 2)]);
        let expected = sequential::run(board.clone(), 3);
        assert_eq!(game_of_life(board, 3, EngineConfig::default()), Ok(expected));
    }

    #[test]
    fn dispatch_rejects_oversized_boards() {
        let board = Board::new(32, MAX_DIMENSION + 1);
        assert_eq!(
            game_of_life(board, 1, EngineConfig::default()),
            Err(LifeError::UnsupportedSize {
                nrows: 32,
                ncols: MAX_DIMENSION + 1,
                max: MAX_DIMENSION,
            })
        );
    }

    #[test]
    fn dispatch_runs_parallel_engine_for_large_boards() {
        let board = random_board(64, 5);
        let expected = sequential::run(board.clone(), 8);
        assert_eq!(game_of_life(board, 8, EngineConfig::default()), Ok(expected));
    }
}
