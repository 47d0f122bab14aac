//! Conway's Game of Life on a toroidal square board.
//!
//! The parallel engine keeps a neighbor count inside every cell and splits the
//! board into row slices, one per thread, synchronized by per-boundary locks
//! and a generation barrier. [`game_of_life`] picks between it and a
//! sequential engine depending on board size.

pub mod board;
pub mod cell;
pub mod config;
pub mod enc;
pub mod engine;
pub mod error;
pub mod pos;
pub mod window;

pub use board::Board;
pub use cell::Cell;
pub use config::EngineConfig;
pub use enc::{DecodeError, Pattern, PositionEncoder, RunLengthEncoded};
pub use engine::{DoubleBuffer, ParallelLife, game_of_life};
pub use error::LifeError;
pub use pos::Pos2;
pub use window::BoardWindow;
