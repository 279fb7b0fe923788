//! Core engine for the apple game: a timed puzzle where rectangles of
//! numbered cells are cleared when their values sum to exactly ten.
//!
//! The crate has three moving parts, in dependency order:
//! - [`generator`]: fills a square grid with runs of values summing to
//!   ten so that a dense set of clearable rectangles exists.
//! - [`evaluator`]: decides whether a selection rectangle is a legal
//!   match and clears it atomically when it is.
//! - [`session`]: thin orchestration over the two: countdown, score,
//!   and the game-over report.
//!
//! Rendering, input translation, and leaderboard persistence live in
//! frontend crates; this crate does no I/O.

pub mod evaluator;
pub mod generator;
pub mod grid;
pub mod session;

pub use evaluator::{evaluate, MatchResult, TARGET_SUM};
pub use generator::{Generator, GeneratorConfig};
pub use grid::{Cell, Grid, Position, Selection, DEFAULT_GRID_SIZE};
pub use session::{GameOverReason, GameSummary, Session, SessionState, GAME_TIME_SECS};
