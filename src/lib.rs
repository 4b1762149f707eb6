//! # Rush Hour Solver Library
//!
//! This library models the Rush Hour sliding-block puzzle and searches its state space for
//! a sequence of moves that brings the primary piece `P` to the exit `K`.
//!
//! It is used by two binaries:
//! - `rush_hour`: Loads a puzzle file, solves it with a chosen strategy and heuristic,
//!   then prints (and optionally exports) the solution.
//! - `strategy_evaluator`: Runs every strategy/heuristic pair over seeded random boards
//!   and compares moves, expanded nodes and time.
//!
//! ## Modules
//! - `engine`: Board representation (`Board`, `Cell`), piece geometry (`Piece`, `PiecesMap`),
//!   goal test and random puzzle generation (`Puzzle`).
//! - `moves`: Move generation and application (`Move`, `generate_moves`, `apply_move`).
//! - `heuristics`: Distance estimators used by the informed strategies.
//! - `queue`: The comparator-driven binary heap backing the search frontiers.
//! - `solver`: UCS, Greedy best-first, A*, Dijkstra and Fringe search behind `solve`.
//! - `utils`: Puzzle file parsing and solution export.
//! - `error`: The crate-wide `PuzzleError`.

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod moves;
pub mod queue;
pub mod solver;
pub mod utils;

// Items from sub-modules are accessed via their full path,
// e.g. `rush_hour_solver::solver::solve()`.
