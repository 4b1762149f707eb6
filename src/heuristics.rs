use crate::engine::{Board, Cell, Orientation, PiecesMap, Position};
use crate::error::PuzzleError;
use std::fmt;
use std::str::FromStr;

/// Signature shared by all estimators: board × pieces → estimated moves to the goal.
pub type HeuristicFn = fn(&Board, &PiecesMap) -> usize;

/// Estimates how far the primary piece still has to travel.
///
/// For a horizontal primary this is the gap between the end facing the exit and the exit
/// cell (plus any row offset). For a vertical or single-cell primary it is the smaller
/// Manhattan distance from either end to the exit, minus one, so both orientations read 0
/// exactly when an end touches the exit.
///
/// The minus one is intentional: the plain end-to-exit minimum would read 1 on a solved
/// vertical board and disagree with `PiecesMap::is_solved`.
///
/// Obstructions are ignored and one move may cover many cells, so this is not a strict
/// lower bound on the number of moves.
///
/// # Returns
/// `0` when the board has no primary piece or no exit.
///
/// # Examples
/// ```
/// use rush_hour_solver::engine::Puzzle;
/// use rush_hour_solver::heuristics::manhattan;
/// let puzzle = Puzzle::from_rows(&["PP...K"]).unwrap();
/// assert_eq!(manhattan(&puzzle.board, &puzzle.pieces), 3);
/// ```
pub fn manhattan(_board: &Board, pieces: &PiecesMap) -> usize {
    let (Some(primary), Some(exit_pos)) = (pieces.primary(), pieces.exit_position()) else {
        return 0;
    };

    match primary.orientation() {
        Orientation::Horizontal => {
            if exit_pos.col < primary.head().col {
                let head = primary.head();
                head.row.abs_diff(exit_pos.row) + head.col.abs_diff(exit_pos.col + 1)
            } else {
                let tail = primary.tail();
                tail.row.abs_diff(exit_pos.row) + (tail.col + 1).abs_diff(exit_pos.col)
            }
        }
        Orientation::Vertical | Orientation::Unknown => {
            let nearest = primary
                .head()
                .manhattan(exit_pos)
                .min(primary.tail().manhattan(exit_pos));
            nearest.saturating_sub(1)
        }
    }
}

/// Counts occupied cells on the straight line between the primary piece and the exit.
///
/// Only cells strictly between the relevant end and the exit are inspected, along the
/// primary's row (horizontal) or column (vertical). Empty cells and the exit itself do not
/// count. Each blocker is assumed to need one move, which is optimistic when slides can be
/// long.
///
/// # Returns
/// `0` when the board has no primary piece or no exit.
pub fn blocking_vehicles(board: &Board, pieces: &PiecesMap) -> usize {
    let (Some(primary), Some(exit_pos)) = (pieces.primary(), pieces.exit_position()) else {
        return 0;
    };
    let (head, tail) = (primary.head(), primary.tail());

    let line: Vec<Position> = match primary.orientation() {
        Orientation::Horizontal => {
            let row = head.row;
            if exit_pos.col < head.col {
                (exit_pos.col + 1..head.col).map(|c| Position::new(row, c)).collect()
            } else {
                (tail.col + 1..=exit_pos.col).map(|c| Position::new(row, c)).collect()
            }
        }
        Orientation::Vertical | Orientation::Unknown => {
            let col = head.col;
            if exit_pos.row < head.row {
                (exit_pos.row + 1..head.row).map(|r| Position::new(r, col)).collect()
            } else {
                (tail.row + 1..=exit_pos.row).map(|r| Position::new(r, col)).collect()
            }
        }
    };

    line.into_iter()
        .filter(|&pos| !matches!(board.get(pos), None | Some(Cell::Empty) | Some(Cell::Exit)))
        .count()
}

/// `manhattan + 3 × blocking_vehicles`.
///
/// Not admissible: A* driven by it may return longer solutions.
pub fn combined(board: &Board, pieces: &PiecesMap) -> usize {
    manhattan(board, pieces) + 3 * blocking_vehicles(board, pieces)
}

/// The estimators an informed strategy can be driven by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heuristic {
    Manhattan,
    BlockingVehicles,
    Combined,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [
        Heuristic::Manhattan,
        Heuristic::BlockingVehicles,
        Heuristic::Combined,
    ];

    pub fn function(&self) -> HeuristicFn {
        match self {
            Heuristic::Manhattan => manhattan,
            Heuristic::BlockingVehicles => blocking_vehicles,
            Heuristic::Combined => combined,
        }
    }

    pub fn estimate(&self, board: &Board, pieces: &PiecesMap) -> usize {
        (self.function())(board, pieces)
    }

    /// Estimate used by Fringe search.
    ///
    /// Manhattan is used as-is. The lane-counting estimators are capped by Manhattan and
    /// floored at 1, which keeps their f-thresholds from jumping past the optimum.
    pub fn fringe_estimate(&self, board: &Board, pieces: &PiecesMap) -> usize {
        match self {
            Heuristic::Manhattan => manhattan(board, pieces),
            Heuristic::BlockingVehicles | Heuristic::Combined => {
                let h = self.estimate(board, pieces);
                manhattan(board, pieces).min(h).max(1)
            }
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Heuristic::Manhattan => "manhattan",
            Heuristic::BlockingVehicles => "blocking",
            Heuristic::Combined => "combined",
        })
    }
}

impl FromStr for Heuristic {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manhattan" => Ok(Heuristic::Manhattan),
            "blocking" | "blockingvehicles" | "blocking-vehicles" => {
                Ok(Heuristic::BlockingVehicles)
            }
            "combined" => Ok(Heuristic::Combined),
            other => Err(PuzzleError::InvalidInput(format!(
                "unknown heuristic '{}' (expected manhattan, blocking or combined)",
                other
            ))),
        }
    }
}
