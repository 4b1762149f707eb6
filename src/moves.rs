//! Legal-move generation and immutable move application.
use crate::engine::{Board, Cell, Orientation, Piece, PiecesMap, Position};
use crate::error::PuzzleError;
use std::fmt;

/// Direction of a slide, relative to the board axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Translates `pos` by `steps` cells. Returns `None` when the result would fall off the
    /// top or left edge; the bottom/right edges are the caller's bounds check.
    pub fn offset(&self, pos: Position, steps: usize) -> Option<Position> {
        match self {
            Direction::Up => pos.row.checked_sub(steps).map(|row| Position::new(row, pos.col)),
            Direction::Down => Some(Position::new(pos.row + steps, pos.col)),
            Direction::Left => pos.col.checked_sub(steps).map(|col| Position::new(pos.row, col)),
            Direction::Right => Some(Position::new(pos.row, pos.col + steps)),
        }
    }

    /// Whether a piece with `orientation` may slide this way.
    pub fn fits(&self, orientation: Orientation) -> bool {
        matches!(
            (self, orientation),
            (Direction::Left | Direction::Right, Orientation::Horizontal)
                | (Direction::Up | Direction::Down, Orientation::Vertical)
        )
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

/// One slide of one piece by `steps` (at least 1) cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: char,
    pub direction: Direction,
    pub steps: usize,
}

impl Move {
    pub fn new(piece: char, direction: Direction, steps: usize) -> Self {
        Move {
            piece,
            direction,
            steps,
        }
    }
}

impl fmt::Display for Move {
    /// `P-right (3)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.piece, self.direction, self.steps)
    }
}

/// Enumerates every legal move on `board`.
///
/// Pieces are visited in declaration order; horizontal pieces try left then right,
/// vertical pieces up then down. Each direction is walked one cell at a time from the
/// leading end and yields one move per reachable step count, so a piece with three free
/// cells ahead produces steps 1, 2 and 3. The walk stops at the first cell that is not
/// `Cell::Empty`, except that the primary piece may take one final step onto the exit.
///
/// Once the primary piece is next to the exit the state is terminal and no moves are
/// returned. A map without an exit or primary simply yields whatever moves the other
/// pieces have.
///
/// # Examples
/// ```
/// use rush_hour_solver::engine::Puzzle;
/// use rush_hour_solver::moves::{generate_moves, Direction, Move};
///
/// let puzzle = Puzzle::from_rows(&["PP..K"]).unwrap();
/// let moves = generate_moves(&puzzle.board, &puzzle.pieces);
/// assert_eq!(moves, vec![
///     Move::new('P', Direction::Right, 1),
///     Move::new('P', Direction::Right, 2),
///     Move::new('P', Direction::Right, 3),
/// ]);
/// ```
pub fn generate_moves(board: &Board, pieces: &PiecesMap) -> Vec<Move> {
    let mut moves = Vec::new();
    if pieces.is_solved() {
        return moves;
    }

    for piece in pieces.iter().filter(|p| !p.is_exit()) {
        let directions = match piece.orientation() {
            Orientation::Horizontal => [Direction::Left, Direction::Right],
            Orientation::Vertical => [Direction::Up, Direction::Down],
            Orientation::Unknown => continue,
        };
        for direction in directions {
            collect_slides(board, piece, direction, &mut moves);
        }
    }
    moves
}

fn collect_slides(board: &Board, piece: &Piece, direction: Direction, moves: &mut Vec<Move>) {
    let leading = match direction {
        Direction::Up | Direction::Left => piece.head(),
        Direction::Down | Direction::Right => piece.tail(),
    };

    let mut steps = 0;
    while let Some(cell) = direction
        .offset(leading, steps + 1)
        .and_then(|pos| board.get(pos))
    {
        match cell {
            Cell::Empty => {
                steps += 1;
                moves.push(Move::new(piece.symbol(), direction, steps));
            }
            Cell::Exit if piece.is_primary() => {
                // The exit is a boundary: the primary may step onto it but no further.
                steps += 1;
                moves.push(Move::new(piece.symbol(), direction, steps));
                break;
            }
            _ => break,
        }
    }
}

/// Applies `mv`, returning fresh board and piece snapshots. The inputs are left untouched.
///
/// The piece's cells are cleared first (the exit cell keeps its `K` glyph), every position
/// is translated by `steps`, and each destination must then be empty or the exit. The
/// piece's symbol is written to every destination except the exit cell, which stays
/// visible; the piece's positions still include it.
///
/// # Errors
/// - `UnknownPiece` if `mv.piece` is not a movable piece in `pieces`.
/// - `IllegalMove` if `steps` is zero, the direction runs against the piece's axis, or any
///   destination is off the grid or occupied.
pub fn apply_move(
    board: &Board,
    pieces: &PiecesMap,
    mv: &Move,
) -> Result<(Board, PiecesMap), PuzzleError> {
    let piece = pieces
        .get(mv.piece)
        .filter(|p| !p.is_exit())
        .ok_or(PuzzleError::UnknownPiece(mv.piece))?;

    let illegal = |reason: String| PuzzleError::IllegalMove { mv: *mv, reason };
    if mv.steps == 0 {
        return Err(illegal("a move must cover at least one cell".to_string()));
    }
    if !mv.direction.fits(piece.orientation()) {
        return Err(illegal(format!(
            "piece {} cannot slide {}",
            piece.symbol(),
            mv.direction
        )));
    }

    let exit_pos = pieces.exit_position();
    let mut new_board = board.clone();
    for &pos in piece.positions() {
        let cleared = if Some(pos) == exit_pos {
            Cell::Exit
        } else {
            Cell::Empty
        };
        new_board.set(pos, cleared);
    }

    let mut new_positions = Vec::with_capacity(piece.size());
    for &pos in piece.positions() {
        let dest = mv
            .direction
            .offset(pos, mv.steps)
            .filter(|&dest| new_board.in_bounds(dest))
            .ok_or_else(|| illegal(format!("{} would leave the board", pos)))?;
        match new_board.get(dest) {
            Some(Cell::Empty) | Some(Cell::Exit) => new_positions.push(dest),
            Some(other) => {
                return Err(illegal(format!(
                    "destination {} is occupied by '{}'",
                    dest,
                    other.to_char()
                )))
            }
            None => return Err(illegal(format!("{} would leave the board", pos))),
        }
    }

    for &dest in &new_positions {
        if Some(dest) != exit_pos {
            new_board.set(dest, Cell::Piece(piece.symbol()));
        }
    }

    let new_pieces = pieces.with_piece(piece.with_positions(new_positions));
    Ok((new_board, new_pieces))
}

/// Replays `moves` from the given snapshot, returning the snapshot after each move.
///
/// The presentation layer uses this to animate or export a solution.
pub fn replay_moves(
    board: &Board,
    pieces: &PiecesMap,
    moves: &[Move],
) -> Result<Vec<(Board, PiecesMap)>, PuzzleError> {
    let mut snapshots = Vec::with_capacity(moves.len());
    let mut current = (board.clone(), pieces.clone());
    for mv in moves {
        current = apply_move(&current.0, &current.1, mv)?;
        snapshots.push(current.clone());
    }
    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Puzzle;

    fn puzzle(rows: &[&str]) -> Puzzle {
        Puzzle::from_rows(rows).unwrap()
    }

    #[test]
    fn test_generate_multi_step_slides_in_declaration_order() {
        let p = puzzle(&[
            "..A...",
            "..A...",
            "......",
            "PP....K",
        ]);
        let moves = generate_moves(&p.board, &p.pieces);
        assert_eq!(
            moves,
            vec![
                Move::new('A', Direction::Down, 1),
                Move::new('A', Direction::Down, 2),
                Move::new('P', Direction::Right, 1),
                Move::new('P', Direction::Right, 2),
                Move::new('P', Direction::Right, 3),
                Move::new('P', Direction::Right, 4),
                Move::new('P', Direction::Right, 5),
            ]
        );
    }

    #[test]
    fn test_generate_stops_at_first_obstruction() {
        let p = puzzle(&[
            "....B.",
            "....B.",
            "PP..B.K",
        ]);
        let moves: Vec<Move> = generate_moves(&p.board, &p.pieces)
            .into_iter()
            .filter(|m| m.piece == 'P')
            .collect();
        assert_eq!(
            moves,
            vec![
                Move::new('P', Direction::Right, 1),
                Move::new('P', Direction::Right, 2),
            ]
        );
    }

    #[test]
    fn test_non_primary_never_enters_exit_or_margin() {
        // C sits in the exit row; the exit and the void margin both stop it.
        let p = puzzle(&[
            "...AA.",
            "PP..CCK",
        ]);
        let moves = generate_moves(&p.board, &p.pieces);
        assert!(moves.iter().all(|m| !(m.piece == 'C' && m.direction == Direction::Right)));
        assert!(moves.iter().all(|m| !(m.piece == 'A' && m.direction == Direction::Right && m.steps > 1)));
        assert!(moves.contains(&Move::new('A', Direction::Right, 1)));
        assert!(moves.contains(&Move::new('C', Direction::Left, 2)));
    }

    #[test]
    fn test_primary_may_step_onto_exit() {
        let p = puzzle(&[" ...", "K.PP"]);
        let moves = generate_moves(&p.board, &p.pieces);
        assert_eq!(
            moves,
            vec![
                Move::new('P', Direction::Left, 1),
                Move::new('P', Direction::Left, 2),
            ]
        );
    }

    #[test]
    fn test_vertical_primary_steps_up_onto_top_exit() {
        let p = puzzle(&[" K  ", "..A.", ".PA.", ".P.."]);
        let moves = generate_moves(&p.board, &p.pieces);
        // A is stopped by the void margin above it.
        assert_eq!(
            moves,
            vec![
                Move::new('A', Direction::Down, 1),
                Move::new('P', Direction::Up, 1),
                Move::new('P', Direction::Up, 2),
            ]
        );

        let (board, pieces) = apply_move(&p.board, &p.pieces, &Move::new('P', Direction::Up, 2)).unwrap();
        assert_eq!(board.to_string(), " K  \n.PA.\n..A.\n....");
        assert_eq!(
            pieces.primary().unwrap().positions(),
            &[Position::new(0, 1), Position::new(1, 1)]
        );
        assert!(pieces.is_solved());
    }

    #[test]
    fn test_vertical_primary_steps_down_onto_bottom_exit() {
        let p = puzzle(&[".P..", ".P..", "....", " K  "]);
        assert_eq!(
            generate_moves(&p.board, &p.pieces),
            vec![
                Move::new('P', Direction::Down, 1),
                Move::new('P', Direction::Down, 2),
            ]
        );

        let (_, pieces) = apply_move(&p.board, &p.pieces, &Move::new('P', Direction::Down, 1)).unwrap();
        assert!(pieces.is_solved());
        assert!(apply_move(&p.board, &p.pieces, &Move::new('P', Direction::Left, 1)).is_err());
    }

    #[test]
    fn test_left_exit_primary_slides_left_onto_exit() {
        let p = puzzle(&[" ....", "K..PP"]);
        let moves = generate_moves(&p.board, &p.pieces);
        assert_eq!(moves.last(), Some(&Move::new('P', Direction::Left, 3)));

        let (board, pieces) = apply_move(&p.board, &p.pieces, &Move::new('P', Direction::Left, 3)).unwrap();
        assert_eq!(board.state_key(), " ....KP...");
        assert!(pieces.is_solved());
    }

    #[test]
    fn test_generate_returns_nothing_when_solved() {
        let p = puzzle(&["AA...", "...PPK"]);
        assert!(p.pieces.is_solved());
        assert!(generate_moves(&p.board, &p.pieces).is_empty());
    }

    #[test]
    fn test_generate_walled_in_yields_no_moves_but_is_not_solved() {
        let p = puzzle(&["PPAA K"]);
        assert!(!p.pieces.is_solved());
        assert!(generate_moves(&p.board, &p.pieces).is_empty());
    }

    #[test]
    fn test_apply_move_produces_new_snapshot() {
        let p = puzzle(&["..A...", "..A...", "PP....K"]);
        let mv = Move::new('A', Direction::Down, 1);
        let (board, pieces) = apply_move(&p.board, &p.pieces, &mv).unwrap();

        assert_eq!(board.to_string(), "...... \n..A... \nPPA...K");
        assert_eq!(
            pieces.get('A').unwrap().positions(),
            &[Position::new(1, 2), Position::new(2, 2)]
        );
        // Inputs are untouched.
        assert_eq!(p.board.to_string(), "..A... \n..A... \nPP....K");
        assert_eq!(p.pieces.get('A').unwrap().head(), Position::new(0, 2));
    }

    #[test]
    fn test_apply_move_onto_exit_keeps_exit_visible() {
        let p = puzzle(&["PP.K"]);
        let (board, pieces) = apply_move(&p.board, &p.pieces, &Move::new('P', Direction::Right, 2)).unwrap();
        assert_eq!(board.state_key(), "..PK");
        assert_eq!(
            pieces.primary().unwrap().positions(),
            &[Position::new(0, 2), Position::new(0, 3)]
        );
        assert!(pieces.is_solved());

        // And back off it: the exit glyph survives the clearing.
        let (back, _) = apply_move(&board, &pieces, &Move::new('P', Direction::Left, 1)).unwrap();
        assert_eq!(back.state_key(), ".PPK");
    }

    #[test]
    fn test_apply_move_unknown_piece() {
        let p = puzzle(&["PP.K"]);
        let err = apply_move(&p.board, &p.pieces, &Move::new('Z', Direction::Left, 1)).unwrap_err();
        assert_eq!(err, PuzzleError::UnknownPiece('Z'));
        let err = apply_move(&p.board, &p.pieces, &Move::new('K', Direction::Left, 1)).unwrap_err();
        assert_eq!(err, PuzzleError::UnknownPiece('K'));
    }

    #[test]
    fn test_apply_move_illegal_moves() {
        let p = puzzle(&["..A.", "PPA.K"]);
        let cases = [
            Move::new('P', Direction::Right, 1), // blocked by A
            Move::new('P', Direction::Left, 1),  // off the board
            Move::new('P', Direction::Up, 1),    // against the axis
            Move::new('A', Direction::Down, 1),  // off the board
            Move::new('A', Direction::Up, 0),    // no distance
        ];
        for mv in cases {
            let result = apply_move(&p.board, &p.pieces, &mv);
            assert!(
                matches!(result, Err(PuzzleError::IllegalMove { .. })),
                "expected IllegalMove for {}",
                mv
            );
        }
    }

    #[test]
    fn test_generated_moves_always_apply_on_random_boards() {
        for seed in 0..100 {
            let p = Puzzle::new_random_with_seed(seed, 10).unwrap();
            for mv in generate_moves(&p.board, &p.pieces) {
                let result = apply_move(&p.board, &p.pieces, &mv);
                assert!(result.is_ok(), "seed {}: {} failed: {:?}", seed, mv, result);
                let (board, pieces) = result.unwrap();
                // The piece model stays in sync with the grid.
                assert!(PiecesMap::from_board(&board).unwrap().get(mv.piece).is_some());
                assert_eq!(pieces.len(), p.pieces.len());
            }
        }
    }

    #[test]
    fn test_replay_moves_returns_every_snapshot() {
        let p = puzzle(&["..A...", "..A...", "PP....K"]);
        let moves = [
            Move::new('P', Direction::Right, 1),
            Move::new('P', Direction::Right, 2),
        ];
        let snapshots = replay_moves(&p.board, &p.pieces, &moves).unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].0.to_string(), "..A... \n..A... \n.PP...K");
        assert_eq!(snapshots[1].0.to_string(), "..A... \n..A... \n...PP.K");

        let bad = [Move::new('A', Direction::Down, 2)];
        assert!(replay_moves(&p.board, &p.pieces, &bad).is_err());
    }
}
