//! Board and piece model for the Rush Hour puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Cell`: a single grid cell (empty, exit, margin void or part of a piece).
//! - `Board`: the rectangular grid, including the margin row or column that holds the exit.
//! - `Piece` / `PiecesMap`: per-vehicle geometry derived from a board.
//! - `Puzzle`: an initial board together with its pieces, ready to be searched.
//!
//! Boards are plain values. Every transition builds a new `Board` (see `moves::apply_move`),
//! so a snapshot held by a pending search node is never changed underneath it.
use crate::error::PuzzleError;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::fmt;

/// Symbol of the vehicle that has to reach the exit.
pub const PRIMARY_SYMBOL: char = 'P';
/// Symbol of the exit marker.
pub const EXIT_SYMBOL: char = 'K';
/// Glyph of an empty cell.
pub const EMPTY_SYMBOL: char = '.';
/// Glyph of a margin cell outside the playable area.
pub const VOID_SYMBOL: char = ' ';
/// Upper bound on the number of pieces (the primary included) a board may hold.
pub const MAX_PIECES: usize = 24;

/// Represents the content of one cell of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// A free cell any piece may slide into.
    Empty,
    /// The exit marker. Only the primary piece may slide onto it.
    Exit,
    /// Part of the exit margin that is not the exit itself; nothing may enter it.
    Void,
    /// A cell covered by the piece with the given symbol.
    Piece(char),
}

impl Cell {
    /// Interprets a puzzle glyph.
    ///
    /// # Examples
    ///
    /// ```
    /// use rush_hour_solver::engine::Cell;
    /// assert_eq!(Cell::from_char('.'), Cell::Empty);
    /// assert_eq!(Cell::from_char('K'), Cell::Exit);
    /// assert_eq!(Cell::from_char('A'), Cell::Piece('A'));
    /// ```
    pub fn from_char(c: char) -> Cell {
        match c {
            EMPTY_SYMBOL => Cell::Empty,
            EXIT_SYMBOL => Cell::Exit,
            VOID_SYMBOL => Cell::Void,
            symbol => Cell::Piece(symbol),
        }
    }

    /// Converts the cell back to its single-character glyph.
    pub fn to_char(&self) -> char {
        match self {
            Cell::Empty => EMPTY_SYMBOL,
            Cell::Exit => EXIT_SYMBOL,
            Cell::Void => VOID_SYMBOL,
            Cell::Piece(symbol) => *symbol,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Cell::Empty
    }

    /// Returns the ANSI background colour code used for terminal output.
    fn to_ansi_color_code(&self, highlight: Option<char>) -> &'static str {
        match self {
            Cell::Empty | Cell::Void => "40",
            Cell::Exit => "42",
            Cell::Piece(PRIMARY_SYMBOL) => "41",
            Cell::Piece(symbol) if Some(*symbol) == highlight => "43",
            Cell::Piece(_) => "44",
        }
    }
}

/// A zero-based (row, column) coordinate on the stored grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Manhattan distance between two positions.
    pub fn manhattan(&self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The axis a piece is allowed to slide along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
    /// Single-cell pieces (and the exit entry) have no axis and never move.
    Unknown,
}

/// The puzzle grid, stored row-major.
///
/// The stored grid includes the margin that carries the exit, so its dimensions are one
/// larger than the playable area along the exit's axis. Dimensions never change during a
/// search.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Builds a board from rows of cells. Short rows are padded on the right with
    /// `Cell::Void`, so the result is always rectangular.
    ///
    /// # Errors
    /// `MalformedPuzzle` when there are no rows or every row is empty.
    pub fn from_grid(grid: Vec<Vec<Cell>>) -> Result<Board, PuzzleError> {
        let height = grid.len();
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(PuzzleError::MalformedPuzzle(
                "board must have at least one row and one column".to_string(),
            ));
        }

        let mut cells = Vec::with_capacity(width * height);
        for mut row in grid {
            row.resize(width, Cell::Void);
            cells.extend(row);
        }
        Ok(Board {
            width,
            height,
            cells,
        })
    }

    /// Builds a board from row strings, one glyph per cell.
    ///
    /// # Examples
    /// ```
    /// use rush_hour_solver::engine::{Board, Cell, Position};
    /// let board = Board::from_rows(&["AA.", "PP.K"]).unwrap();
    /// assert_eq!(board.width(), 4);
    /// assert_eq!(board.get(Position::new(0, 3)), Some(Cell::Void));
    /// assert_eq!(board.get(Position::new(1, 3)), Some(Cell::Exit));
    /// ```
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Board, PuzzleError> {
        let grid = rows
            .iter()
            .map(|row| row.as_ref().chars().map(Cell::from_char).collect())
            .collect();
        Board::from_grid(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    /// Returns the cell at `pos`, or `None` when `pos` lies outside the grid.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if self.in_bounds(pos) {
            Some(self.cells[pos.row * self.width + pos.col])
        } else {
            None
        }
    }

    /// Overwrites the cell at `pos`. Callers check bounds first.
    pub(crate) fn set(&mut self, pos: Position, cell: Cell) {
        let idx = pos.row * self.width + pos.col;
        self.cells[idx] = cell;
    }

    /// Iterates over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Canonical key of this board state.
    ///
    /// Rows are concatenated top to bottom, each left to right, with no separator. Every
    /// glyph is a single character and the dimensions are fixed for a search, so two boards
    /// are equal exactly when their keys are.
    ///
    /// ```
    /// use rush_hour_solver::engine::Board;
    /// let board = Board::from_rows(&["AB", ".K"]).unwrap();
    /// assert_eq!(board.state_key(), "AB.K");
    /// ```
    pub fn state_key(&self) -> String {
        self.cells.iter().map(Cell::to_char).collect()
    }

    /// Renders the board for a terminal, colouring the primary piece red, the exit green
    /// and `highlight` (typically the piece that just moved) yellow.
    pub fn to_string_with_highlight(&self, highlight: Option<char>) -> String {
        let mut output = String::new();
        for (r_idx, row) in self.rows().enumerate() {
            for cell in row {
                output.push_str(&format!(
                    "\x1b[1;{}m{}\x1b[m",
                    cell.to_ansi_color_code(highlight),
                    cell.to_char()
                ));
            }
            if r_idx < self.height - 1 {
                output.push('\n');
            }
        }
        output
    }

    /// Collects the 4-connected run of `symbol` cells containing `start` (BFS), marking
    /// each cell in `visited`.
    fn flood_fill(&self, start: Position, symbol: char, visited: &mut [bool]) -> Vec<Position> {
        let mut run = Vec::new();
        let mut q = VecDeque::new();
        q.push_back(start);
        visited[start.row * self.width + start.col] = true;

        let dr = [-1, 1, 0, 0];
        let dc = [0, 0, -1, 1];

        while let Some(current) = q.pop_front() {
            run.push(current);
            for i in 0..4 {
                let nr = current.row as isize + dr[i];
                let nc = current.col as isize + dc[i];
                if nr < 0 || nc < 0 {
                    continue;
                }
                let next = Position::new(nr as usize, nc as usize);
                if !self.in_bounds(next) {
                    continue;
                }
                let idx = next.row * self.width + next.col;
                if !visited[idx] && self.cells[idx] == Cell::Piece(symbol) {
                    visited[idx] = true;
                    q.push_back(next);
                }
            }
        }
        run
    }
}

impl fmt::Display for Board {
    /// Plain glyph rows joined by newlines, the format used for solution export.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r_idx, row) in self.rows().enumerate() {
            if r_idx > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
        }
        Ok(())
    }
}

/// Geometry of one vehicle (or of the exit marker).
///
/// Positions are never empty and are kept sorted ascending along the piece's axis, so
/// `head()` is the top/left end and `tail()` the bottom/right end.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    symbol: char,
    positions: Vec<Position>,
    orientation: Orientation,
    is_primary: bool,
    is_exit: bool,
}

impl Piece {
    /// Builds a vehicle from the cells of one connected run.
    ///
    /// # Errors
    /// `MalformedPuzzle` if the cells are not collinear or leave a gap along their axis.
    fn from_run(symbol: char, mut positions: Vec<Position>) -> Result<Piece, PuzzleError> {
        let orientation = if positions.len() == 1 {
            Orientation::Unknown
        } else if positions.iter().all(|p| p.row == positions[0].row) {
            Orientation::Horizontal
        } else if positions.iter().all(|p| p.col == positions[0].col) {
            Orientation::Vertical
        } else {
            return Err(PuzzleError::MalformedPuzzle(format!(
                "piece {} is not a straight line",
                symbol
            )));
        };

        positions.sort_unstable();
        let contiguous = positions.windows(2).all(|w| match orientation {
            Orientation::Horizontal => w[1].col == w[0].col + 1,
            Orientation::Vertical => w[1].row == w[0].row + 1,
            Orientation::Unknown => true,
        });
        if !contiguous {
            return Err(PuzzleError::MalformedPuzzle(format!(
                "piece {} has non-contiguous positions",
                symbol
            )));
        }

        Ok(Piece {
            symbol,
            positions,
            orientation,
            is_primary: symbol == PRIMARY_SYMBOL,
            is_exit: false,
        })
    }

    fn exit(pos: Position) -> Piece {
        Piece {
            symbol: EXIT_SYMBOL,
            positions: vec![pos],
            orientation: Orientation::Unknown,
            is_primary: false,
            is_exit: true,
        }
    }

    /// Same piece, moved to `positions`. The caller keeps them sorted along the axis.
    pub(crate) fn with_positions(&self, positions: Vec<Position>) -> Piece {
        Piece {
            positions,
            ..self.clone()
        }
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_exit(&self) -> bool {
        self.is_exit
    }

    pub fn size(&self) -> usize {
        self.positions.len()
    }

    /// The first cell of the piece, in reading order.
    pub fn primary_position(&self) -> Position {
        self.head()
    }

    /// Top (vertical) or left (horizontal) end.
    pub fn head(&self) -> Position {
        self.positions[0]
    }

    /// Bottom (vertical) or right (horizontal) end.
    pub fn tail(&self) -> Position {
        self.positions[self.positions.len() - 1]
    }
}

/// All pieces of a board, keyed by symbol, in declaration (row-major discovery) order.
///
/// The exit marker is stored here too, flagged with `is_exit`, so adjacency tests can find
/// it next to the pieces.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PiecesMap {
    pieces: Vec<Piece>,
}

impl PiecesMap {
    /// Derives the pieces from a board.
    ///
    /// Every maximal 4-connected run of identical piece glyphs becomes one `Piece`.
    ///
    /// # Errors
    /// `MalformedPuzzle` when a symbol is reused by separate runs, when more than
    /// `MAX_PIECES` pieces are present, when a run is not a straight contiguous line, or when
    /// the exit marker occurs more than once.
    ///
    /// # Examples
    /// ```
    /// use rush_hour_solver::engine::{Board, Orientation, PiecesMap};
    /// let board = Board::from_rows(&["..A.", "PPA.K"]).unwrap();
    /// let pieces = PiecesMap::from_board(&board).unwrap();
    /// assert_eq!(pieces.get('A').unwrap().orientation(), Orientation::Vertical);
    /// assert!(pieces.primary().is_some());
    /// assert!(pieces.exit().is_some());
    /// ```
    pub fn from_board(board: &Board) -> Result<PiecesMap, PuzzleError> {
        let mut pieces: Vec<Piece> = Vec::new();
        let mut visited = vec![false; board.width * board.height];
        let mut piece_count = 0;

        for row in 0..board.height {
            for col in 0..board.width {
                let idx = row * board.width + col;
                if visited[idx] {
                    continue;
                }
                let pos = Position::new(row, col);

                match board.cells[idx] {
                    Cell::Empty | Cell::Void => visited[idx] = true,
                    Cell::Exit => {
                        visited[idx] = true;
                        if pieces.iter().any(Piece::is_exit) {
                            return Err(PuzzleError::MalformedPuzzle(format!(
                                "exit marker '{}' appears more than once",
                                EXIT_SYMBOL
                            )));
                        }
                        pieces.push(Piece::exit(pos));
                    }
                    Cell::Piece(symbol) => {
                        if pieces.iter().any(|p| p.symbol == symbol) {
                            return Err(PuzzleError::MalformedPuzzle(format!(
                                "symbol '{}' is used by more than one separate group of cells",
                                symbol
                            )));
                        }
                        if piece_count >= MAX_PIECES {
                            return Err(PuzzleError::MalformedPuzzle(format!(
                                "maximum number of pieces ({}) exceeded",
                                MAX_PIECES
                            )));
                        }
                        let run = board.flood_fill(pos, symbol, &mut visited);
                        pieces.push(Piece::from_run(symbol, run)?);
                        piece_count += 1;
                    }
                }
            }
        }

        Ok(PiecesMap { pieces })
    }

    pub fn get(&self, symbol: char) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.symbol == symbol)
    }

    /// Iterates in declaration order, exit entry included.
    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn primary(&self) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.is_primary)
    }

    pub fn exit(&self) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.is_exit)
    }

    pub fn exit_position(&self) -> Option<Position> {
        self.exit().map(Piece::head)
    }

    /// Copy of this map with `piece` replacing the entry that has the same symbol.
    pub(crate) fn with_piece(&self, piece: Piece) -> PiecesMap {
        let pieces = self
            .pieces
            .iter()
            .map(|p| {
                if p.symbol == piece.symbol {
                    piece.clone()
                } else {
                    p.clone()
                }
            })
            .collect();
        PiecesMap { pieces }
    }

    /// Whether the primary piece sits directly next to the exit on the exit's side.
    ///
    /// A horizontal primary is solved when the exit is immediately left of its left end or
    /// immediately right of its right end, in the same row; a vertical primary likewise with
    /// its top and bottom ends. In any other arrangement the primary counts as solved only
    /// when one of its cells coincides with the exit. A map without a primary or an exit is
    /// never solved.
    pub fn is_solved(&self) -> bool {
        let (Some(primary), Some(exit_pos)) = (self.primary(), self.exit_position()) else {
            return false;
        };
        let (head, tail) = (primary.head(), primary.tail());

        match primary.orientation {
            Orientation::Horizontal if exit_pos.col < head.col => {
                return head.row == exit_pos.row && head.col == exit_pos.col + 1;
            }
            Orientation::Horizontal if exit_pos.col > tail.col => {
                return tail.row == exit_pos.row && tail.col + 1 == exit_pos.col;
            }
            Orientation::Vertical if exit_pos.row < head.row => {
                return head.col == exit_pos.col && head.row == exit_pos.row + 1;
            }
            Orientation::Vertical if exit_pos.row > tail.row => {
                return tail.col == exit_pos.col && tail.row + 1 == exit_pos.row;
            }
            _ => {}
        }

        primary.positions.contains(&exit_pos)
    }
}

/// An initial board together with the pieces derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    pub board: Board,
    pub pieces: PiecesMap,
}

impl Puzzle {
    pub fn new(board: Board) -> Result<Puzzle, PuzzleError> {
        let pieces = PiecesMap::from_board(&board)?;
        Ok(Puzzle { board, pieces })
    }

    /// Builds a puzzle straight from row strings (already normalised: exit margin
    /// included, one glyph per cell).
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Puzzle, PuzzleError> {
        Puzzle::new(Board::from_rows(rows)?)
    }

    /// Generates a reproducible random 6x6 puzzle.
    ///
    /// The primary piece is a horizontal pair in a random row, with the exit in the right
    /// margin of that row. Up to `vehicles` further pieces of length 2 or 3 are dropped at
    /// random free spots; horizontal pieces never go into the primary's row. The result is
    /// not guaranteed to be solvable. The same seed always yields the same puzzle.
    pub fn new_random_with_seed(seed: u64, vehicles: usize) -> Result<Puzzle, PuzzleError> {
        const SIZE: usize = 6;
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut grid = [[EMPTY_SYMBOL; SIZE]; SIZE];

        let exit_row = rng.gen_range(0..SIZE);
        let primary_col = rng.gen_range(0..=SIZE - 2);
        grid[exit_row][primary_col] = PRIMARY_SYMBOL;
        grid[exit_row][primary_col + 1] = PRIMARY_SYMBOL;

        let mut symbols = ('A'..='Z').filter(|&c| c != PRIMARY_SYMBOL && c != EXIT_SYMBOL);
        let target = vehicles.min(MAX_PIECES - 1);
        let mut placed = 0;
        let mut attempts = 0;

        while placed < target && attempts < target * 20 {
            attempts += 1;
            let len = rng.gen_range(2..=3);
            let horizontal = rng.gen_bool(0.5);
            let (row, col) = if horizontal {
                (rng.gen_range(0..SIZE), rng.gen_range(0..=SIZE - len))
            } else {
                (rng.gen_range(0..=SIZE - len), rng.gen_range(0..SIZE))
            };
            if horizontal && row == exit_row {
                continue;
            }

            let cells: Vec<(usize, usize)> = (0..len)
                .map(|i| if horizontal { (row, col + i) } else { (row + i, col) })
                .collect();
            if cells.iter().any(|&(r, c)| grid[r][c] != EMPTY_SYMBOL) {
                continue;
            }

            let Some(symbol) = symbols.next() else {
                break;
            };
            for (r, c) in cells {
                grid[r][c] = symbol;
            }
            placed += 1;
        }

        let rows: Vec<String> = grid
            .iter()
            .enumerate()
            .map(|(r, row)| {
                let margin = if r == exit_row { EXIT_SYMBOL } else { VOID_SYMBOL };
                row.iter().chain(std::iter::once(&margin)).collect()
            })
            .collect();
        Puzzle::from_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_from_rows_pads_short_rows_with_void() {
        let board = Board::from_rows(&["..", "PP.K"]).unwrap();
        assert_eq!(board.width(), 4);
        assert_eq!(board.height(), 2);
        assert_eq!(board.get(Position::new(0, 2)), Some(Cell::Void));
        assert_eq!(board.get(Position::new(0, 3)), Some(Cell::Void));
        assert_eq!(board.get(Position::new(1, 3)), Some(Cell::Exit));
        assert_eq!(board.get(Position::new(2, 0)), None);
    }

    #[test]
    fn test_board_from_rows_rejects_empty_input() {
        let rows: [&str; 0] = [];
        assert!(matches!(
            Board::from_rows(&rows),
            Err(PuzzleError::MalformedPuzzle(_))
        ));
        assert!(Board::from_rows(&["", ""]).is_err());
    }

    #[test]
    fn test_display_and_state_key() {
        let rows = ["AA..", "PP.K"];
        let board = Board::from_rows(&rows).unwrap();
        assert_eq!(board.to_string(), "AA..\nPP.K");
        assert_eq!(board.state_key(), "AA..PP.K");
    }

    #[test]
    fn test_state_key_distinguishes_any_differing_cell() {
        let a = Board::from_rows(&["AA.", "PP.K"]).unwrap();
        let b = Board::from_rows(&[".AA", "PP.K"]).unwrap();
        let c = Board::from_rows(&["AA.", "PP.K"]).unwrap();
        assert_ne!(a.state_key(), b.state_key());
        assert_eq!(a.state_key(), c.state_key());
        assert_eq!(a, c);
    }

    #[test]
    fn test_highlight_output_contains_colour_codes() {
        let board = Board::from_rows(&["A.", "PPK"]).unwrap();
        let out = board.to_string_with_highlight(Some('A'));
        assert!(out.contains("\x1b[1;43mA"));
        assert!(out.contains("\x1b[1;41mP"));
        assert!(out.contains("\x1b[1;42mK"));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_pieces_from_board_orientation_and_order() {
        let board = Board::from_rows(&[
            "BB.C..",
            "...C..",
            "PP.C..K",
        ])
        .unwrap();
        let pieces = PiecesMap::from_board(&board).unwrap();
        let symbols: Vec<char> = pieces.iter().map(Piece::symbol).collect();
        assert_eq!(symbols, vec!['B', 'C', 'P', 'K']);

        let c = pieces.get('C').unwrap();
        assert_eq!(c.orientation(), Orientation::Vertical);
        assert_eq!(c.size(), 3);
        assert_eq!(c.head(), Position::new(0, 3));
        assert_eq!(c.tail(), Position::new(2, 3));
        assert_eq!(c.primary_position(), Position::new(0, 3));

        let p = pieces.primary().unwrap();
        assert_eq!(p.symbol(), 'P');
        assert_eq!(p.orientation(), Orientation::Horizontal);
        assert!(!p.is_exit());

        let exit = pieces.exit().unwrap();
        assert!(exit.is_exit());
        assert_eq!(pieces.exit_position(), Some(Position::new(2, 6)));
    }

    #[test]
    fn test_single_cell_piece_has_unknown_orientation() {
        let board = Board::from_rows(&["A..", "PP.K"]).unwrap();
        let pieces = PiecesMap::from_board(&board).unwrap();
        assert_eq!(pieces.get('A').unwrap().orientation(), Orientation::Unknown);
    }

    #[test]
    fn test_pieces_rejects_reused_symbol() {
        let board = Board::from_rows(&["AA.AA", "PP...K"]).unwrap();
        let err = PiecesMap::from_board(&board).unwrap_err();
        assert!(matches!(err, PuzzleError::MalformedPuzzle(msg) if msg.contains("'A'")));
    }

    #[test]
    fn test_pieces_rejects_non_straight_piece() {
        let board = Board::from_rows(&["AA..", ".A..", "PP..K"]).unwrap();
        assert!(matches!(
            PiecesMap::from_board(&board),
            Err(PuzzleError::MalformedPuzzle(msg)) if msg.contains("straight")
        ));
    }

    #[test]
    fn test_pieces_rejects_second_exit() {
        let board = Board::from_rows(&["K...", "PP..K"]).unwrap();
        assert!(matches!(
            PiecesMap::from_board(&board),
            Err(PuzzleError::MalformedPuzzle(msg)) if msg.contains("more than once")
        ));
    }

    #[test]
    fn test_pieces_rejects_too_many_pieces() {
        // 25 vertical pairs, one per column: one more than the cap.
        let symbols: Vec<char> = ('A'..='Z').filter(|&c| c != EXIT_SYMBOL).collect();
        assert_eq!(symbols.len(), MAX_PIECES + 1);
        let row: String = symbols.iter().collect();
        let board = Board::from_rows(&[row.clone(), row]).unwrap();
        assert!(matches!(
            PiecesMap::from_board(&board),
            Err(PuzzleError::MalformedPuzzle(msg)) if msg.contains("maximum")
        ));
    }

    #[test]
    fn test_is_solved_horizontal_right_and_left() {
        let right = Puzzle::from_rows(&["....", "..PPK"]).unwrap();
        assert!(right.pieces.is_solved());

        let not_yet = Puzzle::from_rows(&["....", ".PP.K"]).unwrap();
        assert!(!not_yet.pieces.is_solved());

        let left = Puzzle::from_rows(&[" ....", "KPP.."]).unwrap();
        assert!(left.pieces.is_solved());
    }

    #[test]
    fn test_is_solved_vertical_top_and_bottom() {
        let top = Puzzle::from_rows(&[" K", ".P", ".P", ".."]).unwrap();
        assert!(top.pieces.is_solved());

        let bottom = Puzzle::from_rows(&["..", ".P", ".P", ".K"]).unwrap();
        assert!(bottom.pieces.is_solved());

        let gap = Puzzle::from_rows(&["..", ".P", ".P", "..", ".K"]).unwrap();
        assert!(!gap.pieces.is_solved());
    }

    #[test]
    fn test_is_solved_without_primary_or_exit() {
        let no_primary = Puzzle::from_rows(&["AA.K"]).unwrap();
        assert!(!no_primary.pieces.is_solved());
        let no_exit = Puzzle::from_rows(&["PP.."]).unwrap();
        assert!(!no_exit.pieces.is_solved());
    }

    #[test]
    fn test_new_random_with_seed_determinism() {
        let a = Puzzle::new_random_with_seed(42, 8).unwrap();
        let b = Puzzle::new_random_with_seed(42, 8).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.board.width(), 7);
        assert_eq!(a.board.height(), 6);
        assert!(a.pieces.primary().is_some());
        assert!(a.pieces.exit().is_some());
        assert!(a.pieces.len() <= MAX_PIECES + 1);
    }

    #[test]
    fn test_new_random_with_seed_varies_with_seed() {
        let boards: Vec<Board> = (0..10)
            .map(|seed| Puzzle::new_random_with_seed(seed, 8).unwrap().board)
            .collect();
        assert!(boards.iter().any(|b| *b != boards[0]));
    }

    #[test]
    fn test_random_puzzle_exit_is_in_primary_row() {
        for seed in 0..50 {
            let puzzle = Puzzle::new_random_with_seed(seed, 10).unwrap();
            let primary = puzzle.pieces.primary().unwrap();
            let exit = puzzle.pieces.exit_position().unwrap();
            assert_eq!(primary.orientation(), Orientation::Horizontal);
            assert_eq!(primary.head().row, exit.row);
            assert_eq!(exit.col, 6);
        }
    }
}
