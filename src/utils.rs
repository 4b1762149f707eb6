use crate::engine::{
    Board, PiecesMap, Position, Puzzle, EMPTY_SYMBOL, EXIT_SYMBOL, PRIMARY_SYMBOL, VOID_SYMBOL,
};
use crate::error::PuzzleError;
use crate::moves::{replay_moves, Move};

/// Border of the playable area the exit sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// A validated puzzle description.
///
/// `rows` are already normalised: every row has the same length, the exit margin is
/// included, and margin cells other than the exit are spaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    /// Width of the playable area, margin excluded.
    pub width: usize,
    /// Height of the playable area, margin excluded.
    pub height: usize,
    /// Number of non-primary pieces.
    pub piece_count: usize,
    pub rows: Vec<String>,
    /// Position of the exit in `rows`.
    pub exit: Position,
    pub exit_side: ExitSide,
}

fn invalid(msg: impl Into<String>) -> PuzzleError {
    PuzzleError::InvalidInput(msg.into())
}

/// Parses a puzzle file.
///
/// The expected layout is:
///
/// ```text
/// A B      width and height of the playable area
/// N        number of pieces besides the primary
/// rows...  B rows, or B + 1 when the exit is on the top or bottom border
/// ```
///
/// The exit `K` sits in a margin outside the playable area. With a left or right exit the
/// row holding it has `A + 1` characters and the other rows may omit the margin; with a top
/// or bottom exit it occupies a row of its own.
///
/// # Returns
/// * `Ok(BoardConfig)` with normalised rows.
/// * `Err(PuzzleError::InvalidInput)` describing the first problem found: bad header,
///   missing or misplaced exit, wrong row count or length, missing primary, a primary not
///   aligned with the exit, an illegal glyph, a piece count mismatch, or a piece that is not
///   a straight bar at least two cells long.
///
/// # Examples
/// ```
/// use rush_hour_solver::utils::{parse_puzzle, ExitSide};
///
/// let text = "6 3\n1\n..A...\nPPA...K\n......\n";
/// let config = parse_puzzle(text).unwrap();
/// assert_eq!(config.exit_side, ExitSide::Right);
/// assert_eq!(config.rows[0], "..A... ");
///
/// assert!(parse_puzzle("6 3\n2\n..A...\nPPA...K\n......\n").is_err());
/// ```
pub fn parse_puzzle(text: &str) -> Result<BoardConfig, PuzzleError> {
    let cleaned = text.replace('\r', "");
    let mut lines: Vec<&str> = cleaned
        .split('\n')
        .skip_while(|line| line.trim().is_empty())
        .collect();
    while lines.last().map_or(false, |line| line.trim().is_empty()) {
        lines.pop();
    }
    if lines.len() < 2 {
        return Err(invalid(
            "expected at least a dimensions line and a piece count line",
        ));
    }

    let dims: Vec<usize> = lines[0]
        .split_whitespace()
        .map(|s| s.parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|_| invalid(format!("invalid board dimensions '{}'", lines[0].trim())))?;
    let (width, height) = match dims[..] {
        [w, h] if w > 0 && h > 0 => (w, h),
        _ => return Err(invalid(format!("invalid board dimensions '{}'", lines[0].trim()))),
    };
    let piece_count: usize = lines[1]
        .trim()
        .parse()
        .map_err(|_| invalid(format!("invalid piece count '{}'", lines[1].trim())))?;

    let raw: Vec<Vec<char>> = lines[2..].iter().map(|line| line.chars().collect()).collect();

    let exits: Vec<Position> = raw
        .iter()
        .enumerate()
        .flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &c)| c == EXIT_SYMBOL)
                .map(move |(c, _)| Position::new(r, c))
        })
        .collect();
    let exit = match exits[..] {
        [exit] => exit,
        [] => return Err(invalid("the board has no exit (K)")),
        _ => return Err(invalid("the board must contain exactly one exit (K)")),
    };

    let exit_row_len = raw[exit.row].len();
    let exit_side = if exit.col == 0 && exit_row_len == width + 1 {
        ExitSide::Left
    } else if exit.col == width && exit_row_len == width + 1 {
        ExitSide::Right
    } else if exit.row == 0 && raw.len() == height + 1 {
        ExitSide::Top
    } else if exit.row == height && raw.len() == height + 1 {
        ExitSide::Bottom
    } else {
        return Err(invalid(format!(
            "exit at {} is not on the border of the board",
            exit
        )));
    };

    let expected_rows = match exit_side {
        ExitSide::Left | ExitSide::Right => height,
        ExitSide::Top | ExitSide::Bottom => height + 1,
    };
    if raw.len() != expected_rows {
        return Err(invalid(format!(
            "expected {} board rows, found {}",
            expected_rows,
            raw.len()
        )));
    }

    let rows = normalize_rows(&raw, width, exit, exit_side)?;
    validate_pieces(&rows, piece_count, exit)?;

    Ok(BoardConfig {
        width,
        height,
        piece_count,
        rows: rows.into_iter().map(|row| row.into_iter().collect()).collect(),
        exit,
        exit_side,
    })
}

/// Pads every row to the full stored width and turns the margin into void cells.
fn normalize_rows(
    raw: &[Vec<char>],
    width: usize,
    exit: Position,
    side: ExitSide,
) -> Result<Vec<Vec<char>>, PuzzleError> {
    let mut rows = Vec::with_capacity(raw.len());

    for (r, row) in raw.iter().enumerate() {
        let normalized: Vec<char> = match side {
            ExitSide::Left | ExitSide::Right => {
                if r != exit.row && row.len() != width && row.len() != width + 1 {
                    return Err(invalid(format!(
                        "row {} must have {} or {} columns, found {}",
                        r,
                        width,
                        width + 1,
                        row.len()
                    )));
                }
                if row.len() == width + 1 {
                    let margin_col = if side == ExitSide::Left { 0 } else { width };
                    check_margin(r, margin_col, row[margin_col])?;
                }
                let cells: &[char] = match (side, row.len() == width + 1) {
                    (_, false) => row.as_slice(),
                    (ExitSide::Left, true) => &row[1..],
                    (_, true) => &row[..width],
                };
                let margin = if r == exit.row { EXIT_SYMBOL } else { VOID_SYMBOL };
                if side == ExitSide::Left {
                    std::iter::once(margin).chain(cells.iter().copied()).collect()
                } else {
                    cells.iter().copied().chain(std::iter::once(margin)).collect()
                }
            }
            ExitSide::Top | ExitSide::Bottom => {
                if r == exit.row {
                    if exit.col >= width {
                        return Err(invalid(format!(
                            "exit column {} is outside a board {} wide",
                            exit.col, width
                        )));
                    }
                    for (c, &glyph) in row.iter().enumerate() {
                        check_margin(r, c, glyph)?;
                    }
                    (0..width)
                        .map(|c| if c == exit.col { EXIT_SYMBOL } else { VOID_SYMBOL })
                        .collect()
                } else if row.len() != width {
                    return Err(invalid(format!(
                        "row {} must have {} columns, found {}",
                        r,
                        width,
                        row.len()
                    )));
                } else {
                    row.clone()
                }
            }
        };
        rows.push(normalized);
    }
    Ok(rows)
}

/// Margin cells are rebuilt as void, so only blank, empty or exit glyphs may sit there.
fn check_margin(row: usize, col: usize, glyph: char) -> Result<(), PuzzleError> {
    match glyph {
        VOID_SYMBOL | EMPTY_SYMBOL | EXIT_SYMBOL => Ok(()),
        other => Err(invalid(format!(
            "unexpected '{}' in the exit margin at row {} col {}",
            other, row, col
        ))),
    }
}

/// Checks the glyphs, the piece count, the shape of every piece and the primary's alignment.
fn validate_pieces(
    rows: &[Vec<char>],
    piece_count: usize,
    exit: Position,
) -> Result<(), PuzzleError> {
    // Symbols in order of first appearance, with their cells.
    let mut pieces: Vec<(char, Vec<Position>)> = Vec::new();

    for (r, row) in rows.iter().enumerate() {
        for (c, &glyph) in row.iter().enumerate() {
            if glyph == EMPTY_SYMBOL || glyph == VOID_SYMBOL || glyph == EXIT_SYMBOL {
                continue;
            }
            if !glyph.is_ascii_alphabetic() {
                return Err(invalid(format!(
                    "unexpected character '{}' at row {} col {}",
                    glyph, r, c
                )));
            }
            let pos = Position::new(r, c);
            match pieces.iter_mut().find(|(symbol, _)| *symbol == glyph) {
                Some((_, cells)) => cells.push(pos),
                None => pieces.push((glyph, vec![pos])),
            }
        }
    }

    let Some((_, primary)) = pieces.iter().find(|(symbol, _)| *symbol == PRIMARY_SYMBOL) else {
        return Err(invalid("primary piece (P) not found on the board"));
    };
    let found = pieces.len() - 1;
    if found != piece_count {
        return Err(invalid(format!(
            "header declares {} pieces but the board holds {}",
            piece_count, found
        )));
    }

    for (symbol, cells) in &pieces {
        check_bar(*symbol, cells)?;
    }

    let horizontal = primary.iter().all(|p| p.row == primary[0].row);
    let aligned = if horizontal {
        primary[0].row == exit.row
    } else {
        primary[0].col == exit.col
    };
    if !aligned {
        return Err(invalid(
            "exit (K) must be aligned with the primary piece (P)",
        ));
    }
    Ok(())
}

/// A piece must fill a 1×N or N×1 bounding box exactly, with N ≥ 2.
fn check_bar(symbol: char, cells: &[Position]) -> Result<(), PuzzleError> {
    let min_row = cells.iter().map(|p| p.row).min().unwrap_or(0);
    let max_row = cells.iter().map(|p| p.row).max().unwrap_or(0);
    let min_col = cells.iter().map(|p| p.col).min().unwrap_or(0);
    let max_col = cells.iter().map(|p| p.col).max().unwrap_or(0);
    let (h, w) = (max_row - min_row + 1, max_col - min_col + 1);

    if cells.len() != h * w {
        return Err(invalid(format!("piece {} is not a solid rectangle", symbol)));
    }
    if h == 1 && w == 1 {
        return Err(invalid(format!(
            "piece {} is a single cell; pieces are at least 2 long",
            symbol
        )));
    }
    if h != 1 && w != 1 {
        return Err(invalid(format!(
            "piece {} is {}x{}; one dimension must be 1",
            symbol, w, h
        )));
    }
    Ok(())
}

impl Puzzle {
    pub fn from_config(config: &BoardConfig) -> Result<Puzzle, PuzzleError> {
        Puzzle::from_rows(&config.rows)
    }

    /// Parses and builds a puzzle in one step.
    pub fn parse(text: &str) -> Result<Puzzle, PuzzleError> {
        Puzzle::from_config(&parse_puzzle(text)?)
    }
}

/// Renders a solution as text: the initial board, then every move followed by the board
/// it produces, blocks separated by two blank lines.
///
/// # Errors
/// Whatever `apply_move` reports if a move does not apply in sequence.
pub fn format_solution(
    board: &Board,
    pieces: &PiecesMap,
    moves: &[Move],
) -> Result<String, PuzzleError> {
    let snapshots = replay_moves(board, pieces, moves)?;

    let mut out = format!("Initial board\n{}\n\n\n", board);
    for (i, (mv, (next, _))) in moves.iter().zip(&snapshots).enumerate() {
        out.push_str(&format!("Move {}: {}\n{}\n\n\n", i + 1, mv, next));
    }
    Ok(out)
}
