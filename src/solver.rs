//! Search strategies over the puzzle's state space.
//!
//! Five strategies share one expansion step (generate moves, apply each, encode the
//! resulting board) and differ only in how the frontier is ordered and how repeated states
//! are handled:
//!
//! | Strategy      | Frontier order        | Duplicates        |
//! |---------------|-----------------------|-------------------|
//! | `UniformCost` | g                     | `SkipFinalized`   |
//! | `Greedy`      | h                     | `SkipFinalized`   |
//! | `AStar`       | g + h                 | `SkipFinalized`   |
//! | `Dijkstra`    | g                     | `RelaxDistance`   |
//! | `Fringe`      | f-threshold buckets   | `RelaxDistance`   |
//!
//! Every run owns its frontier and visited/distance tables; nothing is shared between
//! calls, so several searches may run over the same input at once.
use crate::engine::{Board, PiecesMap};
use crate::error::PuzzleError;
use crate::heuristics::{Heuristic, HeuristicFn};
use crate::moves::{apply_move, generate_moves, Move};
use crate::queue::PriorityQueue;
use log::{debug, error, trace};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Multiplier applied to the board area to get the path-cost bound of a search.
pub const MAX_COST_FACTOR: usize = 50;

/// Path-cost bound for searches on `board`: no state deeper than this is expanded.
pub fn max_cost(board: &Board, factor: usize) -> usize {
    board.width() * board.height() * factor
}

/// Which search algorithm to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Uniform-cost search; optimal in move count.
    UniformCost,
    /// Greedy best-first search on the heuristic alone; fast, no optimality.
    Greedy,
    /// A*; optimal when the heuristic is admissible.
    AStar,
    /// Cost-ordered search that relaxes a best-known distance per state; optimal.
    Dijkstra,
    /// Fringe search: A*-like, but expands f-threshold buckets from plain lists.
    Fringe,
}

/// Frontier ordering used by the heap-based strategies.
type FrontierOrder = fn(&SearchState, &SearchState) -> Ordering;

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::UniformCost,
        Strategy::Greedy,
        Strategy::AStar,
        Strategy::Dijkstra,
        Strategy::Fringe,
    ];

    /// Whether the strategy consults a heuristic.
    pub fn is_informed(&self) -> bool {
        matches!(self, Strategy::Greedy | Strategy::AStar | Strategy::Fringe)
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        match self {
            Strategy::UniformCost | Strategy::Greedy | Strategy::AStar => {
                DuplicatePolicy::SkipFinalized
            }
            Strategy::Dijkstra | Strategy::Fringe => DuplicatePolicy::RelaxDistance,
        }
    }

    fn frontier_order(&self) -> FrontierOrder {
        match self {
            Strategy::UniformCost | Strategy::Dijkstra => {
                |a: &SearchState, b: &SearchState| a.cost.cmp(&b.cost)
            }
            Strategy::Greedy => |a: &SearchState, b: &SearchState| a.heuristic.cmp(&b.heuristic),
            Strategy::AStar | Strategy::Fringe => |a: &SearchState, b: &SearchState| a.f.cmp(&b.f),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::UniformCost => "ucs",
            Strategy::Greedy => "greedy",
            Strategy::AStar => "astar",
            Strategy::Dijkstra => "dijkstra",
            Strategy::Fringe => "fringe",
        })
    }
}

impl FromStr for Strategy {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ucs" | "uniform-cost" => Ok(Strategy::UniformCost),
            "greedy" | "gbfs" => Ok(Strategy::Greedy),
            "astar" | "a*" => Ok(Strategy::AStar),
            "dijkstra" => Ok(Strategy::Dijkstra),
            "fringe" => Ok(Strategy::Fringe),
            other => Err(PuzzleError::InvalidInput(format!(
                "unknown strategy '{}' (expected ucs, greedy, astar, dijkstra or fringe)",
                other
            ))),
        }
    }
}

/// How a strategy treats a state it has already seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The first pop of a key finalizes it; later pops and later discoveries are dropped.
    SkipFinalized,
    /// Keep the best known g per key; only strictly better paths are queued, and a popped
    /// state is skipped only when a better path to its key is already known.
    RelaxDistance,
}

/// Per-run duplicate bookkeeping, keyed by `Board::state_key`.
struct Seen {
    policy: DuplicatePolicy,
    finalized: FxHashSet<String>,
    distance: FxHashMap<String, usize>,
}

impl Seen {
    fn new(policy: DuplicatePolicy) -> Self {
        Seen {
            policy,
            finalized: FxHashSet::default(),
            distance: FxHashMap::default(),
        }
    }

    fn record_start(&mut self, key: &str) {
        if self.policy == DuplicatePolicy::RelaxDistance {
            self.distance.insert(key.to_string(), 0);
        }
    }

    /// Whether a state just popped from the frontier should be goal-tested and expanded.
    fn admit_popped(&mut self, state: &SearchState) -> bool {
        match self.policy {
            DuplicatePolicy::SkipFinalized => self.finalized.insert(state.key.clone()),
            DuplicatePolicy::RelaxDistance => self
                .distance
                .get(&state.key)
                .map_or(true, |&best| state.cost <= best),
        }
    }

    /// Whether a successor reached at `cost` should enter the frontier.
    fn admit_successor(&mut self, key: &str, cost: usize) -> bool {
        match self.policy {
            DuplicatePolicy::SkipFinalized => !self.finalized.contains(key),
            DuplicatePolicy::RelaxDistance => {
                if self.distance.get(key).map_or(true, |&best| cost < best) {
                    self.distance.insert(key.to_string(), cost);
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// Tunables for one search run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub strategy: Strategy,
    /// Ignored by the uninformed strategies.
    pub heuristic: Heuristic,
    pub max_cost_factor: usize,
}

impl SearchConfig {
    pub fn new(strategy: Strategy, heuristic: Heuristic) -> Self {
        SearchConfig {
            strategy,
            heuristic,
            max_cost_factor: MAX_COST_FACTOR,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig::new(Strategy::Greedy, Heuristic::Manhattan)
    }
}

/// Outcome of a search. Running out of frontier is reported here with `solved == false`;
/// it is never an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolutionResult {
    pub solved: bool,
    /// Moves from the initial board to the goal; empty when unsolved.
    pub moves: Vec<Move>,
    /// Frontier pops, stale duplicates included.
    pub nodes_visited: usize,
    pub execution_time: Duration,
}

impl SolutionResult {
    fn solved(moves: Vec<Move>, nodes_visited: usize, execution_time: Duration) -> Self {
        SolutionResult {
            solved: true,
            moves,
            nodes_visited,
            execution_time,
        }
    }

    fn unsolved(nodes_visited: usize, execution_time: Duration) -> Self {
        SolutionResult {
            solved: false,
            moves: Vec::new(),
            nodes_visited,
            execution_time,
        }
    }
}

/// A node of the search: one board snapshot plus the path that produced it.
#[derive(Clone, Debug)]
pub struct SearchState {
    pub board: Board,
    pub pieces: PiecesMap,
    pub key: String,
    /// g: moves taken so far.
    pub cost: usize,
    /// h: estimate to the goal (0 for uninformed strategies).
    pub heuristic: usize,
    /// g + h.
    pub f: usize,
    pub moves: Vec<Move>,
}

impl SearchState {
    fn initial(board: &Board, pieces: &PiecesMap, heuristic: usize) -> Self {
        SearchState {
            board: board.clone(),
            pieces: pieces.clone(),
            key: board.state_key(),
            cost: 0,
            heuristic,
            f: heuristic,
            moves: Vec::new(),
        }
    }

    fn child(&self, mv: Move, board: Board, pieces: PiecesMap, key: String, heuristic: usize) -> Self {
        let cost = self.cost + 1;
        let mut moves = Vec::with_capacity(self.moves.len() + 1);
        moves.extend_from_slice(&self.moves);
        moves.push(mv);
        SearchState {
            board,
            pieces,
            key,
            cost,
            heuristic,
            f: cost + heuristic,
            moves,
        }
    }

    /// Successor snapshots of this state, one per legal move.
    ///
    /// A move the applicator rejects means the generator and applicator disagree; it is
    /// logged and skipped rather than aborting the search.
    fn successors(&self) -> impl Iterator<Item = (Move, Board, PiecesMap)> + '_ {
        generate_moves(&self.board, &self.pieces)
            .into_iter()
            .filter_map(move |mv| match apply_move(&self.board, &self.pieces, &mv) {
                Ok((board, pieces)) => Some((mv, board, pieces)),
                Err(err) => {
                    error!("generated move could not be applied: {}", err);
                    None
                }
            })
    }
}

/// Runs the strategy selected in `config` from the given snapshot.
///
/// # Examples
/// ```
/// use rush_hour_solver::engine::Puzzle;
/// use rush_hour_solver::heuristics::Heuristic;
/// use rush_hour_solver::solver::{solve, SearchConfig, Strategy};
///
/// let puzzle = Puzzle::from_rows(&["......", "PPA...K", "..A...", "......"]).unwrap();
/// let config = SearchConfig::new(Strategy::UniformCost, Heuristic::Manhattan);
/// let result = solve(&puzzle.board, &puzzle.pieces, &config);
/// assert!(result.solved);
/// assert_eq!(result.moves.len(), 2);
/// ```
pub fn solve(board: &Board, pieces: &PiecesMap, config: &SearchConfig) -> SolutionResult {
    let limit = max_cost(board, config.max_cost_factor);
    debug!(
        "starting {} search (heuristic: {}, max cost: {})",
        config.strategy, config.heuristic, limit
    );

    let result = match config.strategy {
        Strategy::Fringe => fringe_search(board, pieces, config.heuristic, limit),
        strategy => {
            let estimator = strategy
                .is_informed()
                .then(|| config.heuristic.function());
            best_first(board, pieces, strategy, estimator, limit)
        }
    };

    debug!(
        "{} search finished: solved={}, moves={}, nodes={}, elapsed={:?}",
        config.strategy,
        result.solved,
        result.moves.len(),
        result.nodes_visited,
        result.execution_time
    );
    result
}

pub fn uniform_cost(board: &Board, pieces: &PiecesMap) -> SolutionResult {
    solve(
        board,
        pieces,
        &SearchConfig::new(Strategy::UniformCost, Heuristic::Manhattan),
    )
}

pub fn greedy(board: &Board, pieces: &PiecesMap, heuristic: Heuristic) -> SolutionResult {
    solve(board, pieces, &SearchConfig::new(Strategy::Greedy, heuristic))
}

pub fn astar(board: &Board, pieces: &PiecesMap, heuristic: Heuristic) -> SolutionResult {
    solve(board, pieces, &SearchConfig::new(Strategy::AStar, heuristic))
}

pub fn dijkstra(board: &Board, pieces: &PiecesMap) -> SolutionResult {
    solve(
        board,
        pieces,
        &SearchConfig::new(Strategy::Dijkstra, Heuristic::Manhattan),
    )
}

pub fn fringe(board: &Board, pieces: &PiecesMap, heuristic: Heuristic) -> SolutionResult {
    solve(board, pieces, &SearchConfig::new(Strategy::Fringe, heuristic))
}

/// Heap-driven search shared by UCS, Greedy, A* and Dijkstra.
///
/// A popped state is goal-tested before its cost is compared with `limit`, so a goal
/// reached exactly at the bound is accepted; successors beyond the bound are never queued.
fn best_first(
    board: &Board,
    pieces: &PiecesMap,
    strategy: Strategy,
    estimator: Option<HeuristicFn>,
    limit: usize,
) -> SolutionResult {
    let start = Instant::now();
    let estimate = |b: &Board, p: &PiecesMap| estimator.map_or(0, |h| h(b, p));

    let mut seen = Seen::new(strategy.duplicate_policy());
    let mut open = PriorityQueue::new(strategy.frontier_order());
    let initial = SearchState::initial(board, pieces, estimate(board, pieces));
    seen.record_start(&initial.key);
    open.push(initial);

    let mut nodes_visited = 0;
    while let Some(current) = open.pop() {
        nodes_visited += 1;

        if !seen.admit_popped(&current) {
            continue;
        }
        if current.pieces.is_solved() {
            return SolutionResult::solved(current.moves, nodes_visited, start.elapsed());
        }
        if current.cost > limit {
            continue;
        }

        for (mv, next_board, next_pieces) in current.successors() {
            let cost = current.cost + 1;
            let key = next_board.state_key();
            if cost > limit || !seen.admit_successor(&key, cost) {
                continue;
            }
            let h = estimate(&next_board, &next_pieces);
            open.push(current.child(mv, next_board, next_pieces, key, h));
        }
    }

    SolutionResult::unsolved(nodes_visited, start.elapsed())
}

/// Fringe search.
///
/// `now` holds the states within the current f-threshold and is worked front to back;
/// successors that stay within the threshold go to its front, the rest are deferred to
/// `later`. When `now` runs dry, every deferred state with the smallest f is promoted in one
/// batch and that f becomes the new threshold.
///
/// The cost bound applies to g exactly as in `best_first`: goals are tested before it and
/// successors past it are never queued.
fn fringe_search(
    board: &Board,
    pieces: &PiecesMap,
    heuristic: Heuristic,
    limit: usize,
) -> SolutionResult {
    let start = Instant::now();
    let mut seen = Seen::new(Strategy::Fringe.duplicate_policy());

    let initial = SearchState::initial(board, pieces, heuristic.fringe_estimate(board, pieces));
    seen.record_start(&initial.key);
    let mut f_limit = initial.f;
    let mut now: VecDeque<SearchState> = VecDeque::from([initial]);
    let mut later: Vec<SearchState> = Vec::new();

    let mut nodes_visited = 0;
    loop {
        if now.is_empty() {
            let Some(next_f) = later.iter().map(|s| s.f).min() else {
                break;
            };
            let (promoted, deferred): (Vec<_>, Vec<_>) =
                later.into_iter().partition(|s| s.f == next_f);
            trace!(
                "fringe threshold {} -> {}: promoting {} states, {} deferred",
                f_limit,
                next_f,
                promoted.len(),
                deferred.len()
            );
            now.extend(promoted);
            later = deferred;
            f_limit = next_f;
        }

        let Some(current) = now.pop_front() else {
            break;
        };
        nodes_visited += 1;

        if !seen.admit_popped(&current) {
            continue;
        }
        if current.pieces.is_solved() {
            return SolutionResult::solved(current.moves, nodes_visited, start.elapsed());
        }
        if current.cost > limit {
            continue;
        }

        for (mv, next_board, next_pieces) in current.successors() {
            let cost = current.cost + 1;
            let key = next_board.state_key();
            if cost > limit || !seen.admit_successor(&key, cost) {
                continue;
            }
            let h = heuristic.fringe_estimate(&next_board, &next_pieces);
            let child = current.child(mv, next_board, next_pieces, key, h);
            if child.f <= f_limit {
                now.push_front(child);
            } else {
                later.push(child);
            }
        }
    }

    SolutionResult::unsolved(nodes_visited, start.elapsed())
}
