use clap::Parser;
use rush_hour_solver::engine::Puzzle;
use rush_hour_solver::heuristics::Heuristic;
use rush_hour_solver::moves::replay_moves;
use rush_hour_solver::solver::{max_cost, solve, SearchConfig, Strategy, MAX_COST_FACTOR};
use rush_hour_solver::utils::format_solution;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the puzzle file
    puzzle_file: PathBuf,

    /// Search strategy: ucs, greedy, astar, dijkstra or fringe
    #[clap(short, long, default_value = "greedy")]
    strategy: Strategy,

    /// Heuristic for greedy, astar and fringe: manhattan, blocking or combined
    #[clap(short = 'H', long, default_value = "manhattan")]
    heuristic: Heuristic,

    /// Path cost bound, as a multiple of the board area
    #[clap(long, default_value_t = MAX_COST_FACTOR)]
    max_cost_factor: usize,

    /// Write the solution to this file
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Highlight the moved piece on every step
    #[clap(long)]
    animate: bool,
}

fn read_puzzle_file(path: &PathBuf) -> Result<Puzzle, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
    Puzzle::parse(&content).map_err(|e| format!("Invalid puzzle: {}", e))
}

/// Returns whether a solution was found.
fn run(args: &Args) -> Result<bool, String> {
    let puzzle = read_puzzle_file(&args.puzzle_file)?;
    println!("Loaded puzzle from {}\n", args.puzzle_file.display());
    println!("Initial board:\n{}\n", puzzle.board.to_string_with_highlight(None));

    let config = SearchConfig {
        strategy: args.strategy,
        heuristic: args.heuristic,
        max_cost_factor: args.max_cost_factor,
    };
    if config.strategy.is_informed() {
        println!(
            "Searching with {} ({} heuristic, max cost {})...\n",
            config.strategy,
            config.heuristic,
            max_cost(&puzzle.board, config.max_cost_factor)
        );
    } else {
        println!(
            "Searching with {} (max cost {})...\n",
            config.strategy,
            max_cost(&puzzle.board, config.max_cost_factor)
        );
    }

    let result = solve(&puzzle.board, &puzzle.pieces, &config);
    println!("Nodes visited: {}", result.nodes_visited);
    println!(
        "Execution time: {:.3} ms\n",
        result.execution_time.as_secs_f64() * 1000.0
    );

    if !result.solved {
        println!("No solution found.");
        return Ok(false);
    }

    println!("Solution found in {} moves:\n", result.moves.len());
    let snapshots = replay_moves(&puzzle.board, &puzzle.pieces, &result.moves)
        .map_err(|e| format!("Solution does not replay: {}", e))?;
    for (i, (mv, (board, _))) in result.moves.iter().zip(&snapshots).enumerate() {
        let highlight = args.animate.then_some(mv.piece);
        println!("Move {}: {}", i + 1, mv);
        println!("{}\n", board.to_string_with_highlight(highlight));
    }

    if let Some(path) = &args.output {
        let text = format_solution(&puzzle.board, &puzzle.pieces, &result.moves)
            .map_err(|e| format!("Failed to format solution: {}", e))?;
        fs::write(path, text).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        println!("Solution written to {}", path.display());
    }
    Ok(true)
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
