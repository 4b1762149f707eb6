use clap::Parser;
use rush_hour_solver::engine::Puzzle;
use rush_hour_solver::heuristics::Heuristic;
use rush_hour_solver::solver::{solve, SearchConfig, Strategy};
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compares search strategies on seeded random boards", long_about = None)]
struct Args {
    /// Number of random boards to evaluate
    #[clap(long, default_value_t = 20)]
    boards: usize,

    /// Seed of the first board; board i uses seed + i
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Vehicles to place on each board besides the primary
    #[clap(long, default_value_t = 8)]
    vehicles: usize,
}

#[derive(Default)]
struct Tally {
    solved: usize,
    total_moves: usize,
    total_nodes: usize,
    total_time: Duration,
}

impl Tally {
    fn average(total: usize, count: usize) -> f64 {
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    fn average_millis(&self, count: usize) -> f64 {
        if count == 0 {
            0.0
        } else {
            self.total_time.as_secs_f64() * 1000.0 / count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_millis_keeps_long_totals() {
        let tally = Tally {
            total_time: Duration::from_secs(u64::MAX / 2),
            ..Tally::default()
        };
        let expected = (u64::MAX / 2) as f64 * 1000.0 / 4.0;
        assert!((tally.average_millis(4) - expected).abs() / expected < 1e-9);
        assert_eq!(tally.average_millis(0), 0.0);

        let short = Tally {
            total_time: Duration::from_micros(3500),
            ..Tally::default()
        };
        assert!((short.average_millis(2) - 1.75).abs() < 1e-9);
    }
}

fn configurations() -> Vec<SearchConfig> {
    let mut configs = Vec::new();
    for strategy in Strategy::ALL {
        if strategy.is_informed() {
            configs.extend(Heuristic::ALL.iter().map(|&h| SearchConfig::new(strategy, h)));
        } else {
            configs.push(SearchConfig::new(strategy, Heuristic::Manhattan));
        }
    }
    configs
}

fn label(config: &SearchConfig) -> String {
    if config.strategy.is_informed() {
        format!("{}/{}", config.strategy, config.heuristic)
    } else {
        config.strategy.to_string()
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let configs = configurations();
    let mut tallies: Vec<Tally> = configs.iter().map(|_| Tally::default()).collect();
    let mut evaluated = 0;

    println!("Starting strategy evaluation for {} boards...", args.boards);

    for board_idx in 0..args.boards {
        let current_seed = args.seed + board_idx as u64;
        let puzzle = match Puzzle::new_random_with_seed(current_seed, args.vehicles) {
            Ok(puzzle) => puzzle,
            Err(e) => {
                eprintln!("Skipping board {} (Seed: {}): {}", board_idx, current_seed, e);
                continue;
            }
        };
        evaluated += 1;

        println!("\nEvaluating Board {} (Seed: {})", board_idx, current_seed);
        println!("{}", puzzle.board);

        for (config, tally) in configs.iter().zip(tallies.iter_mut()) {
            let result = solve(&puzzle.board, &puzzle.pieces, config);
            if result.solved {
                tally.solved += 1;
                tally.total_moves += result.moves.len();
            }
            tally.total_nodes += result.nodes_visited;
            tally.total_time += result.execution_time;
            println!(
                "  {:<20} solved: {:<5} moves: {:<4} nodes: {}",
                label(config),
                result.solved,
                result.moves.len(),
                result.nodes_visited
            );
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards evaluated: {}", evaluated);
    println!("\n--- Averages ---");
    println!(
        "{:<20} {:>8} {:>10} {:>12} {:>12}",
        "Strategy", "Solved", "Avg moves", "Avg nodes", "Avg ms"
    );
    for (config, tally) in configs.iter().zip(&tallies) {
        println!(
            "{:<20} {:>8} {:>10.2} {:>12.1} {:>12.3}",
            label(config),
            format!("{}/{}", tally.solved, evaluated),
            Tally::average(tally.total_moves, tally.solved),
            Tally::average(tally.total_nodes, evaluated),
            tally.average_millis(evaluated)
        );
    }
}
