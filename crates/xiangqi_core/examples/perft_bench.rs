//! Perft benchmark for profiling with cargo-flamegraph.
//!
//! Usage:
//!   cargo flamegraph --example perft_bench -p xiangqi_core -- [depth] [fen]
//!
//! Pass `divide` as a third argument to print the per-move breakdown.

use std::env;
use std::time::Instant;

use xiangqi_core::{divide, parse_fen, perft};

/// Test positions for profiling
const TEST_POSITIONS: &[(&str, &str)] = &[
    (
        "Starting position",
        "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w",
    ),
    (
        "Central cannon opening",
        "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C2C4/9/RNBAKABNR b",
    ),
    (
        "Chariot endgame",
        "3ak4/4a4/9/9/9/9/9/9/4R4/3K5 w",
    ),
];

fn main() {
    let args: Vec<String> = env::args().collect();

    let depth: u8 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(4);

    // If FEN provided, use single position mode
    if let Some(fen) = args.get(2) {
        run_single_position(fen, depth, args.get(3).is_some_and(|a| a == "divide"));
    } else {
        run_all_positions(depth);
    }
}

fn run_single_position(fen: &str, depth: u8, show_divide: bool) {
    let (mut pos, side) = match parse_fen(fen) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("invalid FEN: {err}");
            return;
        }
    };

    println!("Position: {fen}");
    println!("Depth: {depth}");
    println!();

    if show_divide {
        for (mv, nodes) in divide(&mut pos, side, depth) {
            println!("{mv}: {nodes}");
        }
        println!();
    }

    let start = Instant::now();
    let nodes = perft(&mut pos, side, depth);
    let elapsed = start.elapsed();

    let nps = if elapsed.as_secs_f64() > 0.0 {
        nodes as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    println!("Nodes: {nodes}");
    println!("Time: {elapsed:.3?}");
    println!("NPS: {nps:.0}");
}

fn run_all_positions(depth: u8) {
    println!("=== Perft Benchmark Suite ===");
    println!("Depth: {depth}");
    println!();

    let mut total_nodes = 0u64;
    let mut total_time = std::time::Duration::ZERO;

    for (name, fen) in TEST_POSITIONS {
        let Ok((mut pos, side)) = parse_fen(fen) else {
            eprintln!("{name}: invalid FEN");
            continue;
        };

        print!("{name:.<30}");

        let start = Instant::now();
        let nodes = perft(&mut pos, side, depth);
        let elapsed = start.elapsed();

        total_nodes += nodes;
        total_time += elapsed;

        let nps = if elapsed.as_secs_f64() > 0.0 {
            nodes as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        println!(" {nodes:>12} nodes in {elapsed:>8.3?} ({nps:>10.0} nps)");
    }

    println!();
    println!("{:=<70}", "");
    let total_nps = if total_time.as_secs_f64() > 0.0 {
        total_nodes as f64 / total_time.as_secs_f64()
    } else {
        0.0
    };
    println!("TOTAL: {total_nodes} nodes in {total_time:.3?} ({total_nps:.0} nps)");
}
