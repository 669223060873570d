use std::time::Instant;

use rayon::prelude::*;

use xiangqi_core::{Position, Side, legal_moves, parse_fen, perft};

const FULL_PERFT_ENV: &str = "FULL_PERFT";
const NODE_LIMIT: u64 = 1_000_000;

fn parse_epd_line(line: &str) -> Option<(String, Vec<(u8, u64)>)> {
    let mut parts = line.split(';');
    let fen = parts.next()?.trim();
    if fen.is_empty() {
        return None;
    }

    let mut depths = Vec::new();
    for part in parts {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let mut items = part.split_whitespace();
        let key = items.next().unwrap_or("");
        let val = items.next().unwrap_or("");
        if !key.starts_with('D') {
            continue;
        }
        let depth: u8 = key[1..]
            .parse()
            .unwrap_or_else(|_| panic!("Invalid depth token in EPD: {}", key));
        let expected: u64 = val
            .parse()
            .unwrap_or_else(|_| panic!("Invalid node count in EPD: {}", val));
        depths.push((depth, expected));
    }
    if depths.is_empty() {
        return None;
    }
    depths.sort_by_key(|(d, _)| *d);
    Some((fen.to_string(), depths))
}

/// Splits the root moves across the rayon pool.
fn parallel_perft(pos: &Position, side: Side, depth: u8) -> u64 {
    if depth <= 1 {
        return legal_moves(pos, side).len() as u64;
    }
    legal_moves(pos, side)
        .par_iter()
        .map(|&mv| {
            let mut child = pos.clone();
            child.make_move(mv);
            perft(&mut child, side.other(), depth - 1)
        })
        .sum()
}

#[test]
fn perft_from_standard_epd() {
    let full = std::env::var(FULL_PERFT_ENV).is_ok();
    let data = include_str!("standard.epd");

    for (idx, line) in data.lines().enumerate() {
        let Some((fen, depths)) = parse_epd_line(line.trim()) else {
            continue;
        };
        let (pos, side) = parse_fen(&fen).expect("EPD contains an invalid FEN");
        let case_start = Instant::now();
        let mut ran_depths = Vec::new();

        for (depth, expected) in depths {
            if !full && expected > NODE_LIMIT {
                eprintln!(
                    "Skipping depth {} for case {} (expected {} nodes) - set {}=1 to run all.",
                    depth,
                    idx + 1,
                    expected,
                    FULL_PERFT_ENV
                );
                continue;
            }
            let got = parallel_perft(&pos, side, depth);
            assert!(
                got == expected,
                "Perft mismatch for FEN '{}' at depth {}: expected {}, got {}",
                fen,
                depth,
                expected,
                got
            );
            ran_depths.push(depth);
        }

        println!(
            "Case {:03} done: depths {:?}, elapsed {:.3?}",
            idx + 1,
            ran_depths,
            case_start.elapsed()
        );
    }
}

#[test]
fn perft_serial_matches_parallel() {
    let mut pos = Position::startpos();
    assert_eq!(perft(&mut pos, Side::Red, 2), 1920);
    assert_eq!(parallel_perft(&pos, Side::Red, 2), 1920);
    assert_eq!(pos, Position::startpos());
}

#[test]
fn divide_sums_to_perft() {
    let mut pos = Position::startpos();
    let split = xiangqi_core::divide(&mut pos, Side::Black, 2);
    assert_eq!(split.len(), 44);
    assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 1920);
}
