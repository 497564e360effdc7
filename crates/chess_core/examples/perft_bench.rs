//! Perft throughput and move-generation debugging.
//!
//! Usage:
//!   cargo run --release --example perft_bench -p chess_core -- [depth] [fen]
//!   cargo run --release --example perft_bench -p chess_core -- divide <depth> [fen]
//!
//! Without a FEN the standard suite below is run. `divide` prints the node
//! count under each root move, for diffing against another engine.

use std::env;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use chess_core::{Position, STARTPOS_FEN, magic, perft, perft_divide};

const SUITE: &[(&str, &str)] = &[
    ("Starting position", STARTPOS_FEN),
    (
        "Kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    ("Rook endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
    (
        "Promotions",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    ),
    (
        "Middlegame",
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    ),
];

fn nps(nodes: u64, elapsed: Duration) -> f64 {
    if elapsed.as_secs_f64() > 0.0 {
        nodes as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    }
}

fn parse(fen: &str) -> Option<Position> {
    match Position::from_fen(fen) {
        Ok(pos) => Some(pos),
        Err(e) => {
            eprintln!("invalid FEN '{fen}': {e}");
            None
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    // Keep table construction out of the timings
    magic::init();

    if args.first().map(String::as_str) == Some("divide") {
        let depth: u8 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(4);
        let fen = args.get(2).map(String::as_str).unwrap_or(STARTPOS_FEN);
        let Some(mut pos) = parse(fen) else {
            return ExitCode::FAILURE;
        };
        let mut total = 0;
        for (mv, nodes) in perft_divide(&mut pos, depth) {
            println!("{mv}: {nodes}");
            total += nodes;
        }
        println!();
        println!("Nodes searched: {total}");
        return ExitCode::SUCCESS;
    }

    let depth: u8 = args.first().and_then(|s| s.parse().ok()).unwrap_or(5);
    let positions: Vec<(&str, &str)> = match args.get(1) {
        Some(fen) => vec![("Custom", fen.as_str())],
        None => SUITE.to_vec(),
    };

    println!("=== Perft Benchmark (depth {depth}) ===");
    let mut total_nodes = 0u64;
    let mut total_time = Duration::ZERO;
    for (name, fen) in positions {
        let Some(mut pos) = parse(fen) else {
            return ExitCode::FAILURE;
        };
        let start = Instant::now();
        let nodes = perft(&mut pos, depth);
        let elapsed = start.elapsed();
        total_nodes += nodes;
        total_time += elapsed;
        println!(
            "{name:.<30} {nodes:>12} nodes in {elapsed:>8.3?} ({:>10.0} nps)",
            nps(nodes, elapsed)
        );
    }
    println!("{:=<70}", "");
    println!(
        "TOTAL: {total_nodes} nodes in {total_time:.3?} ({:.0} nps)",
        nps(total_nodes, total_time)
    );
    ExitCode::SUCCESS
}
