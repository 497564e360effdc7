//! UCI front end for the classical engine.
//!
//! Commands are read from stdin on the main thread; each `go` runs on a
//! worker thread that owns the engine until it prints `bestmove`. Logs go to
//! stderr so stdout carries protocol traffic only.

mod go;
mod options;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use chess_core::{Position, StopHandle, move_to_uci, perft_divide, set_position_from_uci};
use classical_engine::{
    ClassicalEngine, EngineConfig, SearchParameters, SearchReport, format_line, mate_in_moves,
};
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use go::GoOptions;
use options::{DEFAULT_HASH_MB, EngineOption};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Engine configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    if let Err(e) = run(&args) {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading engine config {}", path.display()))?,
        None => EngineConfig {
            hash_buckets_log2: EngineConfig::buckets_log2_for_megabytes(DEFAULT_HASH_MB),
            ..EngineConfig::default()
        },
    };
    info!(?config, "engine starting");

    let mut session = Session::new(config);
    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, rest)) = parts.split_first() else {
            continue;
        };
        debug!(%line, "command");
        if !session.handle(command, rest) {
            break;
        }
    }
    session.stop_search();
    Ok(())
}

/// Write one protocol line to stdout.
fn send(line: &str) {
    let mut out = io::stdout().lock();
    // A closed stdout means the GUI is gone; the read loop ends on its own
    let _ = writeln!(out, "{line}").and_then(|()| out.flush());
}

fn lock(engine: &Mutex<ClassicalEngine>) -> MutexGuard<'_, ClassicalEngine> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `info` line for one completed iteration.
fn info_line(report: &SearchReport) -> String {
    let score = match mate_in_moves(report.score) {
        Some(moves) => format!("mate {moves}"),
        None => format!("cp {}", report.score),
    };
    let millis = report.elapsed.as_millis() as u64;
    let nps = report.nodes * 1000 / millis.max(1);
    let mut line = format!(
        "info depth {} score {score} nodes {} nps {nps} time {millis}",
        report.depth, report.nodes
    );
    if !report.pv.is_empty() {
        line.push_str(" pv ");
        line.push_str(&format_line(&report.pv));
    }
    line
}

struct Session {
    engine: Arc<Mutex<ClassicalEngine>>,
    /// The engine's own stop flag, raised to cut a running search short.
    stop: StopHandle,
    /// Set by `stop` and checked after every iteration, so a stop sent
    /// before the worker started searching is not lost.
    halt: StopHandle,
    position: Position,
    params: SearchParameters,
    worker: Option<JoinHandle<()>>,
}

impl Session {
    fn new(config: EngineConfig) -> Self {
        let params = config.search.clone();
        let engine = ClassicalEngine::new(config);
        Self {
            stop: engine.stop_handle(),
            halt: StopHandle::new(),
            engine: Arc::new(Mutex::new(engine)),
            position: Position::startpos(),
            params,
            worker: None,
        }
    }

    /// Handle one command. Returns false on `quit`.
    fn handle(&mut self, command: &str, args: &[&str]) -> bool {
        match command {
            "uci" => {
                let engine = lock(&self.engine);
                send(&format!("id name {}", engine.name()));
                send(&format!("id author {}", engine.author()));
                for line in options::advertise(engine.config()) {
                    send(&line);
                }
                send("uciok");
            }
            "isready" => send("readyok"),
            "ucinewgame" => {
                self.finish_search();
                lock(&self.engine).new_game();
                self.position = Position::startpos();
            }
            "setoption" => {
                self.finish_search();
                match options::parse_setoption(args) {
                    Ok(option) => self.apply(option),
                    Err(e) => warn!("setoption rejected: {e:#}"),
                }
            }
            "position" => match set_position_from_uci(args) {
                Ok(pos) => self.position = pos,
                Err(e) => warn!("position rejected: {e}"),
            },
            "go" => match GoOptions::parse(args) {
                Ok(go) => self.go(&go),
                Err(e) => warn!("go rejected: {e:#}"),
            },
            "stop" => self.stop_search(),
            "d" => send(&format!("Fen: {}", self.position.to_fen())),
            "quit" => return false,
            other => warn!(command = other, "unknown command"),
        }
        true
    }

    fn apply(&mut self, option: EngineOption) {
        debug!(?option, "setoption");
        let mut engine = lock(&self.engine);
        match option {
            EngineOption::Hash(mb) => {
                engine.set_hash_buckets_log2(EngineConfig::buckets_log2_for_megabytes(mb));
            }
            EngineOption::ClearHash => engine.new_game(),
            EngineOption::Depth(depth) => self.params.max_depth = depth,
            EngineOption::Toggle(toggle, on) => toggle.set(&mut self.params, on),
        }
    }

    fn go(&mut self, go: &GoOptions) {
        if let Some(depth) = go.perft {
            self.perft(depth);
            return;
        }
        if self.worker.is_some() {
            warn!("go while searching; stopping the previous search");
            self.stop_search();
        }

        let params = go.search_params(&self.params, self.position.side_to_move());
        let engine = Arc::clone(&self.engine);
        let stop = self.stop.clone();
        let halt = self.halt.clone();
        let mut pos = self.position.clone();
        halt.reset();

        self.worker = Some(thread::spawn(move || {
            let mut engine = lock(&engine);
            let mut observer = |report: &SearchReport| {
                send(&info_line(report));
                if halt.is_stopped() {
                    stop.stop();
                }
            };
            let report = engine.search(&mut pos, &params, &mut observer);
            let best = report.best_move.map_or_else(|| "0000".to_string(), move_to_uci);
            send(&format!("bestmove {best}"));
        }));
    }

    fn perft(&self, depth: u8) {
        let mut pos = self.position.clone();
        let divide = perft_divide(&mut pos, depth);
        let total: u64 = divide.iter().map(|&(_, n)| n).sum();
        for (mv, nodes) in divide {
            send(&format!("{mv}: {nodes}"));
        }
        send("");
        send(&format!("Nodes searched: {total}"));
    }

    /// Cut the running search short and wait for its `bestmove`.
    fn stop_search(&mut self) {
        self.halt.stop();
        self.stop.stop();
        self.finish_search();
    }

    /// Wait for the running search, if any, to finish on its own.
    fn finish_search(&mut self) {
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            error!("search thread panicked");
        }
    }
}
