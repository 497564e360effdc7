//! UCI options: what `uci` advertises and how `setoption` applies.

use anyhow::{Context, Result, bail};
use classical_engine::params::MAX_DEPTH;
use classical_engine::{EngineConfig, SearchParameters};

pub const DEFAULT_HASH_MB: usize = 16;
pub const MAX_HASH_MB: usize = 1024;

/// A parsed `setoption` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOption {
    Hash(usize),
    ClearHash,
    Depth(u8),
    /// One of the technique switches of [`SearchParameters`].
    Toggle(Toggle, bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Quiescence,
    NullMove,
    LateMoveReduction,
    TranspositionTable,
    KillerMoves,
    HistoryHeuristic,
}

impl Toggle {
    pub const ALL: [Toggle; 6] = [
        Toggle::Quiescence,
        Toggle::NullMove,
        Toggle::LateMoveReduction,
        Toggle::TranspositionTable,
        Toggle::KillerMoves,
        Toggle::HistoryHeuristic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Toggle::Quiescence => "Quiescence",
            Toggle::NullMove => "NullMove",
            Toggle::LateMoveReduction => "LateMoveReduction",
            Toggle::TranspositionTable => "TranspositionTable",
            Toggle::KillerMoves => "KillerMoves",
            Toggle::HistoryHeuristic => "HistoryHeuristic",
        }
    }

    fn flag(self, params: &mut SearchParameters) -> &mut bool {
        match self {
            Toggle::Quiescence => &mut params.use_quiescence,
            Toggle::NullMove => &mut params.use_null_move,
            Toggle::LateMoveReduction => &mut params.use_late_move_reduction,
            Toggle::TranspositionTable => &mut params.use_transposition_table,
            Toggle::KillerMoves => &mut params.use_killer_moves,
            Toggle::HistoryHeuristic => &mut params.use_history_heuristic,
        }
    }

    pub fn get(self, params: &SearchParameters) -> bool {
        match self {
            Toggle::Quiescence => params.use_quiescence,
            Toggle::NullMove => params.use_null_move,
            Toggle::LateMoveReduction => params.use_late_move_reduction,
            Toggle::TranspositionTable => params.use_transposition_table,
            Toggle::KillerMoves => params.use_killer_moves,
            Toggle::HistoryHeuristic => params.use_history_heuristic,
        }
    }

    pub fn set(self, params: &mut SearchParameters, on: bool) {
        *self.flag(params) = on;
    }
}

/// `option` lines for the `uci` reply, defaults taken from `config`.
pub fn advertise(config: &EngineConfig) -> Vec<String> {
    let mut lines = vec![
        format!("option name Hash type spin default {DEFAULT_HASH_MB} min 1 max {MAX_HASH_MB}"),
        "option name Clear Hash type button".to_string(),
        format!(
            "option name Depth type spin default {} min 1 max {MAX_DEPTH}",
            config.search.target_depth()
        ),
    ];
    for toggle in Toggle::ALL {
        lines.push(format!(
            "option name {} type check default {}",
            toggle.name(),
            toggle.get(&config.search)
        ));
    }
    lines
}

/// Parse the arguments of `setoption name <name> [value <value>]`. Option
/// names may contain spaces and match case-insensitively.
pub fn parse_setoption(args: &[&str]) -> Result<EngineOption> {
    let Some((&"name", rest)) = args.split_first() else {
        bail!("expected 'name <option>'");
    };
    let value_at = rest.iter().position(|&a| a == "value");
    let (name, value) = match value_at {
        Some(i) => (rest[..i].join(" "), Some(rest[i + 1..].join(" "))),
        None => (rest.join(" "), None),
    };
    let value = value.as_deref();
    let need = || value.with_context(|| format!("option '{name}' needs a value"));

    if name.eq_ignore_ascii_case("Hash") {
        let raw = need()?;
        let mb: usize = raw.parse().with_context(|| format!("bad hash size '{raw}'"))?;
        return Ok(EngineOption::Hash(mb.clamp(1, MAX_HASH_MB)));
    }
    if name.eq_ignore_ascii_case("Clear Hash") {
        return Ok(EngineOption::ClearHash);
    }
    if name.eq_ignore_ascii_case("Depth") {
        let raw = need()?;
        let depth: u8 = raw.parse().with_context(|| format!("bad depth '{raw}'"))?;
        return Ok(EngineOption::Depth(depth.clamp(1, MAX_DEPTH)));
    }
    if let Some(toggle) = Toggle::ALL.into_iter().find(|t| name.eq_ignore_ascii_case(t.name())) {
        let on = match need()? {
            v if v.eq_ignore_ascii_case("true") => true,
            v if v.eq_ignore_ascii_case("false") => false,
            v => bail!("option '{name}' expects true or false, got '{v}'"),
        };
        return Ok(EngineOption::Toggle(toggle, on));
    }
    bail!("unknown option '{name}'")
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod options_tests;
