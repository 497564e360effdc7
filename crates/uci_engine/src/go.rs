//! Arguments of the UCI `go` command and how they map onto search limits.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use chess_core::{Color, clock_budget};
use classical_engine::SearchParameters;
use classical_engine::params::MAX_DEPTH;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GoOptions {
    pub depth: Option<u8>,
    pub movetime: Option<Duration>,
    pub wtime: Option<Duration>,
    pub btime: Option<Duration>,
    pub winc: Option<Duration>,
    pub binc: Option<Duration>,
    pub movestogo: Option<u32>,
    pub infinite: bool,
    /// `go perft N`: count leaf nodes instead of searching.
    pub perft: Option<u8>,
}

fn value<'a>(it: &mut impl Iterator<Item = &'a str>, key: &str) -> Result<&'a str> {
    it.next().with_context(|| format!("'{key}' needs a value"))
}

fn millis<'a>(it: &mut impl Iterator<Item = &'a str>, key: &str) -> Result<Duration> {
    let raw = value(it, key)?;
    // GUIs send negative clocks once a side has flagged
    let ms: i64 = raw
        .parse()
        .with_context(|| format!("'{key}' expects milliseconds, got '{raw}'"))?;
    Ok(Duration::from_millis(ms.max(0) as u64))
}

impl GoOptions {
    pub fn parse(args: &[&str]) -> Result<Self> {
        let mut opts = GoOptions::default();
        let mut it = args.iter().copied();
        while let Some(key) = it.next() {
            match key {
                "depth" => {
                    let raw = value(&mut it, key)?;
                    opts.depth = Some(raw.parse().with_context(|| format!("bad depth '{raw}'"))?);
                }
                "movetime" => opts.movetime = Some(millis(&mut it, key)?),
                "wtime" => opts.wtime = Some(millis(&mut it, key)?),
                "btime" => opts.btime = Some(millis(&mut it, key)?),
                "winc" => opts.winc = Some(millis(&mut it, key)?),
                "binc" => opts.binc = Some(millis(&mut it, key)?),
                "movestogo" => {
                    let raw = value(&mut it, key)?;
                    opts.movestogo =
                        Some(raw.parse().with_context(|| format!("bad movestogo '{raw}'"))?);
                }
                "infinite" => opts.infinite = true,
                "perft" => {
                    let raw = value(&mut it, key)?;
                    opts.perft = Some(raw.parse().with_context(|| format!("bad perft depth '{raw}'"))?);
                }
                // Accepted and ignored
                "ponder" | "nodes" | "mate" | "searchmoves" => {}
                other => bail!("unknown go argument '{other}'"),
            }
        }
        Ok(opts)
    }

    /// Limits for one search by `side`, starting from the configured
    /// defaults.
    ///
    /// `infinite` runs until stopped. A move time or the side's clock sets
    /// the time budget and lifts the depth cap unless a depth was given too.
    /// A bare depth keeps the configured budget.
    pub fn search_params(&self, base: &SearchParameters, side: Color) -> SearchParameters {
        let mut params = base.clone();
        if self.infinite {
            params.max_depth = self.depth.unwrap_or(MAX_DEPTH);
            params.time_budget_ms = None;
            return params;
        }

        let (remaining, increment) = match side {
            Color::White => (self.wtime, self.winc),
            Color::Black => (self.btime, self.binc),
        };
        let budget = self.movetime.or_else(|| {
            remaining.map(|left| clock_budget(left, increment.unwrap_or_default(), self.movestogo))
        });

        if let Some(budget) = budget {
            // Always leave at least a millisecond, so a flagged side still moves
            params.time_budget_ms = Some((budget.as_millis() as u64).max(1));
            params.max_depth = self.depth.unwrap_or(MAX_DEPTH);
        } else if let Some(depth) = self.depth {
            params.max_depth = depth;
        }
        params
    }
}

#[cfg(test)]
#[path = "go_tests.rs"]
mod go_tests;
