//! Bounded dry run of a configuration.
//!
//! Expands at most a fixed number of symbols and interprets them, catching
//! render-time failures (bad commands, unbalanced pops, empty output) without paying
//! for an exponentially large word.

use crate::config::LSystemConfig;
use crate::error::{Error, Result};
use crate::grammar::expand;
use crate::interpreter::TurtleInterpreter;
use serde::Serialize;

/// Symbols sampled by [`validate`] when no explicit limit is needed.
pub const DEFAULT_SYMBOL_LIMIT: usize = 10_000;

/// Summary of a bounded run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Symbols actually interpreted.
    pub symbols: usize,
    /// The expansion had more symbols than the limit; geometry stats cover a prefix only.
    pub truncated: bool,
    pub polylines: usize,
}

/// Validates `config` and interprets at most `limit` expanded symbols.
///
/// # Errors
///
/// Any configuration or interpretation error, and [`Error::NoDrawableGeometry`] if the
/// sampled prefix yields no polylines.
pub fn validate(config: &LSystemConfig, limit: usize) -> Result<ValidationReport> {
    config.validate()?;
    let rules = config.rule_table()?;
    let commands = config.command_table()?;

    let mut expander = expand(&config.axiom, &rules, config.iterations);
    let mut symbols = 0usize;
    let drawing = TurtleInterpreter::new(&commands, config.turtle_config()).interpret(
        expander
            .by_ref()
            .take(limit)
            .inspect(|_| symbols += 1),
    )?;
    let truncated = expander.next().is_some();

    if truncated {
        tracing::warn!(
            limit,
            name = %config.name,
            "expansion exceeds the symbol limit; geometry stats cover the first portion only"
        );
    }
    if drawing.polylines.is_empty() {
        return Err(Error::NoDrawableGeometry);
    }

    Ok(ValidationReport {
        symbols,
        truncated,
        polylines: drawing.polylines.len(),
    })
}
