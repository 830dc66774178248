//! Error types shared by expansion, interpretation, configuration and rendering.

use crate::grammar::Symbol;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while turning a grammar into line art.
///
/// Interpretation errors are fatal for the run: there is no skip-and-continue mode.
#[derive(Debug, Error)]
pub enum Error {
    /// A pop symbol was reached while the state stack was empty.
    #[error("pop symbol '{symbol}' at position {index} with an empty state stack (depth 0)")]
    StackUnderflow {
        /// The symbol that resolved to a pop.
        symbol: Symbol,
        /// Zero-based position of the symbol in the expanded stream.
        index: usize,
    },

    /// An action descriptor is malformed. `symbol` is `None` for the default action.
    #[error("invalid action for {}: {reason}", describe_symbol(.symbol))]
    InvalidAction {
        symbol: Option<Symbol>,
        reason: String,
    },

    /// A rule or command key does not name exactly one symbol.
    #[error("key {key:?} must be a single symbol")]
    InvalidGrammarReference { key: String },

    /// A configuration value is out of range.
    #[error("{field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Interpretation produced no polylines.
    #[error("configuration produces no drawable geometry")]
    NoDrawableGeometry,

    /// The viewBox collapsed to zero width or height.
    #[error(
        "degenerate bounds after margin (width {width}, height {height}); \
         set svg.margin > 0 to render collinear or single-point geometry"
    )]
    DegenerateBounds { width: f64, height: f64 },

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe_symbol(symbol: &Option<Symbol>) -> String {
    match symbol {
        Some(s) => format!("symbol '{s}'"),
        None => "the default action".to_string(),
    }
}
