//! Declarative description of an L-System drawing, decoded from JSON via `serde`.
//!
//! Every field except `axiom` has a default, so `{"axiom": "F"}` is a complete config.

use crate::error::{Error, Result};
use crate::grammar::{RuleTable, Symbol, expand};
use crate::interpreter::{BoundsPolicy, Drawing, TurtleConfig, TurtleInterpreter};
use crate::svg::{SvgOptions, SvgWriter};
use crate::turtle::{Action, CommandTable, DefaultAction, TurtleState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The full configuration of one drawing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LSystemConfig {
    /// Human-readable title, written into the SVG `<title>`.
    #[serde(default = "default_name")]
    pub name: String,
    pub axiom: String,
    #[serde(default)]
    pub iterations: u32,
    /// Productions keyed by a single-symbol string.
    #[serde(default)]
    pub rules: BTreeMap<String, String>,
    #[serde(default)]
    pub turtle: TurtleSpec,
    #[serde(default)]
    pub svg: SvgOptions,
}

fn default_name() -> String {
    "L-System".to_string()
}

/// Geometric interpretation of symbols.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleSpec {
    /// Base turn angle in degrees.
    pub angle: f64,
    /// Base forward step length.
    pub step: f64,
    pub start: StartSpec,
    pub commands: BTreeMap<String, Action>,
    pub default_action: DefaultAction,
    pub bounds: BoundsPolicy,
}

impl Default for TurtleSpec {
    fn default() -> Self {
        Self {
            angle: 90.0,
            step: 10.0,
            start: StartSpec::default(),
            commands: BTreeMap::new(),
            default_action: DefaultAction::default(),
            bounds: BoundsPolicy::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartSpec {
    pub x: f64,
    pub y: f64,
    /// Degrees; 0 = +X, 90 = +Y.
    pub heading: f64,
}

impl LSystemConfig {
    /// Creates a config with the given axiom and defaults for everything else.
    pub fn new(axiom: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            axiom: axiom.into(),
            iterations: 0,
            rules: BTreeMap::new(),
            turtle: TurtleSpec::default(),
            svg: SvgOptions::default(),
        }
    }

    /// Decodes and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks ranges and key shapes that the JSON schema cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.axiom.is_empty() {
            return Err(invalid("axiom", "must be non-empty"));
        }
        for key in self.rules.keys() {
            single_symbol(key)?;
        }

        self.turtle_config().validate()?;
        for (key, action) in &self.turtle.commands {
            action.validate(Some(single_symbol(key)?))?;
        }

        self.svg.validate()
    }

    pub fn rule_table(&self) -> Result<RuleTable> {
        self.rules
            .iter()
            .map(|(key, word)| Ok((single_symbol(key)?, word.clone())))
            .collect()
    }

    pub fn command_table(&self) -> Result<CommandTable> {
        let mut table = CommandTable::new(self.turtle.default_action);
        for (key, action) in &self.turtle.commands {
            table.set(single_symbol(key)?, *action);
        }
        Ok(table)
    }

    pub fn turtle_config(&self) -> TurtleConfig {
        let start = self.turtle.start;
        TurtleConfig {
            step: self.turtle.step,
            angle: self.turtle.angle,
            start: TurtleState::new(start.x, start.y, start.heading),
            bounds_policy: self.turtle.bounds,
        }
    }

    /// Expands the grammar and interprets the full word.
    pub fn draw(&self) -> Result<Drawing> {
        let rules = self.rule_table()?;
        let commands = self.command_table()?;
        TurtleInterpreter::new(&commands, self.turtle_config())
            .interpret(expand(&self.axiom, &rules, self.iterations))
    }

    /// Draws the config and serializes the result as an SVG document.
    pub fn to_svg(&self) -> Result<String> {
        let drawing = self.draw()?;
        SvgWriter::new(&self.svg)
            .with_title(&self.name)
            .write(&drawing)
    }
}

fn invalid(field: &'static str, reason: &str) -> Error {
    Error::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}

fn single_symbol(key: &str) -> Result<Symbol> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(Error::InvalidGrammarReference {
            key: key.to_string(),
        }),
    }
}
