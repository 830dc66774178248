//! Turtle state, actions and the symbol-to-action command table.

use crate::error::{Error, Result};
use crate::grammar::Symbol;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Position and heading of the drawing cursor.
///
/// Heading is in degrees: 0 points along `+X`, 90 along `+Y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    pub position: DVec2,
    pub heading: f64,
}

impl TurtleState {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            heading,
        }
    }

    /// Unit vector along the current heading.
    pub fn direction(&self) -> DVec2 {
        DVec2::from_angle(self.heading.to_radians())
    }

    /// Moves the cursor `distance` units along the heading and returns the new position.
    pub fn advance(&mut self, distance: f64) -> DVec2 {
        self.position += self.direction() * distance;
        self.position
    }

    /// Adds `degrees` to the heading, keeping it in `[0, 360)`.
    pub fn turn(&mut self, degrees: f64) {
        let heading = (self.heading + degrees).rem_euclid(360.0);
        // Tiny negative sums round up to exactly 360.
        self.heading = if heading >= 360.0 { 0.0 } else { heading };
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.heading.is_finite()
    }
}

fn unit() -> f64 {
    1.0
}

/// What the turtle does when it reads a symbol.
///
/// Decodes from the `{"type": ...}` objects of the JSON command table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Move `step × base step` along the heading, tracing a line when `draw` is set.
    Forward {
        draw: bool,
        #[serde(default = "unit")]
        step: f64,
    },
    /// Turn by `direction × angle × base angle` degrees. `direction` must be `1` or `-1`.
    Turn {
        direction: i8,
        #[serde(default = "unit")]
        angle: f64,
    },
    /// Turn by a raw number of degrees, ignoring the base angle.
    TurnAbs { angle: f64 },
    /// Save the turtle state (`[`).
    Push,
    /// Restore the most recently pushed turtle state and start a new polyline (`]`).
    Pop,
    Noop,
}

impl Action {
    pub const DRAW: Action = Action::Forward {
        draw: true,
        step: 1.0,
    };
    pub const MOVE: Action = Action::Forward {
        draw: false,
        step: 1.0,
    };

    /// Checks the variant's fields. `symbol` is only used for error context.
    pub fn validate(&self, symbol: Option<Symbol>) -> Result<()> {
        let invalid = |reason: String| Error::InvalidAction { symbol, reason };
        match *self {
            Action::Forward { step, .. } => {
                if !step.is_finite() || step < 0.0 {
                    return Err(invalid(format!(
                        "forward step multiplier must be finite and >= 0, got {step}"
                    )));
                }
            }
            Action::Turn { direction, angle } => {
                if direction != 1 && direction != -1 {
                    return Err(invalid(format!(
                        "turn direction must be 1 or -1, got {direction}"
                    )));
                }
                if !angle.is_finite() {
                    return Err(invalid(format!("turn angle must be finite, got {angle}")));
                }
            }
            Action::TurnAbs { angle } => {
                if !angle.is_finite() {
                    return Err(invalid(format!(
                        "turn_abs angle must be finite, got {angle}"
                    )));
                }
            }
            Action::Push | Action::Pop | Action::Noop => {}
        }
        Ok(())
    }
}

/// Policy for symbols that have no entry in the [`CommandTable`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultAction {
    /// Unknown symbols draw one base step forward.
    #[default]
    ForwardDraw,
    /// Unknown symbols move one base step forward with the pen up.
    ForwardMove,
    /// Unknown symbols are ignored.
    Noop,
}

impl DefaultAction {
    pub fn action(self) -> Action {
        match self {
            DefaultAction::ForwardDraw => Action::DRAW,
            DefaultAction::ForwardMove => Action::MOVE,
            DefaultAction::Noop => Action::Noop,
        }
    }
}

/// Maps symbols to turtle actions, with a fallback for unmapped symbols.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandTable {
    actions: BTreeMap<Symbol, Action>,
    default_action: DefaultAction,
}

impl CommandTable {
    /// Creates an empty table where every symbol resolves to `default_action`.
    pub fn new(default_action: DefaultAction) -> Self {
        Self {
            actions: BTreeMap::new(),
            default_action,
        }
    }

    /// The conventional turtle alphabet.
    ///
    /// | Symbol | Action |
    /// |--------|--------|
    /// | `F` | draw forward |
    /// | `f` | move forward, pen up |
    /// | `+` / `-` | turn by ±base angle |
    /// | `\|` | turn around (180°) |
    /// | `[` / `]` | push / pop |
    pub fn standard(default_action: DefaultAction) -> Self {
        let mappings = [
            ('F', Action::DRAW),
            ('f', Action::MOVE),
            (
                '+',
                Action::Turn {
                    direction: 1,
                    angle: 1.0,
                },
            ),
            (
                '-',
                Action::Turn {
                    direction: -1,
                    angle: 1.0,
                },
            ),
            ('|', Action::TurnAbs { angle: 180.0 }),
            ('[', Action::Push),
            (']', Action::Pop),
        ];

        let mut table = Self::new(default_action);
        for (symbol, action) in mappings {
            table.set(symbol, action);
        }
        table
    }

    /// Assigns an [`Action`] to `symbol`, replacing any previous mapping.
    pub fn set(&mut self, symbol: Symbol, action: Action) {
        self.actions.insert(symbol, action);
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, symbol: Symbol, action: Action) -> Self {
        self.set(symbol, action);
        self
    }

    pub fn default_action(&self) -> DefaultAction {
        self.default_action
    }

    /// Resolves `symbol` to its action, falling back to the default policy.
    pub fn lookup(&self, symbol: Symbol) -> Action {
        self.actions
            .get(&symbol)
            .copied()
            .unwrap_or_else(|| self.default_action.action())
    }

    /// Rejects the table if any mapped action is malformed, reporting the lowest symbol first.
    pub fn validate(&self) -> Result<()> {
        self.actions
            .iter()
            .try_for_each(|(&symbol, action)| action.validate(Some(symbol)))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
