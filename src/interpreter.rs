//! Interpreter that converts an L-System symbol stream into 2D polylines.
//!
//! The entry point is [`TurtleInterpreter`]. Configure it with a [`TurtleConfig`] and a
//! [`CommandTable`], then call [`TurtleInterpreter::interpret`] with any symbol iterator,
//! typically an [`Expander`](crate::grammar::Expander). Symbols are pulled one at a time;
//! the full word is never buffered.

use crate::bounds::Bounds;
use crate::error::{Error, Result};
use crate::grammar::Symbol;
use crate::turtle::{Action, CommandTable, TurtleState};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Which cursor positions count towards the drawing's [`Bounds`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Every position the cursor moves through, pen up or down. The start point
    /// counts once the cursor first leaves it.
    #[default]
    Visited,
    /// Only points of finalized polylines.
    Drawn,
}

/// Configuration for turtle interpretation.
#[derive(Clone, Debug)]
pub struct TurtleConfig {
    /// Base forward step length, scaled by each forward action's multiplier.
    pub step: f64,
    /// Base turn angle in degrees, scaled by each turn action's multiplier.
    pub angle: f64,
    /// Initial cursor state.
    pub start: TurtleState,
    pub bounds_policy: BoundsPolicy,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            step: 10.0,
            angle: 90.0,
            start: TurtleState::default(),
            bounds_policy: BoundsPolicy::default(),
        }
    }
}

impl TurtleConfig {
    /// Rejects a non-positive or non-finite step, a non-finite angle and a non-finite start.
    pub fn validate(&self) -> Result<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(invalid("turtle.step", format!("must be > 0, got {}", self.step)));
        }
        if !self.angle.is_finite() {
            return Err(invalid("turtle.angle", "must be a finite number".to_string()));
        }
        if !self.start.is_finite() {
            return Err(invalid(
                "turtle.start",
                "coordinates and heading must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> Error {
    Error::InvalidConfig { field, reason }
}

/// A connected sequence of line segments.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<DVec2>,
}

impl Polyline {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<DVec2> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<DVec2> {
        self.points.last().copied()
    }
}

/// The result of interpretation: finalized polylines in closing order plus their extent.
///
/// `bounds` stays empty when the cursor never moved (under [`BoundsPolicy::Visited`])
/// or nothing was drawn (under [`BoundsPolicy::Drawn`]).
#[derive(Clone, Debug, Default)]
pub struct Drawing {
    pub polylines: Vec<Polyline>,
    pub bounds: Bounds,
}

impl Drawing {
    /// Total number of points across all polylines.
    pub fn point_count(&self) -> usize {
        self.polylines.iter().map(Polyline::len).sum()
    }
}

/// Polyline assembly and bounds for one run.
struct Pen {
    active: Vec<DVec2>,
    drawing: Drawing,
    policy: BoundsPolicy,
}

impl Pen {
    fn new(policy: BoundsPolicy) -> Self {
        Self {
            active: Vec::new(),
            drawing: Drawing::default(),
            policy,
        }
    }

    /// Records a cursor move `from -> to`, pen up or down.
    fn visit(&mut self, from: DVec2, to: DVec2) {
        if self.policy == BoundsPolicy::Visited {
            self.drawing.bounds.observe(from);
            self.drawing.bounds.observe(to);
        }
    }

    /// Extends the active polyline with a segment `from -> to`.
    fn line(&mut self, from: DVec2, to: DVec2) {
        if self.active.is_empty() {
            self.active.push(from);
        }
        // A zero-length step adds nothing to the path.
        if self.active.last() != Some(&to) {
            self.active.push(to);
        }
    }

    /// Finalizes the active polyline, discarding it if it has fewer than two points.
    fn lift(&mut self) {
        let points = std::mem::take(&mut self.active);
        if points.len() < 2 {
            return;
        }
        if self.policy == BoundsPolicy::Drawn {
            self.drawing.bounds.observe_all(points.iter().copied());
        }
        self.drawing.polylines.push(Polyline { points });
    }

    fn finish(mut self) -> Drawing {
        self.lift();
        self.drawing
    }
}

/// Interprets L-System output as 2D turtle graphics.
pub struct TurtleInterpreter<'c> {
    commands: &'c CommandTable,
    config: TurtleConfig,
}

impl<'c> TurtleInterpreter<'c> {
    pub fn new(commands: &'c CommandTable, config: TurtleConfig) -> Self {
        Self { commands, config }
    }

    /// Walks `symbols` in order and returns the resulting [`Drawing`].
    ///
    /// The config, the command table and the default action are validated before the
    /// first symbol is pulled. Interpretation stops as soon as the iterator is exhausted, so a
    /// caller may pass a truncated stream (e.g. `expander.take(k)`).
    ///
    /// # Push / Pop
    ///
    /// `[` saves position and heading onto a stack. `]` restores them and closes the
    /// active polyline, so the next drawing step starts a new one at the restored point.
    /// Pen-up moves close the active polyline as well.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] for a bad step, angle or start, and
    /// [`Error::InvalidAction`] for a malformed action; both before any symbol is read.
    /// [`Error::StackUnderflow`] on a pop with an empty stack aborts the run.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(step = self.config.step, angle = self.config.angle)
    )]
    pub fn interpret<I>(&self, symbols: I) -> Result<Drawing>
    where
        I: IntoIterator<Item = Symbol>,
    {
        self.config.validate()?;
        self.commands.validate()?;
        self.commands.default_action().action().validate(None)?;

        let mut turtle = self.config.start;
        let mut stack: Vec<TurtleState> = Vec::new();
        let mut pen = Pen::new(self.config.bounds_policy);
        let mut consumed = 0usize;

        for (index, symbol) in symbols.into_iter().enumerate() {
            consumed = index + 1;
            match self.commands.lookup(symbol) {
                Action::Forward { draw, step } => {
                    let from = turtle.position;
                    let to = turtle.advance(self.config.step * step);
                    if draw {
                        pen.line(from, to);
                    } else {
                        pen.lift();
                    }
                    pen.visit(from, to);
                }
                Action::Turn { direction, angle } => {
                    turtle.turn(f64::from(direction) * self.config.angle * angle);
                }
                Action::TurnAbs { angle } => turtle.turn(angle),
                Action::Push => stack.push(turtle),
                Action::Pop => {
                    let Some(saved) = stack.pop() else {
                        tracing::debug!(%symbol, index, "pop with empty state stack");
                        return Err(Error::StackUnderflow { symbol, index });
                    };
                    turtle = saved;
                    pen.lift();
                }
                Action::Noop => {}
            }
        }

        let drawing = pen.finish();
        tracing::debug!(
            symbols = consumed,
            polylines = drawing.polylines.len(),
            unbalanced_pushes = stack.len(),
            "interpretation finished"
        );
        Ok(drawing)
    }
}

/// Interprets `symbols` with a one-off [`TurtleInterpreter`].
pub fn interpret<I>(symbols: I, commands: &CommandTable, config: TurtleConfig) -> Result<Drawing>
where
    I: IntoIterator<Item = Symbol>,
{
    TurtleInterpreter::new(commands, config).interpret(symbols)
}
