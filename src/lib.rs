//! # turtle-lines
//!
//! Converts L-System grammars into 2D vector line art.
//!
//! An axiom is expanded lazily by [`expand`], which walks the rewritten word depth-first
//! without ever materializing it. The resulting symbol stream is consumed by a
//! [`TurtleInterpreter`], which produces disjoint polylines plus their bounding box.
//! The [`SvgWriter`] turns that [`Drawing`] into a document for vector editors.

pub mod bounds;
pub mod config;
pub mod error;
pub mod grammar;
pub mod interpreter;
pub mod svg;
pub mod turtle;
pub mod validate;

pub use bounds::*;
pub use config::*;
pub use error::*;
pub use grammar::*;
pub use interpreter::*;
pub use svg::*;
pub use turtle::*;
pub use validate::*;
