//! Rule tables and lazy, depth-first expansion of an axiom.
//!
//! The entry point is [`expand`], which returns an [`Expander`]: an iterator that yields
//! the fully rewritten word one symbol at a time. Memory use is bounded by the number of
//! iterations rather than by the length of the word.

use std::collections::HashMap;
use std::iter::FusedIterator;

/// A grammar token and turtle-command key. Grammars operate purely on character identity.
pub type Symbol = char;

/// Source of replacement words for the expander.
///
/// Returning `None` means the symbol rewrites to itself.
pub trait Rewrite {
    fn replacement(&self, symbol: Symbol) -> Option<&[Symbol]>;
}

/// An immutable mapping from a symbol to its replacement word.
///
/// Symbols with no entry rewrite to themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: HashMap<Symbol, Vec<Symbol>>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a production `symbol -> replacement` (builder pattern).
    ///
    /// A later rule for the same symbol replaces the earlier one.
    pub fn with_rule(mut self, symbol: Symbol, replacement: &str) -> Self {
        self.rules.insert(symbol, replacement.chars().collect());
        self
    }

    /// Returns the replacement word for `symbol`, or the single-symbol word when unmapped.
    pub fn lookup<'a>(&'a self, symbol: &'a Symbol) -> &'a [Symbol] {
        self.rules
            .get(symbol)
            .map(Vec::as_slice)
            .unwrap_or(std::slice::from_ref(symbol))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Rewrite for RuleTable {
    fn replacement(&self, symbol: Symbol) -> Option<&[Symbol]> {
        self.rules.get(&symbol).map(Vec::as_slice)
    }
}

impl FromIterator<(Symbol, String)> for RuleTable {
    fn from_iter<T: IntoIterator<Item = (Symbol, String)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |table, (symbol, word)| table.with_rule(symbol, &word))
    }
}

/// A partially consumed replacement word at one rewrite depth.
#[derive(Clone, Debug)]
struct Frame<'r> {
    word: &'r [Symbol],
    pos: usize,
    /// Number of rewrites already applied to the symbols of `word`.
    depth: u32,
}

/// Lazy cursor over the word obtained by rewriting an axiom `iterations` times.
///
/// Each expander is single-use. Build a fresh one with [`expand`] or [`Expander::new`]
/// to walk the same word again. Dropping it early is free: nothing beyond the
/// consumed prefix has been computed.
#[derive(Debug)]
pub struct Expander<'r, R: Rewrite + ?Sized> {
    rules: &'r R,
    iterations: u32,
    axiom: Vec<Symbol>,
    axiom_pos: usize,
    // Never deeper than `iterations`.
    stack: Vec<Frame<'r>>,
}

impl<'r, R: Rewrite + ?Sized> Expander<'r, R> {
    pub fn new(axiom: &str, rules: &'r R, iterations: u32) -> Self {
        Self {
            rules,
            iterations,
            axiom: axiom.chars().collect(),
            axiom_pos: 0,
            stack: Vec::with_capacity(iterations.min(64) as usize),
        }
    }

    /// Current number of open replacement frames.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Pulls the next symbol still awaiting rewrite, along with its depth.
    fn next_pending(&mut self) -> Option<(Symbol, u32)> {
        while let Some(top) = self.stack.last_mut() {
            if let Some(&symbol) = top.word.get(top.pos) {
                top.pos += 1;
                return Some((symbol, top.depth));
            }
            self.stack.pop();
        }

        let symbol = *self.axiom.get(self.axiom_pos)?;
        self.axiom_pos += 1;
        Some((symbol, 0))
    }
}

impl<R: Rewrite + ?Sized> Iterator for Expander<'_, R> {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        let rules = self.rules;
        loop {
            let (symbol, depth) = self.next_pending()?;
            if depth >= self.iterations {
                return Some(symbol);
            }
            match rules.replacement(symbol) {
                Some(word) => self.stack.push(Frame {
                    word,
                    pos: 0,
                    depth: depth + 1,
                }),
                // Identity rewrites are a fixed point, so the remaining depth can be skipped.
                None => return Some(symbol),
            }
        }
    }
}

impl<R: Rewrite + ?Sized> FusedIterator for Expander<'_, R> {}

/// Expands `axiom` under `rules` for `iterations` generations, lazily.
///
/// With `iterations == 0` the axiom is yielded verbatim.
pub fn expand<'r, R: Rewrite + ?Sized>(
    axiom: &str,
    rules: &'r R,
    iterations: u32,
) -> Expander<'r, R> {
    Expander::new(axiom, rules, iterations)
}
