// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the arbora crate.

//! The stochastic grammar engine.
//!
//! A [`Grammar`] maps a [`Symbol`] to an ordered list of [`WeightedAlternative`]s. Every
//! alternative carries a [`Weight`], a pure function of the recursion depth. Expansion picks one
//! alternative per visited symbol, with a probability proportional to its weight at the current
//! depth, and recurses into the non-terminals of the chosen [`Part`] at `depth + 1`.
//!
//! The depth is the only channel a grammar has to steer itself towards termination. The engine
//! adds no bias of its own, it only refuses to go deeper than [`Grammar::max_depth`].

mod random;
mod trait_impl;

pub use random::{RandomSource, ScriptedRandom};

use crate::ArboraError;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::{sync::Arc, time::Instant};

/// A symbol is both a potential rule key (non-terminal) and a potential turtle command
/// (terminal). Nothing but the presence of a rule tells the two roles apart.
pub type Symbol = char;

/// Recursion ceiling used unless [`Grammar::with_max_depth`] says otherwise.
pub const DEFAULT_MAX_DEPTH: u32 = 256;

/// The largest recursion ceiling a grammar accepts.
pub const MAX_DEPTH_LIMIT: u32 = 1024;

/// One element of a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Atom {
    /// Copied verbatim into the output
    Terminal(Symbol),
    /// Expanded recursively, one level deeper
    NonTerminal(Symbol),
}

impl Atom {
    pub fn symbol(&self) -> Symbol {
        match self {
            Atom::Terminal(s) | Atom::NonTerminal(s) => *s,
        }
    }
}

/// The right-hand side of one alternative. Atom order is output order.
///
/// The empty part is epsilon, it rewrites a symbol to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Part {
    atoms: SmallVec<[Atom; 8]>,
}

impl Part {
    pub fn epsilon() -> Self {
        Self::default()
    }

    /// Append a terminal atom
    pub fn terminal(mut self, symbol: Symbol) -> Self {
        self.atoms.push(Atom::Terminal(symbol));
        self
    }

    /// Append a non-terminal atom
    pub fn non_terminal(mut self, symbol: Symbol) -> Self {
        self.atoms.push(Atom::NonTerminal(symbol));
        self
    }

    pub fn push(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn is_epsilon(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.atoms.iter().filter_map(|a| match a {
            Atom::NonTerminal(s) => Some(*s),
            Atom::Terminal(_) => None,
        })
    }
}

/// A depth dependent weight.
///
/// The wrapped function must be pure: same depth, same weight. Negative, infinite and NaN
/// results are read as zero.
#[derive(Clone)]
pub struct Weight(Arc<dyn Fn(u32) -> f64 + Send + Sync>);

impl Weight {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(u32) -> f64 + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// `weight` at every depth
    pub fn constant(weight: f64) -> Self {
        Self::from_fn(move |_| weight)
    }

    /// `weight` while `depth < limit`, zero after that
    pub fn below(limit: u32, weight: f64) -> Self {
        Self::from_fn(move |t| if t < limit { weight } else { 0.0 })
    }

    /// zero while `depth < limit`, `weight` after that
    pub fn at_least(limit: u32, weight: f64) -> Self {
        Self::from_fn(move |t| if t >= limit { weight } else { 0.0 })
    }

    /// `weight / (depth + 1)`
    pub fn inverse(weight: f64) -> Self {
        Self::from_fn(move |t| weight / (f64::from(t) + 1.0))
    }

    /// zero at the root, `weight` at every other depth
    pub fn non_root(weight: f64) -> Self {
        Self::from_fn(move |t| if t > 0 { weight } else { 0.0 })
    }

    /// Evaluates the weight at `depth`. Anything but a finite positive value is zero.
    #[inline]
    pub fn at(&self, depth: u32) -> f64 {
        let w = (self.0)(depth);
        if w > 0.0 && w.is_finite() { w } else { 0.0 }
    }
}

#[derive(Clone, Debug)]
pub struct WeightedAlternative {
    pub part: Part,
    pub weight: Weight,
}

impl WeightedAlternative {
    pub fn new(part: Part, weight: Weight) -> Self {
        Self { part, weight }
    }
}

/// All alternatives of one symbol, in declaration order.
pub type Rule = Vec<WeightedAlternative>;

/// Picks an alternative index given a uniform `unit` draw in `[0, 1)`.
///
/// Draws outside that range are clamped into it, NaN counts as zero. The draw is scaled by the weight sum and the weights are subtracted in declaration order;
/// the first alternative that drives the remainder strictly below zero wins. Zero weight
/// alternatives can therefore never be picked, not even when the draw is exactly zero.
/// If rounding leaves the remainder at or above zero after the last alternative, the last
/// alternative with a positive weight is returned.
///
/// Returns `None` when no alternative has a positive weight.
pub(crate) fn select_alternative(weights: &[f64], unit: f64) -> Option<usize> {
    let mut sum: f64 = weights.iter().sum();
    if !(sum > 0.0) {
        return None;
    }
    // finite weights can still overflow the sum
    let scale = if sum.is_finite() {
        1.0
    } else {
        let max = weights.iter().copied().fold(0.0_f64, f64::max);
        sum = weights.iter().map(|w| w / max).sum();
        max
    };
    let unit = if unit > 0.0 { unit.min(1.0) } else { 0.0 };
    let mut remainder = unit * sum;
    for (index, weight) in weights.iter().enumerate() {
        remainder -= weight / scale;
        if remainder < 0.0 {
            return Some(index);
        }
    }
    weights.iter().rposition(|w| *w > 0.0)
}

/// A set of weighted rules together with a starting symbol.
#[derive(Clone, Debug)]
pub struct Grammar {
    rules: FxHashMap<Symbol, Rule>,
    starting: Symbol,
    max_depth: u32,
}

impl Grammar {
    pub fn new(starting: Symbol) -> Self {
        Self {
            rules: FxHashMap::default(),
            starting,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Builder flavour of [`Grammar::set_max_depth`]
    pub fn with_max_depth(mut self, max_depth: u32) -> Result<Self, ArboraError> {
        let _ = self.set_max_depth(max_depth)?;
        Ok(self)
    }

    /// Sets the deepest recursion depth expansion may reach. Values above
    /// [`MAX_DEPTH_LIMIT`] are rejected.
    pub fn set_max_depth(&mut self, max_depth: u32) -> Result<&mut Self, ArboraError> {
        if max_depth > MAX_DEPTH_LIMIT {
            return Err(ArboraError::InvalidParameter(format!(
                "max_depth {max_depth} is larger than {MAX_DEPTH_LIMIT}"
            )));
        }
        self.max_depth = max_depth;
        Ok(self)
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn starting(&self) -> Symbol {
        self.starting
    }

    pub fn set_starting(&mut self, starting: Symbol) -> &mut Self {
        self.starting = starting;
        self
    }

    /// Builder flavour of [`Grammar::add_alternative`]
    pub fn with_alternative(mut self, symbol: Symbol, part: Part, weight: Weight) -> Self {
        let _ = self.add_alternative(symbol, part, weight);
        self
    }

    /// Appends an alternative to the rule of `symbol`, creating the rule if needed.
    pub fn add_alternative(&mut self, symbol: Symbol, part: Part, weight: Weight) -> &mut Self {
        self.rules
            .entry(symbol)
            .or_default()
            .push(WeightedAlternative::new(part, weight));
        self
    }

    /// Inserts a complete rule. It is an error to replace an existing one.
    pub fn add_rule(&mut self, symbol: Symbol, rule: Rule) -> Result<&mut Self, ArboraError> {
        if self.rules.contains_key(&symbol) {
            return Err(ArboraError::InvalidParameter(format!(
                "Rule '{symbol}' overwriting previous rule"
            )));
        }
        let _ = self.rules.insert(symbol, rule);
        Ok(self)
    }

    pub fn rule(&self, symbol: Symbol) -> Option<&Rule> {
        self.rules.get(&symbol)
    }

    /// Iterates the rules sorted by symbol
    pub fn rules(&self) -> impl Iterator<Item = (Symbol, &Rule)> + '_ {
        self.rules
            .iter()
            .sorted_by_key(|(symbol, _)| **symbol)
            .map(|(symbol, rule)| (*symbol, rule))
    }

    /// Expands the starting symbol at depth 0.
    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<Symbol>, ArboraError> {
        let now = Instant::now();
        let symbols = self.generate_from(self.starting, 0, rng)?;
        log::debug!(
            "generated {} symbols from '{}' in {:?}",
            symbols.len(),
            self.starting,
            now.elapsed()
        );
        Ok(symbols)
    }

    /// Same as [`Grammar::generate`], concatenated into a `String`
    pub fn generate_string<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<String, ArboraError> {
        Ok(self.generate(rng)?.into_iter().collect())
    }

    /// Expands `symbol` as if it had been reached at recursion depth `depth`.
    pub fn generate_from<R: RandomSource + ?Sized>(
        &self,
        symbol: Symbol,
        depth: u32,
        rng: &mut R,
    ) -> Result<Vec<Symbol>, ArboraError> {
        let mut output = Vec::new();
        self.expand(symbol, depth, rng, &mut output)?;
        Ok(output)
    }

    /// Depth first, left to right expansion. Pending atoms live on an explicit stack, pushed in
    /// reverse so the leftmost one is expanded (and draws) first.
    fn expand<R: RandomSource + ?Sized>(
        &self,
        symbol: Symbol,
        depth: u32,
        rng: &mut R,
        output: &mut Vec<Symbol>,
    ) -> Result<(), ArboraError> {
        let mut pending: Vec<(Atom, u32)> = vec![(Atom::NonTerminal(symbol), depth)];
        while let Some((atom, depth)) = pending.pop() {
            match atom {
                Atom::Terminal(s) => output.push(s),
                Atom::NonTerminal(s) => {
                    if depth > self.max_depth {
                        return Err(ArboraError::RecursionLimitExceeded { symbol: s, depth });
                    }
                    let part = self.choose(s, depth, rng)?;
                    pending.extend(part.atoms().iter().rev().map(|a| (*a, depth + 1)));
                }
            }
        }
        Ok(())
    }

    /// Draws one alternative of `symbol` at `depth`.
    fn choose<R: RandomSource + ?Sized>(
        &self,
        symbol: Symbol,
        depth: u32,
        rng: &mut R,
    ) -> Result<&Part, ArboraError> {
        let rule = self
            .rules
            .get(&symbol)
            .ok_or(ArboraError::UndefinedSymbol(symbol))?;
        if rule.is_empty() {
            return Err(ArboraError::EmptyRule(symbol));
        }
        let weights: SmallVec<[f64; 4]> = rule.iter().map(|a| a.weight.at(depth)).collect();
        let index = select_alternative(&weights, rng.next_unit())
            .ok_or(ArboraError::NoViableAlternative { symbol, depth })?;
        Ok(&rule[index].part)
    }

    /// Offline structural check: the starting symbol and every non-terminal mentioned by any
    /// part must have a rule with at least one alternative.
    pub fn validate(&self) -> Result<(), ArboraError> {
        let check = |symbol: Symbol| match self.rules.get(&symbol) {
            None => Err(ArboraError::UndefinedSymbol(symbol)),
            Some(rule) if rule.is_empty() => Err(ArboraError::EmptyRule(symbol)),
            Some(_) => Ok(()),
        };
        check(self.starting)?;
        for (_, rule) in self.rules() {
            for alternative in rule {
                alternative.part.non_terminals().try_for_each(check)?;
            }
        }
        Ok(())
    }

    /// Offline weight check: every rule must have a positive weight sum at every depth in
    /// `0..=depths`. Rules are visited in symbol order, depths in increasing order.
    pub fn check_viability(&self, depths: u32) -> Result<(), ArboraError> {
        for (symbol, rule) in self.rules() {
            if rule.is_empty() {
                return Err(ArboraError::EmptyRule(symbol));
            }
            for depth in 0..=depths {
                let sum: f64 = rule.iter().map(|a| a.weight.at(depth)).sum();
                if !(sum > 0.0) {
                    return Err(ArboraError::NoViableAlternative { symbol, depth });
                }
            }
        }
        Ok(())
    }
}
