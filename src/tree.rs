// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the arbora crate.

use crate::{
    ArboraError,
    grammar::{Grammar, RandomSource, Symbol},
    turtle::{BranchPlacement, CommandAlphabet, Interpreter, TurtleState},
};
use vector_traits::glam::DVec3;

pub const DEFAULT_STEP_LENGTH: f64 = 1.0;
pub const DEFAULT_ANGLE_INCREMENT: f64 = 25.0;

/// Everything needed to grow one tree: the grammar, what its terminals mean to the turtle and
/// where the turtle starts.
#[derive(Debug, Clone)]
pub struct TreeDescription {
    pub grammar: Grammar,
    pub alphabet: CommandAlphabet,
    pub step_length: f64,
    /// degrees
    pub angle_increment: f64,
    pub initial_state: TurtleState,
}

impl TreeDescription {
    /// A description using the default alphabet and turtle parameters
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            alphabet: CommandAlphabet::default(),
            step_length: DEFAULT_STEP_LENGTH,
            angle_increment: DEFAULT_ANGLE_INCREMENT,
            initial_state: TurtleState::default(),
        }
    }

    pub fn interpreter(&self) -> Interpreter {
        Interpreter::new(self.step_length, self.angle_increment)
            .with_alphabet(self.alphabet.clone())
    }

    /// Generates a symbol string and walks the turtle over it.
    pub fn build<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<Tree, ArboraError> {
        let symbols = self.grammar.generate(rng)?;
        let placements = self
            .interpreter()
            .interpret(symbols.iter().copied(), self.initial_state)?;
        Ok(Tree {
            symbols,
            placements,
        })
    }
}

/// A grown tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    pub symbols: Vec<Symbol>,
    pub placements: Vec<BranchPlacement>,
}

impl Tree {
    pub fn symbol_string(&self) -> String {
        self.symbols.iter().collect()
    }

    /// One `[start, end]` pair per branch
    pub fn line_chunks(&self) -> Vec<[DVec3; 2]> {
        self.placements.iter().map(|p| [p.location, p.end()]).collect()
    }
}
