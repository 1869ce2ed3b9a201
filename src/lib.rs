// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the arbora crate.

#![deny(
    rust_2018_compatibility,
    rust_2018_idioms,
    nonstandard_style,
    unused,
    future_incompatible,
    non_camel_case_types,
    unused_parens,
    non_upper_case_globals,
    unused_qualifications,
    unused_results,
    unused_imports,
    unused_variables,
    bare_trait_objects,
    ellipsis_inclusive_range_patterns,
    elided_lifetimes_in_paths
)]
#![warn(clippy::explicit_into_iter_loop)]

//! Procedural trees from stochastic, depth weighted L-systems.
//!
//! A [`Grammar`](grammar::Grammar) maps symbols to weighted alternatives whose weights are
//! functions of the recursion depth. Expanding the starting symbol yields a flat string of
//! terminal symbols, which a 3D [`Turtle`](turtle::Turtle) walks to produce a list of
//! [`BranchPlacement`](turtle::BranchPlacement)s. Drawing those placements is left to the caller.
//!
//! Like every other entry point of this crate, [`command::process_command`] is stateless:
//! everything needed for one tree is contained in the call.

pub mod command;
pub mod grammar;
pub mod parse;
pub mod presets;
pub mod tree;
pub mod turtle;

pub mod prelude {
    pub use crate::{
        ArboraError,
        command::{ConfigType, process_command},
        grammar::{
            Atom, DEFAULT_MAX_DEPTH, Grammar, MAX_DEPTH_LIMIT, Part, RandomSource, Rule,
            ScriptedRandom, Symbol, Weight, WeightedAlternative,
        },
        parse::parse_description,
        tree::{Tree, TreeDescription},
        turtle::{
            BranchPlacement, CommandAlphabet, Interpreter, TurtleCommand, TurtleState, interpret,
        },
    };
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ArboraError {
    #[error("No rule defined for symbol '{0}'")]
    UndefinedSymbol(char),

    #[error("The rule for symbol '{0}' has no alternatives")]
    EmptyRule(char),

    #[error("No alternative of '{symbol}' has a positive weight at depth {depth}")]
    NoViableAlternative { symbol: char, depth: u32 },

    #[error("Recursion limit exceeded while expanding '{symbol}' at depth {depth}")]
    RecursionLimitExceeded { symbol: char, depth: u32 },

    #[error("Could not pop an empty turtle stack, symbol index {0}")]
    UnbalancedStack(usize),

    #[error("Invalid float value: {0}")]
    FloatNotFinite(String),

    #[error("Invalid input data: {0}")]
    InvalidParameter(String),

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Could not parse tree description: {0}")]
    ParseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
