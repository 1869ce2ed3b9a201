// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the arbora crate.

//! Text form of a [`TreeDescription`].
//!
//! ```text
//! # a comment
//! token("F", Turtle::Draw)
//! starting("X")
//! rule("X", "{F}[+{X}]{F}[-{X}]+{X}", Weight::Inverse(1.0))
//! rule("X", "", Weight::NonRoot(0.3))
//! step(1.0)
//! angle(25.0)
//! position(0.0, 0.0, 0.0)
//! orientation(0.0, 0.0, 0.0)
//! max_depth(256)
//! ```
//!
//! One statement per line. Rules for the same symbol add alternatives in declaration order.
//! Without any `token(..)` statement the default alphabet is used, otherwise the declared
//! tokens are the whole alphabet.


use crate::{
    ArboraError,
    grammar::{Grammar, MAX_DEPTH_LIMIT, Part, Weight},
    tree::TreeDescription,
    turtle::{CommandAlphabet, TurtleCommand},
};
use logos::Logos;
use smallvec::SmallVec;
use std::str::FromStr;
use vector_traits::glam::DVec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeightKind {
    Constant,
    Below,
    AtLeast,
    Inverse,
    NonRoot,
}

impl WeightKind {
    fn arity(self) -> usize {
        match self {
            WeightKind::Below | WeightKind::AtLeast => 2,
            _ => 1,
        }
    }

    fn build(self, args: &[f64], line: usize) -> Result<Weight, ArboraError> {
        Ok(match (self, args) {
            (WeightKind::Constant, [w]) => Weight::constant(*w),
            (WeightKind::Inverse, [w]) => Weight::inverse(*w),
            (WeightKind::NonRoot, [w]) => Weight::non_root(*w),
            (WeightKind::Below, [n, w]) => Weight::below(depth_value(*n, line)?, *w),
            (WeightKind::AtLeast, [n, w]) => Weight::at_least(depth_value(*n, line)?, *w),
            _ => {
                return Err(ArboraError::ParseError(format!(
                    "Weight::{self:?} takes {} argument(s), got {} at line {line}",
                    self.arity(),
                    args.len()
                )));
            }
        })
    }
}

/// A depth given as a number, it must be a non-negative integer.
fn depth_value(value: f64, line: usize) -> Result<u32, ArboraError> {
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(ArboraError::ParseError(format!(
            "Expected a non-negative integer depth, got {value} at line {line}"
        )));
    }
    Ok(value as u32)
}

fn single_char(text: &str, line: usize) -> Result<char, ArboraError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ArboraError::ParseError(format!(
            "Symbol must be one single char, got '{text}' at line {line}"
        ))),
    }
}

/// remove comments and surrounding white space, one output line per input line
fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for line in input.lines() {
        // Remove comments (everything after #)
        let line_without_comments = line.split('#').next().unwrap_or("");
        result.push_str(line_without_comments.trim());
        result.push('\n');
    }
    result
}

#[derive(Logos, Debug, PartialEq)]
enum ParseToken {
    #[regex("\\.?token")]
    Token,

    #[regex("\\.?(starting|axiom)")]
    Starting,

    #[regex("\\.?rule")]
    Rule,

    #[regex("\\.?step")]
    Step,

    #[regex("\\.?angle")]
    Angle,

    #[regex("\\.?position")]
    Position,

    #[regex("\\.?orientation")]
    Orientation,

    #[regex("\\.?max_depth")]
    MaxDepth,

    #[token("Turtle::Nop", |_| TurtleCommand::Nop)]
    #[token("Turtle::Draw", |_| TurtleCommand::Draw)]
    #[token("Turtle::Move", |_| TurtleCommand::Move)]
    #[token("Turtle::PositiveX", |_| TurtleCommand::PositiveX)]
    #[token("Turtle::NegativeX", |_| TurtleCommand::NegativeX)]
    #[token("Turtle::PositiveY", |_| TurtleCommand::PositiveY)]
    #[token("Turtle::NegativeY", |_| TurtleCommand::NegativeY)]
    #[token("Turtle::PositiveZ", |_| TurtleCommand::PositiveZ)]
    #[token("Turtle::NegativeZ", |_| TurtleCommand::NegativeZ)]
    #[token("Turtle::TurnAround", |_| TurtleCommand::TurnAround)]
    #[token("Turtle::Push", |_| TurtleCommand::Push)]
    #[token("Turtle::Pop", |_| TurtleCommand::Pop)]
    Command(TurtleCommand),

    #[token("Weight::Constant", |_| WeightKind::Constant)]
    #[token("Weight::Below", |_| WeightKind::Below)]
    #[token("Weight::AtLeast", |_| WeightKind::AtLeast)]
    #[token("Weight::Inverse", |_| WeightKind::Inverse)]
    #[token("Weight::NonRoot", |_| WeightKind::NonRoot)]
    Weight(WeightKind),

    #[token("\n")]
    EOL,

    #[regex("-?[0-9]+(\\.[0-9]+)?")]
    Number,

    #[regex(r#""[^"\n]*""#)]
    QuotedText,

    #[regex(r"[ \t\f\r(),;]+", logos::skip)]
    Skip,
}

#[derive(Debug, PartialEq)]
enum ParseState {
    Start,
    Token(Option<char>),
    Starting,
    Rule(Option<char>, Option<Part>),
    RuleWeight(char, Part, WeightKind, SmallVec<[f64; 2]>),
    Step,
    Angle,
    MaxDepth,
    Position(SmallVec<[f64; 3]>),
    Orientation(SmallVec<[f64; 3]>),
}

fn bad_state(what: &str, state: &ParseState, line: usize) -> ArboraError {
    ArboraError::ParseError(format!("Bad state for {what}:{state:?} at line {line}"))
}

/// Parses the text form of a tree description, see the module documentation.
pub fn parse_description(text: &str) -> Result<TreeDescription, ArboraError> {
    let text = strip_comments(text);

    let mut starting: Option<char> = None;
    let mut max_depth: Option<u32> = None;
    let mut alternatives: Vec<(char, Part, Weight)> = Vec::new();
    let mut alphabet: Option<CommandAlphabet> = None;
    let mut description = TreeDescription::new(Grammar::new(' '));

    let mut lex = ParseToken::lexer(&text);
    let mut state = ParseState::Start;
    let mut line = 1_usize;

    while let Some(token) = lex.next() {
        let token = token.map_err(|_| {
            ArboraError::ParseError(format!("Bad token: {:?} at line {line}", lex.slice()))
        })?;
        match token {
            ParseToken::Token
            | ParseToken::Starting
            | ParseToken::Rule
            | ParseToken::Step
            | ParseToken::Angle
            | ParseToken::Position
            | ParseToken::Orientation
            | ParseToken::MaxDepth => {
                if state != ParseState::Start {
                    return Err(ArboraError::ParseError(format!(
                        "Expected to be in Start state, was in state:{:?} when reading:{} at line {}.",
                        state,
                        lex.slice(),
                        line
                    )));
                }
                state = match token {
                    ParseToken::Token => ParseState::Token(None),
                    ParseToken::Starting => ParseState::Starting,
                    ParseToken::Rule => ParseState::Rule(None, None),
                    ParseToken::Step => ParseState::Step,
                    ParseToken::Angle => ParseState::Angle,
                    ParseToken::Position => ParseState::Position(SmallVec::new()),
                    ParseToken::Orientation => ParseState::Orientation(SmallVec::new()),
                    _ => ParseState::MaxDepth,
                };
            }
            ParseToken::QuotedText => {
                let text: &str = &lex.slice()[1..lex.slice().len() - 1];
                state = match state {
                    ParseState::Token(None) => ParseState::Token(Some(single_char(text, line)?)),
                    ParseState::Starting => {
                        log::trace!("Got .starting(\"{text}\")");
                        starting = Some(single_char(text, line)?);
                        ParseState::Start
                    }
                    ParseState::Rule(None, None) => {
                        ParseState::Rule(Some(single_char(text, line)?), None)
                    }
                    ParseState::Rule(Some(rule_id), None) => {
                        let part = text.parse::<Part>().map_err(|e| {
                            ArboraError::ParseError(format!("{e} at line {line}"))
                        })?;
                        ParseState::Rule(Some(rule_id), Some(part))
                    }
                    other => return Err(bad_state("QuotedText", &other, line)),
                };
            }
            ParseToken::Command(command) => match state {
                ParseState::Token(Some(symbol)) => {
                    log::trace!("Got .add_token(\"{symbol}\", {command:?})");
                    let _ = alphabet
                        .get_or_insert_with(CommandAlphabet::empty)
                        .add_token(symbol, command)
                        .map_err(|e| ArboraError::ParseError(format!("{e} at line {line}")))?;
                    state = ParseState::Start;
                }
                other => return Err(bad_state("Turtle command", &other, line)),
            },
            ParseToken::Weight(kind) => {
                state = match state {
                    ParseState::Rule(Some(rule_id), Some(part)) => {
                        ParseState::RuleWeight(rule_id, part, kind, SmallVec::new())
                    }
                    other => return Err(bad_state("Weight", &other, line)),
                };
            }
            ParseToken::Number => {
                let value = lex.slice().parse::<f64>().map_err(|e| {
                    ArboraError::ParseError(format!(
                        "Could not parse number :{} at line {}. {:?}",
                        lex.slice(),
                        line,
                        e
                    ))
                })?;
                if !value.is_finite() {
                    return Err(ArboraError::ParseError(format!(
                        "Number out of range :{} at line {line}",
                        lex.slice()
                    )));
                }
                state = match state {
                    ParseState::RuleWeight(rule_id, part, kind, mut args) => {
                        args.push(value);
                        if args.len() < kind.arity() {
                            ParseState::RuleWeight(rule_id, part, kind, args)
                        } else {
                            log::trace!("Got .rule(\"{rule_id}\", \"{part}\", {kind:?}{args:?})");
                            alternatives.push((rule_id, part, kind.build(&args, line)?));
                            ParseState::Start
                        }
                    }
                    ParseState::Step => {
                        description.step_length = value;
                        ParseState::Start
                    }
                    ParseState::Angle => {
                        description.angle_increment = value;
                        ParseState::Start
                    }
                    ParseState::MaxDepth => {
                        let depth = depth_value(value, line)?;
                        if depth > MAX_DEPTH_LIMIT {
                            return Err(ArboraError::ParseError(format!(
                                "max_depth({depth}) is larger than {MAX_DEPTH_LIMIT} at line {line}"
                            )));
                        }
                        max_depth = Some(depth);
                        ParseState::Start
                    }
                    ParseState::Position(mut xyz) => {
                        xyz.push(value);
                        if let [x, y, z] = xyz[..] {
                            description.initial_state.location = DVec3::new(x, y, z);
                            ParseState::Start
                        } else {
                            ParseState::Position(xyz)
                        }
                    }
                    ParseState::Orientation(mut xyz) => {
                        xyz.push(value);
                        if let [x, y, z] = xyz[..] {
                            description.initial_state.orientation = DVec3::new(x, y, z);
                            ParseState::Start
                        } else {
                            ParseState::Orientation(xyz)
                        }
                    }
                    other => return Err(bad_state("Number", &other, line)),
                };
            }
            ParseToken::EOL => {
                if state != ParseState::Start {
                    return Err(ArboraError::ParseError(format!(
                        "Incomplete statement, state:{state:?} at line {line}"
                    )));
                }
                line += 1;
            }
            ParseToken::Skip => {}
        }
    }
    if state != ParseState::Start {
        return Err(ArboraError::ParseError(format!(
            "Incomplete statement, state:{state:?} at line {line}"
        )));
    }

    let starting = starting.ok_or_else(|| {
        ArboraError::ParseError("Missing starting(..) statement".to_string())
    })?;
    let mut grammar = Grammar::new(starting);
    if let Some(max_depth) = max_depth {
        let _ = grammar.set_max_depth(max_depth)?;
    }
    for (symbol, part, weight) in alternatives {
        let _ = grammar.add_alternative(symbol, part, weight);
    }
    description.grammar = grammar;
    if let Some(alphabet) = alphabet {
        description.alphabet = alphabet;
    }
    Ok(description)
}

impl FromStr for TreeDescription {
    type Err = ArboraError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_description(text)
    }
}
