// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the arbora crate.

//! A module containing boilerplate implementations of standard traits such as Debug, Display,
//! FromStr etc etc

use super::{Atom, Part, Weight};
use crate::ArboraError;
use std::{fmt, str::FromStr};

impl fmt::Debug for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // a closure can't be printed, a few samples will have to do
        write!(
            f,
            "Weight(t0:{}, t1:{}, t2:{}, t3:{}, ..)",
            self.at(0),
            self.at(1),
            self.at(2),
            self.at(3)
        )
    }
}

impl fmt::Display for Part {
    /// The inverse of `Part::from_str`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for atom in self.atoms() {
            match atom {
                Atom::Terminal(s) => write!(f, "{s}")?,
                Atom::NonTerminal(s) => write!(f, "{{{s}}}")?,
            }
        }
        Ok(())
    }
}

impl FromStr for Part {
    type Err = ArboraError;

    /// Parses the text form of a production: `{X}` is the non-terminal `X`, every other char is a
    /// terminal. White space is dropped, so `{` and `}` can not be used as terminals.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut part = Part::epsilon();
        let mut chars = text.chars().filter(|c| !c.is_whitespace());
        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let symbol = match chars.next() {
                        Some('}') | None => {
                            return Err(ArboraError::ParseError(format!(
                                "Missing non-terminal symbol in \"{text}\""
                            )));
                        }
                        Some(symbol) => symbol,
                    };
                    if chars.next() != Some('}') {
                        return Err(ArboraError::ParseError(format!(
                            "Non-terminal must be one single char followed by '}}' in \"{text}\""
                        )));
                    }
                    part.push(Atom::NonTerminal(symbol));
                }
                '}' => {
                    return Err(ArboraError::ParseError(format!(
                        "Unmatched '}}' in \"{text}\""
                    )));
                }
                c => part.push(Atom::Terminal(c)),
            }
        }
        Ok(part)
    }
}
