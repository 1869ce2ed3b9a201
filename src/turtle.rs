// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the arbora crate.

//! A 3D turtle that turns a string of symbols into a list of [`BranchPlacement`]s.

#[cfg(test)]
mod tests;

use crate::{ArboraError, grammar::Symbol};
use rustc_hash::FxHashMap;
use std::time::Instant;
use vector_traits::glam::{DMat3, DMat4, DVec3};

/// Rotation of an orientation given as Euler degrees about X, Y and Z.
///
/// The rotation is `Rz * Ry * Rx`, the same composition the renderer uses for its
/// translate-rotate transforms. Placements only line up with their parents if both agree on this.
pub fn rotation_matrix(orientation: DVec3) -> DMat3 {
    DMat3::from_rotation_z(orientation.z.to_radians())
        * DMat3::from_rotation_y(orientation.y.to_radians())
        * DMat3::from_rotation_x(orientation.x.to_radians())
}

/// The direction a turtle with this orientation moves in: the canonical up vector (+Y), rotated.
pub fn forward(orientation: DVec3) -> DVec3 {
    rotation_matrix(orientation) * DVec3::Y
}

/// Position and orientation of the pen. Pushed and popped by value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TurtleState {
    pub location: DVec3,
    /// Euler angles in degrees
    pub orientation: DVec3,
}

impl TurtleState {
    pub fn new(location: DVec3, orientation: DVec3) -> Self {
        Self {
            location,
            orientation,
        }
    }

    pub fn forward(&self) -> DVec3 {
        forward(self.orientation)
    }
}

/// The spatial data of one draw step, captured before the turtle moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchPlacement {
    pub location: DVec3,
    /// Euler angles in degrees
    pub orientation: DVec3,
    pub length: f64,
}

impl BranchPlacement {
    /// Unit vector along the branch
    pub fn direction(&self) -> DVec3 {
        forward(self.orientation)
    }

    /// Where the branch ends, and where the next child frame starts
    pub fn end(&self) -> DVec3 {
        self.location + self.direction() * self.length
    }

    pub fn rotation(&self) -> DMat3 {
        rotation_matrix(self.orientation)
    }

    /// translation * rotation, ready to position a segment mesh built along +Y
    pub fn transform(&self) -> DMat4 {
        DMat4::from_translation(self.location) * DMat4::from_mat3(self.rotation())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurtleCommand {
    /// Symbols without spatial meaning
    Nop,
    /// Emit a placement and move forward
    Draw,
    /// Move forward without drawing
    Move,
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
    /// Add 180 degrees to every orientation component
    TurnAround,
    Push,
    Pop,
}

/// Maps symbols to turtle commands. Unmapped symbols are no-ops.
#[derive(Debug, Clone)]
pub struct CommandAlphabet {
    tokens: FxHashMap<Symbol, TurtleCommand>,
}

impl Default for CommandAlphabet {
    /// `F` draw, `f` move, `+ -` about X, `& ^` about Y, `\ /` about Z, `|` turn around,
    /// `[ ]` push and pop.
    fn default() -> Self {
        let tokens = [
            ('F', TurtleCommand::Draw),
            ('f', TurtleCommand::Move),
            ('+', TurtleCommand::PositiveX),
            ('-', TurtleCommand::NegativeX),
            ('&', TurtleCommand::PositiveY),
            ('^', TurtleCommand::NegativeY),
            ('\\', TurtleCommand::PositiveZ),
            ('/', TurtleCommand::NegativeZ),
            ('|', TurtleCommand::TurnAround),
            ('[', TurtleCommand::Push),
            (']', TurtleCommand::Pop),
        ]
        .into_iter()
        .collect();
        Self { tokens }
    }
}

impl CommandAlphabet {
    /// An alphabet where every symbol is a no-op
    pub fn empty() -> Self {
        Self {
            tokens: FxHashMap::default(),
        }
    }

    pub fn add_token(
        &mut self,
        token: Symbol,
        command: TurtleCommand,
    ) -> Result<&mut Self, ArboraError> {
        if self.tokens.contains_key(&token) {
            return Err(ArboraError::InvalidParameter(format!(
                "already contain the token {token}"
            )));
        }
        let _ = self.tokens.insert(token, command);
        Ok(self)
    }

    #[inline]
    pub fn get(&self, symbol: Symbol) -> TurtleCommand {
        self.tokens
            .get(&symbol)
            .copied()
            .unwrap_or(TurtleCommand::Nop)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// The state of one interpretation run.
#[derive(Debug, Clone)]
pub struct Turtle {
    state: TurtleState,
    stack: Vec<TurtleState>,
    result: Vec<BranchPlacement>,
    step_length: f64,
    angle_increment: f64,
    /// number of commands applied so far
    steps: usize,
}

impl Turtle {
    pub fn new(initial: TurtleState, step_length: f64, angle_increment: f64) -> Self {
        Self {
            state: initial,
            stack: Vec::new(),
            result: Vec::new(),
            step_length,
            angle_increment,
            steps: 0,
        }
    }

    /// Apply a turtle command
    pub fn apply(&mut self, command: TurtleCommand) -> Result<(), ArboraError> {
        let angle = self.angle_increment;
        match command {
            TurtleCommand::Nop => {}
            TurtleCommand::Draw => {
                self.result.push(BranchPlacement {
                    location: self.state.location,
                    orientation: self.state.orientation,
                    length: self.step_length,
                });
                self.advance();
            }
            TurtleCommand::Move => self.advance(),
            TurtleCommand::PositiveX => self.state.orientation.x += angle,
            TurtleCommand::NegativeX => self.state.orientation.x -= angle,
            TurtleCommand::PositiveY => self.state.orientation.y += angle,
            TurtleCommand::NegativeY => self.state.orientation.y -= angle,
            TurtleCommand::PositiveZ => self.state.orientation.z += angle,
            TurtleCommand::NegativeZ => self.state.orientation.z -= angle,
            TurtleCommand::TurnAround => self.state.orientation += DVec3::splat(180.0),
            TurtleCommand::Push => self.stack.push(self.state),
            TurtleCommand::Pop => {
                self.state = self
                    .stack
                    .pop()
                    .ok_or(ArboraError::UnbalancedStack(self.steps))?;
            }
        };
        self.steps += 1;
        Ok(())
    }

    fn advance(&mut self) {
        self.state.location += self.state.forward() * self.step_length;
    }

    pub fn state(&self) -> TurtleState {
        self.state
    }

    /// Number of saved states
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn placements(&self) -> &[BranchPlacement] {
        &self.result
    }

    pub fn into_placements(self) -> Vec<BranchPlacement> {
        self.result
    }
}

/// Runs a fresh [`Turtle`] over a symbol string, one run per call.
#[derive(Debug, Clone)]
pub struct Interpreter {
    pub alphabet: CommandAlphabet,
    pub step_length: f64,
    /// degrees
    pub angle_increment: f64,
}

impl Interpreter {
    pub fn new(step_length: f64, angle_increment: f64) -> Self {
        Self {
            alphabet: CommandAlphabet::default(),
            step_length,
            angle_increment,
        }
    }

    pub fn with_alphabet(mut self, alphabet: CommandAlphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn interpret<I>(
        &self,
        symbols: I,
        initial: TurtleState,
    ) -> Result<Vec<BranchPlacement>, ArboraError>
    where
        I: IntoIterator<Item = Symbol>,
    {
        if !self.step_length.is_finite() || !self.angle_increment.is_finite() {
            return Err(ArboraError::FloatNotFinite(format!(
                "step length:{} angle increment:{}",
                self.step_length, self.angle_increment
            )));
        }
        if !(initial.location.is_finite() && initial.orientation.is_finite()) {
            return Err(ArboraError::FloatNotFinite(format!(
                "initial turtle state:{initial:?}"
            )));
        }
        let now = Instant::now();
        let mut turtle = Turtle::new(initial, self.step_length, self.angle_increment);
        for symbol in symbols {
            turtle.apply(self.alphabet.get(symbol))?;
        }
        if turtle.stack_depth() > 0 {
            log::debug!(
                "interpretation ended with {} states left on the stack",
                turtle.stack_depth()
            );
        }
        log::debug!(
            "turtle emitted {} placements in {:?}",
            turtle.placements().len(),
            now.elapsed()
        );
        Ok(turtle.into_placements())
    }
}

/// Interprets `symbols` with the default [`CommandAlphabet`].
pub fn interpret<I>(
    symbols: I,
    initial: TurtleState,
    step_length: f64,
    angle_increment: f64,
) -> Result<Vec<BranchPlacement>, ArboraError>
where
    I: IntoIterator<Item = Symbol>,
{
    Interpreter::new(step_length, angle_increment).interpret(symbols, initial)
}
