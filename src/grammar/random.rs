// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the arbora crate.

/// A uniform random source in `[0, 1)`.
///
/// Every `rand::Rng` is one. Use [`ScriptedRandom`] when the draws must be known in advance.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: rand::Rng + ?Sized> RandomSource for R {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Replays a fixed list of draws, starting over when the list is exhausted.
/// An empty list always draws `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Always draws `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws made so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        let value = if self.values.is_empty() {
            0.0
        } else {
            self.values[self.cursor % self.values.len()]
        };
        self.cursor += 1;
        value
    }
}
