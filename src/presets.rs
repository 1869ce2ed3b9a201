// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the arbora crate.

//! Built-in tree descriptions.


use crate::{ArboraError, parse::parse_description, tree::TreeDescription};

/// Dense, five way branching. Stops at random, more likely the deeper it gets.
pub const BUSH: &str = r###"
starting("F")
rule("F", "{F}[+{F}]{F}[-{F}]{F}", Weight::Inverse(1.0))
rule("F", "F", Weight::NonRoot(0.5))
angle(25.7)
"###;

/// Sparse branches with stems that double in length, random depth.
pub const WEED: &str = r###"
starting("X")
rule("X", "{F}[+{X}]{F}[-{X}]+{X}", Weight::Inverse(1.0))
rule("X", "", Weight::NonRoot(0.3))
rule("F", "{F}{F}", Weight::Inverse(1.0))
rule("F", "F", Weight::NonRoot(0.3))
"###;

/// Exactly three levels of branching
pub const SHRUB: &str = r###"
starting("F")
rule("F", "{F}[+{F}]{F}[-{F}][{F}]", Weight::Below(3, 1.0))
rule("F", "F", Weight::AtLeast(3, 1.0))
"###;

/// Five levels of forks, stems growing towards the root
pub const SAPLING: &str = r###"
starting("X")
rule("X", "{F}[+{X}][-{X}]{F}{X}", Weight::Below(5, 1.0))
rule("X", "", Weight::AtLeast(5, 1.0))
rule("F", "{F}{F}", Weight::Below(5, 1.0))
rule("F", "F", Weight::AtLeast(5, 1.0))
"###;

/// The classic fern-like plant, four levels deep
pub const FERN: &str = r###"
starting("X")
rule("X", "{F}-[[{X}]+{X}]+{F}[+{F}{X}]-{X}", Weight::Below(4, 1.0))
rule("X", "", Weight::AtLeast(4, 1.0))
rule("F", "{F}{F}", Weight::Below(4, 1.0))
rule("F", "F", Weight::AtLeast(4, 1.0))
angle(22.5)
"###;

pub const PRESET_NAMES: [&str; 5] = ["bush", "weed", "shrub", "sapling", "fern"];

/// The description text of a named preset
pub fn preset_text(name: &str) -> Option<&'static str> {
    match name {
        "bush" => Some(BUSH),
        "weed" => Some(WEED),
        "shrub" => Some(SHRUB),
        "sapling" => Some(SAPLING),
        "fern" => Some(FERN),
        _ => None,
    }
}

/// Parses a named preset
pub fn preset(name: &str) -> Result<TreeDescription, ArboraError> {
    let text = preset_text(name).ok_or_else(|| {
        ArboraError::InvalidParameter(format!(
            "Unknown preset:{name}, expected one of {PRESET_NAMES:?}"
        ))
    })?;
    parse_description(text)
}
