// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the arbora crate.


use super::{ConfigType, Options};
use crate::{ArboraError, presets, tree::TreeDescription};
use rand::{SeedableRng, rngs::StdRng};
use std::time;

/// The option holding a tree description text
pub(crate) const DESCRIPTION_TAG: &str = "🌳";
pub(crate) const PRESET_TAG: &str = "preset";
pub(crate) const SEED_TAG: &str = "seed";

pub(crate) fn process_command(
    input_config: &ConfigType,
) -> Result<super::CommandResult, ArboraError> {
    let mut description = if input_config.does_option_exist(DESCRIPTION_TAG)? {
        input_config
            .get_mandatory_option(DESCRIPTION_TAG)?
            .parse::<TreeDescription>()?
    } else if input_config.does_option_exist(PRESET_TAG)? {
        presets::preset(input_config.get_mandatory_option(PRESET_TAG)?.trim())?
    } else {
        return Err(ArboraError::MissingParameter(format!(
            "Either \"{DESCRIPTION_TAG}\" or \"{PRESET_TAG}\" must be given"
        )));
    };

    description.step_length =
        input_config.get_mandatory_parsed_option("step_length", Some(description.step_length))?;
    description.angle_increment =
        input_config.get_mandatory_parsed_option("angle", Some(description.angle_increment))?;
    if let Some(max_depth) = input_config.get_parsed_option::<u32>("max_depth")? {
        let _ = description.grammar.set_max_depth(max_depth)?;
    }

    let seed = input_config.get_parsed_option::<u64>(SEED_TAG)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::try_from_os_rng().map_err(|e| {
            ArboraError::InternalError(format!("Could not seed from the OS random source: {e}"))
        })?,
    };

    let now = time::Instant::now();
    let tree = description.build(&mut rng)?;
    log::debug!(
        "tree command: {} symbols, {} placements in {:?}",
        tree.symbols.len(),
        tree.placements.len(),
        now.elapsed()
    );

    let mut return_config = ConfigType::new();
    let _ = return_config.insert("symbol_count".to_string(), tree.symbols.len().to_string());
    let _ = return_config.insert(
        "placement_count".to_string(),
        tree.placements.len().to_string(),
    );
    if let Some(seed) = seed {
        let _ = return_config.insert(SEED_TAG.to_string(), seed.to_string());
    }
    Ok((tree, return_config))
}
