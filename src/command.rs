// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 lacklustr@protonmail.com https://github.com/eadf
// This file is part of the arbora crate.

mod cmd_tree;
mod trait_impl;

use crate::{ArboraError, tree::Tree};
use std::collections::HashMap;

trait Options {
    /// Will return an option parsed as a `T`, the `default` value or an Err
    fn get_mandatory_parsed_option<'a, T: std::str::FromStr>(
        &'a self,
        key: &'a str,
        default: Option<T>,
    ) -> Result<T, ArboraError>;

    /// Will return an option parsed as a `T` or None.
    /// If the option is missing None is returned, if it there but if it can't be parsed an error
    /// will be returned.
    fn get_parsed_option<'a, T: std::str::FromStr>(
        &'a self,
        key: &'a str,
    ) -> Result<Option<T>, ArboraError>;

    /// Returns the &str value of an option, or an Err is it does not exists
    fn get_mandatory_option(&self, key: &str) -> Result<&str, ArboraError>;

    /// Returns true if the option exists
    fn does_option_exist(&self, key: &str) -> Result<bool, ArboraError>;
}

/// All parameters, in and out, travel as strings
pub type ConfigType = HashMap<String, String>;

/// The grown tree and a few facts about it
pub type CommandResult = (Tree, ConfigType);

/// The main entry point, all commands are routed through this API.
///
/// `config["command"]` selects the command. Currently there is only `"tree"`, see the
/// crate README for its options.
pub fn process_command(config: ConfigType) -> Result<CommandResult, ArboraError> {
    match config.get_mandatory_option("command")? {
        "tree" => cmd_tree::process_command(&config),
        illegal_command => Err(ArboraError::InvalidParameter(format!(
            "Invalid command:{illegal_command}"
        ))),
    }
}
