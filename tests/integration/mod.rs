//! Integration tests for the file settings resolution engine

mod cascade_resolution;
mod cli_commands;
mod registry_build;
mod test_utils;

pub use test_utils::with_xdg_env;
