//! CLI subcommands.

pub mod sample;
pub mod validate;
