//! CLI subcommands.

pub mod common;
pub mod components;
pub mod config;
pub mod full_install;
pub mod install;
