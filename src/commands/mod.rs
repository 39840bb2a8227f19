//! Operations behind the CLI subcommands.

pub mod camera;
pub mod config;
pub mod health;
pub mod split;
pub mod update;
