//! Library entry for sqlmapctl exposing the option model, command builder, validator
//! and process supervisor for integration tests.

pub mod args;
pub mod command;
pub mod config;
pub mod logic;
pub mod process;
pub mod registry;
pub mod scan;
pub mod state;
pub mod validate;
