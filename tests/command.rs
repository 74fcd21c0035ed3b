//! Integration tests for command building and quoting.

#[path = "command/builder_integration.rs"]
mod builder_integration;
#[path = "command/quoting_integration.rs"]
mod quoting_integration;
