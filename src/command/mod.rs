//! Command construction: host discovery, the builder and its argument vector.

pub mod builder;
pub mod environment;
pub mod quote;
pub mod vector;

pub use builder::{CommandBuilder, FORCED_FLAGS, technique_letters};
pub use environment::Environment;
pub use quote::{quote_arg, shell_single_quote};
pub use vector::ArgumentVector;
