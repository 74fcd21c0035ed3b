//! Command-line argument parsing and handling.

pub mod definition;
pub mod error;
pub mod handlers;
pub mod options;
pub mod utils;

pub use definition::{Action, Args, Dispatch, process_args};
pub use error::ArgsError;
pub use utils::determine_log_level;
