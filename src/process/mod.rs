//! Process supervision for runs of the external tool.

pub mod clean;
pub mod status;
pub mod supervisor;

pub use clean::clean_line;
pub use status::ProcessStatus;
pub use supervisor::{ElevationOutcome, LineObserver, ManagedProcess, Stream};
