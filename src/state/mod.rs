//! Option values, the option map and the profile-document boundary.

pub mod options;
pub mod profile;

pub use options::{OptionMap, OptionValue};
pub use profile::{ProfileDocument, ProfileError, ProfileMetadata};
