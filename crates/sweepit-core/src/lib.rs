//! Core domain types for the sweepit artifact cleaner.
//!
//! This crate contains:
//! - Artifactory storage/stats payload types
//! - The retention policy evaluator
//! - The companion metadata path scheme
//! - Error types shared across the workspace
//!
//! Everything here is pure: no I/O, no async, no clocks. The reference
//! instant for the policy evaluator is always passed in by the caller.

pub mod error;
pub mod model;
pub mod paths;
pub mod policy;

pub use error::{Error, Result};
pub use model::{ArtifactChildRef, ArtifactListing, ArtifactStats};
pub use paths::MetadataPathScheme;
pub use policy::{RetentionPolicy, RetentionRule};
