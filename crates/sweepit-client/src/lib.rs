//! Artifactory REST client for sweepit.

pub mod artifactory;

pub use artifactory::{ArtifactoryClient, Credentials};
