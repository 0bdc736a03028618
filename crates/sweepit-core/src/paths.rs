//! Companion metadata path scheme.
//!
//! Every published `.tgz` archive has a 1:1 companion JSON descriptor stored
//! under a parallel path convention:
//!
//! - archive:  `{server}/{repo}/{package}/-/{version}.tgz`
//! - metadata: `{server}/{repo}/.npm/{package}/{version}.json`
//!
//! This module is an explicit parser/formatter pair: parse the version out of
//! an archive URI, format the companion URI for a version.

use regex::Regex;

/// Parses archive URIs and formats companion metadata URIs for one
/// (server, repo, package) coordinate.
#[derive(Debug)]
pub struct MetadataPathScheme {
    archive: Regex,
    server: String,
    repo: String,
    package: String,
}

impl MetadataPathScheme {
    pub fn new(server: &str, repo: &str, package: &str) -> Self {
        let server = server.trim_end_matches('/').to_string();
        let pattern = format!(
            "^{}/{}/{}/-/(.+)\\.tgz$",
            regex::escape(&server),
            regex::escape(repo),
            regex::escape(package),
        );
        // The pattern is assembled entirely from escaped literals.
        let archive = Regex::new(&pattern).expect("escaped archive pattern is valid");
        Self {
            archive,
            server,
            repo: repo.to_string(),
            package: package.to_string(),
        }
    }

    /// Extract the version from an archive URI, or `None` when the URI does
    /// not follow the expected naming pattern.
    pub fn version_of(&self, archive_uri: &str) -> Option<String> {
        self.archive
            .captures(archive_uri)
            .map(|c| c[1].to_string())
    }

    /// Absolute URI of the companion metadata descriptor for a version.
    pub fn metadata_uri(&self, version: &str) -> String {
        format!(
            "{}/{}/.npm/{}/{}.json",
            self.server, self.repo, self.package, version
        )
    }

    /// Companion metadata URI for an archive URI, or `None` on pattern
    /// mismatch (the caller logs and skips metadata deletion).
    pub fn companion_uri(&self, archive_uri: &str) -> Option<String> {
        self.version_of(archive_uri)
            .map(|version| self.metadata_uri(&version))
    }
}
