//! Artifactory storage and statistics payload types.
//!
//! These mirror the JSON bodies of the storage API (`/api/storage/...`) and the
//! per-artifact `?stats` endpoint. All types are deserialized once per run and
//! never mutated afterwards.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Result of listing a package's published-version folder.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactListing {
    pub uri: String,
    pub repo: String,
    pub path: String,
    // Artifactory emits timestamps like "2014-01-23T13:17:53.201-0500", which
    // is not RFC 3339; keep them verbatim since nothing computes on them.
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub modified_by: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub children: Vec<ArtifactChildRef>,

    #[serde(default)]
    pub download_uri: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub checksums: Option<Checksums>,
    #[serde(default)]
    pub original_checksums: Option<Checksums>,
}

impl ArtifactListing {
    /// Ordered iterator over the file entries. Folder children are never
    /// deletion candidates.
    pub fn file_children(&self) -> impl Iterator<Item = &ArtifactChildRef> {
        self.children.iter().filter(|c| !c.folder)
    }
}

/// One entry inside an [`ArtifactListing`]: either a sub-folder or a single
/// published version file.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactChildRef {
    pub uri: String,
    #[serde(default)]
    pub folder: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checksums {
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub md5: Option<String>,
}

/// Per-version usage record from the `?stats` endpoint.
///
/// `last_downloaded` is `None` when the artifact was never downloaded (the
/// server reports epoch-millis `0` in that case). The remote counters are
/// populated by federated repository setups and are not consulted by the
/// retention policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactStats {
    pub uri: String,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default, deserialize_with = "epoch_millis_opt")]
    pub last_downloaded: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_downloaded_by: Option<String>,
    #[serde(default)]
    pub remote_download_count: u64,
    #[serde(default, deserialize_with = "epoch_millis_opt")]
    pub remote_last_downloaded: Option<DateTime<Utc>>,
}

/// Epoch-millis integer to `Option<DateTime<Utc>>`; zero, negative, or
/// out-of-range values map to `None` (treated as never downloaded).
fn epoch_millis_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = Option::<i64>::deserialize(deserializer)?;
    Ok(millis
        .filter(|&m| m > 0)
        .and_then(|m| Utc.timestamp_millis_opt(m).single()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_splits_folders_from_files() {
        let json = r#"{
            "uri": "http://repo.example.net/api/storage/npm-ring/ring-ui/-",
            "repo": "npm-ring",
            "path": "ring-ui/-",
            "created": "2014-01-23T13:17:53.201-0500",
            "createdBy": "admin",
            "lastModified": "2016-03-01T10:00:00.000-0500",
            "modifiedBy": "deployer",
            "lastUpdated": "2016-03-01T10:00:00.000-0500",
            "children": [
                {"uri": "/archive", "folder": true},
                {"uri": "/ring-ui-0.1.0.tgz", "folder": false},
                {"uri": "/ring-ui-0.2.0.tgz", "folder": false}
            ]
        }"#;

        let listing: ArtifactListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.repo, "npm-ring");
        assert_eq!(listing.children.len(), 3);

        let files: Vec<_> = listing.file_children().map(|c| c.uri.as_str()).collect();
        assert_eq!(files, ["/ring-ui-0.1.0.tgz", "/ring-ui-0.2.0.tgz"]);
    }

    #[test]
    fn stats_parse_with_last_download() {
        let json = r#"{
            "uri": "http://repo.example.net/npm-ring/ring-ui/-/ring-ui-0.1.0.tgz",
            "downloadCount": 42,
            "lastDownloaded": 1457964000000,
            "lastDownloadedBy": "builder",
            "remoteDownloadCount": 0,
            "remoteLastDownloaded": 0
        }"#;

        let stats: ArtifactStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.download_count, 42);
        let last = stats.last_downloaded.unwrap();
        assert_eq!(last.timestamp_millis(), 1_457_964_000_000);
        assert!(stats.remote_last_downloaded.is_none());
    }

    #[test]
    fn zero_epoch_means_never_downloaded() {
        let json = r#"{"uri": "http://x/a.tgz", "downloadCount": 0, "lastDownloaded": 0}"#;
        let stats: ArtifactStats = serde_json::from_str(json).unwrap();
        assert!(stats.last_downloaded.is_none());
    }

    #[test]
    fn missing_stats_fields_default() {
        let json = r#"{"uri": "http://x/a.tgz"}"#;
        let stats: ArtifactStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.download_count, 0);
        assert!(stats.last_downloaded.is_none());
        assert!(stats.last_downloaded_by.is_none());
    }
}
