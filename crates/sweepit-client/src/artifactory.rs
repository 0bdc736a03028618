//! Artifactory REST client.
//!
//! Covers the four endpoints the sweep pipeline consumes: folder listing,
//! per-artifact download stats, artifact deletion, and the npm reindex
//! trigger. All calls are sequential and blocking from the pipeline's point
//! of view; each carries a fixed timeout.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::info;
use url::Url;

use sweepit_core::{ArtifactListing, ArtifactStats, Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Progress is reported after every this many completed stats fetches.
const PROGRESS_EVERY: usize = 100;

/// Basic-auth credentials for the Artifactory server.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

/// Client bound to one server and repository.
pub struct ArtifactoryClient {
    http: reqwest::Client,
    server: String,
    repo: String,
    credentials: Credentials,
}

impl ArtifactoryClient {
    pub fn new(server: &str, repo: &str, credentials: Credentials) -> Result<Self> {
        Url::parse(server).map_err(|e| Error::Http(format!("invalid server url {server}: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            server: server.trim_end_matches('/').to_string(),
            repo: repo.to_string(),
            credentials,
        })
    }

    fn storage_url(&self, package: &str) -> String {
        format!("{}/api/storage/{}/{}/-", self.server, self.repo, package)
    }

    fn reindex_url(&self) -> String {
        format!("{}/api/npm/{}/reindex", self.server, self.repo)
    }

    /// Fetch the published-version folder listing for a package.
    pub async fn package_listing(&self, package: &str) -> Result<ArtifactListing> {
        let url = self.storage_url(package);

        let response = self.http.get(&url).send().await.map_err(|e| Error::ListingFetch {
            path: url.clone(),
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ListingFetch {
                path: url,
                message: format!("{status}: {body}"),
            });
        }

        response.json().await.map_err(|e| Error::ListingFetch {
            path: url,
            message: e.to_string(),
        })
    }

    /// Fetch download stats for one child of the package folder. `child_uri`
    /// is the listing-relative uri, e.g. `/ring-ui-0.1.0.tgz`.
    pub async fn artifact_stats(&self, package: &str, child_uri: &str) -> Result<ArtifactStats> {
        let url = format!("{}{}?stats", self.storage_url(package), child_uri);

        let response = self.http.get(&url).send().await.map_err(|e| Error::StatsFetch {
            uri: url.clone(),
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::StatsFetch {
                uri: url,
                message: format!("{status}: {body}"),
            });
        }

        response.json().await.map_err(|e| Error::StatsFetch {
            uri: url,
            message: e.to_string(),
        })
    }

    /// Fetch stats for every file child of the listing, one request at a
    /// time, preserving listing order. The first failure aborts the run.
    pub async fn fetch_all_stats(
        &self,
        package: &str,
        listing: &ArtifactListing,
    ) -> Result<Vec<ArtifactStats>> {
        let total = listing.file_children().count();
        let mut all = Vec::with_capacity(total);

        for child in listing.file_children() {
            all.push(self.artifact_stats(package, &child.uri).await?);
            if all.len() % PROGRESS_EVERY == 0 {
                info!("fetched stats for {}/{} artifacts", all.len(), total);
            }
        }

        info!("fetched stats for {}/{} artifacts", all.len(), total);
        Ok(all)
    }

    /// Delete one artifact by absolute uri. Non-2xx responses become
    /// [`Error::Delete`] carrying the status and response body.
    pub async fn delete_artifact(&self, uri: &str) -> Result<()> {
        let response = self
            .http
            .delete(uri)
            .basic_auth(&self.credentials.login, Some(&self.credentials.password))
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Delete {
                uri: uri.to_string(),
                status,
                body,
            });
        }

        Ok(())
    }

    /// Ask the server to rebuild the npm search index for the repository.
    /// Single attempt; the response is returned for logging, not acted upon.
    pub async fn reindex(&self) -> Result<(StatusCode, String)> {
        let response = self
            .http
            .post(self.reindex_url())
            .basic_auth(&self.credentials.login, Some(&self.credentials.password))
            .header("Content-Type", "text/plain")
            .body("")
            .send()
            .await
            .map_err(|e| Error::Reindex(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok((status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ArtifactoryClient {
        ArtifactoryClient::new(
            "http://repo.example.net",
            "npm-ring",
            Credentials {
                login: "admin".into(),
                password: "secret".into(),
            },
        )
        .unwrap()
    }

    #[test]
    fn builds_storage_url() {
        assert_eq!(
            client().storage_url("ring-ui"),
            "http://repo.example.net/api/storage/npm-ring/ring-ui/-"
        );
    }

    #[test]
    fn builds_reindex_url() {
        assert_eq!(
            client().reindex_url(),
            "http://repo.example.net/api/npm/npm-ring/reindex"
        );
    }

    #[test]
    fn trims_trailing_slash_from_server() {
        let c = ArtifactoryClient::new(
            "http://repo.example.net/",
            "npm-ring",
            Credentials {
                login: "a".into(),
                password: "b".into(),
            },
        )
        .unwrap();
        assert_eq!(
            c.storage_url("ring-ui"),
            "http://repo.example.net/api/storage/npm-ring/ring-ui/-"
        );
    }

    #[test]
    fn rejects_invalid_server_url() {
        let err = ArtifactoryClient::new(
            "not a url",
            "npm-ring",
            Credentials {
                login: "a".into(),
                password: "b".into(),
            },
        );
        assert!(err.is_err());
    }
}
