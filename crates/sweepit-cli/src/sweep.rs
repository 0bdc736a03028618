//! The sweep pipeline: list, fetch stats, evaluate, delete, reindex.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use sweepit_client::{ArtifactoryClient, Credentials};
use sweepit_core::{ArtifactStats, MetadataPathScheme, RetentionPolicy};

/// Immutable run configuration, built once in `main` from CLI arguments.
pub struct SweepConfig {
    pub server_url: String,
    pub repo: String,
    pub package: String,
    pub credentials: Credentials,
    pub dry_run: bool,
}

pub async fn run(config: &SweepConfig) -> Result<()> {
    let client =
        ArtifactoryClient::new(&config.server_url, &config.repo, config.credentials.clone())?;

    let listing = client.package_listing(&config.package).await?;
    info!(
        "listed {} in {}: {} children",
        listing.path,
        listing.repo,
        listing.children.len()
    );

    let stats = client.fetch_all_stats(&config.package, &listing).await?;

    let policy = RetentionPolicy::default();
    let now = Utc::now();
    let stale = policy.select_stale(&stats, now);
    info!("deleting {} builds of {}", stale.len(), stats.len());

    let scheme = MetadataPathScheme::new(&config.server_url, &config.repo, &config.package);
    for artifact in &stale {
        report(&policy, artifact, now);

        if config.dry_run {
            match scheme.companion_uri(&artifact.uri) {
                Some(json_uri) => info!("  would also delete {json_uri}"),
                None => warn!("  cannot find json for {}", artifact.uri),
            }
            continue;
        }

        delete_with_companion(&client, &scheme, artifact).await;
    }

    if config.dry_run {
        info!("dry run: skipping reindex");
        return Ok(());
    }

    let (status, body) = client.reindex().await?;
    info!("reindex responded {status}: {body}");

    Ok(())
}

fn report(policy: &RetentionPolicy, artifact: &ArtifactStats, now: DateTime<Utc>) {
    let last = artifact
        .last_downloaded
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "never".to_string());
    let bucket = policy
        .governing_rule(artifact, now)
        .map(|rule| rule.label)
        .unwrap_or("?");
    info!(
        "  {} was downloaded {} time(s), last on {} ({bucket})",
        artifact.uri, artifact.download_count, last
    );
}

/// Delete the primary artifact, then its companion metadata descriptor.
/// Failures are logged and never abort the remaining deletions.
async fn delete_with_companion(
    client: &ArtifactoryClient,
    scheme: &MetadataPathScheme,
    artifact: &ArtifactStats,
) {
    match client.delete_artifact(&artifact.uri).await {
        Ok(()) => info!("  deleted {}", artifact.uri),
        Err(e) => warn!("  {e}"),
    }

    match scheme.companion_uri(&artifact.uri) {
        Some(json_uri) => match client.delete_artifact(&json_uri).await {
            Ok(()) => info!("  deleted {json_uri}"),
            Err(e) => warn!("  {e}"),
        },
        None => warn!("  cannot find json for {}", artifact.uri),
    }
}
