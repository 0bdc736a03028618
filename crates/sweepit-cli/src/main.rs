//! Sweepit CLI tool.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sweepit_client::Credentials;

mod sweep;

#[derive(Parser)]
#[command(name = "sweepit")]
#[command(about = "Prunes stale published package versions from an Artifactory npm repository", long_about = None)]
struct Cli {
    /// Artifactory server URL
    #[arg(
        long,
        env = "SWEEPIT_SERVER_URL",
        default_value = "http://repo.labs.intellij.net"
    )]
    server_url: String,

    /// Repository holding the package
    #[arg(long, env = "SWEEPIT_REPO", default_value = "npm-ring")]
    repo: String,

    /// Package whose published versions are swept
    #[arg(long, env = "SWEEPIT_PACKAGE", default_value = "ring-ui")]
    package: String,

    /// Basic-auth username
    #[arg(long, env = "SWEEPIT_LOGIN")]
    login: String,

    /// Basic-auth password
    #[arg(long, env = "SWEEPIT_PASSWORD")]
    password: String,

    /// Report what would be deleted without deleting anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = sweep::SweepConfig {
        server_url: cli.server_url,
        repo: cli.repo,
        package: cli.package,
        credentials: Credentials {
            login: cli.login,
            password: cli.password,
        },
        dry_run: cli.dry_run,
    };

    sweep::run(&config).await
}
