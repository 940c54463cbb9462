use anyhow::Context as _;
use clap::Parser;
use tracing::{info, warn};

use weread_common::{Fingerprint, Notion, Syncer};

mod credential;
mod weread;

use credential::Credential;
use weread::WeRead;

#[derive(Debug, Parser)]
struct Cli {
    /// WeRead session cookie; must carry the wr_vid and wr_skey fields
    #[arg(long, env = "WEREAD_COOKIE", hide_env_values = true)]
    weread_cookie: String,

    /// Notion integration token
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    notion_token: String,

    /// Notion database the records are written into
    #[arg(long, env = "NOTION_DATABASE_ID")]
    notion_database_id: String,

    /// Dedup strategy; keep the same one across runs of a database
    #[arg(long, value_enum, default_value = "exact-range")]
    fingerprint: Fingerprint,

    /// How many per-book mark fetches may be in flight at once
    #[arg(long, default_value_t = 1)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let credential =
        Credential::parse(&cli.weread_cookie).context("invalid WeRead credential")?;

    let source = WeRead::new(credential);
    let destination = Notion::new(&cli.notion_token, &cli.notion_database_id, cli.fingerprint);

    info!("starting weread to notion sync");

    let stats = Syncer::new(source, destination)
        .with_concurrency(cli.concurrency)
        .run()
        .await;

    if stats.fetch_failures > 0 {
        warn!(
            "{} fetch call(s) failed; their books contributed no records this run",
            stats.fetch_failures
        );
    }

    info!(
        "sync finished: {} records processed across {} books ({} created, {} skipped, {} failed)",
        stats.processed, stats.books, stats.created, stats.skipped, stats.failed
    );

    Ok(())
}
