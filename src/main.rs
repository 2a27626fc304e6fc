use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::info;

use replygraph::bluesky::client::AtpClient;
use replygraph::config::Config;
use replygraph::graph::gexf;
use replygraph::graph::walk::IngestOpts;
use replygraph::pipeline::collect::{self, CollectOpts};

/// replygraph: snowball-sampled reply-interaction graphs from Bluesky.
///
/// Seeds a collection run from keyword searches, walks every hit's reply
/// tree, snowball-expands over discovered commenters, and writes the
/// aggregated directed interaction graph to a GEXF file.
#[derive(Parser)]
#[command(name = "replygraph", version, about)]
struct Cli {
    /// Search keywords seeding Phase 1
    #[arg(default_values_t = ["venezuela".to_string(), "tennis".to_string()])]
    queries: Vec<String>,

    /// Max seed posts per keyword search
    #[arg(long, default_value = "3")]
    seed_limit: usize,

    /// Max posts fetched per expanded user in Phase 2
    #[arg(long, default_value = "3")]
    user_posts_limit: usize,

    /// Pause between consecutive API calls, in milliseconds
    #[arg(long, default_value = "1500")]
    delay_ms: u64,

    /// Minimum trimmed reply length (characters) to record an edge
    #[arg(long, default_value = "5")]
    min_reply_chars: usize,

    /// Minimum top-level reply count for a thread to be ingested
    #[arg(long, default_value = "5")]
    min_replies: usize,

    /// Reply-tree traversal depth (1 = direct replies only)
    #[arg(long, default_value = "3")]
    depth: usize,

    /// Hard cap on users expanded in Phase 2
    #[arg(long, default_value = "100")]
    max_expansion: usize,

    /// Language filter for keyword search
    #[arg(long, default_value = "en")]
    lang: String,

    /// Output GEXF file (overwritten each run)
    #[arg(long, default_value = "dataset_snowball_aggregated.gexf")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("replygraph=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::load()?;
    config.require_handle()?;
    // Credential problems abort here, before any network call.
    let password = config.read_password()?;

    let mut client = AtpClient::new(&config.service_url)?;
    let session = client.login(&config.bluesky_handle, &password).await?;
    println!("{} Logged in as {}", "✓".green(), session.handle.bold());
    info!(did = session.did, "Session established");

    let opts = CollectOpts {
        queries: cli.queries,
        seed_limit: cli.seed_limit,
        user_posts_limit: cli.user_posts_limit,
        lang: cli.lang,
        delay: Duration::from_millis(cli.delay_ms),
        max_expansion: cli.max_expansion,
        ingest: IngestOpts {
            min_reply_chars: cli.min_reply_chars,
            min_replies: cli.min_replies,
            max_depth: cli.depth,
        },
    };

    let acc = collect::run(&client, &opts).await?;

    println!("\n{}", "Collection complete.".bold());

    let graph = gexf::build_graph(&acc);
    println!("  Edges (unique interaction pairs): {}", graph.edge_count());
    println!("  Nodes: {}", graph.node_count());

    gexf::write_gexf(&graph, &cli.output)?;
    println!("{} Saved {}", "✓".green(), cli.output.display().to_string().bold());

    Ok(())
}
