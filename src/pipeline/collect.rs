// Two-phase snowball collection driver.
//
// Phase 1 seeds the accumulator from keyword searches: every hit's thread
// is fetched and aggregated. Phase 2 expands the net over the commenters
// discovered so far, fetching each one's own recent posts' threads, capped
// at a fixed number of users. Both phases share one accumulator and run
// strictly sequentially with a fixed pause between API calls — a failed
// call is logged and abandoned, never retried.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::bluesky::client::AtpClient;
use crate::bluesky::handles::qualify_handle;
use crate::bluesky::pacing::Pacer;
use crate::bluesky::{search, thread};
use crate::graph::accumulator::InteractionMap;
use crate::graph::walk::{ingest_thread, IngestOpts};

/// Parameters for one collection run. These mirror the constants at the
/// top of the CLI: seed queries, per-phase result limits, pacing delay,
/// and the ingestion thresholds.
#[derive(Debug, Clone)]
pub struct CollectOpts {
    /// Phase 1 search keywords.
    pub queries: Vec<String>,
    /// Max seed posts per keyword search.
    pub seed_limit: usize,
    /// Max posts fetched per expanded user in Phase 2.
    pub user_posts_limit: usize,
    /// Language filter for keyword search.
    pub lang: String,
    /// Fixed pause between consecutive API calls.
    pub delay: Duration,
    /// Hard cap on the number of users expanded in Phase 2.
    pub max_expansion: usize,
    pub ingest: IngestOpts,
}

/// Run both collection phases and return the populated accumulator.
pub async fn run(client: &AtpClient, opts: &CollectOpts) -> Result<InteractionMap> {
    let mut acc = InteractionMap::new();
    let pacer = Pacer::new(opts.delay);
    let mut processed: HashSet<String> = HashSet::new();

    // ── Phase 1: seeded search ──────────────────────────────────────
    for query in &opts.queries {
        println!(
            "Phase 1: searching for '{}' (depth {})...",
            query, opts.ingest.max_depth
        );

        pacer.wait().await;
        let posts = match search::search_posts(client, query, opts.seed_limit, &opts.lang).await {
            Ok(posts) => posts,
            Err(e) => {
                warn!(query = query.as_str(), error = %e, "Search failed, skipping query");
                continue;
            }
        };

        println!("  Found {} seed posts for '{}'", posts.len(), query);

        let pb = progress_bar(posts.len(), "Threads");
        for post in &posts {
            collect_thread(client, &post.uri, opts, &mut acc).await;
            pacer.wait().await;
            pb.inc(1);
        }
        pb.finish_and_clear();
    }

    let commenters = acc.source_handles();
    println!(
        "\nPhase 1 complete. Unique interactions (edges): {}",
        acc.len()
    );
    println!("Active users discovered: {}", commenters.len());

    // ── Phase 2: snowball expansion ─────────────────────────────────
    let candidates = expansion_candidates(&acc, &processed, opts.max_expansion);
    println!(
        "Phase 2: snowball expansion over {} users...",
        candidates.len()
    );

    let pb = progress_bar(candidates.len(), "Users");
    for handle in &candidates {
        // Marked processed up front: one expansion attempt per handle,
        // whatever the outcome.
        if !processed.insert(handle.clone()) {
            pb.inc(1);
            continue;
        }

        let full_handle = qualify_handle(handle);
        pacer.wait().await;
        match search::search_author_posts(client, &full_handle, opts.user_posts_limit).await {
            Ok(posts) => {
                debug!(handle = full_handle.as_str(), posts = posts.len(), "Expanding user");
                for post in &posts {
                    collect_thread(client, &post.uri, opts, &mut acc).await;
                    pacer.wait().await;
                }
            }
            Err(e) => {
                warn!(handle = full_handle.as_str(), error = %e, "Expansion failed, skipping user");
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        edges = acc.len(),
        expanded = processed.len(),
        "Collection finished"
    );

    Ok(acc)
}

/// Phase 2 candidate list: distinct source handles in discovery order,
/// truncated to the expansion cap, minus anything already processed.
///
/// Discovery order makes the truncation deterministic run-to-run for
/// identical input.
pub fn expansion_candidates(
    acc: &InteractionMap,
    processed: &HashSet<String>,
    cap: usize,
) -> Vec<String> {
    acc.source_handles()
        .into_iter()
        .take(cap)
        .filter(|handle| !processed.contains(handle))
        .collect()
}

/// Fetch one thread and feed it to the aggregator. Failures are logged
/// here and the thread is skipped; nothing propagates to the caller.
async fn collect_thread(client: &AtpClient, uri: &str, opts: &CollectOpts, acc: &mut InteractionMap) {
    match thread::fetch_thread(client, uri, opts.ingest.max_depth).await {
        Ok(t) => {
            let outcome = ingest_thread(&t, &opts.ingest, acc);
            debug!(uri = uri, outcome = ?outcome, "Thread ingested");
        }
        Err(e) => {
            warn!(uri = uri, error = %e, "Thread fetch failed, skipping");
        }
    }
}

fn progress_bar(len: usize, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template(&format!("  {label} [{{bar:30}}] {{pos}}/{{len}} ({{eta}})"))
    {
        pb.set_style(style);
    }
    pb
}
