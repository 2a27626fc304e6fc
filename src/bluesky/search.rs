// Post search — `app.bsky.feed.searchPosts` with hand-rolled serde types.
//
// Two query shapes are used: a plain keyword search for Phase 1 seeds, and
// a `from:<handle>` search for Phase 2 expansion. Both are ranked by `top`
// and bounded by a result limit; only keyword search carries a language
// filter.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use super::client::AtpClient;

/// Post author, reduced to the one field the collector uses.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorView {
    pub handle: String,
}

/// A post's record payload. Only the text body matters here; everything
/// else (facets, embeds, langs) is ignored on deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostRecord {
    #[serde(default)]
    pub text: String,
}

/// A post as returned by search and thread endpoints, reduced to the
/// fields the collector reads.
#[derive(Debug, Clone, Deserialize)]
pub struct PostView {
    pub uri: String,
    pub author: AuthorView,
    #[serde(default)]
    pub record: Option<PostRecord>,
}

impl PostView {
    /// The post's plain text body, or the empty string when the record or
    /// its text field is absent. Absence is not an error.
    pub fn text(&self) -> &str {
        self.record.as_ref().map(|r| r.text.as_str()).unwrap_or("")
    }
}

/// Response from `app.bsky.feed.searchPosts`.
#[derive(Debug, Deserialize)]
pub struct SearchPostsResponse {
    pub posts: Vec<PostView>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Run a ranked keyword search, bounded by `limit`, filtered to `lang`.
pub async fn search_posts(
    client: &AtpClient,
    query: &str,
    limit: usize,
    lang: &str,
) -> Result<Vec<PostView>> {
    let limit_str = limit.to_string();
    let output: SearchPostsResponse = client
        .xrpc_get(
            "app.bsky.feed.searchPosts",
            &[
                ("q", query),
                ("limit", &limit_str),
                ("sort", "top"),
                ("lang", lang),
            ],
        )
        .await
        .with_context(|| format!("Search for '{query}' failed"))?;

    debug!(query = query, count = output.posts.len(), "Keyword search");
    Ok(output.posts)
}

/// Run a ranked `from:<handle>` search for a user's own recent posts.
pub async fn search_author_posts(
    client: &AtpClient,
    handle: &str,
    limit: usize,
) -> Result<Vec<PostView>> {
    let query = format!("from:{handle}");
    let limit_str = limit.to_string();
    let output: SearchPostsResponse = client
        .xrpc_get(
            "app.bsky.feed.searchPosts",
            &[("q", &query), ("limit", &limit_str), ("sort", "top")],
        )
        .await
        .with_context(|| format!("Author search for @{handle} failed"))?;

    debug!(handle = handle, count = output.posts.len(), "Author search");
    Ok(output.posts)
}
