// Thread fetching — `app.bsky.feed.getPostThread` with a lenient reply
// tree representation.
//
// The endpoint returns a union per node (threadViewPost / notFoundPost /
// blockedPost). Rather than model the union, nodes deserialize leniently:
// a deleted or blocked entry simply has no `post` payload and an empty
// reply list, which is exactly how the aggregator wants to see it.

use anyhow::{Context, Result};
use serde::Deserialize;

use super::client::AtpClient;
use super::search::PostView;

/// One node of a fetched reply tree.
///
/// `post` is absent for deleted or blocked entries; `replies` is absent on
/// leaves and on nodes the server truncated at the requested depth.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadNode {
    #[serde(default)]
    pub post: Option<PostView>,
    #[serde(default)]
    pub replies: Vec<ThreadNode>,
}

/// Response from `app.bsky.feed.getPostThread`.
#[derive(Debug, Deserialize)]
pub struct ThreadResponse {
    pub thread: ThreadNode,
}

/// Fetch the reply tree for a post, bounded to `depth` levels.
///
/// Failures are returned to the caller — the driver logs them and skips
/// the thread rather than retrying.
pub async fn fetch_thread(client: &AtpClient, uri: &str, depth: usize) -> Result<ThreadNode> {
    let depth_str = depth.to_string();
    let output: ThreadResponse = client
        .xrpc_get(
            "app.bsky.feed.getPostThread",
            &[("uri", uri), ("depth", &depth_str)],
        )
        .await
        .with_context(|| format!("Failed to fetch thread for {uri}"))?;

    Ok(output.thread)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_nested_thread() {
        let json = r#"{
            "thread": {
                "$type": "app.bsky.feed.defs#threadViewPost",
                "post": {
                    "uri": "at://did:plc:root/app.bsky.feed.post/1",
                    "author": {"handle": "root.bsky.social"},
                    "record": {"text": "seed post"}
                },
                "replies": [
                    {
                        "$type": "app.bsky.feed.defs#threadViewPost",
                        "post": {
                            "uri": "at://did:plc:alice/app.bsky.feed.post/2",
                            "author": {"handle": "alice.bsky.social"},
                            "record": {"text": "a reply"}
                        },
                        "replies": []
                    }
                ]
            }
        }"#;
        let resp: ThreadResponse = serde_json::from_str(json).unwrap();
        let root = resp.thread.post.unwrap();
        assert_eq!(root.author.handle, "root.bsky.social");
        assert_eq!(resp.thread.replies.len(), 1);
        assert_eq!(resp.thread.replies[0].post.as_ref().unwrap().text(), "a reply");
    }

    #[test]
    fn deleted_node_deserializes_without_post() {
        let json = r#"{
            "$type": "app.bsky.feed.defs#notFoundPost",
            "uri": "at://did:plc:gone/app.bsky.feed.post/9",
            "notFound": true
        }"#;
        let node: ThreadNode = serde_json::from_str(json).unwrap();
        assert!(node.post.is_none());
        assert!(node.replies.is_empty());
    }

    #[test]
    fn leaf_node_has_empty_replies() {
        let json = r#"{
            "post": {
                "uri": "at://did:plc:bob/app.bsky.feed.post/3",
                "author": {"handle": "bob.bsky.social"},
                "record": {"text": "leaf"}
            }
        }"#;
        let node: ThreadNode = serde_json::from_str(json).unwrap();
        assert!(node.post.is_some());
        assert!(node.replies.is_empty());
    }
}
