// Reply-tree aggregation.
//
// Walks a fetched thread's nested reply structure and emits aggregated
// (replier, parent) edges into the shared accumulator. The walk is an
// explicit stack-driven depth-first traversal with an enforced maximum
// depth, so a very deep or malformed reply tree cannot grow the call
// stack. Preorder with children pushed in reverse keeps discovery order
// identical to a naive recursive walk.

use crate::bluesky::handles::normalize_handle;
use crate::bluesky::thread::ThreadNode;

use super::accumulator::InteractionMap;

/// Thresholds governing thread ingestion and the reply walk.
#[derive(Debug, Clone)]
pub struct IngestOpts {
    /// Minimum trimmed character count for a reply to record an edge.
    pub min_reply_chars: usize,
    /// Minimum top-level reply count for a thread to be ingested at all.
    pub min_replies: usize,
    /// Maximum reply depth to descend into (1 = direct replies only).
    pub max_depth: usize,
}

impl Default for IngestOpts {
    fn default() -> Self {
        Self {
            min_reply_chars: 5,
            min_replies: 5,
            max_depth: 3,
        }
    }
}

/// What happened when a fetched thread was handed to the aggregator.
///
/// Skip decisions are explicit values rather than silent early returns,
/// so the driver can log them and tests can assert on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadOutcome {
    /// The thread root had no retrievable post payload (deleted/blocked).
    MissingRoot,
    /// The root post exists but has no replies.
    NoReplies,
    /// Fewer top-level replies than the configured minimum.
    TooFewReplies { found: usize },
    /// The reply walk ran over this many top-level replies.
    Aggregated { top_level: usize },
}

/// Feed a fetched thread into the accumulator.
///
/// Pure with respect to the network: the thread has already been fetched,
/// so every skip path here is a data-shape decision, not an error.
pub fn ingest_thread(
    thread: &ThreadNode,
    opts: &IngestOpts,
    acc: &mut InteractionMap,
) -> ThreadOutcome {
    let Some(root) = &thread.post else {
        return ThreadOutcome::MissingRoot;
    };

    if thread.replies.is_empty() {
        return ThreadOutcome::NoReplies;
    }
    if thread.replies.len() < opts.min_replies {
        return ThreadOutcome::TooFewReplies {
            found: thread.replies.len(),
        };
    }

    let root_handle = normalize_handle(&root.author.handle);
    aggregate_replies(&thread.replies, &root_handle, opts, acc);
    ThreadOutcome::Aggregated {
        top_level: thread.replies.len(),
    }
}

/// Walk one level of replies (and everything beneath it) under the given
/// parent handle, recording qualifying edges into the accumulator.
///
/// Per node: deleted/blocked entries are skipped subtree and all;
/// self-replies record no edge but keep the chain going with the same
/// parent handle; texts below the minimum trimmed length record no edge
/// but descendants are still walked under the replier.
pub fn aggregate_replies(
    replies: &[ThreadNode],
    parent_handle: &str,
    opts: &IngestOpts,
    acc: &mut InteractionMap,
) {
    struct Frame<'a> {
        node: &'a ThreadNode,
        parent: String,
        depth: usize,
    }

    let mut stack: Vec<Frame> = Vec::with_capacity(replies.len());
    for node in replies.iter().rev() {
        stack.push(Frame {
            node,
            parent: parent_handle.to_string(),
            depth: 1,
        });
    }

    while let Some(frame) = stack.pop() {
        // Deleted or blocked reply — no payload, nothing to attribute the
        // subtree to, so it is dropped entirely.
        let Some(post) = &frame.node.post else {
            continue;
        };

        let source = normalize_handle(&post.author.handle);

        // Self-replies record no edge; the thread-chain continues below
        // with the same handle as parent. Short texts record no edge
        // either, but their children are still judged against the replier.
        if source != frame.parent {
            let text = post.text();
            if text.trim().chars().count() >= opts.min_reply_chars {
                acc.record(&source, &frame.parent, text);
            }
        }

        if frame.depth < opts.max_depth {
            for child in frame.node.replies.iter().rev() {
                stack.push(Frame {
                    node: child,
                    parent: source.clone(),
                    depth: frame.depth + 1,
                });
            }
        }
    }
}
