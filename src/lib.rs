// replygraph: snowball-sampled reply-interaction graphs from Bluesky
//
// This is the library root. Each module corresponds to a stage of the
// collection pipeline: talking to the Bluesky APIs, aggregating reply
// edges, and exporting the resulting graph.

pub mod bluesky;
pub mod config;
pub mod graph;
pub mod pipeline;
