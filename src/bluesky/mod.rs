// Bluesky API surface — session, search, thread fetching, pacing.
//
// Built as a thin reqwest wrapper over XRPC with hand-rolled serde types
// for the handful of endpoints the collector touches.

pub mod client;
pub mod handles;
pub mod pacing;
pub mod search;
pub mod thread;
