// Handle normalization.
//
// Graph nodes are keyed by short handles — "alice" rather than
// "alice.bsky.social" — so the default platform suffix is stripped on the
// way in and restored when a fully-qualified handle is needed for an API
// call. Custom-domain handles pass through both directions unchanged.

/// Suffix of handles hosted on the default platform domain.
const PLATFORM_SUFFIX: &str = ".bsky.social";

/// Strip the platform suffix from a handle, yielding the short node id.
pub fn normalize_handle(handle: &str) -> String {
    handle
        .strip_suffix(PLATFORM_SUFFIX)
        .unwrap_or(handle)
        .to_string()
}

/// Re-qualify a short handle for use in an API query.
///
/// A handle containing a dot is assumed to already be fully qualified
/// (custom domains keep their dots through normalization).
pub fn qualify_handle(handle: &str) -> String {
    if handle.contains('.') {
        handle.to_string()
    } else {
        format!("{handle}{PLATFORM_SUFFIX}")
    }
}
