//! Error taxonomy for a document render.
//!
//! Any of these aborts the whole top-level render; there is no partial
//! output and no retry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnhanceError {
    /// A render function failed. Wraps the offending tag name.
    #[error("issue rendering template for <{tag}>: {message}")]
    RenderFailure { tag: String, message: String },

    /// A recognized custom tag has no registered render function (strict
    /// mode only; lenient mode leaves the tag unexpanded).
    #[error("no render function registered for <{tag}>")]
    UnknownElement { tag: String },

    /// A render function handed back a pending result instead of markup
    /// text. Distinct from `RenderFailure` so callers can tell a usage
    /// contract violation from a logic bug.
    #[error("render function for <{tag}> returned a pending result; markup must be produced synchronously")]
    IllegalAsyncRender { tag: String },

    /// Nested expansion exceeded the configured depth limit, which usually
    /// means a component re-introduces itself without terminating.
    #[error("expansion depth limit of {limit} exceeded while expanding <{tag}>")]
    DepthExceeded { tag: String, limit: usize },

    /// The parsed document lost its head or body section.
    #[error("parsed document has no head or body")]
    MalformedDocument,
}
