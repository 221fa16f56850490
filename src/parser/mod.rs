//! Parser module — single-pass extraction of documentable C entities.

pub mod c;

use crate::model::SourceDocument;

/// Capacity bounds for a single parse. Text over a bound is truncated
/// silently; nodes over the bound are dropped with a one-time warning flag
/// on the document.
#[derive(Debug, Clone)]
pub struct Limits {
    pub max_nodes: usize,
    pub max_name: usize,
    pub max_text: usize,
}

pub const DEFAULT_MAX_NODES: usize = 2048;

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_nodes: DEFAULT_MAX_NODES,
            max_name: 256,
            max_text: 8192,
        }
    }
}

/// Parse one source file's content into a SourceDocument.
///
/// Never fails: malformed input degrades to fewer or partial nodes.
pub fn parse_source(content: &str, filepath: &str, limits: &Limits) -> SourceDocument {
    c::parse(content, filepath, limits)
}
