//! Structural presence filtering.

use crate::{NodeQuery, DEFAULT_PATH};

/// Keeps items that contain a node matching `path`, or with `inverted` set,
/// items that contain no such node.
///
/// An empty path or [`DEFAULT_PATH`] returns the input unchanged.
pub fn path_filter<N: NodeQuery>(items: &[N], path: &str, inverted: bool) -> Vec<N> {
    if path.is_empty() || path == DEFAULT_PATH {
        return items.to_vec();
    }

    let filtered: Vec<N> = items
        .iter()
        .filter(|item| item.select_first(path).is_some() != inverted)
        .cloned()
        .collect();

    tracing::debug!(
        path,
        inverted,
        total = items.len(),
        kept = filtered.len(),
        "path filter applied"
    );
    filtered
}
