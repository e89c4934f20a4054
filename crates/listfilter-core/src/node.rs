//! The capability every filterable item exposes.
//!
//! The filter engine never sees a concrete document representation; it only
//! talks to items through [`NodeQuery`]. Handles are cheap to clone and all
//! clones refer to the same underlying node, so writes through one handle are
//! visible through every other.

/// Query and mutation surface of a single node in a document tree.
pub trait NodeQuery: Clone {
    /// Returns the descendants matching `pattern`, in document order.
    ///
    /// An empty (or all-whitespace) pattern selects the node itself.
    fn select(&self, pattern: &str) -> Vec<Self>;

    /// Returns the first match of [`NodeQuery::select`], if any.
    fn select_first(&self, pattern: &str) -> Option<Self> {
        self.select(pattern).into_iter().next()
    }

    /// Concatenated text content of the node and all of its descendants.
    fn text(&self) -> String;

    /// Reads the named attribute.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Replaces the node's text content.
    fn set_text(&self, text: &str);

    /// Shows or hides the node.
    fn set_visible(&self, visible: bool);

    /// Records the distance (in kilometers) and its display form on the item.
    ///
    /// Implementations that do not track annotations may ignore the call.
    fn set_distance(&self, _distance_km: f64, _formatted: &str) {}

    /// Reference equality: `true` when both handles point at the same node.
    fn same_node(&self, other: &Self) -> bool;
}
