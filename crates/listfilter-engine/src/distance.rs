//! Proximity filtering and ordering.

use crate::geo::{calculate_distance, format_distance};
use crate::NodeQuery;

/// Parameters of one distance evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceSpec {
    /// Selector for the node carrying the latitude attribute; empty means the
    /// item itself.
    pub lat_path: String,
    pub lng_path: String,
    pub lat_attr: String,
    pub lng_attr: String,
    /// Items farther than this many kilometers are dropped.
    pub max_distance: Option<f64>,
    pub user_lat: Option<f64>,
    pub user_lng: Option<f64>,
    /// Selector for nodes that receive the formatted distance. Empty means
    /// nothing is written.
    pub display_path: String,
}

/// Keeps items within `max_distance` of the user's position and orders them
/// nearest first.
///
/// Without both user coordinates the input is returned unchanged. Each item's
/// coordinates come from the first node matched by the lat/lng paths; items
/// without a match or with an attribute that is not a finite number are
/// dropped. Survivors get their distance recorded via
/// [`NodeQuery::set_distance`], and every node under `display_path` gets the
/// formatted distance as text and is made visible. The sort is stable.
pub fn distance_filter<N: NodeQuery>(items: &[N], spec: &DistanceSpec) -> Vec<N> {
    let (Some(user_lat), Some(user_lng)) = (spec.user_lat, spec.user_lng) else {
        return items.to_vec();
    };

    let mut measured: Vec<(N, f64)> = Vec::with_capacity(items.len());

    for item in items {
        let Some(lat) = read_coordinate(item, &spec.lat_path, &spec.lat_attr) else {
            continue;
        };
        let Some(lng) = read_coordinate(item, &spec.lng_path, &spec.lng_attr) else {
            continue;
        };

        let distance = calculate_distance(user_lat, user_lng, lat, lng);
        if spec.max_distance.is_some_and(|max| distance > max) {
            continue;
        }

        let formatted = format_distance(distance);
        item.set_distance(distance, &formatted);

        if !spec.display_path.is_empty() {
            for display in item.select(&spec.display_path) {
                display.set_text(&formatted);
                display.set_visible(true);
            }
        }

        measured.push((item.clone(), distance));
    }

    measured.sort_by(|a, b| a.1.total_cmp(&b.1));

    tracing::debug!(
        user_lat,
        user_lng,
        max_distance = ?spec.max_distance,
        total = items.len(),
        kept = measured.len(),
        "distance filter applied"
    );
    measured.into_iter().map(|(item, _)| item).collect()
}

/// First match wins when several nodes match `path`.
fn read_coordinate<N: NodeQuery>(item: &N, path: &str, attr: &str) -> Option<f64> {
    let node = item.select_first(path)?;
    let value = node.attribute(attr)?.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}
