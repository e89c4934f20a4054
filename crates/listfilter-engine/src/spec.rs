//! Filter kinds as a single tagged value.

use crate::distance::{distance_filter, DistanceSpec};
use crate::error::FilterError;
use crate::path::path_filter;
use crate::range::range_filter;
use crate::text::{text_filter, TextMode};
use crate::NodeQuery;

/// One configured filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    Text {
        pattern: String,
        path: String,
        mode: TextMode,
        ignore_pattern: String,
    },
    Path {
        path: String,
        inverted: bool,
    },
    Range {
        path: String,
        from: f64,
        to: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
    Distance(DistanceSpec),
}

impl FilterSpec {
    /// Short name of the filter kind, used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FilterSpec::Text { .. } => "text",
            FilterSpec::Path { .. } => "path",
            FilterSpec::Range { .. } => "range",
            FilterSpec::Distance(_) => "distance",
        }
    }

    /// Runs this filter over `items`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidIgnorePattern`] for a text filter with a
    /// malformed ignore pattern.
    pub fn apply<N: NodeQuery>(&self, items: &[N]) -> Result<Vec<N>, FilterError> {
        match self {
            FilterSpec::Text {
                pattern,
                path,
                mode,
                ignore_pattern,
            } => text_filter(items, pattern, path, *mode, ignore_pattern),
            FilterSpec::Path { path, inverted } => Ok(path_filter(items, path, *inverted)),
            FilterSpec::Range {
                path,
                from,
                to,
                min,
                max,
            } => Ok(range_filter(items, path, *from, *to, *min, *max)),
            FilterSpec::Distance(spec) => Ok(distance_filter(items, spec)),
        }
    }
}

/// Applies `specs` in order, each to the output of the previous one.
///
/// # Errors
///
/// Stops at the first filter that fails and returns its error.
pub fn apply_all<N: NodeQuery>(items: &[N], specs: &[FilterSpec]) -> Result<Vec<N>, FilterError> {
    let mut current = items.to_vec();
    for spec in specs {
        current = spec.apply(&current)?;
        tracing::trace!(kind = spec.kind(), remaining = current.len(), "filter stage done");
    }
    Ok(current)
}
