//! Numeric range filtering.

use crate::{NodeQuery, DEFAULT_PATH};

/// Keeps items where every number found under `path` lies within
/// `[from, to]` after clamping the bounds to `[min, max]`.
///
/// `min` and `max` default to `from` and `to`. A bound that is not finite
/// (NaN or infinite) leaves that side open. Each selected node contributes at
/// most one number, read from its text with everything except ASCII digits,
/// `-` and `.` removed; nodes whose text does not parse are ignored. Items
/// that yield no number at all are dropped.
pub fn range_filter<N: NodeQuery>(
    items: &[N],
    path: &str,
    from: f64,
    to: f64,
    min: Option<f64>,
    max: Option<f64>,
) -> Vec<N> {
    if path == DEFAULT_PATH {
        return items.to_vec();
    }

    let from = clamp_with(from, min.unwrap_or(from), f64::max);
    let to = clamp_with(to, max.unwrap_or(to), f64::min);

    let filtered: Vec<N> = items
        .iter()
        .filter(|item| {
            let numbers: Vec<f64> = item
                .select(path)
                .iter()
                .filter_map(|node| extract_number(&node.text()))
                .collect();
            let Some((lowest, highest)) = bounds(&numbers) else {
                return false;
            };
            (!from.is_finite() || from <= lowest) && (!to.is_finite() || highest <= to)
        })
        .cloned()
        .collect();

    tracing::debug!(
        path,
        from,
        to,
        total = items.len(),
        kept = filtered.len(),
        "range filter applied"
    );
    filtered
}

/// Applies `pick` unless either operand is NaN, in which case the result is
/// NaN (an open bound).
fn clamp_with(value: f64, limit: f64, pick: fn(f64, f64) -> f64) -> f64 {
    if value.is_nan() || limit.is_nan() {
        f64::NAN
    } else {
        pick(value, limit)
    }
}

/// Parses the number embedded in `text`, ignoring every character other than
/// ASCII digits, `-` and `.`. Text with none of those left reads as zero.
pub(crate) fn extract_number(text: &str) -> Option<f64> {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect();
    if kept.is_empty() {
        return Some(0.0);
    }
    kept.parse::<f64>().ok()
}

fn bounds(numbers: &[f64]) -> Option<(f64, f64)> {
    let (first, rest) = numbers.split_first()?;
    Some(
        rest.iter()
            .fold((*first, *first), |(lo, hi), n| (lo.min(*n), hi.max(*n))),
    )
}
