use thiserror::Error;

/// Errors returned by the filter engine.
///
/// Per-item problems (unparsable numbers, missing coordinates) are never
/// errors; they only exclude the affected value or item.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The text filter's ignore pattern is not a valid regular expression.
    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
