//! Text matching against item content.

use std::str::FromStr;

use regex::{Regex, RegexBuilder};

use crate::error::FilterError;
use crate::{NodeQuery, DEFAULT_PATH};

/// How a normalized candidate text is compared with the normalized pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextMode {
    #[default]
    Contains,
    StartsWith,
    EndsWith,
    Equal,
}

impl TextMode {
    fn matches(self, candidate: &str, pattern: &str) -> bool {
        match self {
            TextMode::Contains => candidate.contains(pattern),
            TextMode::StartsWith => candidate.starts_with(pattern),
            TextMode::EndsWith => candidate.ends_with(pattern),
            TextMode::Equal => candidate == pattern,
        }
    }
}

impl FromStr for TextMode {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to [`TextMode::Contains`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "startsWith" | "starts_with" => TextMode::StartsWith,
            "endsWith" | "ends_with" => TextMode::EndsWith,
            "equal" => TextMode::Equal,
            _ => TextMode::Contains,
        })
    }
}

impl std::fmt::Display for TextMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextMode::Contains => write!(f, "contains"),
            TextMode::StartsWith => write!(f, "startsWith"),
            TextMode::EndsWith => write!(f, "endsWith"),
            TextMode::Equal => write!(f, "equal"),
        }
    }
}

/// Strips ignored characters, lower-cases, and trims.
struct Normalizer {
    ignore: Option<Regex>,
}

impl Normalizer {
    fn new(ignore_pattern: &str) -> Result<Self, FilterError> {
        if ignore_pattern.is_empty() {
            return Ok(Self { ignore: None });
        }
        let regex = RegexBuilder::new(ignore_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| FilterError::InvalidIgnorePattern {
                pattern: ignore_pattern.to_string(),
                source,
            })?;
        Ok(Self {
            ignore: Some(regex),
        })
    }

    fn normalize(&self, text: &str) -> String {
        let stripped = match &self.ignore {
            Some(regex) => regex.replace_all(text, ""),
            None => text.into(),
        };
        stripped.to_lowercase().trim().to_string()
    }
}

/// Keeps items where any node selected by `path` matches `pattern`.
///
/// Both the pattern and every candidate text are normalized the same way:
/// matches of `ignore_pattern` (case-insensitive) are removed, then the text
/// is lower-cased and trimmed. An empty `path` tests the item itself. Items
/// whose `path` selects nothing are dropped.
///
/// # Errors
///
/// Returns [`FilterError::InvalidIgnorePattern`] if `ignore_pattern` is not a
/// valid regular expression. The [`DEFAULT_PATH`] short-circuit happens first.
pub fn text_filter<N: NodeQuery>(
    items: &[N],
    pattern: &str,
    path: &str,
    mode: TextMode,
    ignore_pattern: &str,
) -> Result<Vec<N>, FilterError> {
    if path == DEFAULT_PATH {
        return Ok(items.to_vec());
    }

    let normalizer = Normalizer::new(ignore_pattern)?;
    let wanted = normalizer.normalize(pattern);

    let filtered: Vec<N> = items
        .iter()
        .filter(|item| {
            item.select(path)
                .iter()
                .any(|node| mode.matches(&normalizer.normalize(&node.text()), &wanted))
        })
        .cloned()
        .collect();

    tracing::debug!(
        path,
        %mode,
        total = items.len(),
        kept = filtered.len(),
        "text filter applied"
    );
    Ok(filtered)
}
