//! `filter` subcommand: one text, path, or range filter over a page.

use std::path::Path;

use clap::Subcommand;
use listfilter_engine::FilterSpec;

use crate::output;

#[derive(Debug, Subcommand)]
pub enum FilterCommands {
    /// Keep items whose text under PATH matches PATTERN
    Text {
        pattern: String,
        /// Selector under each item; empty tests the item itself
        #[arg(long, default_value = "")]
        path: String,
        /// contains, startsWith, endsWith or equal
        #[arg(long, default_value = "contains")]
        mode: String,
        /// Regex of characters to strip before comparing
        #[arg(long, default_value = "")]
        ignore: String,
    },
    /// Keep items that contain (or, inverted, lack) a node matching PATH
    Path {
        path: String,
        #[arg(long)]
        inverted: bool,
    },
    /// Keep items whose numbers under PATH all fall within [FROM, TO]
    Range {
        path: String,
        #[arg(long, allow_negative_numbers = true)]
        from: f64,
        #[arg(long, allow_negative_numbers = true)]
        to: f64,
        /// Lowest value FROM may be clamped to (defaults to FROM)
        #[arg(long, allow_negative_numbers = true)]
        min: Option<f64>,
        /// Highest value TO may be clamped to (defaults to TO)
        #[arg(long, allow_negative_numbers = true)]
        max: Option<f64>,
    },
}

impl FilterCommands {
    pub(crate) fn to_spec(&self) -> FilterSpec {
        match self {
            FilterCommands::Text {
                pattern,
                path,
                mode,
                ignore,
            } => FilterSpec::Text {
                pattern: pattern.clone(),
                path: path.clone(),
                mode: mode.parse().unwrap_or_default(),
                ignore_pattern: ignore.clone(),
            },
            FilterCommands::Path { path, inverted } => FilterSpec::Path {
                path: path.clone(),
                inverted: *inverted,
            },
            FilterCommands::Range {
                path,
                from,
                to,
                min,
                max,
            } => FilterSpec::Range {
                path: path.clone(),
                from: *from,
                to: *to,
                min: *min,
                max: *max,
            },
        }
    }
}

/// Loads the page, applies the filter, and prints the surviving items.
///
/// # Errors
///
/// Returns an error if the page cannot be loaded or the filter is invalid.
pub(crate) fn run_filter(page: &Path, command: &FilterCommands) -> anyhow::Result<()> {
    let page = listfilter_core::load_page(page)?;
    let items = page.build_items();
    let spec = command.to_spec();
    let kept = spec.apply(&items)?;
    tracing::info!(
        kind = spec.kind(),
        total = items.len(),
        kept = kept.len(),
        "filter complete"
    );
    output::print_items(&items, &kept)
}
