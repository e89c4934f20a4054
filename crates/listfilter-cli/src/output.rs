use listfilter_core::{MemNode, NodeQuery};
use serde::Serialize;

/// One surviving item as printed on stdout.
#[derive(Debug, Serialize)]
pub(crate) struct ItemSummary {
    /// Position in the page's `items` list.
    pub index: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
}

pub(crate) fn summarize(all: &[MemNode], kept: &[MemNode]) -> Vec<ItemSummary> {
    kept.iter()
        .map(|item| ItemSummary {
            index: all
                .iter()
                .position(|candidate| candidate.same_node(item))
                .unwrap_or_default(),
            text: item.text().trim().to_string(),
            distance_km: item.distance(),
            distance: item.formatted_distance(),
        })
        .collect()
}

pub(crate) fn print_items(all: &[MemNode], kept: &[MemNode]) -> anyhow::Result<()> {
    let summaries = summarize(all, kept);
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}
