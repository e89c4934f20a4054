//! `distance` subcommand: resolve one address through every address group on
//! a page and rank the items by distance.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use listfilter_controls::{
    AddressDistanceFilterControlsGroup, AddressGroupSettings, DistanceFilterControl, GroupHost,
};
use listfilter_core::{AppConfig, MemNode, RawControl};
use listfilter_engine::{apply_all, FilterSpec};
use listfilter_geocode::GeocodeClient;

use crate::geocode::resolve_api_key;
use crate::output;

/// Serves the page's items to every group and logs refresh requests.
struct PageHost {
    items: Vec<MemNode>,
    refreshed: Mutex<Vec<String>>,
}

impl GroupHost<MemNode> for PageHost {
    fn refresh(&self, group: &str, control: &DistanceFilterControl) {
        tracing::debug!(group, address = %control.user_address, "group refreshed");
        self.refreshed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(group.to_string());
    }

    fn items(&self, _group: &str) -> Vec<MemNode> {
        self.items.clone()
    }
}

/// Distinct `(group, name)` pairs in page order.
pub(crate) fn group_identities(controls: &[RawControl]) -> Vec<(String, String)> {
    let mut identities: Vec<(String, String)> = Vec::new();
    for control in controls {
        let identity = (control.group.clone(), control.name.clone());
        if !identities.contains(&identity) {
            identities.push(identity);
        }
    }
    identities
}

/// Geocodes `address` for each address group on the page, then prints the
/// items that pass every resolved group's distance filter, nearest first.
///
/// A group whose lookup fails contributes no filter.
///
/// # Errors
///
/// Returns an error if the page cannot be loaded, no API key is available
/// for a group, or a geocode client cannot be built.
pub(crate) async fn run_distance(
    config: &AppConfig,
    page: &Path,
    address: &str,
    api_key: Option<&str>,
) -> anyhow::Result<()> {
    let page = listfilter_core::load_page(page)?;
    let host = Arc::new(PageHost {
        items: page.build_items(),
        refreshed: Mutex::new(Vec::new()),
    });
    let override_key = api_key.map(str::trim).filter(|key| !key.is_empty());

    let mut specs: Vec<FilterSpec> = Vec::new();
    for (group_id, name) in group_identities(&page.controls) {
        let client = GeocodeClient::from_config(config)
            .map_err(|e| anyhow::anyhow!("failed to build geocode client: {e}"))?;
        let settings = AddressGroupSettings {
            api_key: resolve_api_key(config, api_key),
            ..AddressGroupSettings::from_config(config)
        };
        let group = AddressDistanceFilterControlsGroup::new(
            &group_id,
            &name,
            client,
            Arc::clone(&host) as Arc<dyn GroupHost<MemNode>>,
            settings,
        );

        let mut first = None;
        for raw in &page.controls {
            let raw = match override_key {
                Some(key) => RawControl {
                    api_key: Some(key.to_string()),
                    ..raw.clone()
                },
                None => raw.clone(),
            };
            if let Some(id) = group.add_control(&raw, None) {
                first.get_or_insert(id);
            }
        }
        let Some(first) = first else {
            continue;
        };
        if group.geocode_api_key().is_empty() {
            anyhow::bail!(
                "no geocoding API key for group '{group_id}'; \
                 set LISTFILTER_GEOCODE_API_KEY or pass --api-key"
            );
        }

        if !group.geocode_address(address, first).await {
            tracing::warn!(
                group = %group_id,
                name = %name,
                "address not resolved; group skipped"
            );
        }
        specs.extend(group.filter_specs());
    }

    let kept = apply_all(&host.items, &specs)?;
    tracing::info!(
        filters = specs.len(),
        refreshes = host
            .refreshed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len(),
        kept = kept.len(),
        "distance ranking complete"
    );
    output::print_items(&host.items, &kept)
}
