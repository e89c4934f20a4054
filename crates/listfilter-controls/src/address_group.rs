//! Address-driven distance filtering.
//!
//! An [`AddressDistanceFilterControlsGroup`] owns a set of distance-filter
//! controls that share one typed address. Input changes are debounced, the
//! settled address is geocoded once, and the resulting position is written to
//! every control in the group before the host is asked to re-run filtering.
//!
//! Geocode responses are not fenced: a slow response from an older cycle that
//! completes after a newer one still overwrites the group's coordinates.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use listfilter_core::{AppConfig, NodeQuery, RawControl};
use listfilter_engine::FilterSpec;
use listfilter_geocode::Geocoder;

use crate::control::{DistanceFilterControl, DistanceFilterOptions};
use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE_DELAY};
use crate::deep_link::{self, DeepLinkParams};
use crate::group::DistanceFilterControlsGroup;
use crate::host::GroupHost;

/// Where the group is in its input → geocode cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddressPhase {
    /// No timer armed and no request outstanding.
    #[default]
    Idle,
    Debouncing,
    Geocoding,
    /// The last completed request succeeded.
    Resolved,
}

/// Handle to a control added with
/// [`AddressDistanceFilterControlsGroup::add_control`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(usize);

/// Construction-time settings for an address group.
#[derive(Debug, Clone)]
pub struct AddressGroupSettings {
    pub debounce_delay: Duration,
    /// Used when a control carries no API key of its own.
    pub api_key: Option<String>,
    pub deep_link_params: DeepLinkParams,
}

impl Default for AddressGroupSettings {
    fn default() -> Self {
        Self {
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            api_key: None,
            deep_link_params: DeepLinkParams::new(),
        }
    }
}

impl AddressGroupSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            debounce_delay: Duration::from_millis(config.debounce_delay_ms),
            api_key: config.geocode_api_key.clone(),
            deep_link_params: DeepLinkParams::new(),
        }
    }
}

struct State<N> {
    controls: DistanceFilterControlsGroup,
    loading_indicators: Vec<Option<N>>,
    api_key: String,
    phase: AddressPhase,
    /// Bumped on every input event.
    cycle: u64,
}

struct Shared<N, G> {
    group: String,
    name: String,
    geocoder: G,
    host: Arc<dyn GroupHost<N>>,
    fallback_api_key: Option<String>,
    deep_link_params: DeepLinkParams,
    debouncer: Debouncer,
    state: Mutex<State<N>>,
}

/// A distance-filter group whose user position comes from a typed address.
///
/// Cloning yields another handle to the same group.
pub struct AddressDistanceFilterControlsGroup<N, G> {
    shared: Arc<Shared<N, G>>,
}

impl<N, G> Clone for AddressDistanceFilterControlsGroup<N, G> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<N, G> AddressDistanceFilterControlsGroup<N, G>
where
    N: NodeQuery + Send + Sync + 'static,
    G: Geocoder,
{
    #[must_use]
    pub fn new(
        group: &str,
        name: &str,
        geocoder: G,
        host: Arc<dyn GroupHost<N>>,
        settings: AddressGroupSettings,
    ) -> Self {
        let fallback_api_key = settings
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        Self {
            shared: Arc::new(Shared {
                group: group.to_string(),
                name: name.to_string(),
                geocoder,
                host,
                deep_link_params: settings.deep_link_params,
                debouncer: Debouncer::new(settings.debounce_delay),
                state: Mutex::new(State {
                    controls: DistanceFilterControlsGroup::new(group, name),
                    loading_indicators: Vec::new(),
                    api_key: fallback_api_key.clone().unwrap_or_default(),
                    phase: AddressPhase::Idle,
                    cycle: 0,
                }),
                fallback_api_key,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State<N>> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn group(&self) -> &str {
        &self.shared.group
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Adds a control whose identity matches the group.
    ///
    /// The control's API key replaces the group's key; a control without one
    /// resets it to the configured fallback. `loading_indicator` is shown
    /// while a request triggered by this control is in flight.
    pub fn add_control(
        &self,
        raw: &RawControl,
        loading_indicator: Option<N>,
    ) -> Option<ControlId> {
        let mut state = self.state();
        state.controls.add_control(raw)?;
        state.api_key = raw
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .or_else(|| self.shared.fallback_api_key.clone())
            .unwrap_or_default();
        state.loading_indicators.push(loading_indicator);
        Some(ControlId(state.controls.controls().len() - 1))
    }

    /// Handles a change of the address input attached to `id`.
    ///
    /// Non-empty text (re)arms the debounce timer; when it fires the text is
    /// geocoded. Empty text cancels the timer and clears the whole group.
    ///
    /// # Panics
    ///
    /// Panics if non-empty text arrives outside a tokio runtime, since arming
    /// the timer spawns a task.
    pub fn on_address_input(&self, id: ControlId, value: &str) {
        let cycle = {
            let mut state = self.state();
            if state.controls.controls().get(id.0).is_none() {
                tracing::debug!(group = %self.shared.group, control = id.0, "unknown control");
                return;
            }
            state.cycle += 1;
            if !value.trim().is_empty() {
                state.phase = AddressPhase::Debouncing;
            }
            state.cycle
        };

        if value.trim().is_empty() {
            self.clear(id);
            return;
        }

        let this = self.clone();
        let address = value.to_string();
        self.shared.debouncer.schedule(async move {
            this.run_debounced(&address, id, cycle).await;
        });
    }

    async fn run_debounced(&self, address: &str, id: ControlId, cycle: u64) {
        if self.geocode_address(address, id).await {
            return;
        }
        let mut state = self.state();
        if state.cycle == cycle && state.phase == AddressPhase::Debouncing {
            state.phase = AddressPhase::Idle;
        }
    }

    fn clear(&self, id: ControlId) {
        self.shared.debouncer.cancel();
        let trigger = {
            let mut state = self.state();
            for control in state.controls.controls_mut() {
                control.clear_position();
            }
            state.phase = AddressPhase::Idle;
            state.controls.controls().get(id.0).cloned()
        };
        self.hide_distance_display_elements();
        if let Some(trigger) = trigger {
            self.shared.host.refresh(&self.shared.group, &trigger);
        }
    }

    /// Empties and hides every node matched by any control's display path
    /// across the group's current items.
    pub fn hide_distance_display_elements(&self) {
        let paths: BTreeSet<String> = self
            .state()
            .controls
            .controls()
            .iter()
            .map(|control| control.distance_display_path.clone())
            .filter(|path| !path.is_empty())
            .collect();
        if paths.is_empty() {
            return;
        }
        for item in self.shared.host.items(&self.shared.group) {
            for path in &paths {
                for node in item.select(path) {
                    node.set_text("");
                    node.set_visible(false);
                }
            }
        }
    }

    /// Geocodes `address` and, on success, writes the position to every
    /// control in the group and asks the host to refresh.
    ///
    /// Returns `true` when coordinates were updated. An empty address, an
    /// empty API key, or an unknown `id` issue no request. Failures are
    /// logged and leave coordinates untouched.
    pub async fn geocode_address(&self, address: &str, id: ControlId) -> bool {
        let address = address.trim();
        if address.is_empty() {
            return false;
        }

        let (api_key, indicator) = {
            let mut state = self.state();
            if state.controls.controls().get(id.0).is_none() {
                return false;
            }
            if state.api_key.is_empty() {
                tracing::debug!(
                    group = %self.shared.group,
                    "no geocoding API key; skipping lookup"
                );
                return false;
            }
            state.phase = AddressPhase::Geocoding;
            let indicator = state.loading_indicators.get(id.0).cloned().flatten();
            (state.api_key.clone(), indicator)
        };

        if let Some(indicator) = &indicator {
            indicator.set_visible(true);
        }
        let result = self.shared.geocoder.geocode(address, &api_key).await;
        if let Some(indicator) = &indicator {
            indicator.set_visible(false);
        }

        match result {
            Ok(coordinates) => {
                let trigger = {
                    let mut state = self.state();
                    for control in state.controls.controls_mut() {
                        control.set_position(coordinates, address);
                    }
                    if state.phase == AddressPhase::Geocoding {
                        state.phase = AddressPhase::Resolved;
                    }
                    state.controls.controls().get(id.0).cloned()
                };
                tracing::info!(
                    group = %self.shared.group,
                    name = %self.shared.name,
                    address,
                    lat = coordinates.lat,
                    lng = coordinates.lng,
                    "address resolved"
                );
                if let Some(trigger) = trigger {
                    self.shared.host.refresh(&self.shared.group, &trigger);
                }
                true
            }
            Err(e) => {
                tracing::warn!(
                    group = %self.shared.group,
                    address,
                    error = %e,
                    "geocoding failed; keeping previous position"
                );
                let mut state = self.state();
                if state.phase == AddressPhase::Geocoding {
                    state.phase = AddressPhase::Idle;
                }
                false
            }
        }
    }

    /// Geocodes the deep-link value stored under the control's id, if any.
    pub async fn restore_from_deep_link(&self, id: ControlId) -> bool {
        let Some(control_id) = self
            .state()
            .controls
            .controls()
            .get(id.0)
            .and_then(|control| control.id.clone())
        else {
            return false;
        };
        let Some(address) =
            deep_link::lookup(&self.shared.deep_link_params, &self.shared.group, &control_id)
        else {
            return false;
        };
        tracing::debug!(
            group = %self.shared.group,
            control = %control_id,
            "restoring address from deep link"
        );
        self.geocode_address(&address, id).await
    }

    /// Option sets of resolved controls that also have complete coordinate
    /// paths and attribute names.
    #[must_use]
    pub fn get_distance_filter_options(&self) -> Vec<DistanceFilterOptions> {
        self.state()
            .controls
            .get_distance_filter_options()
            .into_iter()
            .filter(|options| {
                !options.lat_path.is_empty()
                    && !options.lng_path.is_empty()
                    && !options.lat_attr.is_empty()
                    && !options.lng_attr.is_empty()
            })
            .collect()
    }

    #[must_use]
    pub fn filter_specs(&self) -> Vec<FilterSpec> {
        self.get_distance_filter_options()
            .iter()
            .map(DistanceFilterOptions::to_filter_spec)
            .collect()
    }

    #[must_use]
    pub fn phase(&self) -> AddressPhase {
        self.state().phase
    }

    /// `true` while a debounce timer is armed.
    #[must_use]
    pub fn is_debouncing(&self) -> bool {
        self.shared.debouncer.is_pending()
    }

    /// Snapshot of the group's controls.
    #[must_use]
    pub fn controls(&self) -> Vec<DistanceFilterControl> {
        self.state().controls.controls().to_vec()
    }

    #[must_use]
    pub fn control(&self, id: ControlId) -> Option<DistanceFilterControl> {
        self.state().controls.controls().get(id.0).cloned()
    }

    #[must_use]
    pub fn geocode_api_key(&self) -> String {
        self.state().api_key.clone()
    }

    #[must_use]
    pub fn is_equal_to(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.shared, &other.shared) {
            return true;
        }
        let mine = self.state().controls.clone();
        let theirs = other.state().controls.clone();
        mine.is_equal_to(&theirs)
    }
}
