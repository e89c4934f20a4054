//! Address group behaviour: debouncing, broadcast, clearing, deep links.
//!
//! All tests run on a paused clock so debounce windows and slow geocodes are
//! deterministic.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use listfilter_controls::{
    AddressDistanceFilterControlsGroup, AddressGroupSettings, AddressPhase, ControlId,
    DeepLinkParam, DeepLinkParams, DistanceFilterControl, GroupHost,
};
use listfilter_core::{MemNode, NodeQuery, RawControl};
use listfilter_engine::apply_all;
use listfilter_geocode::{Coordinates, GeocodeError, Geocoder};

const DC: Coordinates = Coordinates {
    lat: 38.9072,
    lng: -77.0369,
};
const BOSTON: Coordinates = Coordinates {
    lat: 42.3601,
    lng: -71.0589,
};

#[derive(Clone, Copy)]
struct Answer {
    coordinates: Coordinates,
    delay: Duration,
}

/// Answers known addresses after a per-address delay; anything else fails.
#[derive(Clone, Default)]
struct FakeGeocoder {
    answers: Arc<Mutex<HashMap<String, Answer>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeGeocoder {
    fn answer(self, address: &str, coordinates: Coordinates, delay_ms: u64) -> Self {
        self.answers.lock().unwrap().insert(
            address.to_string(),
            Answer {
                coordinates,
                delay: Duration::from_millis(delay_ms),
            },
        );
        self
    }

    fn addresses(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(address, _)| address.clone())
            .collect()
    }

    fn keys(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, key)| key.clone())
            .collect()
    }
}

impl Geocoder for FakeGeocoder {
    async fn geocode(&self, address: &str, api_key: &str) -> Result<Coordinates, GeocodeError> {
        self.calls
            .lock()
            .unwrap()
            .push((address.to_string(), api_key.to_string()));
        let answer = self.answers.lock().unwrap().get(address).copied();
        let Some(answer) = answer else {
            return Err(GeocodeError::ApiStatus {
                status: "ZERO_RESULTS".to_string(),
                message: "no error message".to_string(),
            });
        };
        if !answer.delay.is_zero() {
            tokio::time::sleep(answer.delay).await;
        }
        Ok(answer.coordinates)
    }
}

#[derive(Debug, Clone)]
struct Refresh {
    group: String,
    control_id: Option<String>,
    user_lat: Option<f64>,
}

struct RecordingHost {
    items: Vec<MemNode>,
    refreshes: Mutex<Vec<Refresh>>,
}

impl RecordingHost {
    fn new(items: Vec<MemNode>) -> Arc<Self> {
        Arc::new(Self {
            items,
            refreshes: Mutex::new(Vec::new()),
        })
    }

    fn refreshes(&self) -> Vec<Refresh> {
        self.refreshes.lock().unwrap().clone()
    }
}

impl GroupHost<MemNode> for RecordingHost {
    fn refresh(&self, group: &str, control: &DistanceFilterControl) {
        self.refreshes.lock().unwrap().push(Refresh {
            group: group.to_string(),
            control_id: control.id.clone(),
            user_lat: control.user_lat,
        });
    }

    fn items(&self, _group: &str) -> Vec<MemNode> {
        self.items.clone()
    }
}

type Group = AddressDistanceFilterControlsGroup<MemNode, FakeGeocoder>;

fn located(lat: &str, lng: &str) -> MemNode {
    MemNode::new("div")
        .with_child(MemNode::new("span").with_class("lat").with_attr("data-lat", lat))
        .with_child(MemNode::new("span").with_class("lng").with_attr("data-lng", lng))
        .with_child(MemNode::new("div").with_class("distance"))
}

fn raw(id: &str) -> RawControl {
    RawControl {
        id: Some(id.to_string()),
        lat_path: ".lat".to_string(),
        lng_path: ".lng".to_string(),
        distance_display_path: ".distance".to_string(),
        api_key: Some("test-key".to_string()),
        ..RawControl::new("group1", "distance1")
    }
}

fn group_with(
    geocoder: &FakeGeocoder,
    host: &Arc<RecordingHost>,
    settings: AddressGroupSettings,
) -> Group {
    AddressDistanceFilterControlsGroup::new(
        "group1",
        "distance1",
        geocoder.clone(),
        Arc::clone(host) as Arc<dyn GroupHost<MemNode>>,
        settings,
    )
}

fn setup(geocoder: &FakeGeocoder, items: Vec<MemNode>) -> (Group, Arc<RecordingHost>, ControlId) {
    let host = RecordingHost::new(items);
    let group = group_with(geocoder, &host, AddressGroupSettings::default());
    let id = group.add_control(&raw("search"), None).unwrap();
    (group, host, id)
}

async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// ---------------------------------------------------------------------------
// construction
// ---------------------------------------------------------------------------

#[test]
fn add_control_rejects_foreign_identity() {
    let geocoder = FakeGeocoder::default();
    let host = RecordingHost::new(Vec::new());
    let group = group_with(&geocoder, &host, AddressGroupSettings::default());

    let foreign = RawControl {
        lat_path: ".lat".to_string(),
        lng_path: ".lng".to_string(),
        ..RawControl::new("group2", "distance1")
    };
    assert!(group.add_control(&foreign, None).is_none());
    assert!(group.controls().is_empty());
}

#[test]
fn add_control_records_api_key_with_fallback() {
    let geocoder = FakeGeocoder::default();
    let host = RecordingHost::new(Vec::new());
    let settings = AddressGroupSettings {
        api_key: Some("configured".to_string()),
        ..AddressGroupSettings::default()
    };
    let group = group_with(&geocoder, &host, settings);
    assert_eq!(group.geocode_api_key(), "configured");

    group.add_control(&raw("a"), None).unwrap();
    assert_eq!(group.geocode_api_key(), "test-key");

    let keyless = RawControl {
        api_key: None,
        ..raw("b")
    };
    group.add_control(&keyless, None).unwrap();
    assert_eq!(group.geocode_api_key(), "configured");
}

#[test]
fn address_options_require_complete_paths() {
    let geocoder = FakeGeocoder::default();
    let host = RecordingHost::new(Vec::new());
    let group = group_with(&geocoder, &host, AddressGroupSettings::default());
    let pathless = RawControl {
        lat_path: String::new(),
        ..raw("a")
    };
    group.add_control(&pathless, None).unwrap();
    assert!(group.get_distance_filter_options().is_empty());
    assert!(group.filter_specs().is_empty());
}

// ---------------------------------------------------------------------------
// debounce + geocode
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn rapid_inputs_trigger_one_geocode_with_last_value() {
    let geocoder = FakeGeocoder::default().answer("Washington", DC, 0);
    let (group, host, id) = setup(&geocoder, Vec::new());

    for value in ["W", "Wash", "Washing", "Washington"] {
        group.on_address_input(id, value);
        assert_eq!(group.phase(), AddressPhase::Debouncing);
        settle(100).await;
    }
    assert!(geocoder.addresses().is_empty());

    settle(500).await;
    assert_eq!(geocoder.addresses(), vec!["Washington".to_string()]);
    assert_eq!(geocoder.keys(), vec!["test-key".to_string()]);
    assert_eq!(group.phase(), AddressPhase::Resolved);
    assert_eq!(host.refreshes().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn resolved_position_is_broadcast_to_every_control() {
    let geocoder = FakeGeocoder::default().answer("Washington", DC, 0);
    let (group, host, first) = setup(&geocoder, Vec::new());
    let second = group.add_control(&raw("other"), None).unwrap();

    group.on_address_input(second, "Washington");
    settle(600).await;

    for control in group.controls() {
        assert_eq!(control.user_lat, Some(DC.lat));
        assert_eq!(control.user_lng, Some(DC.lng));
        assert_eq!(control.user_address, "Washington");
    }
    let refreshes = host.refreshes();
    assert_eq!(refreshes.len(), 1);
    assert_eq!(refreshes[0].group, "group1");
    assert_eq!(refreshes[0].control_id.as_deref(), Some("other"));
    assert_eq!(refreshes[0].user_lat, Some(DC.lat));
    assert_ne!(first, second);
    assert_eq!(group.get_distance_filter_options().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_geocode_keeps_previous_position() {
    let geocoder = FakeGeocoder::default().answer("Washington", DC, 0);
    let (group, host, id) = setup(&geocoder, Vec::new());

    group.on_address_input(id, "Washington");
    settle(600).await;
    assert_eq!(group.phase(), AddressPhase::Resolved);

    group.on_address_input(id, "Atlantis");
    settle(600).await;

    assert_eq!(geocoder.addresses().len(), 2);
    assert_eq!(group.phase(), AddressPhase::Idle);
    let control = group.control(id).unwrap();
    assert_eq!(control.user_lat, Some(DC.lat));
    assert_eq!(control.user_address, "Washington");
    assert_eq!(host.refreshes().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn loading_indicator_is_shown_only_while_geocoding() {
    let geocoder = FakeGeocoder::default().answer("Washington", DC, 1_000);
    let host = RecordingHost::new(Vec::new());
    let group = group_with(&geocoder, &host, AddressGroupSettings::default());
    let indicator = MemNode::new("span").with_class("loading");
    indicator.set_visible(false);
    let id = group
        .add_control(&raw("search"), Some(indicator.clone()))
        .unwrap();

    group.on_address_input(id, "Washington");
    settle(600).await;
    assert_eq!(group.phase(), AddressPhase::Geocoding);
    assert!(indicator.is_visible());

    settle(1_000).await;
    assert_eq!(group.phase(), AddressPhase::Resolved);
    assert!(!indicator.is_visible());
}

#[tokio::test(start_paused = true)]
async fn indicator_is_cleared_on_failure() {
    let geocoder = FakeGeocoder::default();
    let host = RecordingHost::new(Vec::new());
    let group = group_with(&geocoder, &host, AddressGroupSettings::default());
    let indicator = MemNode::new("span");
    let id = group
        .add_control(&raw("search"), Some(indicator.clone()))
        .unwrap();

    assert!(!group.geocode_address("Nowhere", id).await);
    assert!(!indicator.is_visible());
    assert!(host.refreshes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn missing_api_key_issues_no_request() {
    let geocoder = FakeGeocoder::default().answer("Washington", DC, 0);
    let host = RecordingHost::new(Vec::new());
    let group = group_with(&geocoder, &host, AddressGroupSettings::default());
    let keyless = RawControl {
        api_key: None,
        ..raw("search")
    };
    let id = group.add_control(&keyless, None).unwrap();

    assert!(!group.geocode_address("Washington", id).await);

    group.on_address_input(id, "Washington");
    settle(600).await;
    assert!(geocoder.addresses().is_empty());
    assert_eq!(group.phase(), AddressPhase::Idle);
    assert!(!group.control(id).unwrap().is_resolved());
}

#[tokio::test(start_paused = true)]
async fn blank_address_is_not_geocoded() {
    let geocoder = FakeGeocoder::default();
    let (group, _host, id) = setup(&geocoder, Vec::new());
    assert!(!group.geocode_address("   ", id).await);
    assert!(geocoder.addresses().is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_stale_response_overwrites_newer_position() {
    // Known race: responses are not fenced against newer input cycles.
    let geocoder = FakeGeocoder::default()
        .answer("Boston", BOSTON, 2_000)
        .answer("Washington", DC, 0);
    let (group, host, id) = setup(&geocoder, Vec::new());

    group.on_address_input(id, "Boston");
    settle(600).await;
    assert_eq!(group.phase(), AddressPhase::Geocoding);

    group.on_address_input(id, "Washington");
    settle(600).await;
    assert_eq!(group.control(id).unwrap().user_lat, Some(DC.lat));
    assert_eq!(group.phase(), AddressPhase::Resolved);

    settle(2_000).await;
    let control = group.control(id).unwrap();
    assert_eq!(control.user_lat, Some(BOSTON.lat));
    assert_eq!(control.user_address, "Boston");
    assert_eq!(group.phase(), AddressPhase::Resolved);
    assert_eq!(host.refreshes().len(), 2);
}

// ---------------------------------------------------------------------------
// clearing
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn clearing_resets_group_and_hides_display_nodes() {
    let items = vec![located("40.7128", "-74.0060"), located("39.9526", "-75.1652")];
    let geocoder = FakeGeocoder::default().answer("Washington", DC, 0);
    let (group, host, id) = setup(&geocoder, items.clone());
    let second = group.add_control(&raw("other"), None).unwrap();

    group.on_address_input(id, "Washington");
    settle(600).await;
    let filtered = apply_all(&items, &group.filter_specs()).unwrap();
    assert_eq!(filtered.len(), 2);
    for item in &items {
        let display = item.select_first(".distance").unwrap();
        assert!(display.is_visible());
        assert!(display.text().ends_with("km"));
    }

    group.on_address_input(second, "");

    assert_eq!(group.phase(), AddressPhase::Idle);
    for control in group.controls() {
        assert!(!control.is_resolved());
        assert!(control.user_address.is_empty());
    }
    for item in &items {
        let display = item.select_first(".distance").unwrap();
        assert!(!display.is_visible());
        assert!(display.text().is_empty());
    }
    let refreshes = host.refreshes();
    assert_eq!(refreshes.len(), 2);
    assert_eq!(refreshes[1].control_id.as_deref(), Some("other"));
    assert_eq!(refreshes[1].user_lat, None);
    assert!(group.filter_specs().is_empty());
}

#[tokio::test(start_paused = true)]
async fn clearing_cancels_pending_timer() {
    let geocoder = FakeGeocoder::default().answer("Washington", DC, 0);
    let (group, host, id) = setup(&geocoder, Vec::new());

    group.on_address_input(id, "Washington");
    assert!(group.is_debouncing());
    settle(200).await;
    group.on_address_input(id, "");
    assert!(!group.is_debouncing());

    settle(1_000).await;
    assert!(geocoder.addresses().is_empty());
    assert_eq!(group.phase(), AddressPhase::Idle);
    assert_eq!(host.refreshes().len(), 1);
}

// ---------------------------------------------------------------------------
// deep links
// ---------------------------------------------------------------------------

fn deep_link(value: &str) -> DeepLinkParams {
    let mut params = DeepLinkParams::new();
    params.insert(
        "group1".to_string(),
        vec![DeepLinkParam {
            key: "search".to_string(),
            value: value.to_string(),
        }],
    );
    params
}

#[tokio::test(start_paused = true)]
async fn restore_from_deep_link_geocodes_decoded_value() {
    let geocoder = FakeGeocoder::default().answer("Washington, DC", DC, 0);
    let host = RecordingHost::new(Vec::new());
    let settings = AddressGroupSettings {
        deep_link_params: deep_link("Washington%2C%20DC"),
        ..AddressGroupSettings::default()
    };
    let group = group_with(&geocoder, &host, settings);
    let id = group.add_control(&raw("search"), None).unwrap();

    assert!(group.restore_from_deep_link(id).await);
    assert_eq!(geocoder.addresses(), vec!["Washington, DC".to_string()]);
    assert_eq!(group.control(id).unwrap().user_address, "Washington, DC");
    assert_eq!(host.refreshes().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn restore_without_matching_param_does_nothing() {
    let geocoder = FakeGeocoder::default().answer("Washington", DC, 0);
    let host = RecordingHost::new(Vec::new());
    let settings = AddressGroupSettings {
        deep_link_params: deep_link("Washington"),
        ..AddressGroupSettings::default()
    };
    let group = group_with(&geocoder, &host, settings);
    let unnamed = RawControl { id: None, ..raw("x") };
    let unnamed = group.add_control(&unnamed, None).unwrap();
    let other = group.add_control(&raw("elsewhere"), None).unwrap();

    assert!(!group.restore_from_deep_link(unnamed).await);
    assert!(!group.restore_from_deep_link(other).await);
    assert!(geocoder.addresses().is_empty());
}

// ---------------------------------------------------------------------------
// end to end
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn resolved_group_drives_distance_filtering() {
    let new_york = located("40.7128", "-74.0060");
    let philadelphia = located("39.9526", "-75.1652");
    let los_angeles = located("34.0522", "-118.2437");
    let items = vec![new_york.clone(), los_angeles.clone(), philadelphia.clone()];

    let geocoder = FakeGeocoder::default().answer("Washington", DC, 0);
    let host = RecordingHost::new(items.clone());
    let group = group_with(&geocoder, &host, AddressGroupSettings::default());
    let bounded = RawControl {
        max_distance: Some(500.0),
        ..raw("search")
    };
    let id = group.add_control(&bounded, None).unwrap();

    assert_eq!(apply_all(&items, &group.filter_specs()).unwrap().len(), 3);

    group.on_address_input(id, "Washington");
    settle(600).await;

    let filtered = apply_all(&items, &group.filter_specs()).unwrap();
    assert_eq!(filtered.len(), 2);
    assert!(filtered[0].same_node(&philadelphia));
    assert!(filtered[1].same_node(&new_york));
    assert_eq!(
        philadelphia
            .select_first(".distance")
            .unwrap()
            .text(),
        philadelphia.formatted_distance().unwrap()
    );
}

#[tokio::test(start_paused = true)]
async fn is_equal_to_tracks_resolution() {
    let geocoder = FakeGeocoder::default().answer("Washington", DC, 0);
    let (a, _host_a, id) = setup(&geocoder, Vec::new());
    let (b, _host_b, _) = setup(&geocoder, Vec::new());
    assert!(a.is_equal_to(&b));
    assert!(a.is_equal_to(&a.clone()));

    assert!(a.geocode_address("Washington", id).await);
    assert!(!a.is_equal_to(&b));
}
