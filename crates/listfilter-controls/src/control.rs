use listfilter_core::RawControl;
use listfilter_engine::{DistanceSpec, FilterSpec};
use listfilter_geocode::Coordinates;

/// Configuration and resolved user position of one distance-filter control.
///
/// `user_lat`/`user_lng` start unset and are only changed by a successful
/// geocode or by clearing the address.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceFilterControl {
    pub id: Option<String>,
    pub group: String,
    pub name: String,
    pub lat_path: String,
    pub lng_path: String,
    pub lat_attr: String,
    pub lng_attr: String,
    pub max_distance: Option<f64>,
    pub or: Option<String>,
    pub distance_display_path: String,
    pub user_lat: Option<f64>,
    pub user_lng: Option<f64>,
    pub user_address: String,
}

/// The option set one resolved control contributes to the filter pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceFilterOptions {
    pub lat_path: String,
    pub lng_path: String,
    pub lat_attr: String,
    pub lng_attr: String,
    pub max_distance: Option<f64>,
    pub user_lat: f64,
    pub user_lng: f64,
    pub distance_display_path: String,
    pub or: Option<String>,
}

impl DistanceFilterControl {
    #[must_use]
    pub fn from_raw(raw: &RawControl) -> Self {
        Self {
            id: raw
                .id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            group: raw.group.clone(),
            name: raw.name.clone(),
            lat_path: raw.lat_path.trim().to_string(),
            lng_path: raw.lng_path.trim().to_string(),
            lat_attr: raw.lat_attr.trim().to_string(),
            lng_attr: raw.lng_attr.trim().to_string(),
            max_distance: raw.max_distance,
            or: raw.or.clone(),
            distance_display_path: raw.distance_display_path.trim().to_string(),
            user_lat: None,
            user_lng: None,
            user_address: String::new(),
        }
    }

    /// Both coordinates are known.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.user_lat.is_some() && self.user_lng.is_some()
    }

    /// The option set for the filter pipeline, or `None` while unresolved.
    #[must_use]
    pub fn options(&self) -> Option<DistanceFilterOptions> {
        let (Some(user_lat), Some(user_lng)) = (self.user_lat, self.user_lng) else {
            return None;
        };
        Some(DistanceFilterOptions {
            lat_path: self.lat_path.clone(),
            lng_path: self.lng_path.clone(),
            lat_attr: self.lat_attr.clone(),
            lng_attr: self.lng_attr.clone(),
            max_distance: self.max_distance,
            user_lat,
            user_lng,
            distance_display_path: self.distance_display_path.clone(),
            or: self.or.clone(),
        })
    }

    pub fn set_position(&mut self, coordinates: Coordinates, address: &str) {
        self.user_lat = Some(coordinates.lat);
        self.user_lng = Some(coordinates.lng);
        self.user_address = address.to_string();
    }

    pub fn clear_position(&mut self) {
        self.user_lat = None;
        self.user_lng = None;
        self.user_address.clear();
    }

    /// Same paths, attributes, bound, and coordinates. Identity, `or`, the
    /// display path and the address text are not compared.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_equal_to(&self, other: &DistanceFilterControl) -> bool {
        self.lat_path == other.lat_path
            && self.lng_path == other.lng_path
            && self.lat_attr == other.lat_attr
            && self.lng_attr == other.lng_attr
            && self.max_distance == other.max_distance
            && self.user_lat == other.user_lat
            && self.user_lng == other.user_lng
    }
}

impl DistanceFilterOptions {
    #[must_use]
    pub fn to_filter_spec(&self) -> FilterSpec {
        FilterSpec::Distance(DistanceSpec {
            lat_path: self.lat_path.clone(),
            lng_path: self.lng_path.clone(),
            lat_attr: self.lat_attr.clone(),
            lng_attr: self.lng_attr.clone(),
            max_distance: self.max_distance,
            user_lat: Some(self.user_lat),
            user_lng: Some(self.user_lng),
            display_path: self.distance_display_path.clone(),
        })
    }
}
