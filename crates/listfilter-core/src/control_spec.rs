use serde::{Deserialize, Serialize};

/// Declarative description of one distance-filter control as handed over by
/// whatever layer reads the page markup.
///
/// `group` and `name` together form the identity that decides which controls
/// group is allowed to adopt the control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawControl {
    /// Key used to look the control up in deep-link parameters.
    #[serde(default)]
    pub id: Option<String>,
    pub group: String,
    pub name: String,
    /// Selector for the element carrying the latitude attribute. Empty means
    /// the item itself.
    #[serde(default)]
    pub lat_path: String,
    #[serde(default)]
    pub lng_path: String,
    #[serde(default = "default_lat_attr")]
    pub lat_attr: String,
    #[serde(default = "default_lng_attr")]
    pub lng_attr: String,
    /// Maximum distance in kilometers.
    #[serde(default)]
    pub max_distance: Option<f64>,
    /// Combine with sibling filters using OR instead of AND.
    #[serde(default)]
    pub or: Option<String>,
    #[serde(default)]
    pub distance_display_path: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_lat_attr() -> String {
    "data-lat".to_string()
}

fn default_lng_attr() -> String {
    "data-lng".to_string()
}

impl RawControl {
    /// A control with the given identity and default attribute names.
    #[must_use]
    pub fn new(group: &str, name: &str) -> Self {
        Self {
            id: None,
            group: group.to_string(),
            name: name.to_string(),
            lat_path: String::new(),
            lng_path: String::new(),
            lat_attr: default_lat_attr(),
            lng_attr: default_lng_attr(),
            max_distance: None,
            or: None,
            distance_display_path: String::new(),
            api_key: None,
        }
    }
}
