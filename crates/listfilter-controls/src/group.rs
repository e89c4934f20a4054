use listfilter_core::RawControl;

use crate::control::{DistanceFilterControl, DistanceFilterOptions};

/// Distance-filter controls that share one `(group, name)` identity.
///
/// Every control in [`DistanceFilterControlsGroup::controls`] carries the
/// group's identity; [`DistanceFilterControlsGroup::add_control`] refuses
/// anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceFilterControlsGroup {
    pub group: String,
    pub name: String,
    controls: Vec<DistanceFilterControl>,
}

impl DistanceFilterControlsGroup {
    #[must_use]
    pub fn new(group: &str, name: &str) -> Self {
        Self {
            group: group.to_string(),
            name: name.to_string(),
            controls: Vec::new(),
        }
    }

    /// `true` when `raw` belongs to this group.
    #[must_use]
    pub fn accepts(&self, raw: &RawControl) -> bool {
        raw.group == self.group && raw.name == self.name
    }

    /// Wraps and appends `raw`, returning the stored control, or `None` if
    /// its identity does not match the group.
    pub fn add_control(&mut self, raw: &RawControl) -> Option<&DistanceFilterControl> {
        if !self.accepts(raw) {
            tracing::debug!(
                group = %self.group,
                name = %self.name,
                control_group = %raw.group,
                control_name = %raw.name,
                "control rejected: identity mismatch"
            );
            return None;
        }
        self.controls.push(DistanceFilterControl::from_raw(raw));
        self.controls.last()
    }

    #[must_use]
    pub fn controls(&self) -> &[DistanceFilterControl] {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut [DistanceFilterControl] {
        &mut self.controls
    }

    /// One option set per control whose position is resolved. An empty result
    /// means the group does not constrain filtering.
    #[must_use]
    pub fn get_distance_filter_options(&self) -> Vec<DistanceFilterOptions> {
        self.controls
            .iter()
            .filter_map(DistanceFilterControl::options)
            .collect()
    }

    /// Same identity and pairwise-equal controls.
    #[must_use]
    pub fn is_equal_to(&self, other: &DistanceFilterControlsGroup) -> bool {
        self.group == other.group
            && self.name == other.name
            && self.controls.len() == other.controls.len()
            && self
                .controls
                .iter()
                .zip(&other.controls)
                .all(|(a, b)| a.is_equal_to(b))
    }
}
