//! Distance-filter controls: per-control configuration, grouping by
//! `(group, name)` identity, and the address-driven group that resolves a
//! typed address to coordinates and broadcasts them to every control.

pub mod address_group;
pub mod control;
pub mod debounce;
pub mod deep_link;
pub mod group;
pub mod host;

pub use address_group::{
    AddressDistanceFilterControlsGroup, AddressGroupSettings, AddressPhase, ControlId,
};
pub use control::{DistanceFilterControl, DistanceFilterOptions};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_DELAY};
pub use deep_link::{DeepLinkParam, DeepLinkParams};
pub use group::DistanceFilterControlsGroup;
pub use host::GroupHost;
