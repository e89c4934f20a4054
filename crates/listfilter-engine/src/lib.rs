//! Stateless filtering over collections of [`NodeQuery`] items.
//!
//! Every filter takes a slice of item handles and returns the surviving
//! handles, in input order except for [`distance_filter`] which sorts by
//! distance. A path of [`DEFAULT_PATH`] always returns the input unchanged.

pub mod distance;
pub mod error;
pub mod geo;
pub mod path;
pub mod range;
pub mod spec;
pub mod text;

pub use distance::{distance_filter, DistanceSpec};
pub use error::FilterError;
pub use geo::{calculate_distance, format_distance, EARTH_RADIUS_KM};
pub use listfilter_core::NodeQuery;
pub use path::path_filter;
pub use range::range_filter;
pub use spec::{apply_all, FilterSpec};
pub use text::{text_filter, TextMode};

/// Sentinel path meaning "this filter is switched off".
pub const DEFAULT_PATH: &str = "default";
