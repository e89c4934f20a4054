use std::future::Future;

use crate::error::GeocodeError;
use crate::types::Coordinates;

/// Resolves a free-form address to coordinates.
///
/// Implemented by [`crate::GeocodeClient`]; controls depend on this trait so
/// they can be driven by an in-process fake.
pub trait Geocoder: Send + Sync + 'static {
    /// Issues exactly one lookup for `address`.
    fn geocode(
        &self,
        address: &str,
        api_key: &str,
    ) -> impl Future<Output = Result<Coordinates, GeocodeError>> + Send;
}
