pub mod client;
pub mod error;
pub mod geocoder;
pub mod types;

pub use client::GeocodeClient;
pub use error::GeocodeError;
pub use geocoder::Geocoder;
pub use types::{Coordinates, GeocodeResponse, GeocodeResult};
