//! Trait and types for turning a place name into coordinates.

use anyhow::Result;
use serde::Serialize;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Abstraction over a forward geocoding provider (e.g., OpenCage).
#[async_trait::async_trait]
pub trait Geocoder {
    /// Resolves "`city`, `province`" to the provider's best match.
    async fn locate(&self, city: &str, province: &str) -> Result<Coordinates>;
}
