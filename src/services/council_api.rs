//! Trait and types for the council waste-service API.

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

/// One candidate returned by an address search.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressCandidate {
    /// Unique Property Reference Number, the stable identifier used to
    /// query service details for a property.
    pub uprn: String,
    /// Full display address, matched against the house-number fragment.
    pub address: String,
}

/// Abstraction over the council API the pipeline talks to.
///
/// The live implementation posts to the two proxy endpoints; tests
/// substitute an in-process fake.
#[async_trait::async_trait]
pub trait CouncilApi: Send + Sync {
    /// Returns every address candidate the upstream knows for a
    /// postcode. An empty list is a valid answer here; the resolver is
    /// the layer that turns it into a not-found failure.
    async fn search_addresses(&self, postcode: &str) -> Result<Vec<AddressCandidate>, Error>;

    /// Returns the raw property-details payload for a resolved address.
    ///
    /// The payload stays untyped because its shape (new or legacy) is
    /// only known after detection; see [`crate::parser`].
    async fn property_details(&self, uprn: &str, address: &str) -> Result<Value, Error>;
}
