use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::services::council_api::{AddressCandidate, CouncilApi};

/// Proxy base for the East Herts council API.
pub const DEFAULT_BASE_URL: &str = "https://api.east-herts.co.uk/api";

#[derive(Serialize)]
struct SearchRequest<'a> {
    postcode: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    addresses: Vec<AddressCandidate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailsRequest<'a> {
    uprn: &'a str,
    address: &'a str,
    // One deployed proxy variant rejects requests without this field;
    // the other ignores it. Always sending it satisfies both.
    property_type: &'a str,
}

/// Live [`CouncilApi`] implementation against the proxied council API.
pub struct EastHertsClient {
    base_url: String,
    client: reqwest::Client,
}

impl EastHertsClient {
    /// Creates a client for `base_url` with the usual request timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] if the underlying HTTP client cannot
    /// be constructed (TLS backend failure).
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Upstream(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Value, Error> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("failed to reach {path}: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "{path} returned status {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("malformed JSON from {path}: {e}")))
    }
}

#[async_trait]
impl CouncilApi for EastHertsClient {
    async fn search_addresses(&self, postcode: &str) -> Result<Vec<AddressCandidate>, Error> {
        let value = self
            .post_json("search-addresses", &SearchRequest { postcode })
            .await?;

        let response: SearchResponse = serde_json::from_value(value)
            .map_err(|e| Error::Upstream(format!("malformed address search response: {e}")))?;

        Ok(response.addresses)
    }

    async fn property_details(&self, uprn: &str, address: &str) -> Result<Value, Error> {
        self.post_json(
            "property-details",
            &DetailsRequest {
                uprn,
                address,
                property_type: "Residential",
            },
        )
        .await
    }
}
