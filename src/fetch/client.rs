use async_trait::async_trait;
use reqwest::{Request, Response};

/// Minimal HTTP seam for the raw-payload fetch path, fakeable in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
