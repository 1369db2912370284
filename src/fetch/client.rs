use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a prepared HTTP request. Abstracted so data sources can be
/// fetched through a wrapped or stubbed client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
