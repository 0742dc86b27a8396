use crate::{ChatRequest, Error};

/// Anything that can answer a chat request with a single aggregated string.
#[async_trait::async_trait]
pub trait ChatCompletion: Send + Sync + 'static {
    /// Send the request and return the assembled answer.
    async fn complete(&self, request: &ChatRequest) -> Result<String, Error>;
}
