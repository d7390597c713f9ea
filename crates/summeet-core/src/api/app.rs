use reqwest::Method;

use crate::models::ServiceStatus;

use super::{ApiClient, ApiError};

/// Service-level endpoints.
pub struct AppApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AppApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Health/status probe on the API root.
    pub async fn status(&self) -> Result<ServiceStatus, ApiError> {
        self.client
            .send_json(self.client.request(Method::GET, "/"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use httpmock::prelude::*;
    use serde_json::json;

    use crate::auth::MemoryStore;
    use crate::config::Config;

    use super::*;

    #[tokio::test]
    async fn test_status_probe_hits_api_root() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/");
                then.status(200)
                    .json_body(json!({"message": "Meeting Summarizer API", "version": "1.0.0"}));
            })
            .await;

        let config = Config::for_base_url(server.url("/api"));
        let client = ApiClient::new(&config, Arc::new(MemoryStore::new())).unwrap();

        let status = client.app().status().await.unwrap();
        mock.assert_async().await;
        assert_eq!(status.message.as_deref(), Some("Meeting Summarizer API"));
        assert_eq!(status.version.as_deref(), Some("1.0.0"));
    }
}
