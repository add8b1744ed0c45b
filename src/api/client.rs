use futures::Stream;
use futures::TryStreamExt;
use reqwest::Client;
use thiserror::Error;

use super::models::{ApiConfig, DeviceTokenRequest};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Opens a download and returns (total_size, stream)
    pub async fn download_file_stream(
        &self,
        download_url: &str,
    ) -> Result<(Option<u64>, impl Stream<Item = Result<bytes::Bytes>>)> {
        let response = self
            .http
            .get(download_url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::ApiError(format!("Download request failed: {}", e)))?;

        let total_size = response.content_length();
        let stream = response.bytes_stream().map_err(ApiError::RequestError);

        Ok((total_size, stream))
    }

    /// Registers the device's push token for a signed-in user
    pub async fn save_device_token(&self, request: &DeviceTokenRequest) -> Result<()> {
        self.http
            .post(&self.config.token_endpoint)
            .json(request)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::ApiError(format!("Token registration failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn client_for(server: &mockito::Server) -> ApiClient {
        ApiClient::new(ApiConfig {
            token_endpoint: format!("{}/api/saveDeviceToken", server.url()),
        })
    }

    #[tokio::test]
    async fn test_save_device_token_posts_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/saveDeviceToken")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "userId": 17,
                "model": "student",
                "device_token": "tok"
            })))
            .with_status(200)
            .create_async()
            .await;

        let request = DeviceTokenRequest {
            user_id: serde_json::json!(17),
            model: "student".into(),
            device_token: "tok".into(),
        };
        client_for(&server).save_device_token(&request).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_save_device_token_reports_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/saveDeviceToken")
            .with_status(500)
            .create_async()
            .await;

        let request = DeviceTokenRequest {
            user_id: serde_json::json!("1"),
            model: "m".into(),
            device_token: "t".into(),
        };
        let err = client_for(&server)
            .save_device_token(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ApiError(_)));
    }

    #[tokio::test]
    async fn test_download_stream_reports_length() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/doc.pdf")
            .with_status(200)
            .with_body("hello world")
            .create_async()
            .await;

        let client = ApiClient::new(ApiConfig::default());
        let (total, stream) = client
            .download_file_stream(&format!("{}/doc.pdf", server.url()))
            .await
            .unwrap();
        assert_eq!(total, Some(11));

        let chunks: Vec<_> = stream.collect().await;
        let body: Vec<u8> = chunks
            .into_iter()
            .flat_map(|chunk| chunk.unwrap().to_vec())
            .collect();
        assert_eq!(body, b"hello world");
    }
}
