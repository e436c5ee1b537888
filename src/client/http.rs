//! HTTP implementation of [`AdminApi`]

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::error::{ClientError, ClientResult};
use super::models::{
    LoginRequest, LoginResponse, MeResponse, Product, ProductInput, Stats, User,
};
use super::AdminApi;

/// REST client for the store API
///
/// The base URL is fixed at construction. No timeout is configured and no
/// request is retried: failures surface exactly once, to the caller.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("storeadmin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    /// Base URL every path is appended to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn product_url(&self, id: &str) -> String {
        self.url(&format!("/api/products/{}", urlencoding::encode(id)))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> ClientResult<Response> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(status = status.as_u16(), error = %e, "Failed to read error body");
                String::new()
            }
        };
        let message = error_message(status, &body);

        tracing::debug!(status = status.as_u16(), message = %message, "API request failed");

        if status == StatusCode::UNAUTHORIZED {
            Err(ClientError::Authentication {
                status: status.as_u16(),
                message,
            })
        } else {
            Err(ClientError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> ClientResult<T> {
        let response = self.send(request, token).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AdminApi for ApiClient {
    async fn current_user(&self, token: &str) -> ClientResult<User> {
        let request = self.client.get(self.url("/api/auth/me"));
        let me: MeResponse = self.send_json(request, Some(token)).await?;
        Ok(me.user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = self.client.post(self.url("/api/auth/login")).json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        });
        self.send_json(request, None).await
    }

    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let request = self.client.get(self.url("/api/products"));
        self.send_json(request, None).await
    }

    async fn create_product(
        &self,
        input: &ProductInput,
        token: Option<&str>,
    ) -> ClientResult<Product> {
        let request = self.client.post(self.url("/api/products")).json(input);
        self.send_json(request, token).await
    }

    async fn update_product(
        &self,
        id: &str,
        input: &ProductInput,
        token: Option<&str>,
    ) -> ClientResult<Product> {
        let request = self.client.put(self.product_url(id)).json(input);
        self.send_json(request, token).await
    }

    async fn delete_product(&self, id: &str, token: Option<&str>) -> ClientResult<()> {
        let request = self.client.delete(self.product_url(id));
        self.send(request, token).await?;
        Ok(())
    }

    async fn stats(&self, token: Option<&str>) -> ClientResult<Stats> {
        let request = self.client.get(self.url("/api/stats"));
        self.send_json(request, token).await
    }
}

/// Normalize: remove trailing slash
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Pick the human-readable message out of an error body
///
/// Servers answer `{"message": ..}`, some middleware `{"error": ..}`;
/// anything else falls back to the status' reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
