use std::sync::Arc;

use bytes::Bytes;
use reqwest::{header, multipart, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::analysis::AnalysisResult;
use crate::api::dto::{LoginRequest, RegisterRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::profile::HealthProfile;
use crate::storage::{KeyValueStore, AUTH_TOKEN_KEY};

/// HTTP client for the intended backend. Auth responses have no agreed shape
/// yet and come back as raw JSON.
pub struct ApiClient {
    base_url: String,
    store: Arc<dyn KeyValueStore>,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attaches the stored token as a bearer header when one is present.
    async fn authorized(&self, req: RequestBuilder) -> ApiResult<RequestBuilder> {
        match self.store.get(AUTH_TOKEN_KEY).await? {
            Some(token) => Ok(req.bearer_auth(token)),
            None => Ok(req),
        }
    }

    async fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let req = self
            .http
            .request(method, self.url(path))
            .header(header::CONTENT_TYPE, "application/json");
        self.authorized(req).await
    }

    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> ApiResult<T> {
        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "api request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        debug!(%status, url = %response.url(), "api response");
        Ok(response.json().await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Value> {
        let req = self
            .request(Method::POST, "/auth/login")
            .await?
            .json(&LoginRequest { email, password });
        self.execute(req).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<Value> {
        let req = self
            .request(Method::POST, "/auth/register")
            .await?
            .json(&RegisterRequest {
                name,
                email,
                password,
            });
        self.execute(req).await
    }

    pub async fn logout(&self) -> ApiResult<Value> {
        let req = self.request(Method::POST, "/auth/logout").await?;
        self.execute(req).await
    }

    pub async fn get_profile(&self) -> ApiResult<HealthProfile> {
        let req = self.request(Method::GET, "/profile").await?;
        self.execute(req).await
    }

    pub async fn update_profile(&self, profile: &HealthProfile) -> ApiResult<HealthProfile> {
        let req = self.request(Method::PUT, "/profile").await?.json(profile);
        self.execute(req).await
    }

    /// Multipart upload; reqwest sets the multipart content type itself.
    pub async fn upload_image(
        &self,
        file_name: &str,
        body: Bytes,
        content_type: &str,
    ) -> ApiResult<AnalysisResult> {
        let part = multipart::Part::bytes(body.to_vec())
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = multipart::Form::new().part("file", part);
        let req = self
            .authorized(self.http.post(self.url("/analyze")).multipart(form))
            .await?;
        self.execute(req).await
    }

    pub async fn get_history(&self) -> ApiResult<Vec<AnalysisResult>> {
        let req = self.request(Method::GET, "/analysis/history").await?;
        self.execute(req).await
    }

    pub async fn get_analysis(&self, id: &str) -> ApiResult<AnalysisResult> {
        let req = self
            .request(Method::GET, &format!("/analysis/{id}"))
            .await?;
        self.execute(req).await
    }
}
