use std::collections::BTreeMap;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Method, RequestBuilder, Response,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    error::RequestFailure,
    traits::{Resource, Validate},
    types::id::Id,
};

/// Everything the client needs to reach the catalog API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url:           String,
    pub auth_token:         Option<String>,
    pub base_url_overrides: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Serve one resource (by plural name) from a different base URL.
    pub fn with_base_url_override(
        mut self,
        resource: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        self.base_url_overrides
            .insert(resource.into(), base_url.into());
        self
    }

    pub fn base_url_for(&self, resource: &str) -> &str {
        self.base_url_overrides
            .get(resource)
            .unwrap_or(&self.base_url)
            .trim_end_matches('/')
    }
}

/// The remote operations a view model relies on, for one resource type.
#[allow(async_fn_in_trait)]
pub trait ResourceGateway<R: Resource> {
    async fn list(&self, parent: Option<Id>) -> Result<Vec<R>, RequestFailure>;
    async fn get(&self, id: Id) -> Result<R, RequestFailure>;
    async fn create(&self, payload: &R::Payload) -> Result<R, RequestFailure>;
    async fn update(&self, id: Id, payload: &R::Payload) -> Result<R, RequestFailure>;
    async fn delete(&self, id: Id) -> Result<(), RequestFailure>;
}

/// HTTP client for the catalog's REST endpoints.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http:   reqwest::Client,
    config: ClientConfig,
}

impl CatalogClient {
    pub fn new(config: ClientConfig) -> Result<Self, RequestFailure> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                RequestFailure::invalid("configuration", "auth token is not a valid header value")
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url<R: Resource>(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url_for(R::NAME_PLURAL))
    }

    fn request<R: Resource>(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url::<R>(path);
        debug!("{method} {url}");
        self.http.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RequestFailure> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        warn!("{url} answered {status}");
        Err(RequestFailure::Status { status, body })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RequestFailure> {
        let bytes = response.bytes().await?;
        let de = &mut serde_json::Deserializer::from_slice(&bytes);
        Ok(serde_path_to_error::deserialize(de)?)
    }
}

impl<R: Resource> ResourceGateway<R> for CatalogClient {
    async fn list(&self, parent: Option<Id>) -> Result<Vec<R>, RequestFailure> {
        let path = R::list_path(parent)?;
        let response = self.send(self.request::<R>(Method::GET, &path)).await?;
        Self::decode(response).await
    }

    async fn get(&self, id: Id) -> Result<R, RequestFailure> {
        let response = self
            .send(self.request::<R>(Method::GET, &R::member_path(id)))
            .await?;
        Self::decode(response).await
    }

    async fn create(&self, payload: &R::Payload) -> Result<R, RequestFailure> {
        payload.validate()?;
        let request = self
            .request::<R>(Method::POST, &R::collection_path())
            .json(payload);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn update(&self, id: Id, payload: &R::Payload) -> Result<R, RequestFailure> {
        payload.validate()?;
        let request = self
            .request::<R>(Method::PUT, &R::member_path(id))
            .json(payload);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn delete(&self, id: Id) -> Result<(), RequestFailure> {
        self.send(self.request::<R>(Method::DELETE, &R::member_path(id)))
            .await?;
        Ok(())
    }
}
