//! Request builder shared by all item endpoints

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, Result};

enum Body {
    Empty,
    Json(Vec<u8>),
    Multipart(Form),
}

/// Helper for building and executing one HTTP request
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    query_params: Vec<(&'static str, String)>,
    body: Body,
}

impl<'a> FetchBuilder<'a> {
    pub fn new(client: &'a Client, url: String, method: Method) -> Self {
        Self {
            client,
            url,
            method,
            query_params: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Add query parameters, kept in the given order
    pub fn query(mut self, params: Vec<(&'static str, String)>) -> Self {
        self.query_params = params;
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Body::Json(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Send a multipart form body
    pub fn multipart(mut self, form: Form) -> Self {
        self.body = Body::Multipart(form);
        self
    }

    fn build(self) -> Result<RequestBuilder> {
        let mut url = Url::parse(&self.url)?;

        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        debug!(method = %self.method, url = %url, "sending request");

        let req = self.client.request(self.method, url);
        let req = match self.body {
            Body::Empty => req,
            Body::Json(bytes) => req
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(bytes),
            Body::Multipart(form) => req.multipart(form),
        };

        Ok(req)
    }

    async fn send(self) -> Result<Response> {
        let method = self.method.clone();
        let url = self.url.clone();
        let response = self.build()?.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "request failed");
            ApiError::Network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            warn!(%method, %url, %status, "server rejected request");
            return Err(ApiError::from_response(status, text));
        }

        Ok(response)
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.send().await?;
        let bytes = response.bytes().await?;
        let result = serde_json::from_slice::<T>(&bytes)?;
        Ok(result)
    }

    /// Execute the request, ignoring whatever body comes back
    pub async fn execute_empty(self) -> Result<()> {
        self.send().await?;
        Ok(())
    }
}

/// Helper for creating HTTP requests
pub struct Fetch;

impl Fetch {
    pub fn get(client: &Client, url: String) -> FetchBuilder<'_> {
        FetchBuilder::new(client, url, Method::GET)
    }

    pub fn post(client: &Client, url: String) -> FetchBuilder<'_> {
        FetchBuilder::new(client, url, Method::POST)
    }

    pub fn patch(client: &Client, url: String) -> FetchBuilder<'_> {
        FetchBuilder::new(client, url, Method::PATCH)
    }

    pub fn delete(client: &Client, url: String) -> FetchBuilder<'_> {
        FetchBuilder::new(client, url, Method::DELETE)
    }
}
