//! REST client for the item management backend
//!
//! Wraps the `/item` and `/upload` endpoints behind a typed client. Every
//! call issues exactly one request against the configured base address and
//! hands failures back unchanged; nothing is retried.

mod error;
mod fetch;
mod types;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::info;
use url::Url;

pub use error::{ApiError, Result};
pub use fetch::{Fetch, FetchBuilder};
pub use types::*;

/// Operations the screens need from the backend
#[async_trait]
pub trait ItemService: Send + Sync {
    /// `GET /item`
    async fn list(&self, query: &ItemQuery) -> Result<Vec<Item>>;

    /// `GET /item/:id`
    async fn get(&self, id: i64) -> Result<Item>;

    /// `POST /item`
    async fn create(&self, fields: &ItemFields) -> Result<Item>;

    /// `PATCH /item/:id`
    async fn update(&self, id: i64, fields: &ItemFields) -> Result<Item>;

    /// `DELETE /item/:id`
    async fn delete(&self, id: i64) -> Result<()>;

    /// `POST /upload/:id/image`, multipart field `file`
    async fn upload_image(&self, id: i64, file: &Attachment) -> Result<()>;
}

/// HTTP implementation of [`ItemService`]
#[derive(Debug, Clone)]
pub struct ItemClient {
    base_url: String,
    http_client: Client,
}

impl ItemClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Example
    ///
    /// ```
    /// use item_manager_api::ItemClient;
    ///
    /// let client = ItemClient::new("http://localhost:3000", reqwest::Client::new()).unwrap();
    /// assert_eq!(client.base_url(), "http://localhost:3000");
    /// ```
    pub fn new(base_url: &str, http_client: Client) -> Result<Self> {
        Url::parse(base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ItemService for ItemClient {
    async fn list(&self, query: &ItemQuery) -> Result<Vec<Item>> {
        let url = self.get_url("/item");

        Fetch::get(&self.http_client, url)
            .query(query.to_params())
            .execute::<Vec<Item>>()
            .await
    }

    async fn get(&self, id: i64) -> Result<Item> {
        let url = self.get_url(&format!("/item/{}", id));

        Fetch::get(&self.http_client, url).execute::<Item>().await
    }

    async fn create(&self, fields: &ItemFields) -> Result<Item> {
        let url = self.get_url("/item");

        let item = Fetch::post(&self.http_client, url)
            .json(fields)?
            .execute::<Item>()
            .await?;

        info!(id = item.id, "item created");
        Ok(item)
    }

    async fn update(&self, id: i64, fields: &ItemFields) -> Result<Item> {
        let url = self.get_url(&format!("/item/{}", id));

        let item = Fetch::patch(&self.http_client, url)
            .json(fields)?
            .execute::<Item>()
            .await?;

        info!(id, "item updated");
        Ok(item)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let url = self.get_url(&format!("/item/{}", id));

        Fetch::delete(&self.http_client, url).execute_empty().await?;

        info!(id, "item deleted");
        Ok(())
    }

    async fn upload_image(&self, id: i64, file: &Attachment) -> Result<()> {
        let url = self.get_url(&format!("/upload/{}/image", id));

        let mut part = Part::bytes(file.data.clone()).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part("file", part);

        Fetch::post(&self.http_client, url)
            .multipart(form)
            .execute_empty()
            .await?;

        info!(id, file = %file.file_name, bytes = file.len(), "image uploaded");
        Ok(())
    }
}
