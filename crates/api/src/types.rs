//! Types exchanged with the item backend

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::error::Result;

/// An item record as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Server-assigned identifier
    pub id: i64,

    pub name: String,

    /// Free-form classification
    #[serde(rename = "type")]
    pub item_type: String,

    pub category: String,

    pub price: f64,

    /// Relative path of the uploaded image, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Item {
    /// The image path, treating an empty string as no image.
    pub fn image_path(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|p| !p.is_empty())
    }
}

/// Body of create and update requests
///
/// There is no `id` here: identifiers are only ever assigned by the backend.
/// A `None` price is sent as `null` and left for the backend to reject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFields {
    pub name: String,

    #[serde(rename = "type")]
    pub item_type: String,

    pub category: String,

    pub price: Option<f64>,
}

/// Column the backend sorts the list by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    Price,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Price => "price",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter and ordering for `GET /item`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemQuery {
    pub search: Option<String>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
}

impl ItemQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name filter
    pub fn search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    /// Set the sort column and direction
    pub fn sort_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = Some(field);
        self.sort_order = Some(order);
        self
    }

    /// Query string pairs in request order.
    ///
    /// An empty search is left out, and `sortOrder` is only sent together
    /// with `sortBy`.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }

        if let Some(field) = self.sort_by {
            params.push(("sortBy", field.as_str().to_string()));
            let order = self.sort_order.unwrap_or_default();
            params.push(("sortOrder", order.as_str().to_string()));
        }

        params
    }
}

/// A file to send with `POST /upload/:id/image`
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: &str, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: None,
            data,
        }
    }

    /// Set the MIME type sent with the multipart part
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// Read a file from disk into an attachment named after the file.
    ///
    /// The content type is guessed from the extension, falling back to
    /// `application/octet-stream`.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let mut file = File::open(path).await?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).await?;

        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());

        let content_type = mime_guess::from_path(path).first_or_octet_stream();

        Ok(Self::new(&file_name, contents).with_content_type(content_type.essence_str()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
