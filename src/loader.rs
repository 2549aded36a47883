use std::fmt;
use std::path::PathBuf;

use anyhow::Context as _;
use reqwest::header::ACCEPT;
use serde_json::Value;
use url::Url;

use crate::book::BookRecord;
use crate::error::{LoadError, TransportFailure};
use crate::formats::RawBookRecord;

pub const DEFAULT_SOURCE: &str = "data.json";

/// Where the catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Local(PathBuf),
    Remote(Url),
}

impl CatalogSource {
    /// `http(s)://` is fetched over the network, `file://` and bare paths are read from disk.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            anyhow::bail!("catalog source must not be empty");
        }

        match Url::parse(raw) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(Self::Remote(url)),
            Ok(url) if url.scheme() == "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| anyhow::anyhow!("file url has no local path: {url}"))
                    .context("parse catalog source")?;
                Ok(Self::Local(path))
            }
            Ok(url) if url.scheme().len() > 1 => {
                anyhow::bail!("unsupported catalog source scheme: {}", url.scheme())
            }
            // Relative paths and Windows drive letters are not URLs.
            _ => Ok(Self::Local(PathBuf::from(raw))),
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Local(path) => write!(f, "{}", path.display()),
            CatalogSource::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Retrieves and normalizes the catalog in a single attempt.
pub async fn load_catalog(source: &CatalogSource) -> Result<Vec<BookRecord>, LoadError> {
    let bytes = fetch_bytes(source).await?;
    let books = parse_catalog(&bytes, &source.to_string())?;
    tracing::debug!(source = %source, records = books.len(), "catalog document decoded");
    Ok(books)
}

async fn fetch_bytes(source: &CatalogSource) -> Result<Vec<u8>, LoadError> {
    let transport = |kind: TransportFailure| LoadError::Transport {
        source_name: source.to_string(),
        kind,
    };

    match source {
        CatalogSource::Local(path) => tokio::fs::read(path)
            .await
            .map_err(|err| transport(err.into())),
        CatalogSource::Remote(url) => {
            let resp = reqwest::Client::new()
                .get(url.clone())
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(|err| transport(err.into()))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(transport(TransportFailure::Status(status)));
            }
            let body = resp.bytes().await.map_err(|err| transport(err.into()))?;
            Ok(body.to_vec())
        }
    }
}

/// Decodes a catalog document: a JSON array whose elements are objects.
pub fn parse_catalog(bytes: &[u8], source_name: &str) -> Result<Vec<BookRecord>, LoadError> {
    let format = |reason: String| LoadError::Format {
        source_name: source_name.to_owned(),
        reason,
    };

    let value: Value =
        serde_json::from_slice(bytes).map_err(|err| format(format!("invalid json: {err}")))?;
    let Value::Array(items) = value else {
        return Err(format("expected a JSON array of books".to_owned()));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(format(format!("book #{index} is not an object")));
            }
            let raw: RawBookRecord = serde_json::from_value(item)
                .map_err(|err| format(format!("book #{index}: {err}")))?;
            Ok(BookRecord::normalize(&raw))
        })
        .collect()
}
