use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::domain::query::Query;

const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Invalid image url {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("Failed to download image: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads article images next to the report.
pub struct ImageStore {
    client: Client,
    directory: PathBuf,
}

impl ImageStore {
    pub fn new(directory: PathBuf) -> Result<Self, ImageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(ImageStore { client, directory })
    }

    pub async fn download(&self, image_url: &str, query: &Query) -> Result<PathBuf, ImageError> {
        let url = Url::parse(image_url).map_err(|source| ImageError::InvalidUrl {
            url: image_url.to_string(),
            source,
        })?;
        let destination = self.directory.join(image_file_name(&url, query));

        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        write_file(&destination, &bytes)?;
        Ok(destination)
    }
}

fn write_file(destination: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(destination, bytes)
}

fn image_file_name(url: &Url, query: &Query) -> String {
    let extension = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|file| file.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

    format!("{}.{}", query.slug(), extension)
}
