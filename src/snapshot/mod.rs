pub mod web;

use crate::config::HarvestConfig;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Where the listing page comes from
#[derive(Debug, Clone)]
pub enum PageSource {
    /// Live page opened through WebDriver
    Web(String),
    /// Saved HTML, with the URL it was saved from
    File { path: PathBuf, base_url: String },
}

/// The rendered document and the URL relative links resolve against
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub html: String,
    pub base_url: Url,
}

impl PageSnapshot {
    pub fn new(html: String, base_url: Url) -> Self {
        Self { html, base_url }
    }
}

/// Failures that leave nothing to harvest
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("no WebDriver server reachable at {0} or any fallback address")]
    NoWebDriver(String),

    #[error("WebDriver failed while {context}: {source}")]
    WebDriver {
        context: &'static str,
        #[source]
        source: fantoccini::error::CmdError,
    },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid page URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl PageSource {
    /// Takes one snapshot of the page
    pub async fn capture(&self, config: &HarvestConfig) -> Result<PageSnapshot, SnapshotError> {
        match self {
            PageSource::Web(page_url) => {
                web::capture(
                    page_url,
                    &config.webdriver_url,
                    &config.selectors.card,
                    Duration::from_secs(config.wait_timeout_secs),
                )
                .await
            }
            PageSource::File { path, base_url } => {
                let base_url = parse_url(base_url)?;
                let html = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| SnapshotError::Io {
                        path: path.clone(),
                        source,
                    })?;
                ::log::info!("Loaded {} bytes of HTML from {}", html.len(), path.display());
                Ok(PageSnapshot::new(html, base_url))
            }
        }
    }
}

pub(crate) fn parse_url(url: &str) -> Result<Url, SnapshotError> {
    Url::parse(url).map_err(|source| SnapshotError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}
