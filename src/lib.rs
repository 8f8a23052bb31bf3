// Re-export modules
pub mod config;
pub mod export;
pub mod harvest;
pub mod parsers;
pub mod recognition;
pub mod results;
pub mod snapshot;
pub mod utils;

#[cfg(test)]
mod test_server;

// Re-export commonly used types for convenience
pub use results::{HarvestReport, VideoRecord};
pub use snapshot::{PageSnapshot, PageSource};

use parsers::ListingParser;
use recognition::RecognitionClient;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Builder for one harvest run over a channel listing page
pub struct Harvest {
    source: PageSource,
    config: config::HarvestConfig,
}

impl Harvest {
    /// Create a new Harvest builder for the given page source
    pub fn new(source: PageSource) -> Self {
        Self {
            source,
            config: config::HarvestConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: config::HarvestConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = config::HarvestConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Set the recognition endpoint
    pub fn with_ocr_endpoint(mut self, endpoint: &str) -> Self {
        self.config.ocr_endpoint = endpoint.to_string();
        self
    }

    /// Set the directory the export is written to
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Cap the number of in-flight recognition calls
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = Some(max_concurrency);
        self
    }

    /// Set a per-request timeout for the recognition client
    pub fn with_request_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.request_timeout_secs = Some(timeout_seconds);
        self
    }

    /// Current configuration
    pub fn config(&self) -> &config::HarvestConfig {
        &self.config
    }

    /// Snapshot the page, recognize every card and export the records
    ///
    /// Only setup and snapshot failures are errors. Malformed cards,
    /// failed recognitions and a failed export are logged and reflected in
    /// the returned report. The configuration is used as given; environment
    /// overrides are the caller's job (see [`config::HarvestConfig::apply_env`]).
    pub async fn run(self) -> Result<HarvestReport, Box<dyn std::error::Error>> {
        let parser = ListingParser::new(&self.config.selectors)?;
        let endpoint = Url::parse(&self.config.ocr_endpoint)?;
        let client = RecognitionClient::new(
            endpoint,
            self.config.request_timeout_secs.map(Duration::from_secs),
        )?;

        let snapshot = self.source.capture(&self.config).await?;

        Ok(harvest::harvest(
            &snapshot,
            &parser,
            &client,
            self.config.max_concurrency,
            &self.config.output_dir,
        )
        .await)
    }
}
