use clap::Parser;
use cover_harvest::PageSource;
use cover_harvest::config::HarvestConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cover-harvest")]
#[command(about = "Harvests video cards and thumbnail text from a channel listing page")]
#[command(version)]
pub struct Args {
    /// Channel listing page to open through WebDriver
    pub url: Option<String>,

    /// Read a saved HTML page instead of opening a live one
    #[arg(long, conflicts_with = "url", requires = "base_url")]
    pub html: Option<PathBuf>,

    /// URL the saved page was captured from (resolves relative links)
    #[arg(long, requires = "html")]
    pub base_url: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image-to-text endpoint
    #[arg(long)]
    pub ocr_endpoint: Option<String>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Directory the JSON export is written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum concurrent recognition calls (unbounded by default)
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Seconds to wait for the first card to render
    #[arg(long)]
    pub wait_timeout: Option<u64>,

    /// Per-request timeout in seconds for the recognition service
    #[arg(long)]
    pub request_timeout: Option<u64>,
}

impl Args {
    /// Writes the flags that were given over `config`; flags take precedence
    pub fn apply_to(&self, config: &mut HarvestConfig) {
        if let Some(endpoint) = &self.ocr_endpoint {
            config.ocr_endpoint = endpoint.clone();
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrency = Some(concurrency);
        }
        if let Some(seconds) = self.wait_timeout {
            config.wait_timeout_secs = seconds;
        }
        if let Some(seconds) = self.request_timeout {
            config.request_timeout_secs = Some(seconds);
        }
    }

    /// Page source from the arguments, falling back to the configured page URL
    pub fn page_source(&self, configured_url: Option<&str>) -> Option<PageSource> {
        if let (Some(path), Some(base_url)) = (&self.html, &self.base_url) {
            return Some(PageSource::File {
                path: path.clone(),
                base_url: base_url.clone(),
            });
        }
        self.url
            .as_deref()
            .or(configured_url)
            .map(|url| PageSource::Web(url.to_string()))
    }
}
