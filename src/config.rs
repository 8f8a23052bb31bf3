use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// CSS selectors describing where the fields of a video card live in the page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSelectors {
    /// Selector matching one video card
    #[serde(default = "default_card_selector")]
    pub card: String,

    /// Title anchor inside a card (text is the title, href is the link)
    #[serde(default = "default_title_selector")]
    pub title: String,

    /// Metadata spans inside a card; the first is views, the second is the upload date
    #[serde(default = "default_metadata_selector")]
    pub metadata: String,

    /// Thumbnail image inside a card
    #[serde(default = "default_thumbnail_selector")]
    pub thumbnail: String,

    /// Page-level heading holding the channel title
    #[serde(default = "default_heading_selector")]
    pub heading: String,
}

impl Default for CardSelectors {
    fn default() -> Self {
        Self {
            card: default_card_selector(),
            title: default_title_selector(),
            metadata: default_metadata_selector(),
            thumbnail: default_thumbnail_selector(),
            heading: default_heading_selector(),
        }
    }
}

/// Configuration for one harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Channel listing page to open over WebDriver
    #[serde(default)]
    pub page_url: Option<String>,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Seconds to wait for the first card to render before taking the snapshot
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Image-to-text endpoint receiving the thumbnails
    #[serde(default = "default_ocr_endpoint")]
    pub ocr_endpoint: String,

    /// Per-request timeout for the recognition client (platform default when unset)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Upper bound on in-flight recognition calls (unbounded when unset)
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    /// Directory the JSON export is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// DOM contract of the listing page
    #[serde(default)]
    pub selectors: CardSelectors,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            page_url: None,
            webdriver_url: default_webdriver_url(),
            wait_timeout_secs: default_wait_timeout_secs(),
            ocr_endpoint: default_ocr_endpoint(),
            request_timeout_secs: None,
            max_concurrency: None,
            output_dir: default_output_dir(),
            selectors: CardSelectors::default(),
        }
    }
}

impl HarvestConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply the `WEBDRIVER_URL` environment override, if set
    ///
    /// Call this before command-line overrides so explicit flags still win.
    pub fn apply_env(&mut self) {
        self.apply_webdriver_override(std::env::var("WEBDRIVER_URL").ok());
    }

    /// Override the WebDriver URL with a non-empty value
    pub fn apply_webdriver_override(&mut self, webdriver_url: Option<String>) {
        if let Some(webdriver_url) = webdriver_url {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }
}

fn default_card_selector() -> String {
    "ytd-rich-item-renderer".to_string()
}

fn default_title_selector() -> String {
    r#"a[id="video-title-link"]"#.to_string()
}

fn default_metadata_selector() -> String {
    r#"div[id="metadata-line"] span"#.to_string()
}

fn default_thumbnail_selector() -> String {
    "a#thumbnail img".to_string()
}

fn default_heading_selector() -> String {
    r#"div[id="page-header"] h1"#.to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_wait_timeout_secs() -> u64 {
    10
}

/// Default value for ocr_endpoint
fn default_ocr_endpoint() -> String {
    "http://127.0.0.1:8000/ocr".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
