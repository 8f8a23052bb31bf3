use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One harvested video card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Title as displayed on the card
    pub title: String,

    /// View count as displayed (e.g. "1.2K views"), unparsed
    pub views: String,

    /// Relative upload date as displayed (e.g. "3 days ago"), unparsed
    pub created: String,

    /// Text recognized on the thumbnail, `null` when recognition failed
    pub cover_text: Option<String>,

    /// Absolute URL of the video
    pub url: String,
}

impl VideoRecord {
    /// Create a new video record
    pub fn new(
        title: String,
        views: String,
        created: String,
        cover_text: Option<String>,
        url: String,
    ) -> Self {
        Self {
            title,
            views,
            created,
            cover_text,
            url,
        }
    }
}

/// Summary of one harvest run
#[derive(Debug, Clone, Default)]
pub struct HarvestReport {
    /// Cards matched by the card selector
    pub cards_found: usize,

    /// Cards dropped because their structure was incomplete
    pub skipped: usize,

    /// Records in completion order
    pub records: Vec<VideoRecord>,

    /// Path of the exported file, if the export succeeded
    pub output: Option<PathBuf>,
}

impl HarvestReport {
    /// Number of records whose thumbnail text was recognized
    pub fn recognized(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.cover_text.is_some())
            .count()
    }
}
