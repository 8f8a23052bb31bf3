use crate::config::CardSelectors;
use crate::parsers::ExtractError;
use crate::parsers::html::{element_text, first_text, parse_selector};
use crate::results::VideoRecord;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Fields read from one card, everything but the recognized cover text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    pub title: String,
    pub views: String,
    pub created: String,
    /// Raw `src` of the thumbnail image; `None` while the image is still lazy
    pub thumbnail: Option<String>,
    /// Video link resolved against the document base URL
    pub url: String,
}

impl CardFields {
    /// Absolute thumbnail URL, if the card has a resolvable one
    pub fn thumbnail_url(&self, base_url: &Url) -> Option<Url> {
        let src = self.thumbnail.as_deref()?;
        match base_url.join(src) {
            Ok(url) => Some(url),
            Err(e) => {
                ::log::warn!("Unresolvable thumbnail `{}` for '{}': {}", src, self.title, e);
                None
            }
        }
    }

    /// Completes the card with its recognition result
    pub fn into_record(self, cover_text: Option<String>) -> VideoRecord {
        VideoRecord::new(self.title, self.views, self.created, cover_text, self.url)
    }
}

/// Everything the pipeline needs from one page snapshot
#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// Channel heading text, if the page has one
    pub channel_title: Option<String>,

    /// Cards matched by the card selector
    pub cards_found: usize,

    /// Structurally complete cards, in document order
    pub cards: Vec<CardFields>,
}

impl Listing {
    /// Cards dropped because of structural faults
    pub fn skipped(&self) -> usize {
        self.cards_found - self.cards.len()
    }
}

/// Compiled DOM contract of a channel listing page
#[derive(Debug)]
pub struct ListingParser {
    card: Selector,
    title: Selector,
    metadata: Selector,
    thumbnail: Selector,
    heading: Selector,
}

impl ListingParser {
    /// Compile the configured selectors
    pub fn new(selectors: &CardSelectors) -> Result<Self, ExtractError> {
        Ok(Self {
            card: parse_selector(&selectors.card)?,
            title: parse_selector(&selectors.title)?,
            metadata: parse_selector(&selectors.metadata)?,
            thumbnail: parse_selector(&selectors.thumbnail)?,
            heading: parse_selector(&selectors.heading)?,
        })
    }

    /// All card elements currently present in the document, in document order
    pub fn cards<'a>(&self, doc: &'a Html) -> Vec<ElementRef<'a>> {
        doc.select(&self.card).collect()
    }

    /// Channel title shown in the page heading, if present and non-empty
    pub fn channel_title(&self, doc: &Html) -> Option<String> {
        first_text(doc, &self.heading).filter(|t| !t.is_empty())
    }

    /// Reads the fields of one card
    ///
    /// Fields sit at fixed positions: the title anchor supplies both title
    /// and link, the first two metadata spans are views and upload date.
    /// Any missing part fails the whole card.
    pub fn extract(&self, card: ElementRef<'_>, base_url: &Url) -> Result<CardFields, ExtractError> {
        let title_anchor = card
            .select(&self.title)
            .next()
            .ok_or(ExtractError::MissingTitle)?;
        let title = element_text(title_anchor);

        let spans: Vec<ElementRef<'_>> = card.select(&self.metadata).collect();
        if spans.len() < 2 {
            return Err(ExtractError::MissingMetadata { found: spans.len() });
        }
        let views = element_text(spans[0]);
        let created = element_text(spans[1]);

        let thumbnail = card
            .select(&self.thumbnail)
            .next()
            .ok_or(ExtractError::MissingThumbnail)?
            .value()
            .attr("src")
            .map(str::to_string);

        let href = title_anchor
            .value()
            .attr("href")
            .ok_or(ExtractError::MissingHref)?;
        let url = base_url
            .join(href)
            .map_err(|source| ExtractError::InvalidHref {
                href: href.to_string(),
                source,
            })?
            .to_string();

        Ok(CardFields {
            title,
            views,
            created,
            thumbnail,
            url,
        })
    }

    /// Parses a page and extracts every card, dropping the malformed ones
    pub fn parse_listing(&self, html: &str, base_url: &Url) -> Listing {
        let doc = Html::parse_document(html);
        let elements = self.cards(&doc);
        ::log::info!("Found {} cards on {}", elements.len(), base_url);

        let mut cards = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            match self.extract(*element, base_url) {
                Ok(fields) => {
                    ::log::debug!("Card {}: '{}' -> {}", index, fields.title, fields.url);
                    cards.push(fields);
                }
                Err(e) => {
                    ::log::warn!("Skipping card {}: {}", index, e);
                }
            }
        }

        Listing {
            channel_title: self.channel_title(&doc),
            cards_found: elements.len(),
            cards,
        }
    }
}

impl Default for ListingParser {
    fn default() -> Self {
        Self::new(&CardSelectors::default()).expect("Default selectors should be valid")
    }
}
