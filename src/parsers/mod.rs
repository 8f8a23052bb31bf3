pub mod html;
pub mod listing;


pub use listing::{CardFields, Listing, ListingParser};

use thiserror::Error;

/// Structural faults found while reading a card
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("card has no title anchor")]
    MissingTitle,

    #[error("card title anchor has no href")]
    MissingHref,

    #[error("card link `{href}` cannot be resolved: {source}")]
    InvalidHref {
        href: String,
        #[source]
        source: url::ParseError,
    },

    #[error("card has {found} metadata span(s), expected at least 2")]
    MissingMetadata { found: usize },

    #[error("card has no thumbnail image")]
    MissingThumbnail,
}
