use crate::parsers::ExtractError;
use crate::utils::normalize_whitespace;
use scraper::{ElementRef, Html, Selector};

/// Compiles a CSS selector, keeping the offending text in the error
pub fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Rendered-ish text of an element: descendant text nodes, whitespace collapsed
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Text of the first element in the document matching `selector`
pub fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector).next().map(element_text)
}
