use crate::snapshot::{PageSnapshot, SnapshotError, parse_url};
use fantoccini::{Client, ClientBuilder, Locator};
use std::time::Duration;

/// Opens `page_url` in a WebDriver session and captures the rendered DOM
///
/// The session is closed whether or not the capture succeeds.
pub async fn capture(
    page_url: &str,
    webdriver_url: &str,
    card_selector: &str,
    wait_timeout: Duration,
) -> Result<PageSnapshot, SnapshotError> {
    // Reject a bad URL before spending a browser session on it
    parse_url(page_url)?;

    let client = connect_to_webdriver(webdriver_url).await?;
    let result = capture_with(&client, page_url, card_selector, wait_timeout).await;

    if let Err(e) = client.close().await {
        ::log::warn!("Failed to close WebDriver session: {}", e);
    }

    result
}

async fn capture_with(
    client: &Client,
    page_url: &str,
    card_selector: &str,
    wait_timeout: Duration,
) -> Result<PageSnapshot, SnapshotError> {
    let start = std::time::Instant::now();
    ::log::info!("Opening {}", page_url);

    client
        .goto(page_url)
        .await
        .map_err(|source| SnapshotError::WebDriver {
            context: "navigating",
            source,
        })?;

    // Cards are rendered by script after load; an empty listing is still a valid snapshot
    match client
        .wait()
        .at_most(wait_timeout)
        .for_element(Locator::Css(card_selector))
        .await
    {
        Ok(_) => ::log::debug!("First card rendered after {:.2}s", start.elapsed().as_secs_f64()),
        Err(e) => ::log::warn!(
            "No element matching `{}` within {}s: {}",
            card_selector,
            wait_timeout.as_secs(),
            e
        ),
    }

    let html = client
        .source()
        .await
        .map_err(|source| SnapshotError::WebDriver {
            context: "reading page source",
            source,
        })?;
    let base_url = client
        .current_url()
        .await
        .map_err(|source| SnapshotError::WebDriver {
            context: "reading current URL",
            source,
        })?;

    ::log::info!(
        "Captured {} bytes of DOM from {} in {:.2}s",
        html.len(),
        base_url,
        start.elapsed().as_secs_f64()
    );
    Ok(PageSnapshot::new(html, base_url))
}

/// Connects to the WebDriver instance, trying common local ports after the configured one
async fn connect_to_webdriver(webdriver_url: &str) -> Result<Client, SnapshotError> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://localhost:4444", // geckodriver / Selenium default
        "http://127.0.0.1:4444",
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(SnapshotError::NoWebDriver(webdriver_url.to_string()))
}
