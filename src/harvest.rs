use crate::export;
use crate::parsers::{CardFields, ListingParser};
use crate::recognition::RecognitionClient;
use crate::results::{HarvestReport, VideoRecord};
use crate::snapshot::PageSnapshot;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Runs extraction, recognition and export over one page snapshot
pub async fn harvest(
    snapshot: &PageSnapshot,
    parser: &ListingParser,
    client: &RecognitionClient,
    max_concurrency: Option<usize>,
    output_dir: &Path,
) -> HarvestReport {
    let start = std::time::Instant::now();

    let listing = parser.parse_listing(&snapshot.html, &snapshot.base_url);
    let cards_found = listing.cards_found;
    let skipped = listing.skipped();
    let file_name = export::export_filename(listing.channel_title.as_deref());

    let records = recognize_all(listing.cards, &snapshot.base_url, client, max_concurrency).await;
    ::log::info!(
        "Collected {} of {} cards in {:.2} seconds",
        records.len(),
        cards_found,
        start.elapsed().as_secs_f64()
    );

    let output = export::export(&records, output_dir, &file_name);

    HarvestReport {
        cards_found,
        skipped,
        records,
        output,
    }
}

/// Recognizes every card's thumbnail concurrently and joins all of them
///
/// One task per card is spawned up front; records come back in completion
/// order. `max_concurrency` caps in-flight recognitions, `None` leaves them
/// unbounded. A panicking task loses only its own record.
pub async fn recognize_all(
    cards: Vec<CardFields>,
    base_url: &Url,
    client: &RecognitionClient,
    max_concurrency: Option<usize>,
) -> Vec<VideoRecord> {
    let semaphore = max_concurrency.map(|n| Arc::new(Semaphore::new(n.max(1))));
    let mut units = JoinSet::new();

    for card in cards {
        let thumbnail = card.thumbnail_url(base_url);
        let client = client.clone();
        let semaphore = semaphore.clone();

        units.spawn(async move {
            let _permit = match semaphore {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };

            let cover_text = match thumbnail {
                Some(url) => client.recognize(&url).await,
                None => {
                    ::log::warn!("Card '{}' has no thumbnail to recognize", card.title);
                    None
                }
            };
            card.into_record(cover_text)
        });
    }

    ::log::debug!("Waiting on {} recognition tasks", units.len());
    join_records(units).await
}

/// Joint wait: settles every unit, dropping (and logging) the ones that panicked
async fn join_records(mut units: JoinSet<VideoRecord>) -> Vec<VideoRecord> {
    let mut records = Vec::with_capacity(units.len());
    while let Some(joined) = units.join_next().await {
        match joined {
            Ok(record) => records.push(record),
            Err(e) => ::log::error!("Recognition task failed: {}", e),
        }
    }
    records
}
