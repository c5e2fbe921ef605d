use serde::Serialize;
use time::OffsetDateTime;
use url::Url;

use crate::{
    error::{Error, SourceError},
    extract::{CompiledListing, Listing, ListingReport},
    fetch::PageFetcher,
};

pub mod date;
pub mod item;
#[cfg(feature = "rss")]
pub mod rss;

use item::{FeedItem, merge_by_recency};

/// One society website and the listings its feed is built from.
pub trait FeedSource {
    const IDENTIFIER: &'static str;
    const TITLE: &'static str;
    const DESCRIPTION: &'static str;
    /// Channel link of the feed.
    const BASE_URL: &'static str;
    /// File name of the feed inside the output directory.
    const OUTPUT: &'static str;

    fn listings(&self) -> &[Listing];
}

#[derive(Debug, Clone)]
pub struct SiteFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub items: Vec<FeedItem>,
    pub generated_at: OffsetDateTime,
    pub report: SourceReport,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub listings: Vec<ListingReport>,
}

impl SourceReport {
    pub fn parsed(&self) -> usize {
        self.listings.iter().map(|l| l.parsed).sum()
    }

    pub fn skipped(&self) -> usize {
        self.listings.iter().map(|l| l.skipped.len()).sum()
    }
}

pub struct FeedCore<F: PageFetcher> {
    fetcher: F,
}

impl<F: PageFetcher> FeedCore<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Builds the feed of `source`.
    ///
    /// Rows that fail to parse are skipped and reported. A listing page that
    /// cannot be loaded fails the whole source.
    pub async fn run<T: FeedSource>(
        &self,
        source: &T,
        rows_limit: Option<usize>,
    ) -> Result<SiteFeed, Error> {
        tracing::info!(source = T::IDENTIFIER, "Building feed");

        let mut extracted = vec![];
        let mut report = SourceReport {
            source: T::IDENTIFIER.to_string(),
            listings: vec![],
        };

        for listing in source.listings() {
            let compiled = listing
                .compile()
                .map_err(|e| SourceError::config::<T>(format!("{}: {e}", listing.label)))?;
            let html = self.load::<T>(listing, &compiled).await?;

            let listing_result = compiled.extract(&html, rows_limit);
            if listing_result.items.is_empty() {
                tracing::warn!(
                    source = T::IDENTIFIER,
                    listing = listing.label,
                    "No items extracted from listing"
                );
            }
            extracted.push(listing_result.items);
            report.listings.push(listing_result.report);
        }

        let items = if extracted.len() > 1 {
            merge_by_recency(extracted)
        } else {
            extracted.into_iter().flatten().collect()
        };

        if items.is_empty() {
            tracing::warn!(
                source = T::IDENTIFIER,
                "Feed has no items; the page structure may have changed"
            );
        }
        tracing::info!(
            source = T::IDENTIFIER,
            items = items.len(),
            skipped = report.skipped(),
            "Feed built"
        );

        Ok(SiteFeed {
            title: T::TITLE.to_string(),
            link: T::BASE_URL.to_string(),
            description: T::DESCRIPTION.to_string(),
            items,
            generated_at: OffsetDateTime::now_utc(),
            report,
        })
    }

    async fn load<T: FeedSource>(
        &self,
        listing: &Listing,
        compiled: &CompiledListing<'_>,
    ) -> Result<String, SourceError> {
        let page_url = Url::parse(listing.page_url).map_err(|e| {
            SourceError::config::<T>(format!("invalid page URL {}: {e}", listing.page_url))
        })?;
        tracing::info!(source = T::IDENTIFIER, url = %page_url, "Loading page");
        let html = self
            .fetcher
            .fetch(&page_url)
            .await
            .map_err(|e| SourceError::load::<T>(e.to_string()))?;

        if !compiled.has_frame() {
            return Ok(html);
        }

        let frame_url = compiled.frame_url(&html, &page_url).ok_or_else(|| {
            SourceError::load::<T>(format!("embedded frame not found on {page_url}"))
        })?;
        tracing::info!(source = T::IDENTIFIER, url = %frame_url, "Loading frame");
        self.fetcher
            .fetch(&frame_url)
            .await
            .map_err(|e| SourceError::load::<T>(e.to_string()))
    }
}
