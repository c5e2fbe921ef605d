pub mod sites;

/// Declares a society source backed by a `&'static [Listing]` table.
macro_rules! society_source {
    (
        $name:ident,
        $identifier:literal,
        $organization:literal,
        $base_url:expr,
        $output:literal,
        $listings:expr $(,)?
    ) => {
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $name;

        impl medfeed::core::FeedSource for $name {
            const IDENTIFIER: &'static str = $identifier;
            const TITLE: &'static str = concat!($organization, "トピックス");
            const DESCRIPTION: &'static str = concat!($organization, "の最新トピック情報");
            const BASE_URL: &'static str = $base_url;
            const OUTPUT: &'static str = $output;

            fn listings(&self) -> &[medfeed::extract::Listing] {
                $listings
            }
        }
    };
}

/// Smoke tests against the live sites. Run with `cargo test -- --ignored`.
#[cfg(test)]
macro_rules! test_sites {
    ($($test:ident($source:ident)),+ $(,)?) => {
        mod live_tests {
            use medfeed::{
                FeedCore,
                fetch::{HttpFetcher, PAGE_TIMEOUT},
            };

            use super::*;

            $(
                #[tokio::test]
                #[ignore = "requires network access"]
                async fn $test() {
                    let core = FeedCore::new(HttpFetcher::new(PAGE_TIMEOUT).unwrap());
                    let feed = core.run(&$source, None).await.unwrap();
                    assert!(!feed.items.is_empty());
                    assert!(feed.items.iter().all(|item| item.link.starts_with("http")));
                }
            )+
        }
    };
}

pub(crate) use society_source;
#[cfg(test)]
pub(crate) use test_sites;

#[cfg(test)]
pub(crate) fn extract_fixture(
    listing: &medfeed::extract::Listing,
    html: &str,
) -> Vec<medfeed::core::item::FeedItem> {
    listing.compile().unwrap().extract(html, None).items
}
