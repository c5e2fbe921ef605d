use medfeed::{
    core::date::DateFormat,
    extract::{DateLocator, DescriptionSource, Listing},
};

const PAGE: &str = "https://www.jsccr.jp/";

const LISTINGS: &[Listing] = &[Listing::new(
    "news",
    PAGE,
    "dl",
    DateLocator::Within("dt"),
    DateFormat::SLASHED,
)
.anchor("dd a")
.fallback_title("お知らせ")
.description(DescriptionSource::Html("dd"))];

crate::society_source!(
    JsccrSource,
    "jsccr.jp",
    "日本大腸癌研究会",
    PAGE,
    "Feed16.xml",
    LISTINGS,
);
