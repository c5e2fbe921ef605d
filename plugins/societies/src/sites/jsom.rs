use medfeed::{
    core::date::DateFormat,
    extract::{DateLocator, Listing},
};

const PAGE: &str = "https://www.jsom.or.jp/medical/index.html";

const LISTINGS: &[Listing] = &[Listing::new(
    "medical",
    PAGE,
    "li.odd",
    DateLocator::Within("dt"),
    DateFormat::KANJI.strip_leading(&['■']),
)
.anchor("dd a")
.limit(10)];

crate::society_source!(
    JsomSource,
    "jsom.or.jp",
    "日本東洋医学会",
    PAGE,
    "Feed12.xml",
    LISTINGS,
);
