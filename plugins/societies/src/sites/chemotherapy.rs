use medfeed::{
    core::date::DateFormat,
    extract::{DateLocator, Listing},
};

const BASE: &str = "https://www.chemotherapy.or.jp/";
const PAGE: &str = "https://www.chemotherapy.or.jp/modules/newslist/index.php?content_id=4";

/// Regular news and important notices share one page but differ in layout.
const LISTINGS: &[Listing] = &[
    Listing::new(
        "news",
        PAGE,
        ".news_title",
        DateLocator::PrevSibling(".news_date"),
        DateFormat::KANJI.cut_at(&["New"]),
    )
    .base_url(BASE)
    .limit(10),
    Listing::new(
        "important",
        PAGE,
        ".title_news",
        DateLocator::NextSibling(".date_news"),
        DateFormat::KANJI,
    )
    .base_url(BASE)
    .limit(10),
];

crate::society_source!(
    ChemotherapySource,
    "chemotherapy.or.jp",
    "日本化学療法学会",
    PAGE,
    "Feed4.xml",
    LISTINGS,
);
