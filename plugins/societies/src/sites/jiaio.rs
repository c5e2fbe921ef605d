use medfeed::{
    core::date::DateFormat,
    extract::{DateLocator, Listing},
};

const PAGE: &str = "http://www.jiaio.umin.jp/";

const LISTINGS: &[Listing] = &[Listing::new(
    "news",
    PAGE,
    "#news > dl > dd",
    DateLocator::PrevSibling("dt"),
    DateFormat::DOTTED,
)
.limit(10)];

crate::society_source!(
    JiaioSource,
    "jiaio.umin.jp",
    "日本耳鼻咽喉科免疫アレルギー感染症学会",
    PAGE,
    "Feed1.xml",
    LISTINGS,
);
