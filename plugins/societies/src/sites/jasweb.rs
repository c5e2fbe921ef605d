use medfeed::{
    core::date::DateFormat,
    extract::{DateLocator, Listing},
};

const PAGE: &str = "https://jasweb.or.jp/";

/// The news list is served inside an iframe on the top page.
const LISTINGS: &[Listing] = &[Listing::new(
    "news",
    PAGE,
    "dl dd",
    DateLocator::PrevSibling("dt"),
    DateFormat::SHORT_DOTTED,
)
.in_frame("iframe")
.keep_dateless()
.limit(10)];

crate::society_source!(
    JaswebSource,
    "jasweb.or.jp",
    "日本喘息学会",
    PAGE,
    "Feed3.xml",
    LISTINGS,
);
