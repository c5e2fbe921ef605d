use medfeed::{
    core::date::DateFormat,
    extract::{CategoryLocator, DateLocator, Listing},
};

const BASE: &str = "https://www.j-endo.jp/";

const LISTINGS: &[Listing] = &[
    Listing::new(
        "general",
        "https://www.j-endo.jp/modules/news_list/index.php?content_id=1",
        ".title_news",
        DateLocator::NextSibling(".date_news"),
        DateFormat::KANJI,
    )
    .base_url(BASE)
    .limit(10),
    Listing::new(
        "members",
        "https://www.j-endo.jp/modules/news_list/index.php?content_id=2",
        ".title_news",
        DateLocator::NextSibling(".date_news"),
        DateFormat::KANJI.cut_at(&["NEW"]),
    )
    .base_url(BASE)
    .category(CategoryLocator::DateNode(".ico_s"))
    .limit(10),
];

crate::society_source!(
    JEndoSource,
    "j-endo.jp",
    "日本内分泌学会",
    BASE,
    "Feed6.xml",
    LISTINGS,
);
