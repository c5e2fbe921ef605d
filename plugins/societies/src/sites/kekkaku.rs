use medfeed::{
    core::date::DateFormat,
    extract::{CategoryLocator, DateLocator, Listing},
};

const BASE: &str = "https://www.kekkaku.gr.jp/";

const fn info_list(label: &'static str, page_url: &'static str) -> Listing {
    Listing::new(
        label,
        page_url,
        ".infoListBox",
        DateLocator::Within(".infoDate"),
        DateFormat::KANJI,
    )
    .base_url(BASE)
    .anchor(".entryTitle a")
    .category(CategoryLocator::Row(".infoCate"))
    .limit(10)
}

const LISTINGS: &[Listing] = &[
    info_list("conference", "https://www.kekkaku.gr.jp/newsconference/"),
    info_list("relation", "https://www.kekkaku.gr.jp/newsrelation/"),
];

crate::society_source!(
    KekkakuSource,
    "kekkaku.gr.jp",
    "日本結核・非結核性抗酸菌症学会",
    "https://www.kekkaku.gr.jp/news/",
    "Feed13.xml",
    LISTINGS,
);
