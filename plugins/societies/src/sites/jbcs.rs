use medfeed::{
    core::date::DateFormat,
    extract::{DateLocator, Listing},
};

const PAGE: &str = "https://www.jbcs.gr.jp/modules/info_list/index.php?content_id=1";

const LISTINGS: &[Listing] = &[Listing::new(
    "info",
    PAGE,
    "div.title_news",
    DateLocator::NextSibling(".date_news"),
    DateFormat::KANJI,
)
.base_url("https://www.jbcs.gr.jp/index.php")];

crate::society_source!(
    JbcsSource,
    "jbcs.gr.jp",
    "日本乳癌学会",
    PAGE,
    "Feed18.xml",
    LISTINGS,
);

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::extract_fixture;

    #[test]
    fn test_extract_all_rows() {
        let rows = (1..=12)
            .map(|day| {
                format!(
                    r#"<div class="title_news"><a href="modules/info/index.php?id={day}">お知らせ{day}</a></div>
                       <div class="date_news">2025年1月{day}日</div>"#
                )
            })
            .collect::<String>();
        let items = extract_fixture(&LISTINGS[0], &format!("<div>{rows}</div>"));

        assert_eq!(items.len(), 12);
        assert_eq!(
            items[0].link,
            "https://www.jbcs.gr.jp/modules/info/index.php?id=1"
        );
        assert_eq!(items[11].published_at, Some(datetime!(2025-01-12 0:00 UTC)));
    }
}
