use medfeed::{
    core::date::DateFormat,
    extract::{CategoryLocator, DateLocator, Listing},
};

const PAGE: &str = "https://www.jsge.or.jp/news/";

const LISTINGS: &[Listing] = &[Listing::new(
    "news",
    PAGE,
    "li.p-news-list__item",
    DateLocator::Attr {
        selector: "time",
        attr: "datetime",
    },
    DateFormat::ISO,
)
.base_url("https://www.jsge.or.jp/")
.title(".p-article04__title")
.category(CategoryLocator::Row(".p-article04__cat"))
.limit(10)];

crate::society_source!(
    JsgeSource,
    "jsge.or.jp",
    "日本産科婦人科学会",
    PAGE,
    "Feed7.xml",
    LISTINGS,
);

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::extract_fixture;

    #[test]
    fn test_extract_news_cards() {
        let html = r#"
            <ul class="p-news-list">
              <li class="p-news-list__item">
                <a class="p-article04" href="/news/2025/04/0001/">
                  <div class="p-article04__meta">
                    <time class="p-article04__date" datetime="2025-04-03">2025.04.03</time>
                    <span class="p-article04__cat">学会からのお知らせ</span>
                  </div>
                  <p class="p-article04__title">専門医制度に関するお知らせ</p>
                </a>
              </li>
              <li class="p-news-list__item">
                <a class="p-article04" href="https://www.jsge.or.jp/committee/">
                  <time class="p-article04__date" datetime="2025-03-30T09:00:00+09:00">2025.03.30</time>
                  <p class="p-article04__title">委員会報告</p>
                </a>
              </li>
            </ul>
        "#;
        let items = extract_fixture(&LISTINGS[0], html);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "専門医制度に関するお知らせ");
        assert_eq!(items[0].link, "https://www.jsge.or.jp/news/2025/04/0001/");
        assert_eq!(
            items[0].description,
            "学会からのお知らせ：専門医制度に関するお知らせ"
        );
        assert_eq!(items[0].published_at, Some(datetime!(2025-04-03 0:00 UTC)));
        assert_eq!(items[1].description, "委員会報告");
        assert_eq!(items[1].published_at, Some(datetime!(2025-03-30 0:00 UTC)));
    }
}
