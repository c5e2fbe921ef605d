use std::sync::LazyLock;

use regex::Regex;
use time::OffsetDateTime;
use url::Url;

/// Separator placed between a category label and the title.
pub const CATEGORY_SEPARATOR: char = '：';

/// One announcement, ready to become a feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published_at: Option<OffsetDateTime>,
    pub guid: String,
}

impl FeedItem {
    pub fn new(
        title: String,
        link: String,
        description: String,
        published_at: Option<OffsetDateTime>,
    ) -> Self {
        let guid = guid_for(&link, published_at);
        Self {
            title,
            link,
            description,
            published_at,
            guid,
        }
    }

    /// Dateless items are identified by their link alone.
    pub fn is_permalink(&self) -> bool {
        self.published_at.is_none()
    }
}

/// `{link}#{YYYYMMDD}`, or the bare link when there is no date.
pub fn guid_for(link: &str, published_at: Option<OffsetDateTime>) -> String {
    match published_at {
        Some(at) => format!(
            "{link}#{:04}{:02}{:02}",
            at.year(),
            u8::from(at.month()),
            at.day()
        ),
        None => link.to_string(),
    }
}

/// Resolves `href` against `base`, falling back to `default_link` when the
/// row carries no usable href.
pub fn resolve_link(
    base: &Url,
    href: Option<&str>,
    default_link: &str,
) -> Result<String, url::ParseError> {
    match href.map(str::trim).filter(|href| !href.is_empty()) {
        Some(href) => Ok(base.join(href)?.to_string()),
        None => Ok(default_link.to_string()),
    }
}

pub fn compose_description(category: Option<&str>, title: &str) -> String {
    match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(category) => format!("{category}{CATEGORY_SEPARATOR}{title}"),
        None => title.to_string(),
    }
}

/// Flattens an HTML fragment into a single line of text.
pub fn clean_html(fragment: &str) -> String {
    static LINE_BREAK: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("Failed to compile line break regex"));
    static TAG: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Failed to compile tag regex"));
    static WHITESPACE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

    let text = LINE_BREAK.replace_all(fragment, " ");
    let text = TAG.replace_all(&text, "");
    let text = html_escape::decode_html_entities(&text);
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Concatenates the items of several listings and orders them newest first.
///
/// The sort is stable and dateless items compare lower than any date, so they
/// end up last in the order they were extracted.
pub fn merge_by_recency(listings: Vec<Vec<FeedItem>>) -> Vec<FeedItem> {
    let mut items = listings.into_iter().flatten().collect::<Vec<_>>();
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    items
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn item(link: &str, published_at: Option<OffsetDateTime>) -> FeedItem {
        FeedItem::new(
            "title".to_string(),
            link.to_string(),
            "title".to_string(),
            published_at,
        )
    }

    #[test]
    fn test_guid_with_date() {
        let item = item(
            "https://example.org/n/1",
            Some(datetime!(2025-04-01 0:00 UTC)),
        );
        assert_eq!(item.guid, "https://example.org/n/1#20250401");
        assert!(!item.is_permalink());
    }

    #[test]
    fn test_guid_without_date() {
        let item = item("https://example.org/n/1", None);
        assert_eq!(item.guid, "https://example.org/n/1");
        assert!(item.is_permalink());
    }

    #[test]
    fn test_resolve_relative_link() {
        let base = Url::parse("https://example.org/").unwrap();
        assert_eq!(
            resolve_link(&base, Some("news/42.html"), "https://example.org/news/").unwrap(),
            "https://example.org/news/42.html"
        );
        assert_eq!(
            resolve_link(&base, Some("/about/"), "https://example.org/news/").unwrap(),
            "https://example.org/about/"
        );
    }

    #[test]
    fn test_resolve_link_against_page_path() {
        let base = Url::parse("https://www.jsom.or.jp/medical/index.html").unwrap();
        assert_eq!(
            resolve_link(&base, Some("news/2025.html"), "").unwrap(),
            "https://www.jsom.or.jp/medical/news/2025.html"
        );
    }

    #[test]
    fn test_resolve_absolute_link() {
        let base = Url::parse("https://example.org/").unwrap();
        assert_eq!(
            resolve_link(&base, Some(" https://other.example/a?b=1 "), "").unwrap(),
            "https://other.example/a?b=1"
        );
    }

    #[test]
    fn test_missing_href_uses_default_link() {
        let base = Url::parse("https://example.org/").unwrap();
        assert_eq!(
            resolve_link(&base, None, "https://example.org/news/").unwrap(),
            "https://example.org/news/"
        );
        assert_eq!(
            resolve_link(&base, Some("  "), "https://example.org/news/").unwrap(),
            "https://example.org/news/"
        );
    }

    #[test]
    fn test_description_with_category() {
        assert_eq!(
            compose_description(Some("お知らせ"), "年次総会のご案内"),
            "お知らせ：年次総会のご案内"
        );
    }

    #[test]
    fn test_description_without_category() {
        assert_eq!(compose_description(None, "年次総会のご案内"), "年次総会のご案内");
        assert_eq!(
            compose_description(Some(" "), "年次総会のご案内"),
            "年次総会のご案内"
        );
    }

    #[test]
    fn test_clean_html() {
        assert_eq!(
            clean_html(
                "<a href=\"/a\">第90回大会</a><br>会期：5月<BR/>\n  会場 &amp; 受付<span>案内</span>"
            ),
            "第90回大会 会期：5月 会場 & 受付案内"
        );
    }

    #[test]
    fn test_merge_by_recency() {
        let first = vec![
            item("https://example.org/1", Some(datetime!(2025-01-01 0:00 UTC))),
            item("https://example.org/3", Some(datetime!(2025-03-01 0:00 UTC))),
        ];
        let second = vec![item(
            "https://example.org/2",
            Some(datetime!(2025-02-01 0:00 UTC)),
        )];

        let merged = merge_by_recency(vec![first, second]);
        let dates = merged
            .iter()
            .map(|item| item.published_at.unwrap())
            .collect::<Vec<_>>();
        assert_eq!(
            dates,
            vec![
                datetime!(2025-03-01 0:00 UTC),
                datetime!(2025-02-01 0:00 UTC),
                datetime!(2025-01-01 0:00 UTC),
            ]
        );
    }

    #[test]
    fn test_merge_puts_dateless_items_last() {
        let first = vec![
            item("https://example.org/a", None),
            item("https://example.org/1", Some(datetime!(2025-01-01 0:00 UTC))),
        ];
        let second = vec![
            item("https://example.org/b", None),
            item("https://example.org/2", Some(datetime!(2025-02-01 0:00 UTC))),
        ];

        let links = merge_by_recency(vec![first, second])
            .into_iter()
            .map(|item| item.link)
            .collect::<Vec<_>>();
        assert_eq!(
            links,
            vec![
                "https://example.org/2",
                "https://example.org/1",
                "https://example.org/a",
                "https://example.org/b",
            ]
        );
    }
}
