//! Configuration-driven extraction of listing rows.
//!
//! A [`Listing`] is a compile-time description of one listing page: where it
//! lives, which nodes are rows, and where each row keeps its title, link,
//! date and category. [`Listing::compile`] checks the selectors and the date
//! format once; the resulting [`CompiledListing`] turns page HTML into
//! [`FeedItem`]s and a [`ListingReport`].

use scraper::{Element, ElementRef, Html, Selector};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::core::{
    date::{DateError, DateFormat, DateFormatError, DateNormalizer},
    item::{FeedItem, clean_html, compose_description, resolve_link},
};

/// Where a row keeps its date text.
#[derive(Debug, Clone)]
pub enum DateLocator {
    /// Inner text of the first matching descendant of the row.
    Within(&'static str),
    /// Attribute of the first matching descendant of the row.
    Attr {
        selector: &'static str,
        attr: &'static str,
    },
    /// Inner text of the element right before the row, which must match.
    PrevSibling(&'static str),
    /// Inner text of the element right after the row, which must match.
    NextSibling(&'static str),
}

#[derive(Debug, Clone)]
pub enum CategoryLocator {
    /// Descendant of the row.
    Row(&'static str),
    /// Descendant of the node the date was read from.
    DateNode(&'static str),
}

#[derive(Debug, Clone)]
pub enum DescriptionSource {
    /// The title, prefixed with the category when there is one.
    Title,
    /// Cleaned inner HTML of a descendant of the row.
    Html(&'static str),
}

/// What happens to a row whose date cannot be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatelessPolicy {
    Drop,
    Keep,
}

#[derive(Debug, Clone)]
pub struct Listing {
    pub label: &'static str,
    pub page_url: &'static str,
    pub base_url: &'static str,
    pub default_link: &'static str,
    pub frame: Option<&'static str>,
    pub rows: &'static str,
    pub anchor: Option<&'static str>,
    pub title: Option<&'static str>,
    pub fallback_title: Option<&'static str>,
    pub date: DateLocator,
    pub date_format: DateFormat,
    pub category: Option<CategoryLocator>,
    pub description: DescriptionSource,
    pub dateless: DatelessPolicy,
    pub limit: Option<usize>,
}

impl Listing {
    /// A listing whose rows link through their first `<a>` and whose links
    /// resolve against the page itself.
    pub const fn new(
        label: &'static str,
        page_url: &'static str,
        rows: &'static str,
        date: DateLocator,
        date_format: DateFormat,
    ) -> Self {
        Self {
            label,
            page_url,
            base_url: page_url,
            default_link: page_url,
            frame: None,
            rows,
            anchor: Some("a"),
            title: None,
            fallback_title: None,
            date,
            date_format,
            category: None,
            description: DescriptionSource::Title,
            dateless: DatelessPolicy::Drop,
            limit: None,
        }
    }

    pub const fn base_url(mut self, base_url: &'static str) -> Self {
        self.base_url = base_url;
        self
    }

    pub const fn default_link(mut self, default_link: &'static str) -> Self {
        self.default_link = default_link;
        self
    }

    /// The rows live in the document of the first frame matching `selector`.
    pub const fn in_frame(mut self, selector: &'static str) -> Self {
        self.frame = Some(selector);
        self
    }

    pub const fn anchor(mut self, selector: &'static str) -> Self {
        self.anchor = Some(selector);
        self
    }

    /// The row element itself carries the title and the href.
    pub const fn row_is_anchor(mut self) -> Self {
        self.anchor = None;
        self
    }

    /// Title node inside the anchor, when the anchor holds more than the title.
    pub const fn title(mut self, selector: &'static str) -> Self {
        self.title = Some(selector);
        self
    }

    pub const fn fallback_title(mut self, title: &'static str) -> Self {
        self.fallback_title = Some(title);
        self
    }

    pub const fn category(mut self, category: CategoryLocator) -> Self {
        self.category = Some(category);
        self
    }

    pub const fn description(mut self, description: DescriptionSource) -> Self {
        self.description = description;
        self
    }

    pub const fn keep_dateless(mut self) -> Self {
        self.dateless = DatelessPolicy::Keep;
        self
    }

    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn compile(&self) -> Result<CompiledListing<'_>, ListingError> {
        let date = match self.date {
            DateLocator::Within(selector) => CompiledDate::Within(parse_selector(selector)?),
            DateLocator::Attr { selector, attr } => {
                CompiledDate::Attr(parse_selector(selector)?, attr)
            }
            DateLocator::PrevSibling(selector) => CompiledDate::Prev(parse_selector(selector)?),
            DateLocator::NextSibling(selector) => CompiledDate::Next(parse_selector(selector)?),
        };
        let category = match self.category {
            Some(CategoryLocator::Row(selector)) => {
                Some(CompiledCategory::Row(parse_selector(selector)?))
            }
            Some(CategoryLocator::DateNode(selector)) => {
                Some(CompiledCategory::DateNode(parse_selector(selector)?))
            }
            None => None,
        };
        let description = match self.description {
            DescriptionSource::Title => None,
            DescriptionSource::Html(selector) => Some(parse_selector(selector)?),
        };

        Ok(CompiledListing {
            listing: self,
            base: Url::parse(self.base_url).map_err(|source| ListingError::Url {
                url: self.base_url,
                source,
            })?,
            frame: self.frame.map(parse_selector).transpose()?,
            rows: parse_selector(self.rows)?,
            anchor: self.anchor.map(parse_selector).transpose()?,
            title: self.title.map(parse_selector).transpose()?,
            date,
            category,
            description,
            normalizer: self.date_format.compile()?,
        })
    }
}

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("invalid selector {selector:?}: {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },
    #[error("invalid URL {url:?}: {source}")]
    Url {
        url: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    DateFormat(#[from] DateFormatError),
}

/// Why a single row produced no item.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("title not found")]
    MissingTitle,
    #[error("date not found")]
    MissingDate,
    #[error("invalid link {href:?}: {source}")]
    InvalidLink {
        href: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Date(#[from] DateError),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListingReport {
    pub label: String,
    /// Rows matched on the page, before any limit.
    pub found: usize,
    pub parsed: usize,
    /// Items kept without a date.
    pub dateless: usize,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    /// 1-based position of the row on the page.
    pub row: usize,
    pub reason: String,
}

#[derive(Debug)]
pub struct Extracted {
    pub items: Vec<FeedItem>,
    pub report: ListingReport,
}

enum CompiledDate {
    Within(Selector),
    Attr(Selector, &'static str),
    Prev(Selector),
    Next(Selector),
}

impl CompiledDate {
    fn locate<'a>(&self, row: ElementRef<'a>) -> Option<ElementRef<'a>> {
        match self {
            Self::Within(selector) | Self::Attr(selector, _) => row.select(selector).next(),
            Self::Prev(selector) => row
                .prev_sibling_element()
                .filter(|sibling| selector.matches(sibling)),
            Self::Next(selector) => row
                .next_sibling_element()
                .filter(|sibling| selector.matches(sibling)),
        }
    }

    fn read(&self, node: ElementRef<'_>) -> Option<String> {
        match self {
            Self::Attr(_, attr) => node.value().attr(attr).map(str::to_string),
            _ => Some(inner_text(node)),
        }
    }
}

enum CompiledCategory {
    Row(Selector),
    DateNode(Selector),
}

pub struct CompiledListing<'a> {
    listing: &'a Listing,
    base: Url,
    frame: Option<Selector>,
    rows: Selector,
    anchor: Option<Selector>,
    title: Option<Selector>,
    date: CompiledDate,
    category: Option<CompiledCategory>,
    description: Option<Selector>,
    normalizer: DateNormalizer,
}

impl CompiledListing<'_> {
    pub fn label(&self) -> &'static str {
        self.listing.label
    }

    pub fn has_frame(&self) -> bool {
        self.frame.is_some()
    }

    /// Resolved `src` of the frame holding the rows, if the page has one.
    pub fn frame_url(&self, html: &str, page_url: &Url) -> Option<Url> {
        let frame = self.frame.as_ref()?;
        let document = Html::parse_document(html);
        let src = document.select(frame).next()?.value().attr("src")?;
        page_url.join(src.trim()).ok()
    }

    /// Extracts at most `rows_limit` rows, on top of the listing's own limit.
    pub fn extract(&self, html: &str, rows_limit: Option<usize>) -> Extracted {
        let document = Html::parse_document(html);
        let rows = document.select(&self.rows).collect::<Vec<_>>();
        let limit = match (self.listing.limit, rows_limit) {
            (Some(a), Some(b)) => a.min(b),
            (Some(limit), None) | (None, Some(limit)) => limit,
            (None, None) => usize::MAX,
        };
        tracing::info!(listing = self.label(), found = rows.len(), "Found rows");

        let mut items = vec![];
        let mut report = ListingReport {
            label: self.label().to_string(),
            found: rows.len(),
            ..Default::default()
        };

        for (index, row) in rows.into_iter().take(limit).enumerate() {
            match self.extract_row(row) {
                Ok(item) => {
                    tracing::debug!(listing = self.label(), ?item, "Extracted item");
                    report.parsed += 1;
                    if item.published_at.is_none() {
                        report.dateless += 1;
                    }
                    items.push(item);
                }
                Err(e) => {
                    tracing::warn!(listing = self.label(), row = index + 1, error = %e, "Failed to parse row");
                    report.skipped.push(SkippedRow {
                        row: index + 1,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Extracted { items, report }
    }

    fn extract_row(&self, row: ElementRef<'_>) -> Result<FeedItem, RowError> {
        let anchor = match &self.anchor {
            Some(selector) => row.select(selector).next(),
            None => Some(row),
        };

        let title = anchor
            .and_then(|anchor| match &self.title {
                Some(selector) => anchor.select(selector).next(),
                None => Some(anchor),
            })
            .map(inner_text)
            .filter(|title| !title.is_empty())
            .or_else(|| self.listing.fallback_title.map(str::to_string))
            .ok_or(RowError::MissingTitle)?;

        let href = anchor.and_then(|anchor| anchor.value().attr("href"));
        let link = resolve_link(&self.base, href, self.listing.default_link).map_err(|source| {
            RowError::InvalidLink {
                href: href.unwrap_or_default().to_string(),
                source,
            }
        })?;

        let date_node = self.date.locate(row);
        let published_at = match date_node.and_then(|node| self.date.read(node)) {
            Some(raw) => match self.normalizer.normalize(&raw) {
                Ok(at) => Some(at),
                Err(e) if self.listing.dateless == DatelessPolicy::Keep => {
                    tracing::debug!(listing = self.label(), error = %e, "Keeping row without date");
                    None
                }
                Err(e) => return Err(e.into()),
            },
            None if self.listing.dateless == DatelessPolicy::Keep => None,
            None => return Err(RowError::MissingDate),
        };

        let category = match &self.category {
            Some(CompiledCategory::Row(selector)) => row.select(selector).next(),
            Some(CompiledCategory::DateNode(selector)) => {
                date_node.and_then(|node| node.select(selector).next())
            }
            None => None,
        }
        .map(inner_text);

        let description = self
            .description
            .as_ref()
            .and_then(|selector| row.select(selector).next())
            .map(|node| clean_html(&node.inner_html()))
            .filter(|description| !description.is_empty())
            .unwrap_or_else(|| compose_description(category.as_deref(), &title));

        Ok(FeedItem::new(title, link, description, published_at))
    }
}

fn parse_selector(selector: &'static str) -> Result<Selector, ListingError> {
    Selector::parse(selector).map_err(|e| ListingError::Selector {
        selector,
        message: format!("{e:?}"),
    })
}

fn inner_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
