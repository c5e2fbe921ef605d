//! Normalization of the free-form date text found on listing pages.
//!
//! Every site prints its dates differently: `2025.04.01`, `2025年4月1日`,
//! `2025/04/01 <br>...`, `25.04.01`, a `datetime` attribute, or any of these
//! decorated with a bullet marker or a trailing `NEW` badge. A [`DateFormat`]
//! describes one of those notations and compiles into a [`DateNormalizer`],
//! which turns raw text into midnight UTC of the encoded calendar date.
//!
//! Normalization never guesses: text that does not yield a valid calendar
//! date is reported as a [`DateError`] and the caller decides whether the row
//! survives without a date.

use regex::Regex;
use thiserror::Error;
use time::{
    Date, Month, OffsetDateTime, format_description::BorrowedFormatItem,
    macros::format_description,
};

/// Dates before this year are rejected as implausible for an announcement.
const MIN_YEAR: i32 = 1900;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("date text is empty")]
    Empty,
    #[error("{text:?} does not match the expected format: {reason}")]
    Format { text: String, reason: String },
    #[error("no date found in {0:?}")]
    NoMatch(String),
    #[error("invalid number {0:?} in date")]
    InvalidNumber(String),
    #[error("date out of range: {0}")]
    OutOfRange(String),
}

#[derive(Debug, Error)]
pub enum DateFormatError {
    #[error("date format has neither a strict format nor a search pattern")]
    Empty,
    #[error("invalid date pattern {pattern:?}: {source}")]
    Pattern {
        pattern: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("date pattern {0:?} must capture year, month and day")]
    Groups(&'static str),
}

/// Declarative description of how one site writes its dates.
///
/// Search patterns must not start or end inside a longer digit run, so the
/// presets bound their captures with `(?:^|\D)` and `(?:\D|$)`.
#[derive(Debug, Clone)]
pub struct DateFormat {
    strict: Option<&'static [BorrowedFormatItem<'static>]>,
    pattern: Option<&'static str>,
    leading_markers: &'static [char],
    trailing_tokens: &'static [&'static str],
    era_pivot: i32,
}

impl DateFormat {
    /// Two-digit years at or above the pivot belong to the 1900s.
    pub const DEFAULT_ERA_PIVOT: i32 = 30;

    /// `2025.04.01`, tolerating unpadded fields.
    pub const DOTTED: Self = Self::strict(format_description!("[year].[month].[day]"))
        .or_search(r"(?:^|\D)(\d{4})\.(\d{1,2})\.(\d{1,2})(?:\D|$)");

    /// `2025年4月1日`, also found inside a longer sentence.
    pub const KANJI: Self = Self::strict(format_description!(
        "[year]年[month padding:none]月[day padding:none]日"
    ))
    .or_search(r"(?:^|\D)(\d{4})年(\d{1,2})月(\d{1,2})日");

    /// `2025/04/01` at the start of the text; any non-digit may follow.
    pub const SLASHED: Self = Self::search(r"^(\d{4})/(\d{1,2})/(\d{1,2})(?:\D|$)");

    /// `25.04.01` or `2025.04.01` anywhere in the text.
    pub const SHORT_DOTTED: Self =
        Self::search(r"(?:^|\D)(\d{2,4})\.(\d{1,2})\.(\d{1,2})(?:\D|$)");

    /// `2025-04-01`, as written in `datetime` attributes.
    pub const ISO: Self = Self::strict(format_description!("[year]-[month]-[day]"))
        .or_search(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:\D|$)");

    pub const fn strict(format: &'static [BorrowedFormatItem<'static>]) -> Self {
        Self {
            strict: Some(format),
            pattern: None,
            leading_markers: &[],
            trailing_tokens: &[],
            era_pivot: Self::DEFAULT_ERA_PIVOT,
        }
    }

    /// `pattern` must capture year, month and day, in that order.
    pub const fn search(pattern: &'static str) -> Self {
        Self {
            strict: None,
            pattern: Some(pattern),
            leading_markers: &[],
            trailing_tokens: &[],
            era_pivot: Self::DEFAULT_ERA_PIVOT,
        }
    }

    /// Pattern searched when the strict format does not match.
    pub const fn or_search(mut self, pattern: &'static str) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Markers such as `■` removed from the start of the text.
    pub const fn strip_leading(mut self, markers: &'static [char]) -> Self {
        self.leading_markers = markers;
        self
    }

    /// Badges such as `NEW`; the text is cut at their first occurrence.
    pub const fn cut_at(mut self, tokens: &'static [&'static str]) -> Self {
        self.trailing_tokens = tokens;
        self
    }

    pub const fn era_pivot(mut self, pivot: i32) -> Self {
        self.era_pivot = pivot;
        self
    }

    pub fn compile(&self) -> Result<DateNormalizer, DateFormatError> {
        if self.strict.is_none() && self.pattern.is_none() {
            return Err(DateFormatError::Empty);
        }
        let pattern = match self.pattern {
            Some(pattern) => {
                let regex = Regex::new(pattern)
                    .map_err(|source| DateFormatError::Pattern { pattern, source })?;
                // group 0 is the whole match
                if regex.captures_len() < 4 {
                    return Err(DateFormatError::Groups(pattern));
                }
                Some(regex)
            }
            None => None,
        };
        Ok(DateNormalizer {
            format: self.clone(),
            pattern,
        })
    }
}

/// A compiled [`DateFormat`].
#[derive(Debug, Clone)]
pub struct DateNormalizer {
    format: DateFormat,
    pattern: Option<Regex>,
}

impl DateNormalizer {
    /// Converts raw date text into midnight UTC of the date it encodes.
    pub fn normalize(&self, raw: &str) -> Result<OffsetDateTime, DateError> {
        let text = self.clean(raw);
        if text.is_empty() {
            return Err(DateError::Empty);
        }

        if let Some(strict) = self.format.strict {
            match Date::parse(&text, strict) {
                Ok(date) => return checked(date, &text),
                Err(e) if self.pattern.is_none() => {
                    return Err(DateError::Format {
                        text,
                        reason: e.to_string(),
                    });
                }
                Err(_) => {}
            }
        }

        let Some(pattern) = &self.pattern else {
            return Err(DateError::NoMatch(text));
        };
        let captures = pattern
            .captures(&text)
            .ok_or_else(|| DateError::NoMatch(text.clone()))?;
        let group = |index: usize| {
            captures
                .get(index)
                .map(|m| m.as_str())
                .ok_or_else(|| DateError::NoMatch(text.clone()))
        };

        let year = resolve_year(group(1)?, self.format.era_pivot)?;
        let month = Month::try_from(parse_number(group(2)?)?)
            .map_err(|e| DateError::OutOfRange(format!("{text}: {e}")))?;
        let day = parse_number(group(3)?)?;
        let date = Date::from_calendar_date(year, month, day)
            .map_err(|e| DateError::OutOfRange(format!("{text}: {e}")))?;
        checked(date, &text)
    }

    /// Full-width digits become ASCII, markers and badges are removed.
    fn clean(&self, raw: &str) -> String {
        let ascii = raw.chars().map(ascii_digit).collect::<String>();
        let mut text = ascii
            .trim()
            .trim_start_matches(self.format.leading_markers)
            .trim();
        for token in self.format.trailing_tokens {
            if let Some((head, _)) = text.split_once(token) {
                text = head.trim();
            }
        }
        text.to_string()
    }
}

fn ascii_digit(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
        _ => c,
    }
}

/// Two-digit years are placed in the century given by `pivot`; longer years
/// are taken as written.
fn resolve_year(digits: &str, pivot: i32) -> Result<i32, DateError> {
    let year: i32 = digits
        .parse()
        .map_err(|_| DateError::InvalidNumber(digits.to_string()))?;
    if digits.len() > 2 {
        Ok(year)
    } else if year >= pivot {
        Ok(1900 + year)
    } else {
        Ok(2000 + year)
    }
}

fn parse_number(digits: &str) -> Result<u8, DateError> {
    digits
        .parse()
        .map_err(|_| DateError::InvalidNumber(digits.to_string()))
}

fn checked(date: Date, text: &str) -> Result<OffsetDateTime, DateError> {
    if date.year() < MIN_YEAR {
        return Err(DateError::OutOfRange(format!(
            "{text}: year {} is before {MIN_YEAR}",
            date.year()
        )));
    }
    Ok(date.midnight().assume_utc())
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn normalize(format: &DateFormat, raw: &str) -> Result<OffsetDateTime, DateError> {
        format.compile().unwrap().normalize(raw)
    }

    #[test]
    fn test_dotted_date() {
        let parsed = normalize(&DateFormat::DOTTED, "2025.04.01").unwrap();
        assert_eq!(parsed, datetime!(2025-04-01 0:00 UTC));
        assert!(parsed.offset().is_utc());
    }

    #[test]
    fn test_dotted_date_without_padding() {
        assert_eq!(
            normalize(&DateFormat::DOTTED, " 2024.5.7 ").unwrap(),
            datetime!(2024-05-07 0:00 UTC)
        );
    }

    #[test]
    fn test_kanji_date() {
        assert_eq!(
            normalize(&DateFormat::KANJI, "2024年12月25日").unwrap(),
            datetime!(2024-12-25 0:00 UTC)
        );
        assert_eq!(
            normalize(&DateFormat::KANJI, "2024年3月9日").unwrap(),
            datetime!(2024-03-09 0:00 UTC)
        );
    }

    #[test]
    fn test_kanji_date_inside_sentence() {
        assert_eq!(
            normalize(&DateFormat::KANJI, "掲載日：2025年1月15日（水）更新").unwrap(),
            datetime!(2025-01-15 0:00 UTC)
        );
    }

    #[test]
    fn test_kanji_date_with_badge() {
        let format = DateFormat::KANJI.cut_at(&["NEW"]);
        assert_eq!(
            normalize(&format, "2025年2月3日 NEW").unwrap(),
            datetime!(2025-02-03 0:00 UTC)
        );
    }

    #[test]
    fn test_leading_marker() {
        let format = DateFormat::KANJI.strip_leading(&['■']);
        assert_eq!(
            normalize(&format, "■2023年11月30日").unwrap(),
            datetime!(2023-11-30 0:00 UTC)
        );
    }

    #[test]
    fn test_full_width_digits() {
        assert_eq!(
            normalize(&DateFormat::KANJI, "２０２５年４月１日").unwrap(),
            datetime!(2025-04-01 0:00 UTC)
        );
    }

    #[test]
    fn test_slashed_date_with_trailing_content() {
        assert_eq!(
            normalize(&DateFormat::SLASHED, "2025/05/01 第90回大会のお知らせ").unwrap(),
            datetime!(2025-05-01 0:00 UTC)
        );
        assert_eq!(
            normalize(&DateFormat::SLASHED, "更新 2025/05/01"),
            Err(DateError::NoMatch("更新 2025/05/01".to_string()))
        );
    }

    #[test]
    fn test_two_digit_year_era() {
        let format = &DateFormat::SHORT_DOTTED;
        assert_eq!(
            normalize(format, "99.03.31").unwrap(),
            datetime!(1999-03-31 0:00 UTC)
        );
        assert_eq!(
            normalize(format, "05.03.31").unwrap(),
            datetime!(2005-03-31 0:00 UTC)
        );
        assert_eq!(
            normalize(format, "30.01.01").unwrap(),
            datetime!(1930-01-01 0:00 UTC)
        );
        assert_eq!(
            normalize(format, "29.12.31").unwrap(),
            datetime!(2029-12-31 0:00 UTC)
        );
        assert_eq!(
            normalize(format, "2025.06.10").unwrap(),
            datetime!(2025-06-10 0:00 UTC)
        );
    }

    #[test]
    fn test_custom_era_pivot() {
        let format = DateFormat::SHORT_DOTTED.era_pivot(50);
        assert_eq!(
            normalize(&format, "35.01.01").unwrap(),
            datetime!(2035-01-01 0:00 UTC)
        );
    }

    #[test]
    fn test_iso_attribute() {
        assert_eq!(
            normalize(&DateFormat::ISO, "2025-04-01").unwrap(),
            datetime!(2025-04-01 0:00 UTC)
        );
        assert_eq!(
            normalize(&DateFormat::ISO, "2025-04-01T09:30:00+09:00").unwrap(),
            datetime!(2025-04-01 0:00 UTC)
        );
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            normalize(&DateFormat::DOTTED, "2025.02.30"),
            Err(DateError::OutOfRange(_))
        ));
        assert!(matches!(
            normalize(&DateFormat::DOTTED, "2025.13.01"),
            Err(DateError::OutOfRange(_))
        ));
        assert!(matches!(
            normalize(&DateFormat::DOTTED, "1850.01.01"),
            Err(DateError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_no_date() {
        assert_eq!(normalize(&DateFormat::KANJI, "   "), Err(DateError::Empty));
        assert_eq!(
            normalize(&DateFormat::KANJI, "近日公開"),
            Err(DateError::NoMatch("近日公開".to_string()))
        );
    }

    #[test]
    fn test_longer_digit_runs_are_not_dates() {
        for (format, raw) in [
            (&DateFormat::SHORT_DOTTED, "2025.04.101"),
            (&DateFormat::DOTTED, "2025.04.101"),
            (&DateFormat::KANJI, "12025年4月1日"),
            (&DateFormat::SLASHED, "2025/04/011"),
            (&DateFormat::ISO, "2025-04-011"),
        ] {
            assert_eq!(
                normalize(format, raw),
                Err(DateError::NoMatch(raw.to_string())),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_date_bounded_by_text() {
        assert_eq!(
            normalize(&DateFormat::SHORT_DOTTED, "[25.04.10]更新").unwrap(),
            datetime!(2025-04-10 0:00 UTC)
        );
        assert_eq!(
            normalize(&DateFormat::DOTTED, "掲載 2025.4.1").unwrap(),
            datetime!(2025-04-01 0:00 UTC)
        );
    }

    #[test]
    fn test_strict_only_format() {
        let format = DateFormat::strict(format_description!("[year].[month].[day]"));
        assert!(matches!(
            normalize(&format, "2025.4.1"),
            Err(DateError::Format { .. })
        ));
    }

    #[test]
    fn test_compile_rejects_bad_patterns() {
        assert!(matches!(
            DateFormat::search(r"(\d{4})-(\d{2})").compile(),
            Err(DateFormatError::Groups(_))
        ));
        assert!(matches!(
            DateFormat::search(r"(\d{4}").compile(),
            Err(DateFormatError::Pattern { .. })
        ));
    }
}
