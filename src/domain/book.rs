//! Book and time-bucket domain models.
//!
//! [`BookSummary`] is the display-ready projection of a catalog entry: one
//! title, the first author, the first genre tag and an optional cover
//! reference. [`TimeBucket`] describes one of the "This Week / This Month /
//! This Year" tiles shown above the book rails.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Number of days covered by the "week" bucket.
const DAYS_PER_WEEK: i64 = 7;

/// Number of days covered by the "month" bucket.
const DAYS_PER_MONTH: i64 = 30;

/// Number of days covered by the "year" bucket.
const DAYS_PER_YEAR: i64 = 365;

/// Reference to a cover image, as stored in the catalog.
///
/// Catalogs store covers as numeric identifiers. Anything that does not parse
/// as a number is kept verbatim so that it still round-trips through storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoverRef {
    /// Numeric cover identifier.
    Id(i64),
    /// Free-form reference (URL or path).
    Raw(String),
}

impl CoverRef {
    /// Parses a raw reference, preferring the numeric form.
    ///
    /// ```
    /// use shelfview::domain::CoverRef;
    ///
    /// assert_eq!(CoverRef::parse("12818862"), CoverRef::Id(12_818_862));
    /// assert_eq!(CoverRef::parse("x.jpg"), CoverRef::Raw("x.jpg".to_string()));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map_or_else(|_| Self::Raw(raw.to_string()), Self::Id)
    }

    /// File stem used for the cached cover art of this reference.
    #[must_use]
    pub fn cache_stem(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Raw(raw) => raw
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect(),
        }
    }
}

/// Display summary of a book.
///
/// `key` is the stable catalog identifier and is the only field used for
/// identity. Two summaries with the same key are the same book even if the
/// title was corrected between loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub cover: Option<CoverRef>,
}

impl BookSummary {
    /// Creates a summary with only a key and a title.
    #[must_use]
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            author: None,
            genre: None,
            cover: None,
        }
    }

    /// Builder-style setter for the first author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Builder-style setter for the first genre tag.
    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Builder-style setter for the cover reference.
    #[must_use]
    pub fn with_cover(mut self, cover: CoverRef) -> Self {
        self.cover = Some(cover);
        self
    }

    /// Author line shown under the title, or an empty string.
    #[must_use]
    pub fn author_line(&self) -> &str {
        self.author.as_deref().unwrap_or("")
    }

    /// Genre line shown above the title, or an empty string.
    #[must_use]
    pub fn genre_line(&self) -> &str {
        self.genre.as_deref().unwrap_or("")
    }
}

/// One of the time-window tiles of the first section.
///
/// Identity is the position of the bucket in the configured list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub index: usize,
    pub label: String,
}

impl TimeBucket {
    /// Creates a bucket at the given position.
    #[must_use]
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
        }
    }

    /// Builds the bucket list from labels, numbering them in order.
    ///
    /// ```
    /// use shelfview::domain::TimeBucket;
    ///
    /// let buckets = TimeBucket::from_labels(["This Week", "This Month"]);
    /// assert_eq!(buckets[1].index, 1);
    /// ```
    #[must_use]
    pub fn from_labels<I, S>(labels: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| Self::new(index, label))
            .collect()
    }

    /// The default "This Week / This Month / This Year" buckets.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        Self::from_labels(["This Week", "This Month", "This Year"])
    }

    /// Lookback window covered by this bucket.
    ///
    /// Labels mentioning week, month or year pick that window. Any other label
    /// falls back on its position: first a week, second a month, then a year.
    #[must_use]
    pub fn window(&self) -> Duration {
        let label = self.label.to_lowercase();
        let days = if label.contains("week") {
            DAYS_PER_WEEK
        } else if label.contains("month") {
            DAYS_PER_MONTH
        } else if label.contains("year") {
            DAYS_PER_YEAR
        } else {
            match self.index {
                0 => DAYS_PER_WEEK,
                1 => DAYS_PER_MONTH,
                _ => DAYS_PER_YEAR,
            }
        };
        Duration::days(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_follows_label_before_position() {
        let bucket = TimeBucket::new(0, "This Year");
        assert_eq!(bucket.window(), Duration::days(365));

        let bucket = TimeBucket::new(1, "Recently");
        assert_eq!(bucket.window(), Duration::days(30));
    }

    #[test]
    fn cover_ref_deserializes_numbers_and_strings() {
        let id: CoverRef = serde_json::from_str("42").unwrap();
        assert_eq!(id, CoverRef::Id(42));

        let raw: CoverRef = serde_json::from_str("\"covers/a b.jpg\"").unwrap();
        assert_eq!(raw.cache_stem(), "covers_a_b_jpg");
    }

    #[test]
    fn missing_optional_fields_default_to_none() {
        let book: BookSummary =
            serde_json::from_str(r#"{"key":"OL1W","title":"Dune"}"#).unwrap();
        assert_eq!(book.author_line(), "");
        assert!(book.cover.is_none());
    }
}
