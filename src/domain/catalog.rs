//! Catalog file format.
//!
//! The top-books catalog is a JSON document listing works the way public
//! catalog dumps do: every work may have several authors and subject tags and
//! an optional numeric cover id. Only the first author and first subject are
//! kept for display.
//!
//! ```json
//! {
//!   "books": [
//!     {
//!       "key": "OL893415W",
//!       "title": "Dune",
//!       "authors": ["Frank Herbert"],
//!       "subjects": ["Science Fiction", "Ecology"],
//!       "cover": 12818862
//!     }
//!   ]
//! }
//! ```

use super::book::{BookSummary, CoverRef};
use super::error::{Result, ShelfError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    books: Vec<CatalogEntry>,
}

/// One work as listed in the catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub cover: Option<CoverRef>,
}

impl From<CatalogEntry> for BookSummary {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            key: entry.key,
            title: entry.title,
            author: entry.authors.into_iter().next(),
            genre: entry.subjects.into_iter().next(),
            cover: entry.cover,
        }
    }
}

/// Parses catalog JSON into display summaries, preserving catalog order.
///
/// # Errors
///
/// Returns [`ShelfError::Catalog`] if the document is not a valid catalog or
/// an entry has an empty key.
pub fn parse_catalog(contents: &str) -> Result<Vec<BookSummary>> {
    let file: CatalogFile = serde_json::from_str(contents)
        .map_err(|e| ShelfError::Catalog(format!("failed to parse catalog: {e}")))?;

    if let Some(position) = file.books.iter().position(|entry| entry.key.trim().is_empty()) {
        return Err(ShelfError::Catalog(format!("entry {position} has an empty key")));
    }

    Ok(file.books.into_iter().map(BookSummary::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_author_and_subject() {
        let books = parse_catalog(
            r#"{ "books": [ {
                "key": "OL1W", "title": "Good Omens",
                "authors": ["Terry Pratchett", "Neil Gaiman"],
                "subjects": ["Fantasy", "Humor"],
                "cover": 240727
            } ] }"#,
        )
        .unwrap();

        assert_eq!(books[0].author.as_deref(), Some("Terry Pratchett"));
        assert_eq!(books[0].genre.as_deref(), Some("Fantasy"));
        assert_eq!(books[0].cover, Some(CoverRef::Id(240_727)));
    }

    #[test]
    fn optional_fields_may_be_missing() {
        let books = parse_catalog(r#"{ "books": [ { "key": "OL2W", "title": "Untitled" } ] }"#)
            .unwrap();
        assert_eq!(books[0].author_line(), "");
        assert!(books[0].cover.is_none());
    }

    #[test]
    fn rejects_empty_keys_and_bad_json() {
        assert!(matches!(
            parse_catalog(r#"{ "books": [ { "key": " ", "title": "x" } ] }"#),
            Err(ShelfError::Catalog(_))
        ));
        assert!(matches!(parse_catalog("[]"), Err(ShelfError::Catalog(_))));
    }
}
