//! Fuzzy search over book summaries.

use crate::domain::BookSummary;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::HashSet;

/// A book matching a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub book: BookSummary,
    pub score: i64,
    /// Character ranges of the title matched by the query, `(start, end)`
    /// with exclusive end.
    pub title_ranges: Vec<(usize, usize)>,
}

/// Finds books whose title or author matches every whitespace-separated
/// token of `query`, best score first.
///
/// A book present in several source lists is reported once. An empty query
/// matches nothing.
///
/// ```
/// use shelfview::domain::BookSummary;
/// use shelfview::navigation::search_books;
///
/// let books = vec![
///     BookSummary::new("a", "Dune").with_author("Frank Herbert"),
///     BookSummary::new("b", "Emma").with_author("Jane Austen"),
/// ];
/// let hits = search_books("herb", &books);
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].book.key, "a");
/// ```
#[must_use]
pub fn search_books(query: &str, books: &[BookSummary]) -> Vec<SearchHit> {
    let _span = tracing::debug_span!("search_books", query_len = query.len(), total = books.len())
        .entered();

    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut seen = HashSet::new();
    let mut hits: Vec<SearchHit> = books
        .iter()
        .filter(|book| seen.insert(book.key.as_str()))
        .filter_map(|book| {
            let haystack = format!("{} {}", book.title, book.author_line()).to_lowercase();
            let score = tokens.iter().try_fold(0_i64, |total, token| {
                matcher.fuzzy_match(&haystack, token).map(|score| total + score)
            })?;
            Some(SearchHit {
                book: book.clone(),
                score,
                title_ranges: highlight_ranges(&matcher, &book.title, query),
            })
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.book.title.cmp(&b.book.title)));

    tracing::debug!(hit_count = hits.len(), "search completed");
    hits
}

/// Coalesces the matcher's character indices into contiguous ranges.
fn highlight_ranges(matcher: &SkimMatcherV2, text: &str, query: &str) -> Vec<(usize, usize)> {
    let Some((_score, indices)) = matcher.fuzzy_indices(text, query.trim()) else {
        return Vec::new();
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}
