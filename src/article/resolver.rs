//! Exact-then-fallback article resolution

use serde::Serialize;
use thiserror::Error;

use crate::article::source::{KnowledgeSource, SourceError};

/// Character bound for the summary field
const SUMMARY_MAX_CHARS: usize = 500;

/// Character bound for the content field
const CONTENT_MAX_CHARS: usize = 3000;

/// Marker appended to a field that was cut at its bound
const TRUNCATION_MARKER: &str = "...";

/// Errors resolving a query to an article
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Neither the exact lookup nor the fallback search produced a page
    #[error("no results for '{query}'; try different keywords")]
    NoResultFound {
        /// The query text as the user submitted it
        query: String,
    },

    /// The knowledge source failed mid-resolution
    #[error("knowledge source error: {0}")]
    Upstream(String),
}

impl From<SourceError> for ResolveError {
    fn from(e: SourceError) -> Self {
        Self::Upstream(e.to_string())
    }
}

/// A resolved encyclopedia article
///
/// Constructed fresh per resolution and never mutated. `summary` and
/// `content` hold at most 500 and 3000 characters respectively, measured
/// before the truncation marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    /// Canonical title as resolved
    pub title: String,
    /// Bounded prefix of the source abstract
    pub summary: String,
    /// Bounded prefix of the article body
    pub content: String,
    /// Canonical reference URL
    pub url: String,
}

/// Resolves free-text queries to article records
///
/// Strategy: exact canonical lookup first; on a miss, one fallback keyword
/// search whose first-ranked candidate is looked up canonically. A query
/// matching several disambiguation candidates uses only that first candidate.
pub struct ArticleResolver<S> {
    source: S,
    search_limit: usize,
}

impl<S: KnowledgeSource> ArticleResolver<S> {
    /// Create a resolver over a knowledge source
    pub fn new(source: S) -> Self {
        Self {
            source,
            search_limit: 3,
        }
    }

    /// Create a resolver with a custom fallback candidate limit
    pub fn with_search_limit(source: S, search_limit: usize) -> Self {
        Self {
            source,
            search_limit,
        }
    }

    /// The underlying knowledge source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve a query to an article record
    ///
    /// Callers must reject empty queries before invoking this; an empty
    /// string is not a defined input.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoResultFound`] when the exact lookup misses
    /// and the fallback search yields nothing usable, and
    /// [`ResolveError::Upstream`] for any transport failure along the way.
    pub async fn resolve(&self, query: &str) -> Result<ArticleRecord, ResolveError> {
        tracing::debug!(query, "resolving article");

        let mut page = self.source.lookup(query).await?;

        if page.is_none() {
            let candidates = self.source.search(query, self.search_limit).await?;
            if let Some(first) = candidates.first() {
                tracing::debug!(candidate = %first, "retrying with first search candidate");
                page = self.source.lookup(first).await?;
            }
        }

        let Some(page) = page else {
            tracing::info!(query, "no results");
            return Err(ResolveError::NoResultFound {
                query: query.to_string(),
            });
        };

        tracing::info!(title = %page.title, "article resolved");

        Ok(ArticleRecord {
            title: page.title,
            summary: truncate_chars(&page.summary, SUMMARY_MAX_CHARS),
            content: truncate_chars(&page.full_text, CONTENT_MAX_CHARS),
            url: page.url,
        })
    }
}

/// Bounded character prefix; the marker is appended exactly once, and only
/// when the input strictly exceeds the bound
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            let mut cut = text[..byte_idx].to_string();
            cut.push_str(TRUNCATION_MARKER);
            cut
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_over_bound_with_marker() {
        let long = "a".repeat(600);
        let cut = truncate_chars(&long, 500);
        assert_eq!(cut.chars().count(), 503);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn no_marker_at_exact_bound() {
        let exact = "b".repeat(500);
        assert_eq!(truncate_chars(&exact, 500), exact);
    }

    #[test]
    fn no_marker_under_bound() {
        assert_eq!(truncate_chars("short", 500), "short");
    }

    #[test]
    fn truncation_respects_multibyte_chars() {
        let text = "नमस्ते".repeat(200);
        let cut = truncate_chars(&text, 500);
        assert_eq!(cut.chars().count(), 503);
        assert!(cut.ends_with("..."));
    }
}
