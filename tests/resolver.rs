//! Article resolution integration tests
//!
//! Exercises the resolver against in-memory knowledge sources, without any
//! network access.

use std::collections::HashMap;

use async_trait::async_trait;

use wikivaani::article::{KnowledgeSource, SourceError, SourcePage};
use wikivaani::{ArticleResolver, ResolveError, SessionContext};

/// In-memory knowledge source with canned pages and search results
#[derive(Default)]
struct FakeSource {
    pages: HashMap<String, SourcePage>,
    search_results: Vec<String>,
}

impl FakeSource {
    fn with_page(mut self, title: &str, summary: &str, full_text: &str) -> Self {
        self.pages.insert(
            title.to_string(),
            SourcePage {
                title: title.to_string(),
                summary: summary.to_string(),
                full_text: full_text.to_string(),
                url: format!(
                    "https://en.wikipedia.org/wiki/{}",
                    title.replace(' ', "_")
                ),
            },
        );
        self
    }

    fn with_search_results(mut self, results: &[&str]) -> Self {
        self.search_results = results.iter().map(ToString::to_string).collect();
        self
    }
}

#[async_trait]
impl KnowledgeSource for FakeSource {
    async fn lookup(&self, title: &str) -> Result<Option<SourcePage>, SourceError> {
        Ok(self.pages.get(title).cloned())
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        Ok(self.search_results.iter().take(limit).cloned().collect())
    }
}

/// Knowledge source whose backend is down
struct FailingSource;

#[async_trait]
impl KnowledgeSource for FailingSource {
    async fn lookup(&self, _title: &str) -> Result<Option<SourcePage>, SourceError> {
        Err(SourceError::BadResponse("backend exploded".to_string()))
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<String>, SourceError> {
        Err(SourceError::BadResponse("backend exploded".to_string()))
    }
}

#[tokio::test]
async fn exact_lookup_returns_canonical_record() {
    let source = FakeSource::default().with_page(
        "Albert Einstein",
        "Albert Einstein was a theoretical physicist.",
        "Albert Einstein was a German-born theoretical physicist.",
    );
    let resolver = ArticleResolver::new(source);

    let article = resolver.resolve("Albert Einstein").await.unwrap();
    assert_eq!(article.title, "Albert Einstein");
    assert!(!article.summary.is_empty());
    assert!(article.url.contains("wikipedia.org"));
}

#[tokio::test]
async fn fallback_uses_first_candidate_only() {
    let source = FakeSource::default()
        .with_page("Albert Einstein", "Physicist.", "Physicist bio.")
        .with_page("Einstein family", "Family.", "Family history.")
        .with_search_results(&["Albert Einstein", "Einstein family", "Einstein (crater)"]);
    let resolver = ArticleResolver::new(source);

    // "einstein" has no exact page; the first ranked candidate wins
    let article = resolver.resolve("einstein").await.unwrap();
    assert_eq!(article.title, "Albert Einstein");
}

#[tokio::test]
async fn first_candidate_missing_means_no_result() {
    // Search suggests a page the source then fails to serve; the resolver
    // must not walk further down the candidate list
    let source = FakeSource::default()
        .with_page("Einstein family", "Family.", "Family history.")
        .with_search_results(&["Albert Einstein", "Einstein family"]);
    let resolver = ArticleResolver::new(source);

    let err = resolver.resolve("einstein").await.unwrap_err();
    assert!(matches!(err, ResolveError::NoResultFound { .. }));
}

#[tokio::test]
async fn no_result_message_contains_the_query() {
    let resolver = ArticleResolver::new(FakeSource::default());

    let err = resolver.resolve("zzxcvqwuiop123").await.unwrap_err();
    assert!(matches!(err, ResolveError::NoResultFound { .. }));
    assert!(err.to_string().contains("zzxcvqwuiop123"));
}

#[tokio::test]
async fn summary_and_content_are_bounded() {
    let source = FakeSource::default().with_page(
        "Long Article",
        &"s".repeat(800),
        &"c".repeat(5000),
    );
    let resolver = ArticleResolver::new(source);

    let article = resolver.resolve("Long Article").await.unwrap();

    let summary_body = article.summary.strip_suffix("...").unwrap();
    assert_eq!(summary_body.chars().count(), 500);

    let content_body = article.content.strip_suffix("...").unwrap();
    assert_eq!(content_body.chars().count(), 3000);
}

#[tokio::test]
async fn marker_only_when_bound_exceeded() {
    let source = FakeSource::default().with_page(
        "Exact Article",
        &"s".repeat(500),
        &"c".repeat(3000),
    );
    let resolver = ArticleResolver::new(source);

    let article = resolver.resolve("Exact Article").await.unwrap();
    assert_eq!(article.summary.chars().count(), 500);
    assert_eq!(article.content.chars().count(), 3000);
    assert!(!article.summary.ends_with("..."));
    assert!(!article.content.ends_with("..."));
}

#[tokio::test]
async fn upstream_failure_is_typed_not_propagated() {
    let resolver = ArticleResolver::new(FailingSource);

    let err = resolver.resolve("anything").await.unwrap_err();
    match err {
        ResolveError::Upstream(message) => assert!(message.contains("backend exploded")),
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn history_appends_once_per_success_in_order() {
    let source = FakeSource::default()
        .with_page("India", "Country.", "Country text.")
        .with_page("Water cycle", "Cycle.", "Cycle text.")
        .with_page("Mahatma Gandhi", "Leader.", "Leader text.");
    let resolver = ArticleResolver::new(source);
    let mut session = SessionContext::new();

    for query in ["India", "Water cycle", "zzxcvqwuiop123", "Mahatma Gandhi"] {
        match resolver.resolve(query).await {
            Ok(article) => session.record(query, &article),
            Err(_) => {} // a failed resolution never appends
        }
    }

    let entries = session.history.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].query, "India");
    assert_eq!(entries[1].query, "Water cycle");
    assert_eq!(entries[2].query, "Mahatma Gandhi");
    assert!(entries[0].timestamp <= entries[2].timestamp);
}
