//! Reference knowledge source client
//!
//! The pipeline talks to a MediaWiki-style backend through the
//! [`KnowledgeSource`] trait: an exact canonical lookup plus a fallback
//! keyword search. [`WikipediaSource`] is the network-backed implementation.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::SourceConfig;

/// Errors reaching or interpreting the knowledge source
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network-level failure reaching the source
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Source answered with an error status or a malformed body
    #[error("bad response from source: {0}")]
    BadResponse(String),
}

/// A page as reported by the knowledge source, before any bounding
#[derive(Debug, Clone)]
pub struct SourcePage {
    /// Canonical title
    pub title: String,
    /// Lead-section abstract, unbounded
    pub summary: String,
    /// Full plain-text body, unbounded
    pub full_text: String,
    /// Canonical URL
    pub url: String,
}

/// Lookup/search interface of the reference knowledge source
#[async_trait]
pub trait KnowledgeSource {
    /// Exact canonical lookup; `Ok(None)` means the page does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached or answers badly
    async fn lookup(&self, title: &str) -> Result<Option<SourcePage>, SourceError>;

    /// Keyword search returning up to `limit` candidate titles, best first
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached or answers badly
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SourceError>;
}

/// Response shape of a MediaWiki `action=query` request (formatversion 2)
#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryPages>,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: Vec<PageInfo>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    title: String,
    #[serde(default)]
    missing: bool,
    extract: Option<String>,
    fullurl: Option<String>,
}

/// MediaWiki-backed knowledge source
pub struct WikipediaSource {
    client: reqwest::Client,
    endpoint: String,
    user_agent: String,
}

impl WikipediaSource {
    /// Create a source client for the configured endpoint
    #[must_use]
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Fetch one page extract; `intro_only` limits the extract to the lead section
    async fn fetch_page(
        &self,
        title: &str,
        intro_only: bool,
    ) -> Result<Option<PageInfo>, SourceError> {
        let mut params = vec![
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("redirects", "1"),
            ("prop", "extracts|info"),
            ("inprop", "url"),
            ("explaintext", "1"),
            ("titles", title),
        ];
        if intro_only {
            params.push(("exintro", "1"));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "knowledge source error");
            return Err(SourceError::BadResponse(format!(
                "source error {status}: {body}"
            )));
        }

        let body = response.text().await?;
        parse_page(&body)
    }
}

#[async_trait]
impl KnowledgeSource for WikipediaSource {
    async fn lookup(&self, title: &str) -> Result<Option<SourcePage>, SourceError> {
        tracing::debug!(title, "canonical lookup");

        let Some(intro) = self.fetch_page(title, true).await? else {
            tracing::debug!(title, "page does not exist");
            return Ok(None);
        };

        // Second request for the full body; the extract API returns either
        // the lead section or the whole text, not both.
        let full = self.fetch_page(&intro.title, false).await?;
        let full_text = full.and_then(|p| p.extract).unwrap_or_default();

        let url = intro.fullurl.unwrap_or_else(|| {
            format!(
                "https://en.wikipedia.org/wiki/{}",
                urlencoding::encode(&intro.title.replace(' ', "_"))
            )
        });

        Ok(Some(SourcePage {
            title: intro.title,
            summary: intro.extract.unwrap_or_default(),
            full_text,
            url,
        }))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        tracing::debug!(query, limit, "fallback search");

        let limit_str = limit.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[
                ("action", "opensearch"),
                ("format", "json"),
                ("limit", limit_str.as_str()),
                ("search", query),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "search error");
            return Err(SourceError::BadResponse(format!(
                "search error {status}: {body}"
            )));
        }

        let body = response.text().await?;
        parse_search_titles(&body, limit)
    }
}

/// Parse an `action=query` response into the page, if it exists
fn parse_page(body: &str) -> Result<Option<PageInfo>, SourceError> {
    let parsed: QueryResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::BadResponse(format!("invalid query response: {e}")))?;

    let page = parsed
        .query
        .map(|q| q.pages)
        .unwrap_or_default()
        .into_iter()
        .next();

    Ok(page.filter(|p| !p.missing))
}

/// Parse an `action=opensearch` response into candidate titles
///
/// The body is a four-element array; index 1 holds the ranked titles.
fn parse_search_titles(body: &str, limit: usize) -> Result<Vec<String>, SourceError> {
    let parsed: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| SourceError::BadResponse(format!("invalid search response: {e}")))?;

    let titles = parsed
        .get(1)
        .and_then(|v| v.as_array())
        .ok_or_else(|| SourceError::BadResponse("search response missing titles".to_string()))?;

    Ok(titles
        .iter()
        .filter_map(|t| t.as_str().map(ToString::to_string))
        .take(limit)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_existing_page() {
        let body = r#"{"query":{"pages":[{"pageid":736,"title":"Albert Einstein",
            "extract":"Albert Einstein was a theoretical physicist.",
            "fullurl":"https://en.wikipedia.org/wiki/Albert_Einstein"}]}}"#;

        let page = parse_page(body).unwrap().unwrap();
        assert_eq!(page.title, "Albert Einstein");
        assert_eq!(
            page.fullurl.as_deref(),
            Some("https://en.wikipedia.org/wiki/Albert_Einstein")
        );
        assert!(page.extract.unwrap().contains("physicist"));
    }

    #[test]
    fn missing_page_is_none() {
        let body = r#"{"query":{"pages":[{"title":"Zzxcvqwuiop123","missing":true}]}}"#;
        assert!(parse_page(body).unwrap().is_none());
    }

    #[test]
    fn garbage_body_is_bad_response() {
        assert!(matches!(
            parse_page("not json"),
            Err(SourceError::BadResponse(_))
        ));
    }

    #[test]
    fn parses_search_titles_in_rank_order() {
        let body = r#"["einstein",["Albert Einstein","Einstein family","Einstein (crater)"],
            ["","",""],["https://a","https://b","https://c"]]"#;

        let titles = parse_search_titles(body, 3).unwrap();
        assert_eq!(
            titles,
            vec!["Albert Einstein", "Einstein family", "Einstein (crater)"]
        );
    }

    #[test]
    fn search_limit_is_applied() {
        let body = r#"["q",["A","B","C"],[],[]]"#;
        assert_eq!(parse_search_titles(body, 2).unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn empty_search_results_are_empty() {
        let body = r#"["zzxcvqwuiop123",[],[],[]]"#;
        assert!(parse_search_titles(body, 3).unwrap().is_empty());
    }
}
