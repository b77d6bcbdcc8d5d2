//! Web search tools backed by daedra
//!
//! `web_search` queries DuckDuckGo and can pin results to one site (for
//! example `yok.gov.tr` or `mevzuat.gov.tr`). `fetch_page` turns a result page
//! into markdown, truncated so it fits in a model prompt.

use crate::tools::registry::Tool;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

const DEFAULT_NUM_RESULTS: usize = 8;
const MAX_NUM_RESULTS: usize = 20;
const DEFAULT_MAX_CHARS: usize = 12_000;

/// Append a `site:` operator when the caller restricts the search domain
/// `num_results` from model-supplied arguments, capped at [`MAX_NUM_RESULTS`]
fn requested_results(args: &Value) -> usize {
    args.get("num_results")
        .and_then(|v| v.as_u64())
        .map(|n| n.min(MAX_NUM_RESULTS as u64) as usize)
        .unwrap_or(DEFAULT_NUM_RESULTS)
}

fn scoped_query(query: &str, site: Option<&str>) -> String {
    match site.map(str::trim).filter(|s| !s.is_empty()) {
        Some(site) => format!("{} site:{}", query.trim(), site),
        None => query.trim().to_string(),
    }
}

/// Cut `content` to at most `max_chars` characters on a char boundary
fn truncate_chars(content: &str, max_chars: usize) -> (String, bool) {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => (content[..idx].to_string(), true),
        None => (content.to_string(), false),
    }
}

/// Web search tool powered by daedra
pub struct SearchTool;

impl SearchTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for current information (DuckDuckGo). Use `site` to restrict results to an official source such as yok.gov.tr or mevzuat.gov.tr."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "site": {
                    "type": "string",
                    "description": "Optional domain to restrict results to"
                },
                "num_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return (default: 8, at most 20)",
                    "default": DEFAULT_NUM_RESULTS
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| AppError::Tool("Missing 'query' parameter".to_string()))?;

        let site = args.get("site").and_then(|v| v.as_str());
        let num_results = requested_results(&args);

        let search_args = daedra::SearchArgs {
            query: scoped_query(query, site),
            options: Some(daedra::SearchOptions {
                num_results,
                ..Default::default()
            }),
        };

        tracing::debug!(query = %search_args.query, num_results, "Running web search");

        let response = daedra::tools::search::perform_search(&search_args)
            .await
            .map_err(|e| AppError::Tool(format!("Search failed: {}", e)))?;

        let results: Vec<Value> = response
            .data
            .iter()
            .map(|r| {
                json!({
                    "title": r.title,
                    "url": r.url,
                    "description": r.description
                })
            })
            .collect();

        Ok(json!({
            "query": search_args.query,
            "results": results,
            "count": results.len()
        }))
    }
}

/// Page fetching tool powered by daedra
pub struct FetchPageTool {
    max_chars: usize,
}

impl FetchPageTool {
    pub fn new() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    pub fn with_max_chars(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for FetchPageTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FetchPageTool {
    fn name(&self) -> &str {
        "fetch_page"
    }

    fn description(&self) -> &str {
        "Fetch a web page (for example a regulation text) and convert it to markdown"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the page to fetch"
                },
                "selector": {
                    "type": "string",
                    "description": "Optional CSS selector to extract specific content"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let url = args
            .get("url")
            .and_then(|v| v.as_str())
            .filter(|u| u.starts_with("http://") || u.starts_with("https://"))
            .ok_or_else(|| AppError::Tool("Missing or invalid 'url' parameter".to_string()))?;

        let selector = args
            .get("selector")
            .and_then(|v| v.as_str())
            .map(String::from);

        let fetch_args = daedra::VisitPageArgs {
            url: url.to_string(),
            include_images: false,
            selector,
        };

        let page = daedra::tools::fetch::fetch_page(&fetch_args)
            .await
            .map_err(|e| AppError::Tool(format!("Failed to fetch page: {}", e)))?;

        let (content, truncated) = truncate_chars(&page.content, self.max_chars);

        Ok(json!({
            "url": page.url,
            "title": page.title,
            "content": content,
            "truncated": truncated,
            "word_count": page.word_count
        }))
    }
}
