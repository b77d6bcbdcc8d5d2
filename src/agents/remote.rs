//! Remote agent over HTTP
//!
//! Forwards the composed prompt to an external agent service as
//! `POST {url}` with body `{"prompt": "..."}`. The service answers with
//! `{"answer": "..."}`; `output`, `result` or a bare JSON string are accepted
//! too.

use crate::agents::Agent;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Serialize)]
struct RemoteRequest<'a> {
    prompt: &'a str,
}

/// An agent living behind an HTTP endpoint
#[derive(Debug, Clone)]
pub struct RemoteAgent {
    name: String,
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl RemoteAgent {
    /// Build a remote agent. `timeout_secs = None` leaves requests unbounded.
    pub fn new(
        name: &str,
        url: &str,
        api_key: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            name: name.to_string(),
            client,
            url: url.to_string(),
            api_key,
        })
    }
}

/// Pull the answer text out of a remote response body
fn extract_answer(body: &Value) -> Option<String> {
    if let Some(text) = body.as_str() {
        return Some(text.to_string());
    }
    ["answer", "output", "result"]
        .iter()
        .find_map(|key| body.get(*key).and_then(|v| v.as_str()))
        .map(String::from)
}

#[async_trait]
impl Agent for RemoteAgent {
    async fn run(&self, prompt: &str) -> Result<String> {
        let mut req = self.client.post(&self.url).json(&RemoteRequest { prompt });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        tracing::debug!(agent = %self.name, url = %self.url, "Calling remote agent");

        let response = req.send().await.map_err(|e| {
            let reason = if e.is_timeout() { "timed out" } else { "failed" };
            AppError::Agent(format!("Remote agent '{}' request {}: {}", self.name, reason, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Agent(format!(
                "Remote agent '{}' returned {}: {}",
                self.name,
                status,
                body.trim()
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            AppError::Agent(format!(
                "Remote agent '{}' returned invalid JSON: {}",
                self.name, e
            ))
        })?;

        extract_answer(&body).ok_or_else(|| {
            AppError::Agent(format!(
                "Remote agent '{}' response has no answer field",
                self.name
            ))
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> &str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extract_answer_shapes() {
        assert_eq!(extract_answer(&json!({"answer": "a"})).as_deref(), Some("a"));
        assert_eq!(extract_answer(&json!({"output": "o"})).as_deref(), Some("o"));
        assert_eq!(extract_answer(&json!({"result": "r"})).as_deref(), Some("r"));
        assert_eq!(extract_answer(&json!("bare")).as_deref(), Some("bare"));
        assert_eq!(extract_answer(&json!({"answer": 42})), None);
        assert_eq!(extract_answer(&json!({})), None);
    }

    #[tokio::test]
    async fn test_run_posts_prompt_and_reads_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/run"))
            .and(body_json(json!({"prompt": "Devamsızlık sınırı nedir?"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "%30"})))
            .expect(1)
            .mount(&server)
            .await;

        let agent = RemoteAgent::new("db", &format!("{}/run", server.uri()), None, None).unwrap();
        let answer = agent.run("Devamsızlık sınırı nedir?").await.unwrap();
        assert_eq!(answer, "%30");
        assert_eq!(agent.backend(), "remote");
    }

    #[tokio::test]
    async fn test_run_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let agent =
            RemoteAgent::new("web", &server.uri(), Some("s3cret".to_string()), Some(5)).unwrap();
        assert_eq!(agent.run("q").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_run_reports_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("model overloaded"))
            .mount(&server)
            .await;

        let agent = RemoteAgent::new("db", &server.uri(), None, None).unwrap();
        let err = agent.run("q").await.unwrap_err();
        assert!(matches!(err, AppError::Agent(_)));
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("model overloaded"));
    }

    #[tokio::test]
    async fn test_run_rejects_body_without_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "done"})))
            .mount(&server)
            .await;

        let agent = RemoteAgent::new("db", &server.uri(), None, None).unwrap();
        let err = agent.run("q").await.unwrap_err();
        assert!(err.to_string().contains("no answer field"));
    }

    #[tokio::test]
    async fn test_run_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"answer": "late"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let agent = RemoteAgent::new("web", &server.uri(), None, Some(1)).unwrap();
        let err = agent.run("q").await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
