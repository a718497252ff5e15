//! Elasticsearch client.
//!
//! Bulk API: POST {url}/_bulk with an NDJSON body, one action line and one
//! source line per document. Single writes: PUT {url}/{index}/_doc/{id}.
//! Index creation and mappings are managed outside this crate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use sentryx_config::SearchConfig;

use crate::error::IndexError;
use crate::index_writer::{BulkItemResult, IndexAction, SearchIndex};

const NDJSON: &str = "application/x-ndjson";

pub struct ElasticsearchIndex {
    client: Client,
    base_url: Url,
}

impl ElasticsearchIndex {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, IndexError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| IndexError::Transport(format!("invalid search url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(IndexError::Transport(format!("invalid search url {base_url}")));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(cfg: &SearchConfig) -> Result<Self, IndexError> {
        Self::new(&cfg.url, Duration::from_secs(cfg.timeout_secs))
    }

    /// Check that the cluster answers at all.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), IndexError> {
        let resp = self.client.get(self.base_url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(IndexError::Status { status: status.as_u16(), body });
        }
        debug!(url = %self.base_url, "Search cluster reachable");
        Ok(())
    }

    fn url(&self, segments: &[&str]) -> Result<Url, IndexError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| IndexError::Transport(format!("invalid search url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    #[instrument(skip(self, actions), fields(n = actions.len()))]
    async fn bulk(&self, actions: &[IndexAction]) -> Result<Vec<BulkItemResult>, IndexError> {
        let body = bulk_body(actions)?;
        let resp = self
            .client
            .post(self.url(&["_bulk"])?)
            .header(reqwest::header::CONTENT_TYPE, NDJSON)
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(IndexError::Status { status: status.as_u16(), body });
        }
        let parsed: Value = resp.json().await?;
        parse_bulk_response(&parsed)
    }

    async fn index_one(&self, action: &IndexAction) -> Result<(), IndexError> {
        let resp = self
            .client
            .put(self.url(&[&action.target, "_doc", &action.id])?)
            .json(&action.body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(IndexError::Status { status: status.as_u16(), body });
        }
        Ok(())
    }
}

/// NDJSON request body; every line, including the last, ends with a newline.
pub fn bulk_body(actions: &[IndexAction]) -> Result<String, IndexError> {
    let mut out = String::new();
    for action in actions {
        let header = json!({"index": {"_index": action.target, "_id": action.id}});
        out.push_str(&header.to_string());
        out.push('\n');
        let source = serde_json::to_string(&action.body).map_err(|e| IndexError::Decode(e.to_string()))?;
        out.push_str(&source);
        out.push('\n');
    }
    Ok(out)
}

/// Per-item results from a bulk response, in request order.
pub fn parse_bulk_response(resp: &Value) -> Result<Vec<BulkItemResult>, IndexError> {
    let items = resp
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| IndexError::Decode("bulk response has no items array".into()))?;

    items
        .iter()
        .map(|item| {
            let result = item
                .as_object()
                .and_then(|o| o.values().next())
                .ok_or_else(|| IndexError::Decode(format!("unexpected bulk item: {item}")))?;
            let id = result.get("_id").and_then(Value::as_str).unwrap_or_default().to_string();
            let status = result.get("status").and_then(Value::as_u64).unwrap_or(0);

            match result.get("error") {
                Some(err) if !err.is_null() => Ok(BulkItemResult::failed(id, error_reason(err))),
                _ if status >= 300 => Ok(BulkItemResult::failed(id, format!("status {status}"))),
                _ => Ok(BulkItemResult::ok(id)),
            }
        })
        .collect()
}

fn error_reason(err: &Value) -> String {
    match (err.get("type").and_then(Value::as_str), err.get("reason").and_then(Value::as_str)) {
        (Some(kind), Some(reason)) => format!("{kind}: {reason}"),
        (Some(kind), None) => kind.to_string(),
        (None, Some(reason)) => reason.to_string(),
        (None, None) => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::project;
    use sentryx_db::Document;

    #[test]
    fn test_bulk_body_is_ndjson() {
        let actions = vec![
            IndexAction::new("harassment_posts", project(&Document::new("a").with("text", "hi")).unwrap()),
            IndexAction::new("harassment_posts", project(&Document::new("b")).unwrap()),
        ];
        let body = bulk_body(&actions).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(body.ends_with('\n'));

        let header: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(header, json!({"index": {"_index": "harassment_posts", "_id": "a"}}));
        let source: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(source["content"], "hi");
        assert_eq!(source["word_count"], 1);
    }

    #[test]
    fn test_parse_bulk_response_mixed() {
        let resp = json!({
            "took": 3,
            "errors": true,
            "items": [
                {"index": {"_id": "a", "status": 201, "result": "created"}},
                {"index": {"_id": "b", "status": 400, "error": {"type": "mapper_parsing_exception", "reason": "failed to parse field [score]"}}},
                {"create": {"_id": "c", "status": 409}}
            ]
        });
        let items = parse_bulk_response(&resp).unwrap();
        assert_eq!(items[0], BulkItemResult::ok("a"));
        assert_eq!(
            items[1],
            BulkItemResult::failed("b", "mapper_parsing_exception: failed to parse field [score]")
        );
        assert_eq!(items[2], BulkItemResult::failed("c", "status 409"));
    }

    #[test]
    fn test_parse_bulk_response_rejects_garbage() {
        assert!(matches!(parse_bulk_response(&json!({"error": "nope"})), Err(IndexError::Decode(_))));
        assert!(matches!(parse_bulk_response(&json!({"items": [42]})), Err(IndexError::Decode(_))));
    }

    #[test]
    fn test_document_url_escapes_id() {
        let es = ElasticsearchIndex::new("http://localhost:9200/", Duration::from_secs(5)).unwrap();
        let url = es.url(&["posts", "_doc", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9200/posts/_doc/a%2Fb%20c");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ElasticsearchIndex::new("not a url", Duration::from_secs(5)).is_err());
    }

    #[tokio::test]
    #[ignore] // Requires a running Elasticsearch at localhost:9200
    async fn test_ping_live_cluster() {
        let es = ElasticsearchIndex::new("http://localhost:9200", Duration::from_secs(5)).unwrap();
        es.ping().await.unwrap();
    }
}
