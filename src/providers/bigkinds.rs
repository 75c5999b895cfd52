//! BigKinds-style news search client
//!
//! Thin reqwest adapter over the provider's JSON envelope
//! (`{return_object: {documents, total_hits}}`). Missing fields default
//! here so the core never sees shape drift.

use crate::errors::{ConciergeError, Result};
use crate::providers::NewsSearchProvider;
use crate::types::{NewsArticle, SearchPage, TodayIssue};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://tools.kinds.or.kr";

/// Request timeout (30 seconds)
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// News search API client
#[derive(Debug, Clone)]
pub struct BigkindsClient {
    client: Client,
    base_url: String,
    access_key: String,
}

impl BigkindsClient {
    pub fn new(access_key: &str) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, access_key)
    }

    pub fn with_base_url(base_url: &str, access_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ConciergeError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_envelope(&self, path: &str, argument: serde_json::Value) -> Result<Envelope> {
        let url = format!("{}{}", self.base_url, path);
        let body = ApiRequest {
            access_key: self.access_key.clone(),
            argument,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ConciergeError::SearchProvider(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ConciergeError::SearchProvider(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<Envelope>()
            .await
            .map_err(|e| ConciergeError::SearchProvider(format!("invalid envelope: {}", e)))
    }
}

#[async_trait]
impl NewsSearchProvider for BigkindsClient {
    async fn search(
        &self,
        query: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        page_size: usize,
    ) -> Result<SearchPage> {
        let argument = serde_json::json!({
            "query": query,
            "published_at": {
                "from": date_from.format("%Y-%m-%d").to_string(),
                "until": date_to.format("%Y-%m-%d").to_string(),
            },
            "sort": { "date": "desc" },
            "return_from": 0,
            "return_size": page_size,
            "fields": [
                "news_id", "title", "content", "provider",
                "published_at", "provider_link_page", "highlight"
            ],
        });

        let envelope = self.post_envelope("/search/news", argument).await?;
        Ok(SearchPage {
            documents: envelope.return_object.documents,
            total_hits: envelope.return_object.total_hits,
        })
    }

    async fn related_keywords(&self, keyword: &str, max_count: usize) -> Result<Vec<String>> {
        let argument = serde_json::json!({
            "query": keyword,
            "return_size": max_count,
        });

        let envelope = self.post_envelope("/word/related", argument).await?;
        Ok(envelope
            .return_object
            .related
            .into_iter()
            .take(max_count)
            .collect())
    }

    async fn issue_ranking(&self, date: NaiveDate) -> Result<Vec<TodayIssue>> {
        let argument = serde_json::json!({
            "date": date.format("%Y-%m-%d").to_string(),
        });

        let envelope = self.post_envelope("/issue_ranking", argument).await?;
        Ok(envelope.return_object.issues)
    }
}

#[derive(Debug, Serialize)]
struct ApiRequest {
    access_key: String,
    argument: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    return_object: ReturnObject,
}

#[derive(Debug, Default, Deserialize)]
struct ReturnObject {
    #[serde(default)]
    documents: Vec<NewsArticle>,
    #[serde(default)]
    total_hits: u64,
    #[serde(default)]
    related: Vec<String>,
    #[serde(default)]
    issues: Vec<TodayIssue>,
}
