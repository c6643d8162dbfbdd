use crate::traits::*;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// SerpAPI-style web search over HTTP GET.
pub struct SerpSearchBackend {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SerpSearchBackend {
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl SearchBackend for SerpSearchBackend {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ProviderError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("engine", "google"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, message });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let results: Vec<SearchResult> = json["organic_results"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|item| SearchResult {
                        title: item["title"].as_str().unwrap_or_default().to_string(),
                        snippet: item["snippet"].as_str().unwrap_or_default().to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!("search returned {} results", results.len());

        Ok(results)
    }

    fn name(&self) -> &str {
        "SerpAPI"
    }
}
