//! Naturalization collaborator client
//!
//! Posts the deterministic draft plus structured turn metadata to an
//! external tone-adaptation service. The call is best-effort: the agent
//! bounds it with a timeout and falls back to the draft on any failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use shop_agent_core::{Error, NaturalizeRequest, Naturalizer, Result};

/// HTTP client for the naturalization service
pub struct HttpNaturalizer {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct NaturalizeResponse {
    text: String,
}

impl HttpNaturalizer {
    /// Build a client with a per-call timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Naturalization(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Naturalizer for HttpNaturalizer {
    async fn naturalize(&self, request: &NaturalizeRequest, tone: &str) -> Result<String> {
        let payload = serde_json::json!({
            "intent": request.intent,
            "draft": request.draft,
            "product": request.product,
            "category": request.category,
            "model": request.model,
            "count": request.count,
            "cross": request.cross,
            "ask": request.ask,
            "tone": tone,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Naturalization(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Naturalization(format!(
                "status {}",
                response.status()
            )));
        }

        let body: NaturalizeResponse = response
            .json()
            .await
            .map_err(|e| Error::Naturalization(e.to_string()))?;

        if body.text.trim().is_empty() {
            return Err(Error::Naturalization("empty rewrite".into()));
        }
        Ok(body.text)
    }
}
