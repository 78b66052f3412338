//! Google Translate backend.
//!
//! Uses the public `translate_a/single` endpoint (the one the web widget
//! calls), so no API key is needed.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tarjimon_core::{error::TarjimonError, traits::Translator};
use tracing::debug;

/// Google Translate over HTTP.
pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslator {
    /// Create a translator whose requests give up after `timeout`.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, TarjimonError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TarjimonError::Translator(format!("http client init failed: {e}")))?;
        Ok(Self { client, base_url })
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body is a nested array: `[[["<translated>", "<original>", ...], ...], ...]`.
pub(crate) fn parse_response(body: &Value) -> Result<String, TarjimonError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TarjimonError::Translator("unexpected response shape".into()))?;

    let translated: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(TarjimonError::Translator("empty translation returned".into()));
    }
    Ok(translated)
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(
        &self,
        source: &str,
        target: &str,
        text: &str,
    ) -> Result<String, TarjimonError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let url = format!("{}/translate_a/single", self.base_url.trim_end_matches('/'));
        debug!("google: GET {url} sl={source} tl={target}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TarjimonError::Translator(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(TarjimonError::Translator(format!(
                "google API error {status}: {body}"
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| TarjimonError::Translator(format!("response parse failed: {e}")))?;

        parse_response(&body)
    }
}
