use crate::domain::ports::LlmService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{error, info, warn, instrument};
use std::time::Duration;
use tokio::time::sleep;

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;
const GENERATE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// Gemini REST client returning the model's raw JSON text answer.
pub struct GeminiService {
    client: Client,
    url: String,
}

impl Default for GeminiService {
    fn default() -> Self {
        Self::new()
    }
}

impl GeminiService {
    pub fn new() -> Self {
        Self::with_url(GENERATE_URL.to_string())
    }

    pub fn with_url(url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            url,
        }
    }

    async fn send_request_with_retry(&self, api_key: &str, payload: &Value) -> Result<String, AppError> {
        let mut retries = 0;
        let mut backoff = INITIAL_BACKOFF_MS;

        loop {
            let res = self.client.post(&self.url)
                .header("x-goog-api-key", api_key)
                .json(payload)
                .send()
                .await;

            match res {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: Value = response.json().await.map_err(|e| {
                            error!("Failed to parse Gemini response JSON: {:?}", e);
                            AppError::GenerationFailure("unreadable provider response".into())
                        })?;
                        return extract_content(&body);
                    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if retries >= MAX_RETRIES {
                            error!("Gemini API failed after {} retries. Status: {}", retries, status);
                            let text = response.text().await.unwrap_or_default();
                            return Err(AppError::GenerationFailure(format!("AI Provider Error: {} - {}", status, text)));
                        }
                        warn!("Gemini API transient error {}. Retrying in {}ms...", status, backoff);
                    } else {
                        let text = response.text().await.unwrap_or_default();
                        error!("Gemini API Terminal Error {}: {}", status, text);
                        return Err(AppError::GenerationFailure(format!("AI Request Rejected: {} - {}", status, text)));
                    }
                },
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        error!("Gemini Network Error after {} retries: {:?}", retries, e);
                        return Err(AppError::GenerationFailure(format!("AI Network Error: {}", e)));
                    }
                    warn!("Gemini Network Error. Retrying in {}ms... {:?}", backoff, e);
                }
            }

            sleep(Duration::from_millis(backoff)).await;
            retries += 1;
            backoff *= 2;
        }
    }
}

/// Pulls the first candidate's text. A candidate without text yields an empty
/// string, which callers treat as "no output".
fn extract_content(body: &Value) -> Result<String, AppError> {
    let Some(first) = body.get("candidates").and_then(|c| c.as_array()).and_then(|c| c.first()) else {
        warn!("Gemini returned no candidates: {:?}", body);
        return Ok(String::new());
    };

    if let Some(finish_reason) = first.get("finishReason").and_then(|s| s.as_str())
        && finish_reason != "STOP" {
            warn!("AI generation stopped abnormally. Reason: {}", finish_reason);
            if finish_reason == "SAFETY" {
                return Err(AppError::GenerationFailure("AI content generation blocked by safety filters.".to_string()));
            }
        }

    let text = first.get("content")
        .and_then(|content| content.get("parts"))
        .and_then(|p| p.as_array())
        .and_then(|parts| parts.first())
        .and_then(|part| part.get("text"))
        .and_then(|t| t.as_str())
        .unwrap_or_default();

    // Clean up markdown code fences if present
    let cleaned_text = text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    Ok(cleaned_text.to_string())
}

#[async_trait]
impl LlmService for GeminiService {
    #[instrument(skip(self, api_key, system_instruction), fields(prompt_len = prompt.len()))]
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        system_instruction: &str
    ) -> Result<String, AppError> {
        let payload = json!({
            "contents": [{
                "parts": [{"text": prompt}]
            }],
            "systemInstruction": {
                "parts": [{"text": system_instruction}]
            },
            "generationConfig": {
                "temperature": 0.2,
                "maxOutputTokens": 2000,
                "responseMimeType": "application/json"
            }
        });

        info!("Sending generation request to Gemini...");
        let result = self.send_request_with_retry(api_key, &payload).await?;
        info!("Gemini answered with {} characters", result.len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content_strips_fences() {
        let body = json!({
            "candidates": [{
                "finishReason": "STOP",
                "content": { "parts": [{ "text": "```json\n{\"suggestedTimes\": []}\n```" }] }
            }]
        });
        assert_eq!(extract_content(&body).unwrap(), "{\"suggestedTimes\": []}");
    }

    #[test]
    fn test_extract_content_without_candidates_is_empty() {
        assert_eq!(extract_content(&json!({})).unwrap(), "");
    }

    #[test]
    fn test_safety_block_is_generation_failure() {
        let body = json!({ "candidates": [{ "finishReason": "SAFETY" }] });
        assert!(matches!(extract_content(&body), Err(AppError::GenerationFailure(_))));
    }
}
