use crate::error::{PhiloError, Result};

pub async fn check_response_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(
            status = %status,
            error = %error_text,
            "API request failed"
        );
        return Err(PhiloError::Api(format!(
            "API request failed with status {}: {}",
            status,
            error_message(&error_text)
        )));
    }
    Ok(response)
}

/// Chat endpoints return errors as `{"error": {"message": ...}}`; fall back
/// to the raw body when that shape is missing.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
