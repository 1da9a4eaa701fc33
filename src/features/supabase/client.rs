use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::core::config::SupabaseConfig;
use crate::core::error::{AppError, Result};
use crate::core::logging::Logger;
use crate::shared::types::{BackendError, BackendResponse};

/// HTTP client for one Supabase project.
///
/// Cloning is cheap; [`SupabaseClient::with_access_token`] yields a clone
/// whose requests run under a user's session instead of the API key.
#[derive(Clone)]
pub struct SupabaseClient {
    config: Arc<SupabaseConfig>,
    http_client: reqwest::Client,
    access_token: Option<String>,
    logger: Arc<Logger>,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig, logger: Arc<Logger>) -> Self {
        Self {
            config: Arc::new(config),
            http_client: reqwest::Client::new(),
            access_token: None,
            logger,
        }
    }

    /// Clone of this client authenticating as the session's user
    pub fn with_access_token(&self, access_token: &str) -> Self {
        Self {
            access_token: Some(access_token.to_string()),
            ..self.clone()
        }
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    pub(crate) fn logger(&self) -> &Logger {
        &self.logger
    }

    fn bearer_token(&self) -> &str {
        self.access_token
            .as_deref()
            .unwrap_or(&self.config.api_key)
    }

    /// Request carrying the project key and the current bearer token
    pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(self.bearer_token())
    }

    /// Send a request and collect status and raw body.
    /// Transport failures are the only errors returned here.
    pub(crate) async fn send(
        &self,
        context: &str,
        request: RequestBuilder,
    ) -> Result<(u16, String)> {
        let response = request.send().await.map_err(|e| {
            self.logger.error(context, format!("request failed: {}", e));
            AppError::ExternalServiceError(format!("{}: {}", context, e))
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            self.logger.error(context, format!("failed to read response body: {}", e));
            AppError::ExternalServiceError(format!("{}: {}", context, e))
        })?;

        self.logger.debug(context, format!("HTTP {}", status));
        Ok((status, body))
    }
}

/// Decode a backend answer into the `{data, error, status}` triple.
///
/// Success bodies must decode as `T` (an empty body yields `data: None`);
/// any non-2xx body is decoded as an error.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: u16,
    body: &str,
) -> Result<BackendResponse<T>> {
    if !(200..300).contains(&status) {
        return Ok(BackendResponse::failed(status, decode_error(status, body)));
    }

    if body.trim().is_empty() {
        return Ok(BackendResponse::ok(status, None));
    }

    let data = serde_json::from_str::<T>(body).map_err(|e| {
        AppError::ExternalServiceError(format!("Failed to parse backend response: {}", e))
    })?;

    Ok(BackendResponse::ok(status, Some(data)))
}

/// Union of the error shapes PostgREST, GoTrue and Storage answer with
#[derive(Debug, Default, Deserialize)]
struct RawErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<Value>,
    code: Option<Value>,
    error_code: Option<String>,
    details: Option<Value>,
    hint: Option<String>,
}

pub(crate) fn decode_error(status: u16, body: &str) -> BackendError {
    let Ok(raw) = serde_json::from_str::<RawErrorBody>(body) else {
        let text = body.trim();
        return if text.is_empty() {
            BackendError::new(format!("HTTP {}", status))
        } else {
            BackendError::new(text)
        };
    };

    let message = raw
        .message
        .or(raw.msg)
        .or(raw.error_description)
        .or_else(|| raw.error.as_ref().and_then(value_to_text))
        .unwrap_or_else(|| format!("HTTP {}", status));

    BackendError {
        message,
        code: raw.error_code.or_else(|| raw.code.as_ref().and_then(value_to_text)),
        details: raw.details.as_ref().and_then(value_to_text),
        hint: raw.hint,
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
