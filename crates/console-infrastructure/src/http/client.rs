//! Thin JSON client for the admin REST API.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use console_core::ConsoleError;
use console_core::config::ApiConfig;

use crate::dto::{Envelope, ErrorBody, StatusDto};

/// Shared HTTP client. One instance serves every resource.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ConsoleError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ConsoleError::config(format!("Invalid API base URL '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConsoleError::config(format!(
                "API base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConsoleError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL. Segments are percent-encoded,
    /// so ids never escape their slot.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ConsoleError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConsoleError::config("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET with query parameters, decoding an optionally enveloped payload.
    pub async fn get_json<T>(&self, segments: &[&str], query: &[(String, String)]) -> Result<T, ConsoleError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let request = self.client.get(url).query(query);
        let response = self.send(request).await?;
        decode(response).await
    }

    /// Sends a request with an optional JSON body and decodes the payload.
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, ConsoleError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.dispatch(method, segments, body).await?;
        decode(response).await
    }

    /// Sends a request whose response body is not needed.
    pub async fn send_empty<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<(), ConsoleError>
    where
        B: Serialize + ?Sized,
    {
        let response = self.dispatch(method, segments, body).await?;
        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<StatusDto>(&text)
            .ok()
            .and_then(|status| status.failure())
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn dispatch<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Response, ConsoleError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await
    }

    async fn send(&self, mut request: RequestBuilder) -> Result<Response, ConsoleError> {
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body));
        }
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ConsoleError> {
    let text = response
        .text()
        .await
        .map_err(|e| ConsoleError::request(None, format!("Failed to read response: {e}")))?;
    // `{"success": false}` with a 2xx status still counts as a failure
    if let Some(err) = serde_json::from_str::<StatusDto>(&text)
        .ok()
        .and_then(|status| status.failure())
    {
        return Err(err);
    }
    let envelope: Envelope<T> = serde_json::from_str(&text)?;
    envelope.into_data()
}

/// Maps a non-2xx response to a request error, preferring the server's
/// own `message` when the body carries one.
pub fn map_http_error(status: StatusCode, body: &str) -> ConsoleError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.message)
        .ok()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        });
    ConsoleError::request(Some(status.as_u16()), message)
}

fn map_transport_error(err: reqwest::Error) -> ConsoleError {
    let message = if err.is_timeout() {
        format!("Request timed out: {err}")
    } else if err.is_connect() {
        format!("Cannot reach server: {err}")
    } else {
        format!("Request failed: {err}")
    };
    ConsoleError::request(err.status().map(|s| s.as_u16()), message)
}

/// Turns a 404 into `NotFound` for requests that addressed a single record.
pub(crate) fn not_found_as(err: ConsoleError, entity_type: &'static str, id: &str) -> ConsoleError {
    match err {
        ConsoleError::Request {
            status: Some(404), ..
        } => ConsoleError::not_found(entity_type, id),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let api = client("http://localhost:5000/api");
        assert_eq!(
            api.endpoint(&["modules", "m1", "toggle-active"]).unwrap().as_str(),
            "http://localhost:5000/api/modules/m1/toggle-active"
        );

        let trailing = client("http://localhost:5000/api/");
        assert_eq!(
            trailing.endpoint(&["lookups", "countries"]).unwrap().as_str(),
            "http://localhost:5000/api/lookups/countries"
        );
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let api = client("http://localhost:5000/api");
        assert_eq!(
            api.endpoint(&["modules", "a/b c"]).unwrap().as_str(),
            "http://localhost:5000/api/modules/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new(&ApiConfig {
            base_url: "not a url".to_string(),
            ..ApiConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }

    #[test]
    fn test_map_http_error_prefers_server_message() {
        let err = map_http_error(
            StatusCode::CONFLICT,
            r#"{"success": false, "message": "name already taken"}"#,
        );
        assert_eq!(err, ConsoleError::request(Some(409), "name already taken"));
    }

    #[test]
    fn test_map_http_error_falls_back_to_reason() {
        let err = map_http_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(
            err,
            ConsoleError::request(Some(500), "Internal Server Error")
        );

        let plain = map_http_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(plain, ConsoleError::request(Some(502), "upstream down"));
    }

    #[test]
    fn test_not_found_only_for_404() {
        let err = not_found_as(ConsoleError::request(Some(404), "gone"), "module", "m1");
        assert_eq!(err, ConsoleError::not_found("module", "m1"));

        let other = not_found_as(ConsoleError::request(Some(500), "boom"), "module", "m1");
        assert!(matches!(other, ConsoleError::Request { status: Some(500), .. }));
    }
}
