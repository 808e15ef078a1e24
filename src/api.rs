//! Remote API boundary: endpoint construction and response envelope decoding.
//!
//! Transport lives in the runtimes (blocking `reqwest` natively, async on the
//! web). Both funnel the raw body through [`decode_envelope`] so error
//! classification is identical on every platform.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::Envelope;

pub const DEFAULT_BASE_URL: &str = "https://fortnite-api.com";

/// Environment variable holding the API key for the stats endpoint.
pub const API_KEY_ENV: &str = "FORTNITE_API_KEY";

/// Failure of a single remote fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    /// The service answered with a non-success status, either at the HTTP
    /// level or inside the envelope.
    #[error("{url} returned status {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },
    /// The body could not be decoded.
    #[error("failed to parse response from {url}: {message}")]
    Parse { url: String, message: String },
}

impl FetchError {
    pub fn transport(url: &str, err: impl std::fmt::Display) -> Self {
        FetchError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Sent as the `Authorization` header on stats lookups.
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn shop_url(&self) -> String {
        self.endpoint("/v2/shop")
    }

    pub fn new_items_url(&self) -> String {
        self.endpoint("/v2/cosmetics/new")
    }

    pub fn cosmetics_url(&self) -> String {
        self.endpoint("/v2/cosmetics")
    }

    /// Stats lookup URL with the username query-encoded.
    pub fn stats_url(&self, name: &str) -> Result<String, FetchError> {
        let base = self.endpoint("/v2/stats/br/v2");
        reqwest::Url::parse_with_params(&base, [("name", name)])
            .map(String::from)
            .map_err(|err| FetchError::transport(&base, err))
    }
}

/// Decodes a `{ status, data, error }` envelope.
///
/// Any envelope status other than 200, or a missing `data` payload, is a
/// [`FetchError::Status`]. An unparseable body is a [`FetchError::Parse`],
/// unless the HTTP status already signalled failure.
pub fn decode_envelope<T: DeserializeOwned>(
    url: &str,
    http_status: u16,
    body: &str,
) -> Result<T, FetchError> {
    let envelope: Envelope<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(err) if (200..300).contains(&http_status) => {
            return Err(FetchError::Parse {
                url: url.to_string(),
                message: err.to_string(),
            });
        }
        Err(_) => {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: http_status,
                message: "unexpected response body".to_string(),
            });
        }
    };

    if envelope.status != 200 {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: envelope.status,
            message: envelope.error.unwrap_or_default(),
        });
    }

    envelope.data.ok_or_else(|| FetchError::Status {
        url: url.to_string(),
        status: envelope.status,
        message: "response carried no data".to_string(),
    })
}

/// A response read to the end but not yet decoded. Lets a runtime report
/// downloading and decoding as separate steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub url: String,
    pub http_status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        decode_envelope(&self.url, self.http_status, &self.body)
    }
}
