//! Record Fetcher.
//!
//! Resolves the display title of a record once its detail tab opens. Fetches
//! run off the UI path; a response that arrives after the tab was closed is
//! simply dropped by the registry's no-op update.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

use crate::types::errors::FetchError;
use crate::types::route::TitleRequest;

/// Characters left as-is inside a URL path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Fields tried after the configured one.
const FALLBACK_TITLE_FIELDS: &[&str] = &["title", "name"];

/// Builds `<base>/pages/<page>[/<subpage>]/records/<record>`.
pub fn record_url(base_url: &str, request: &TitleRequest) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();
    url.push_str("/pages/");
    url.extend(utf8_percent_encode(&request.page_id, SEGMENT));
    if let Some(sub) = &request.sub_page_id {
        url.push('/');
        url.extend(utf8_percent_encode(sub, SEGMENT));
    }
    url.push_str("/records/");
    url.extend(utf8_percent_encode(&request.record_id, SEGMENT));
    url
}

/// Reads the title out of a record body.
///
/// The configured field is tried first, then `title` and `name`; a body of
/// the form `{"data": {...}}` is unwrapped once.
pub fn extract_title(body: &Value, title_field: &str) -> Result<String, FetchError> {
    let record = match body {
        Value::Object(map) => match map.get("data") {
            Some(Value::Object(inner)) if !map.contains_key(title_field) => inner,
            _ => map,
        },
        other => {
            return Err(FetchError::InvalidResponse(format!(
                "expected a JSON object, got {}",
                other
            )))
        }
    };

    std::iter::once(title_field)
        .chain(FALLBACK_TITLE_FIELDS.iter().copied())
        .filter_map(|field| record.get(field))
        .filter_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .next()
        .ok_or_else(|| FetchError::MissingTitle(title_field.to_string()))
}

#[cfg(feature = "network")]
pub use http::HttpRecordFetcher;

#[cfg(feature = "network")]
mod http {
    use std::time::Duration;

    use super::{extract_title, record_url};
    use crate::types::errors::FetchError;
    use crate::types::route::TitleRequest;
    use crate::types::settings::ApiSettings;

    /// reqwest-backed title fetcher.
    #[derive(Clone)]
    pub struct HttpRecordFetcher {
        client: reqwest::Client,
        base_url: String,
        title_field: String,
    }

    impl HttpRecordFetcher {
        pub fn new(api: &ApiSettings) -> Result<Self, FetchError> {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(api.timeout_secs))
                .build()
                .map_err(|e| FetchError::NetworkError(e.to_string()))?;
            Ok(Self {
                client,
                base_url: api.base_url.clone(),
                title_field: api.title_field.clone(),
            })
        }

        pub async fn fetch_title(&self, request: &TitleRequest) -> Result<String, FetchError> {
            let url = record_url(&self.base_url, request);
            log::debug!("fetching title for tab {} from {}", request.tab_id, url);

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| FetchError::NetworkError(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::HttpStatus(status.as_u16()));
            }

            let body: serde_json::Value = response
                .json()
                .await
                .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;
            extract_title(&body, &self.title_field)
        }
    }
}
