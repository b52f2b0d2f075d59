//! Client for the third-party horoscope API.

use std::time::Duration;

use http::StatusCode;
use serde_json::value::RawValue;
use tracing::{debug, warn};

use crate::error::{Error, RelayError};

const DAILY_PATH: &str = "/api/v1/get-horoscope/daily";

/// The upstream API: a base URL and a pooled HTTP client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct Upstream {
    client: reqwest::Client,
    base_url: String,
}

impl Upstream {
    /// `timeout` bounds each outbound call end to end; `None` waits forever.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, Error> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if let Err(source) = url::Url::parse(&base_url) {
            return Err(Error::UpstreamUrl { url: base_url, source });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self { client: builder.build()?, base_url })
    }

    /// Daily-horoscope URL with `sign` and `day` placed into the query
    /// string as given.
    pub fn daily_url(&self, sign: &str, day: &str) -> String {
        format!("{}{DAILY_PATH}?sign={sign}&day={day}", self.base_url)
    }

    /// Fetches the daily horoscope and returns the upstream JSON untouched.
    ///
    /// The body is checked to be one well-formed JSON value but never decoded,
    /// so numbers of any size and key order survive as sent. Only `200 OK`
    /// counts as success. The body of any other status is discarded.
    pub async fn daily(&self, sign: &str, day: &str) -> Result<Box<RawValue>, RelayError> {
        let url = self.daily_url(sign, day);
        debug!(%url, "fetching daily horoscope");

        let res = self.client.get(&url).send().await.map_err(|e| {
            warn!(%url, "upstream unreachable: {e}");
            RelayError::Network(e)
        })?;

        let status = res.status();
        if status != StatusCode::OK {
            warn!(%url, status = status.as_u16(), "upstream returned non-200");
            return Err(RelayError::Upstream { status });
        }

        let body = res.bytes().await.map_err(RelayError::Network)?;
        Ok(serde_json::from_slice::<Box<RawValue>>(&body)?)
    }
}
