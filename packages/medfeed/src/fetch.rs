use std::{future::Future, time::Duration};

use thiserror::Error;
use url::Url;

/// Default timeout for a single page load.
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("medfeed/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timed out loading {0}")]
    Timeout(String),
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Loads the HTML of a page.
pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Fetches pages over HTTP with a shared client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // `charset` feature decodes Shift_JIS and EUC-JP pages from the header.
        response.text().await.map_err(|e| classify(url, e))
    }
}

fn classify(url: &Url, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(url.to_string())
    } else {
        FetchError::Request(err)
    }
}
