//! HTTP endpoint serving a JSON array of service records.

use async_trait::async_trait;
use std::time::Duration;

use super::{FetchError, RegistryFetcher, ServiceRecord};

pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(url: String, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl RegistryFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<Vec<ServiceRecord>, FetchError> {
        let records = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<ServiceRecord>>()
            .await?;
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
