//! Browser data fetching over the async `reqwest` client (fetch API).

use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::api::{ApiConfig, FetchError, RawResponse};
use crate::model::{NewItemsData, ShopData, StatsData};

#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    client: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    async fn get(&self, url: &str, authorized: bool) -> Result<RawResponse, FetchError> {
        let mut request = self.client.get(url);
        if authorized && let Some(key) = &self.config.api_key {
            request = request.header(reqwest::header::AUTHORIZATION, key);
        }
        let response = request
            .send()
            .await
            .map_err(|err| FetchError::transport(url, err))?;
        let http_status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| FetchError::transport(url, err))?;
        debug!("GET {url} -> {http_status} ({} bytes)", body.len());
        Ok(RawResponse {
            url: url.to_string(),
            http_status,
            body,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str, authorized: bool) -> Result<T, FetchError> {
        self.get(url, authorized).await?.decode()
    }

    pub async fn fetch_shop(&self) -> Result<ShopData, FetchError> {
        self.fetch(&self.config.shop_url(), false).await
    }

    pub async fn fetch_new_items(&self) -> Result<NewItemsData, FetchError> {
        self.fetch(&self.config.new_items_url(), false).await
    }

    /// The catalog body, left undecoded so decoding can be shown as its own
    /// step.
    pub async fn download_cosmetics(&self) -> Result<RawResponse, FetchError> {
        self.get(&self.config.cosmetics_url(), false).await
    }

    pub async fn fetch_stats(&self, name: &str) -> Result<StatsData, FetchError> {
        let url = self.config.stats_url(name)?;
        self.fetch(&url, true).await
    }
}
