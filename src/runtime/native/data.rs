//! Native data fetching over a blocking `reqwest` client.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use log::debug;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;

use crate::api::{self, ApiConfig, FetchError, RawResponse};
use crate::model::{NewItemsData, ShopData, StatsData};

#[derive(Debug, Clone, Copy)]
pub struct DownloadProgress {
    pub downloaded: u64,
    pub total: Option<u64>,
}

pub fn get_data_dir() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("com", "itemshop-tui", "itemshop-tui")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = project_dirs.data_dir().to_path_buf();
    fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

pub struct ApiClient {
    config: ApiConfig,
    client: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        // The full catalog is large; a slow link must not cut it off.
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn send(&self, url: &str, authorized: bool) -> Result<Response, FetchError> {
        let mut request = self.client.get(url);
        if authorized && let Some(key) = &self.config.api_key {
            request = request.header(reqwest::header::AUTHORIZATION, key);
        }
        request.send().map_err(|err| FetchError::transport(url, err))
    }

    fn fetch<T: DeserializeOwned>(&self, url: &str, authorized: bool) -> Result<T, FetchError> {
        let response = self.send(url, authorized)?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| FetchError::transport(url, err))?;
        debug!("GET {url} -> {status} ({} bytes)", body.len());
        api::decode_envelope(url, status, &body)
    }

    pub fn fetch_shop(&self) -> Result<ShopData, FetchError> {
        self.fetch(&self.config.shop_url(), false)
    }

    pub fn fetch_new_items(&self) -> Result<NewItemsData, FetchError> {
        self.fetch(&self.config.new_items_url(), false)
    }

    pub fn fetch_stats(&self, name: &str) -> Result<StatsData, FetchError> {
        let url = self.config.stats_url(name)?;
        self.fetch(&url, true)
    }

    /// Downloads the full catalog, reporting progress per chunk read. The
    /// body is returned undecoded so decoding can be shown as its own step.
    pub fn download_cosmetics_with_progress<F>(
        &self,
        mut on_progress: F,
    ) -> Result<RawResponse, FetchError>
    where
        F: FnMut(DownloadProgress),
    {
        let url = self.config.cosmetics_url();
        let mut response = self.send(&url, false)?;
        let http_status = response.status().as_u16();
        let total = response.content_length();

        let mut body = Vec::with_capacity(total.unwrap_or(0) as usize);
        let mut downloaded = 0u64;
        let mut buffer = [0u8; 65536];

        on_progress(DownloadProgress { downloaded, total });

        loop {
            let read = response
                .read(&mut buffer)
                .map_err(|err| FetchError::transport(&url, err))?;
            if read == 0 {
                break;
            }
            body.extend_from_slice(&buffer[..read]);
            downloaded += read as u64;
            on_progress(DownloadProgress { downloaded, total });
        }

        debug!("GET {url} -> {http_status} ({downloaded} bytes)");
        let body = String::from_utf8(body).map_err(|err| FetchError::Parse {
            url: url.clone(),
            message: err.to_string(),
        })?;
        Ok(RawResponse {
            url,
            http_status,
            body,
        })
    }
}
