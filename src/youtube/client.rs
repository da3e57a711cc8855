//! Reqwest-backed client for the RapidAPI `youtube-v31` proxy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{
    dto::{SearchListDto, VideoListDto},
    SearchRequest, UpstreamError, YoutubeApi,
};
use crate::config::YoutubeConfig;

const SEARCH_PARTS: &str = "snippet,id";
const VIDEO_PARTS: &str = "snippet,contentDetails,statistics";

pub struct RapidApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    api_host: Option<String>,
}

impl RapidApiClient {
    pub fn new(config: &YoutubeConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query);
        if let Some(key) = &self.api_key {
            request = request.header("x-rapidapi-key", key);
        }
        if let Some(host) = &self.api_host {
            request = request.header("x-rapidapi-host", host);
        }

        debug!(%url, "upstream request");
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "upstream returned error status");
            return Err(status_error(status, &body));
        }
        decode(&body)
    }
}

fn status_error(status: StatusCode, body: &[u8]) -> UpstreamError {
    let body = String::from_utf8_lossy(body);
    let body: String = body.chars().take(512).collect();
    UpstreamError::Status {
        status: status.as_u16(),
        body,
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, UpstreamError> {
    serde_json::from_slice(body)
        .map_err(|e| UpstreamError::Decode(format!("invalid upstream JSON payload: {e}")))
}

#[async_trait]
impl YoutubeApi for RapidApiClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchListDto, UpstreamError> {
        let mut query = vec![
            ("part", SEARCH_PARTS.to_owned()),
            ("type", "video".to_owned()),
            ("q", request.query.clone()),
            ("maxResults", request.max_results.to_string()),
        ];
        if let Some(token) = &request.page_token {
            query.push(("pageToken", token.clone()));
        }
        self.get_json("/search", &query).await
    }

    async fn videos(&self, ids: &[String]) -> Result<VideoListDto, UpstreamError> {
        let query = [("part", VIDEO_PARTS.to_owned()), ("id", ids.join(","))];
        self.get_json("/videos", &query).await
    }
}
