//! Upstream video API: the trait the services talk to and its HTTP adapter.

use async_trait::async_trait;

pub mod client;
pub mod dto;

pub use client::RapidApiClient;
pub use dto::Video;

use dto::{SearchListDto, VideoListDto};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: u32,
    pub page_token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    Decode(String),
}

#[async_trait]
pub trait YoutubeApi: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchListDto, UpstreamError>;

    /// Looks up full details for the given ids in one call.
    async fn videos(&self, ids: &[String]) -> Result<VideoListDto, UpstreamError>;
}
