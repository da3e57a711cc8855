//! Wire shapes of the upstream `/search` and `/videos` responses and their
//! mapping into [`Video`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoDto {
    pub total_results: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListDto {
    #[serde(default)]
    pub items: Vec<SearchItemDto>,
    pub next_page_token: Option<String>,
    pub page_info: Option<PageInfoDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItemDto {
    pub id: SearchItemIdDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemIdDto {
    pub video_id: Option<String>,
}

impl SearchListDto {
    /// Video ids in result order; channel/playlist hits carry none and are skipped.
    pub fn video_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| item.id.video_id.clone())
            .filter(|id| !id.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoListDto {
    #[serde(default)]
    pub items: Vec<VideoItemDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItemDto {
    pub id: String,
    #[serde(default)]
    pub snippet: SnippetDto,
    pub content_details: Option<ContentDetailsDto>,
    pub statistics: Option<StatisticsDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub thumbnails: ThumbnailsDto,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThumbnailsDto {
    pub default: Option<ThumbnailDto>,
    pub medium: Option<ThumbnailDto>,
    pub high: Option<ThumbnailDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThumbnailDto {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentDetailsDto {
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsDto {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

/// The application's video shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub channel_title: String,
    pub published_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<String>,
}

impl ThumbnailsDto {
    fn best_url(&self) -> String {
        [&self.high, &self.medium, &self.default]
            .into_iter()
            .flatten()
            .map(|t| t.url.clone())
            .find(|url| !url.is_empty())
            .unwrap_or_default()
    }
}

impl From<VideoItemDto> for Video {
    fn from(item: VideoItemDto) -> Self {
        let thumbnail = item.snippet.thumbnails.best_url();
        let (view_count, like_count, comment_count) = match item.statistics {
            Some(s) => (s.view_count, s.like_count, s.comment_count),
            None => (None, None, None),
        };
        Self {
            video_id: item.id,
            title: item.snippet.title,
            description: item.snippet.description,
            thumbnail,
            channel_title: item.snippet.channel_title,
            published_at: item.snippet.published_at,
            duration: item.content_details.and_then(|c| c.duration),
            view_count,
            like_count,
            comment_count,
        }
    }
}
