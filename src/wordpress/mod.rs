//! WordPress REST API client.
//!
//! Creates posts via `POST /wp-json/wp/v2/posts` using application
//! password authentication.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::WordPressConfig;
use crate::error::{DewdropError, Result};

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Total request timeout in seconds.
const TOTAL_TIMEOUT_SECS: u64 = 60;

/// User agent string for API calls.
const USER_AGENT: &str = "dewdrop/0.1 (feed digest curator)";

/// Maximum length of an error body included in error messages.
const MAX_ERROR_BODY: usize = 200;

/// Remote post status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStatus {
    /// Saved as a draft on the remote side.
    Draft,
    /// Published immediately.
    Publish,
}

impl PostStatus {
    /// Wire value for the REST API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Publish => "publish",
        }
    }
}

/// Request body for creating a post.
#[derive(Debug, Serialize)]
struct NewPost<'a> {
    title: &'a str,
    content: &'a str,
    status: &'a str,
}

/// Post record returned by the publish call.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishedPost {
    /// Remote post identifier.
    pub id: u64,
    /// Post URL, when the API provides one.
    #[serde(default)]
    pub link: Option<String>,
}

/// WordPress REST API client.
pub struct WordPressClient {
    client: Client,
    site_url: String,
    username: String,
    app_password: String,
}

impl WordPressClient {
    /// Create a client from the WordPress configuration.
    pub fn new(config: &WordPressConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(TOTAL_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DewdropError::WordPress(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            site_url: config.site_url.clone(),
            username: config.username.clone(),
            app_password: config.app_password.clone(),
        })
    }

    /// Create a post with the given title, content, and status.
    ///
    /// Returns the remote post record on success.
    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        status: PostStatus,
    ) -> Result<PublishedPost> {
        let endpoint = posts_endpoint(&self.site_url);
        debug!("Creating {} post at {}", status.as_str(), endpoint);

        let body = NewPost {
            title,
            content,
            status: status.as_str(),
        };

        let response = self
            .client
            .post(&endpoint)
            .basic_auth(&self.username, Some(&self.app_password))
            .json(&body)
            .send()
            .await
            .map_err(|e| DewdropError::WordPress(format!("request failed: {}", e)))?;

        let http_status = response.status();
        if !http_status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DewdropError::WordPress(format!(
                "HTTP {}: {}",
                http_status,
                truncate_body(&body)
            )));
        }

        response
            .json::<PublishedPost>()
            .await
            .map_err(|e| DewdropError::WordPress(format!("unexpected response: {}", e)))
    }
}

/// Build the posts endpoint from a site base URL.
fn posts_endpoint(site_url: &str) -> String {
    format!("{}/wp-json/wp/v2/posts", site_url.trim_end_matches('/'))
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= MAX_ERROR_BODY {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX_ERROR_BODY).collect();
        format!("{cut}...")
    }
}
