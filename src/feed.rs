use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use spdlog::{debug, error};

use crate::config::Feed;
use crate::post_collection::PostCollection;

/// Read only source of the post collection.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_posts(&self) -> Result<PostCollection>;
}

/// The published `posts.json`, fetched over plain HTTP.
pub struct HttpFeed {
    http: reqwest::Client,
    posts_url: String,
    cache_bust: bool,
    clock: fn() -> i64,
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl HttpFeed {
    pub fn new(feed: &Feed) -> Self {
        HttpFeed {
            http: reqwest::Client::new(),
            posts_url: feed.posts_url.clone(),
            cache_bust: feed.cache_bust,
            clock: now_millis,
        }
    }

    /// Replaces the source of the `t=` cache buster value.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    fn request_url(&self, now_millis: i64) -> String {
        if !self.cache_bust {
            return self.posts_url.clone();
        }

        let separator = if self.posts_url.contains('?') { '&' } else { '?' };
        format!("{}{}t={}", self.posts_url, separator, now_millis)
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    async fn fetch_posts(&self) -> Result<PostCollection> {
        let url = self.request_url((self.clock)());
        debug!("Fetching posts from {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            bail!("Failed to load posts: {}", response.status());
        }

        Ok(response.json::<PostCollection>().await?)
    }
}

/// Fetch failures are logged and read as an empty collection.
pub async fn load_posts(source: &dyn FeedSource) -> PostCollection {
    match source.fetch_posts().await {
        Ok(posts) => posts,
        Err(e) => {
            error!("Error fetching posts: {}", e);
            PostCollection::new()
        }
    }
}
