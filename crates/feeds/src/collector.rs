//! Social text aggregation.
//!
//! Gathers raw texts from the forum stream and the post search once per
//! cycle. A failing source degrades to an empty set and never aborts the
//! cycle.

use crate::{build_search_query, ForumSource, PostSearchSource};
use cryptoshark_core::AssetId;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tuning for one collection pass.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Forum community to read comments from.
    pub subreddit: String,
    /// Number of latest comments to read.
    pub comment_limit: usize,
    /// Maximum number of recent posts to request.
    pub max_posts: u32,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            subreddit: "CryptoCurrency".to_string(),
            comment_limit: 1000,
            max_posts: 100,
        }
    }
}

/// Collects raw texts from every configured source.
pub struct SocialTextCollector {
    config: CollectorConfig,
    forum: Option<Arc<dyn ForumSource>>,
    posts: Option<Arc<dyn PostSearchSource>>,
}

impl SocialTextCollector {
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            config,
            forum: None,
            posts: None,
        }
    }

    pub fn with_forum(mut self, forum: Arc<dyn ForumSource>) -> Self {
        self.forum = Some(forum);
        self
    }

    pub fn with_post_search(mut self, posts: Arc<dyn PostSearchSource>) -> Self {
        self.posts = Some(posts);
        self
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Latest forum comments, or an empty set on any failure.
    pub async fn collect_forum_comments(&self, subreddit: &str, limit: usize) -> Vec<String> {
        let Some(ref forum) = self.forum else {
            debug!("Forum source not configured, skipping comments");
            return Vec::new();
        };
        match forum.comments(subreddit, limit).await {
            Ok(texts) => texts,
            Err(e) => {
                warn!(
                    source = "forum",
                    transient = e.is_transient(),
                    error = %e,
                    "Forum fetch failed, skipping comments this run"
                );
                Vec::new()
            }
        }
    }

    /// Recent posts matching `query`, or an empty set on any failure.
    pub async fn collect_recent_posts(&self, query: &str, max_results: u32) -> Vec<String> {
        let Some(ref posts) = self.posts else {
            debug!("Post search not configured, skipping posts");
            return Vec::new();
        };
        match posts.recent_posts(query, max_results).await {
            Ok(texts) => texts,
            Err(e) => {
                warn!(
                    source = "post_search",
                    transient = e.is_transient(),
                    error = %e,
                    "Post search failed, skipping posts this run"
                );
                Vec::new()
            }
        }
    }

    /// Concatenation of both sources for a watch list. Duplicates are kept.
    pub async fn collect(&self, tickers: &[AssetId]) -> Vec<String> {
        let mut texts = self
            .collect_forum_comments(&self.config.subreddit, self.config.comment_limit)
            .await;
        let forum_count = texts.len();

        if let Some(query) = build_search_query(tickers) {
            texts.extend(self.collect_recent_posts(&query, self.config.max_posts).await);
        }

        debug!(
            forum = forum_count,
            posts = texts.len() - forum_count,
            "Collected social texts"
        );
        texts
    }
}
