//! Interaction store seam.
//!
//! The analysis engine only needs an immutable snapshot of posts matching a
//! filter. Database-backed stores live with the surrounding services; the
//! in-memory store here backs tests and offline analysis of exported data.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::types::{Post, PostSource};

/// Snapshot filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFilter {
    /// Only posts by this KOL
    #[serde(default)]
    pub kol_serial: Option<String>,
    /// Inclusive lower bound on creation time
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// Exclusive upper bound on creation time
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    /// Whether posts written outside the system are included
    #[serde(default)]
    pub include_external: bool,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(ref kol) = self.kol_serial {
            if &post.kol_serial != kol {
                return false;
            }
        }
        if let Some(start) = self.start {
            if post.created_at < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if post.created_at >= end {
                return false;
            }
        }
        if !self.include_external && post.source == PostSource::External {
            return false;
        }
        true
    }
}

/// Source of post + interaction snapshots.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Fetch a finite snapshot of posts matching `filter`.
    async fn fetch_posts(&self, filter: &PostFilter) -> Result<Vec<Post>>;
}

/// Store holding posts in memory.
#[derive(Debug, Default)]
pub struct InMemoryInteractionStore {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryInteractionStore {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
        }
    }

    /// Add or replace a post snapshot (matched by id).
    pub async fn upsert(&self, post: Post) {
        let mut posts = self.posts.write().await;
        match posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => *existing = post,
            None => posts.push(post),
        }
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }
}

#[async_trait]
impl InteractionStore for InMemoryInteractionStore {
    async fn fetch_posts(&self, filter: &PostFilter) -> Result<Vec<Post>> {
        let posts = self.posts.read().await;
        let snapshot: Vec<Post> = posts.iter().filter(|p| filter.matches(p)).cloned().collect();
        tracing::debug!(
            matched = snapshot.len(),
            total = posts.len(),
            kol = ?filter.kol_serial,
            "Fetched post snapshot"
        );
        Ok(snapshot)
    }
}
