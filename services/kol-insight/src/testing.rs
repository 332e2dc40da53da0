//! Test fixtures.

use chrono::{TimeZone, Utc};

use crate::types::{CommodityTag, InteractionMetrics, Post, PostSource};

/// Builder for post fixtures. Defaults to a short system post at 09:00 Taipei time.
pub(crate) struct PostBuilder {
    post: Post,
}

impl PostBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            post: Post {
                id: id.to_string(),
                created_at: Utc.with_ymd_and_hms(2024, 3, 1, 1, 0, 0).unwrap(),
                title: "測試貼文".to_string(),
                body: "今天盤勢整理".to_string(),
                kol_serial: "101".to_string(),
                source: PostSource::System,
                topic_id: None,
                commodity_tags: Vec::new(),
                metrics: InteractionMetrics::default(),
            },
        }
    }

    pub fn utc_hour(mut self, hour: u32) -> Self {
        self.post.created_at = Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap();
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.post.title = title.to_string();
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.post.body = body.to_string();
        self
    }

    pub fn kol(mut self, serial: &str) -> Self {
        self.post.kol_serial = serial.to_string();
        self
    }

    pub fn topic(mut self, topic_id: &str) -> Self {
        self.post.topic_id = Some(topic_id.to_string());
        self
    }

    pub fn external(mut self) -> Self {
        self.post.source = PostSource::External;
        self
    }

    pub fn tags(mut self, symbols: &[&str]) -> Self {
        self.post.commodity_tags = symbols
            .iter()
            .map(|s| CommodityTag {
                symbol: s.to_string(),
                tag_type: "Stock".to_string(),
                bullish: Some(true),
            })
            .collect();
        self
    }

    pub fn likes(mut self, n: u64) -> Self {
        self.post.metrics.likes = n;
        self
    }

    pub fn comments(mut self, n: u64) -> Self {
        self.post.metrics.comments = n;
        self
    }

    pub fn views(mut self, n: u64) -> Self {
        self.post.metrics.views = n;
        self
    }

    pub fn build(self) -> Post {
        self.post
    }
}
