// src/model/cluster.rs
use serde::{Deserialize, Serialize};

use crate::format::format_tag_value;

/// Categorical flags attached to a comment or cluster, in server order.
pub type TagMap = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub danger: Option<bool>,
    #[serde(default)]
    pub sentiment: Option<i64>,
    #[serde(default)]
    pub importance_score: Option<f64>,
    #[serde(default)]
    pub tags: Option<TagMap>,
}

impl Comment {
    pub fn sentiment_label(&self) -> &'static str {
        match self.sentiment {
            Some(1) => "Positive",
            Some(0) => "Negative",
            _ => "N/A",
        }
    }

    pub fn danger_label(&self) -> &'static str {
        if self.danger == Some(true) { "Yes" } else { "No" }
    }

    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => "N/A",
        }
    }
}

/// A ranked group of similar comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub cluster_id: i64,
    pub score: f64,
    pub comment_count: u64,
    pub representative_text: String,
    #[serde(default)]
    pub tags: Option<TagMap>,
    #[serde(default)]
    pub comments_examples: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterDetail {
    pub cluster_id: i64,
    pub representative_text: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagBadge {
    pub name: String,
    pub value: f64,
    pub urgency: bool,
}

impl TagBadge {
    /// Ranking list text: just the name, or `name:value` for urgency.
    pub fn compact_label(&self) -> String {
        if self.urgency {
            format!("{}:{}", self.name, format_tag_value(self.value))
        } else {
            self.name.clone()
        }
    }

    /// Detail overlay text, which always carries the value.
    pub fn detail_label(&self) -> String {
        format!("{}: {}", self.name, format_tag_value(self.value))
    }
}

/// Tags worth a badge: value exactly 1, or the urgency tag with a value above 0.
pub fn tag_badges(tags: Option<&TagMap>, urgency_tag: &str) -> Vec<TagBadge> {
    let Some(tags) = tags else {
        return Vec::new();
    };

    tags.iter()
        .filter_map(|(name, value)| {
            let value = value.as_f64()?;
            let urgency = name == urgency_tag;
            if value == 1.0 || (urgency && value > 0.0) {
                Some(TagBadge { name: name.clone(), value, urgency })
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URGENCY: &str = "緊急性";

    fn tags(value: serde_json::Value) -> TagMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn badge_iff_one_or_positive_urgency() {
        let map = tags(json!({
            "要望": 1,
            "質問": 0,
            "不満": 2,
            "称賛": 1.0,
            "緊急性": 3,
            "flag": true,
            "note": "1"
        }));
        let badges = tag_badges(Some(&map), URGENCY);
        let names: Vec<_> = badges.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["要望", "称賛", "緊急性"]);
    }

    #[test]
    fn urgency_needs_strictly_positive_value() {
        let zero = tags(json!({"緊急性": 0}));
        assert!(tag_badges(Some(&zero), URGENCY).is_empty());

        let negative = tags(json!({"緊急性": -1}));
        assert!(tag_badges(Some(&negative), URGENCY).is_empty());

        let fractional = tags(json!({"緊急性": 0.5}));
        assert_eq!(tag_badges(Some(&fractional), URGENCY).len(), 1);
    }

    #[test]
    fn other_tags_need_exactly_one() {
        let map = tags(json!({"要望": 0.5, "不満": 3}));
        assert!(tag_badges(Some(&map), URGENCY).is_empty());
    }

    #[test]
    fn labels() {
        let map = tags(json!({"緊急性": 2, "要望": 1}));
        let badges = tag_badges(Some(&map), URGENCY);
        assert_eq!(badges[0].compact_label(), "緊急性:2");
        assert_eq!(badges[1].compact_label(), "要望");
        assert_eq!(badges[1].detail_label(), "要望: 1");
    }

    #[test]
    fn no_tags_no_badges() {
        assert!(tag_badges(None, URGENCY).is_empty());
    }

    #[test]
    fn comment_labels() {
        let comment: Comment = serde_json::from_value(json!({
            "id": 1, "text": "板書が見えない", "sentiment": 0, "danger": null
        }))
        .unwrap();
        assert_eq!(comment.sentiment_label(), "Negative");
        assert_eq!(comment.danger_label(), "No");
        assert_eq!(comment.category_label(), "N/A");
    }
}
