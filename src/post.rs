use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::text_utils::parse_date;

#[derive(Debug, Clone, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl PostId {
    pub fn generate() -> Self {
        PostId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for PostId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the post collection, as stored in `posts.json`.
///
/// ```json
/// {
///   "id": "a63bd715-a3fe-4788-b0e1-2a3153778544",
///   "title": "What I learned",
///   "slug": "what-i-learned",
///   "date": "2022-04-02",
///   "image": "https://example.com/hero.png",
///   "summary": "How to be a great software engineer?",
///   "content": "<p>...</p>",
///   "tags": ["career", "rust"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub content: String,
    pub tags: Vec<String>,
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, date={}, slug={}\ntitle={}\ntags={}",
               self.id,
               self.date,
               self.slug,
               self.title,
               join_tags(&self.tags),
        )
    }
}

impl Post {
    /// Hero image, if any. Editors store an empty string when no image was given.
    pub fn hero_image(&self) -> Option<&str> {
        self.image.as_deref().filter(|img| !img.trim().is_empty())
    }

    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date).ok()
    }
}

/// Newest first. Posts whose date can't be parsed go to the end, keeping their relative order.
pub fn compare_by_date_desc(a: &Post, b: &Post) -> Ordering {
    match (a.parsed_date(), b.parsed_date()) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Splits the comma separated tag input of the editor.
pub fn parse_tags(tags_str: &str) -> Vec<String> {
    tags_str.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Derives a slug from a post title.
///
/// Lowercases, drops every character that isn't an ASCII word character or a space
/// and turns each run of spaces into a single hyphen.
pub fn slugify(title: &str) -> String {
    lazy_static! {
        static ref NON_WORD_REGEX: Regex = Regex::new(r"[^A-Za-z0-9_ ]+").unwrap();
        static ref SPACES_REGEX: Regex = Regex::new(r" +").unwrap();
    }

    let lower = title.to_lowercase();
    let word_only = NON_WORD_REGEX.replace_all(&lower, "");
    SPACES_REGEX.replace_all(&word_only, "-").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!  Foo"), "hello-world-foo");
        assert_eq!(slugify("Rust 2024: what's new?"), "rust-2024-whats-new");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
        assert_eq!(slugify("Café au lait"), "caf-au-lait");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slugify_keeps_edge_spaces_as_hyphens() {
        assert_eq!(slugify(" leading and trailing "), "-leading-and-trailing-");
    }

    #[test]
    fn test_parse_tags() {
        let tags = parse_tags(" rust, web ,, ,cms ");
        assert_eq!(tags, ["rust", "web", "cms"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_join_tags() {
        let tags = vec!["rust".to_string(), "web".to_string()];
        assert_eq!(join_tags(&tags), "rust, web");
        assert_eq!(parse_tags(&join_tags(&tags)), tags);
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let first = PostId::generate();
        let second = PostId::generate();
        assert!(!first.is_empty());
        assert_ne!(first, second);
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let post: Post = serde_json::from_str(r#"{"id": "1", "title": "T", "slug": "t", "date": "2024-03-03"}"#).unwrap();
        assert_eq!(post.id, PostId("1".to_string()));
        assert!(post.tags.is_empty());
        assert_eq!(post.image, None);
        assert_eq!(post.summary_text(), "");
        assert_eq!(post.content, "");
    }

    #[test]
    fn test_hero_image_ignores_empty() {
        let mut post = Post { image: Some("  ".to_string()), ..Default::default() };
        assert_eq!(post.hero_image(), None);
        post.image = Some("https://img/x.png".to_string());
        assert_eq!(post.hero_image(), Some("https://img/x.png"));
    }

    #[test]
    fn test_compare_by_date_desc() {
        let older = Post { date: "2023-01-10".to_string(), ..Default::default() };
        let newer = Post { date: "2024-03-03".to_string(), ..Default::default() };
        let broken = Post { date: "not a date".to_string(), ..Default::default() };
        assert_eq!(compare_by_date_desc(&newer, &older), Ordering::Less);
        assert_eq!(compare_by_date_desc(&older, &newer), Ordering::Greater);
        assert_eq!(compare_by_date_desc(&broken, &older), Ordering::Greater);
        assert_eq!(compare_by_date_desc(&broken, &broken), Ordering::Equal);
    }
}
