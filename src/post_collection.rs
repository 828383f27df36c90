use std::slice::Iter;

use serde::{Deserialize, Serialize};

use crate::post::{compare_by_date_desc, Post, PostId};

/// The whole `posts.json` document. Order is the storage order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostCollection {
    posts: Vec<Post>,
}

impl From<Vec<Post>> for PostCollection {
    fn from(posts: Vec<Post>) -> Self {
        PostCollection { posts }
    }
}

impl PostCollection {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Post> {
        self.posts.iter()
    }

    pub fn as_slice(&self) -> &[Post] {
        self.posts.as_slice()
    }

    pub fn find_by_id(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|p| &p.id == id)
    }

    /// Slugs are not unique: the first post in storage order wins.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Replaces the post with the same id, or appends it. Returns true on replace.
    pub fn upsert(&mut self, post: Post) -> bool {
        match self.posts.iter().position(|p| p.id == post.id) {
            Some(idx) => {
                self.posts[idx] = post;
                true
            }
            None => {
                self.posts.push(post);
                false
            }
        }
    }

    pub fn remove(&mut self, id: &PostId) -> Option<Post> {
        let idx = self.posts.iter().position(|p| &p.id == id)?;
        Some(self.posts.remove(idx))
    }

    /// A sorted view, newest first. The collection itself is left untouched.
    pub fn sorted_by_date(&self) -> Vec<&Post> {
        let mut sorted: Vec<&Post> = self.posts.iter().collect();
        sorted.sort_by(|a, b| compare_by_date_desc(a, b));
        sorted
    }
}
