use std::io;
use std::path::Path;

use spdlog::info;

use crate::feed::{load_posts, FeedSource};
use crate::query_string::QueryString;
use crate::view::list_renderer::ListRenderer;
use crate::view::post_renderer::PostRenderer;
use crate::view::templates::{read_template, LIST_TPL, POST_TPL};
use crate::view::RenderedPage;

pub const LOADING_POSTS_HTML: &str = r#"<div class="loading">Loading posts...</div>"#;
pub const LOADING_ARTICLE_HTML: &str = r#"<div class="loading">Loading article...</div>"#;
pub const NOT_SPECIFIED_HTML: &str = "<p>Post not found.</p>";
pub const NOT_FOUND_HTML: &str = r#"<h1>404 - Post Not Found</h1><p><a href="index.html">Back to Blog</a></p>"#;
pub const NOT_FOUND_TITLE: &str = "Post Not Found";

/// Read only rendering of the post collection for the blog pages.
pub struct PublicRenderer<'a> {
    list: ListRenderer<'a>,
    post: PostRenderer<'a>,
}

impl PublicRenderer<'static> {
    pub fn new(template_dir: Option<&Path>) -> io::Result<Self> {
        Ok(PublicRenderer {
            list: ListRenderer::new(read_template(template_dir, LIST_TPL)?)?,
            post: PostRenderer::new(read_template(template_dir, POST_TPL)?)?,
        })
    }
}

impl<'a> PublicRenderer<'a> {
    pub fn from_parts(list: ListRenderer<'a>, post: PostRenderer<'a>) -> Self {
        PublicRenderer { list, post }
    }

    /// Every post, newest first. An unreachable feed renders like an empty one.
    pub async fn render_list(&self, source: &dyn FeedSource) -> RenderedPage {
        let posts = load_posts(source).await;
        info!("Rendering list of {} posts", posts.len());

        let sorted = posts.sorted_by_date();
        RenderedPage::untitled(self.list.render(&sorted))
    }

    /// The post selected by the `slug` query parameter. Nothing is fetched without a slug.
    pub async fn render_single(&self, source: &dyn FeedSource, query: &QueryString) -> RenderedPage {
        let Some(slug) = query.get_slug() else {
            return RenderedPage::untitled(NOT_SPECIFIED_HTML);
        };

        let posts = load_posts(source).await;
        match posts.find_by_slug(slug) {
            None => {
                info!("Post not found for slug {}", slug);
                RenderedPage::not_found(NOT_FOUND_TITLE, NOT_FOUND_HTML)
            }
            Some(post) => RenderedPage::titled(post.title.as_str(), self.post.render(post)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use crate::post::{Post, PostId};
    use crate::post_collection::PostCollection;
    use crate::test_data::POSTS_JSON;

    use super::*;

    struct FakeFeed {
        posts: Option<PostCollection>,
        calls: AtomicUsize,
    }

    impl FakeFeed {
        fn with(posts: PostCollection) -> Self {
            FakeFeed { posts: Some(posts), calls: AtomicUsize::new(0) }
        }

        fn failing() -> Self {
            FakeFeed { posts: None, calls: AtomicUsize::new(0) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FeedSource for FakeFeed {
        async fn fetch_posts(&self) -> Result<PostCollection> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.posts.clone().ok_or_else(|| anyhow!("connection refused"))
        }
    }

    fn renderer() -> PublicRenderer<'static> {
        let list = ListRenderer::new("{{#post_list}}<{{date}}>{{/post_list}}{{^post_list}}No posts found.{{/post_list}}").unwrap();
        let post = PostRenderer::new("{{post_title}}|{{{post_content}}}").unwrap();
        PublicRenderer::from_parts(list, post)
    }

    fn post(id: &str, slug: &str, date: &str) -> Post {
        Post {
            id: PostId(id.to_string()),
            title: format!("Title {}", id),
            slug: slug.to_string(),
            date: date.to_string(),
            content: format!("<p>content {}</p>", id),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_render_list_newest_first() {
        let feed = FakeFeed::with(PostCollection::from(vec![
            post("1", "a", "2023-01-10"),
            post("2", "b", "2024-03-03"),
            post("3", "c", "2023-07-15"),
        ]));

        let page = renderer().render_list(&feed).await;
        assert_eq!(page.title, None);
        assert_eq!(page.body, "<March 3, 2024><July 15, 2023><January 10, 2023>");
    }

    #[tokio::test]
    async fn test_render_list_empty_and_failure() {
        let page = renderer().render_list(&FakeFeed::with(PostCollection::new())).await;
        assert_eq!(page.body, "No posts found.");

        let page = renderer().render_list(&FakeFeed::failing()).await;
        assert_eq!(page.body, "No posts found.");
    }

    #[tokio::test]
    async fn test_render_single_found() {
        let feed = FakeFeed::with(PostCollection::from_json(POSTS_JSON).unwrap());
        let page = renderer().render_single(&feed, &QueryString::from("slug=cafe-com-rust")).await;

        assert_eq!(page.title.as_deref(), Some("Café com Rust ☕"));
        assert!(!page.is_not_found());
        assert_eq!(page.body, "Café com Rust ☕|<p>Ownership – borrowing – lifetimes. 日本語もOK.</p>");
    }

    #[tokio::test]
    async fn test_render_single_duplicate_slug_takes_first() {
        let feed = FakeFeed::with(PostCollection::from(vec![
            post("1", "dup", "2023-01-10"),
            post("2", "dup", "2024-03-03"),
        ]));
        let page = renderer().render_single(&feed, &QueryString::with_slug("dup")).await;
        assert_eq!(page.title.as_deref(), Some("Title 1"));
    }

    #[tokio::test]
    async fn test_render_single_not_found() {
        let feed = FakeFeed::with(PostCollection::from_json(POSTS_JSON).unwrap());
        let page = renderer().render_single(&feed, &QueryString::from("slug=nope")).await;

        assert_eq!(page.title.as_deref(), Some(NOT_FOUND_TITLE));
        assert_eq!(page.body, NOT_FOUND_HTML);
        assert!(page.is_not_found());
        assert_eq!(feed.calls(), 1);

        let failing = FakeFeed::failing();
        let page = renderer().render_single(&failing, &QueryString::from("slug=hello-world")).await;
        assert_eq!(page.body, NOT_FOUND_HTML);
        assert!(page.is_not_found());
    }

    #[tokio::test]
    async fn test_render_single_without_slug_does_not_fetch() {
        let feed = FakeFeed::with(PostCollection::from_json(POSTS_JSON).unwrap());

        let page = renderer().render_single(&feed, &QueryString::from("")).await;
        assert_eq!(page, RenderedPage::untitled(NOT_SPECIFIED_HTML));

        let page = renderer().render_single(&feed, &QueryString::from("slug=")).await;
        assert_eq!(page.body, NOT_SPECIFIED_HTML);
        assert_eq!(feed.calls(), 0);
    }

    #[tokio::test]
    async fn test_default_templates() {
        let renderer = PublicRenderer::new(None).unwrap();
        let feed = FakeFeed::with(PostCollection::from_json(POSTS_JSON).unwrap());

        let page = renderer.render_list(&feed).await;
        let newest = page.body.find("Café com Rust").unwrap();
        let middle = page.body.find("Mid year notes").unwrap();
        let oldest = page.body.find("Hello World").unwrap();
        assert!(newest < middle && middle < oldest);

        let page = renderer.render_single(&feed, &QueryString::with_slug("hello-world")).await;
        assert!(page.body.contains("<p>Welcome to the blog.</p>"));
        assert!(page.body.contains("#intro"));
    }
}
