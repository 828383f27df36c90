use crate::post::Post;

pub mod card_renderer;
pub mod layout_renderer;
pub mod list_renderer;
pub mod post_renderer;
pub mod templates;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageStatus {
    #[default]
    Found,
    NotFound,
}

/// Output of a renderer. `title` is `None` when the page title should stay as it is.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub title: Option<String>,
    pub body: String,
    pub status: PageStatus,
}

impl RenderedPage {
    pub fn untitled(body: impl Into<String>) -> Self {
        RenderedPage { title: None, body: body.into(), status: PageStatus::Found }
    }

    pub fn titled(title: impl Into<String>, body: impl Into<String>) -> Self {
        RenderedPage { title: Some(title.into()), body: body.into(), status: PageStatus::Found }
    }

    pub fn not_found(title: impl Into<String>, body: impl Into<String>) -> Self {
        RenderedPage { title: Some(title.into()), body: body.into(), status: PageStatus::NotFound }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == PageStatus::NotFound
    }
}

#[derive(ramhorns::Content)]
pub(crate) struct ViewTag<'a> {
    tag: &'a str,
}

#[derive(ramhorns::Content)]
pub(crate) struct ViewImage<'a> {
    src: &'a str,
    alt: &'a str,
}

pub(crate) fn view_tags(post: &Post) -> Vec<ViewTag<'_>> {
    post.tags.iter().map(|t| ViewTag { tag: t.as_str() }).collect()
}

pub(crate) fn view_image(post: &Post) -> Option<ViewImage<'_>> {
    post.hero_image().map(|src| ViewImage { src, alt: post.title.as_str() })
}

/// Relative link of the single post page, e.g. `post.html?slug=hello-world`.
pub fn post_link(slug: &str) -> String {
    let query = serde_urlencoded::to_string([("slug", slug)]).unwrap_or_default();
    format!("post.html?{}", query)
}
