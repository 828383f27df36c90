use std::borrow::Cow;
use std::io;

use ramhorns::Template;

use crate::post::Post;
use crate::text_utils::format_date;
use crate::view::{view_image, view_tags, ViewImage, ViewTag};
use crate::view::templates::compile_template;

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    id: &'a str,
    slug: &'a str,
    tags: Vec<ViewTag<'a>>,
    date: String,
    image: Option<ViewImage<'a>>,
    post_title: &'a str,
    post_content: &'a str,
}

/// Full article page. Content is inserted verbatim, use `{{{post_content}}}` in templates.
pub struct PostRenderer<'a> {
    pub template: Template<'a>,
}

impl<'a> PostRenderer<'a> {
    pub fn new<S: Into<Cow<'a, str>>>(view_tpl_src: S) -> io::Result<PostRenderer<'a>> {
        let template = compile_template(view_tpl_src.into(), "post view")?;

        Ok(PostRenderer {
            template,
        })
    }

    pub fn render(&self, post: &Post) -> String {
        self.template.render(&ViewItem {
            id: post.id.as_str(),
            slug: post.slug.as_str(),
            tags: view_tags(post),
            date: format_date(&post.date),
            image: view_image(post),
            post_title: post.title.as_str(),
            post_content: post.content.as_str(),
        })
    }
}
