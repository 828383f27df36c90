use std::borrow::Cow;
use std::io;

use ramhorns::Template;

use crate::post::Post;
use crate::text_utils::format_date;
use crate::view::{post_link, view_image, view_tags, ViewImage, ViewTag};
use crate::view::templates::compile_template;

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    post_list: Vec<PostItem<'a>>,
}

#[derive(ramhorns::Content)]
struct PostItem<'a> {
    date: String,
    link: String,
    title: &'a str,
    summary: &'a str,
    image: Option<ViewImage<'a>>,
    tags: Vec<ViewTag<'a>>,
}

/// Public post list. Expects the posts already in display order.
pub struct ListRenderer<'a> {
    pub template: Template<'a>,
}

impl<'a> ListRenderer<'a> {
    pub fn new<S: Into<Cow<'a, str>>>(list_tpl_src: S) -> io::Result<ListRenderer<'a>> {
        let template = compile_template(list_tpl_src.into(), "list")?;

        Ok(ListRenderer {
            template,
        })
    }

    pub fn render(&self, posts: &[&Post]) -> String {
        let mut post_list = vec![];
        for post in posts {
            post_list.push(PostItem {
                date: format_date(&post.date),
                link: post_link(&post.slug),
                title: post.title.as_str(),
                summary: post.summary_text(),
                image: view_image(post),
                tags: view_tags(post),
            });
        }

        self.template.render(&ListPage {
            post_list,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::post::PostId;
    use crate::view::templates::{read_template, LIST_TPL};

    use super::*;

    fn post(id: &str, title: &str, date: &str) -> Post {
        Post {
            id: PostId(id.to_string()),
            title: title.to_string(),
            slug: format!("slug-{}", id),
            date: date.to_string(),
            summary: Some(format!("summary {}", id)),
            tags: vec!["rust".to_string(), "<web>".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn render_list() {
        let template_src = r##"{{#post_list}}[{{date}}|{{link}}|{{title}}|{{summary}}|{{#image}}{{src}}{{/image}}|{{#tags}}({{tag}}){{/tags}}]{{/post_list}}{{^post_list}}EMPTY{{/post_list}}"##;
        let renderer = ListRenderer::new(template_src).unwrap();

        let mut first = post("1", "<First>", "2024-03-03");
        first.image = Some("https://img/1.png".to_string());
        let second = post("2", "Second", "2023-12-25");

        let res = renderer.render(&[&first, &second]);
        assert_eq!(res, "[March 3, 2024|post.html?slug=slug-1|&lt;First&gt;|summary 1|https://img/1.png|(rust)(&lt;web&gt;)]\
[December 25, 2023|post.html?slug=slug-2|Second|summary 2||(rust)(&lt;web&gt;)]");

        let res = renderer.render(&[]);
        assert_eq!(res, "EMPTY");
    }

    #[test]
    fn render_default_template() {
        let renderer = ListRenderer::new(read_template(None, LIST_TPL).unwrap()).unwrap();
        let first = post("1", "First", "2024-03-03");

        let res = renderer.render(&[&first]);
        assert!(res.contains(r#"<a href="post.html?slug=slug-1">First</a>"#));
        assert!(res.contains(r#"<span class="blog-date">March 3, 2024</span>"#));
        assert!(res.contains(r#"<p class="blog-summary">summary 1</p>"#));
        assert!(!res.contains("blog-image"));
        assert!(!res.contains("No posts found."));

        let res = renderer.render(&[]);
        assert_eq!(res.trim(), "<p>No posts found.</p>");
    }
}
