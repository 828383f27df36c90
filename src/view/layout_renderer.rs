use std::borrow::Cow;
use std::io;

use ramhorns::Template;

use crate::view::RenderedPage;
use crate::view::templates::compile_template;

pub const DEFAULT_TITLE: &str = "Blog";

#[derive(ramhorns::Content)]
struct LayoutPage<'a> {
    title: &'a str,
    body: &'a str,
}

/// Wraps a rendered page into a full HTML document for the preview server.
pub struct LayoutRenderer<'a> {
    pub template: Template<'a>,
}

impl<'a> LayoutRenderer<'a> {
    pub fn new<S: Into<Cow<'a, str>>>(layout_tpl_src: S) -> io::Result<LayoutRenderer<'a>> {
        let template = compile_template(layout_tpl_src.into(), "layout")?;

        Ok(LayoutRenderer {
            template,
        })
    }

    pub fn render(&self, page: &RenderedPage) -> String {
        self.template.render(&LayoutPage {
            title: page.title.as_deref().unwrap_or(DEFAULT_TITLE),
            body: page.body.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_layout() {
        let renderer = LayoutRenderer::new("<title>{{title}}</title><main>{{{body}}}</main>").unwrap();

        let page = RenderedPage::titled("Tom & Jerry", "<p>hi</p>");
        assert_eq!(renderer.render(&page), "<title>Tom &amp; Jerry</title><main><p>hi</p></main>");

        let page = RenderedPage::untitled("<p>list</p>");
        assert_eq!(renderer.render(&page), "<title>Blog</title><main><p>list</p></main>");
    }
}
