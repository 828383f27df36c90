use std::borrow::Cow;
use std::io;

use ramhorns::Template;

use crate::post_collection::PostCollection;
use crate::view::templates::compile_template;

pub const LOADING_HTML: &str = r#"<div class="loading">Loading...</div>"#;

#[derive(ramhorns::Content)]
struct CardList<'a> {
    cards: Vec<Card<'a>>,
    error: Option<LoadError<'a>>,
}

#[derive(ramhorns::Content)]
struct LoadError<'a> {
    message: &'a str,
}

#[derive(ramhorns::Content)]
struct Card<'a> {
    id: &'a str,
    date: &'a str,
    title: &'a str,
    summary: &'a str,
}

/// Editable card list of the admin console.
pub struct CardRenderer<'a> {
    pub template: Template<'a>,
}

impl<'a> CardRenderer<'a> {
    pub fn new<S: Into<Cow<'a, str>>>(cards_tpl_src: S) -> io::Result<CardRenderer<'a>> {
        let template = compile_template(cards_tpl_src.into(), "cards")?;

        Ok(CardRenderer {
            template,
        })
    }

    /// Newest first; dates are shown as stored.
    pub fn render(&self, posts: &PostCollection) -> String {
        let cards = posts.sorted_by_date()
            .into_iter()
            .map(|post| Card {
                id: post.id.as_str(),
                date: post.date.as_str(),
                title: post.title.as_str(),
                summary: post.summary_text(),
            })
            .collect();

        self.template.render(&CardList { cards, error: None })
    }

    /// Replaces the cards with an inline load error.
    pub fn render_error(&self, message: &str) -> String {
        self.template.render(&CardList {
            cards: vec![],
            error: Some(LoadError { message }),
        })
    }
}
