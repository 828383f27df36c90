use crate::post::{join_tags, parse_tags, slugify, Post, PostId};
use crate::post_collection::PostCollection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Title,
    Slug,
    Date,
    Image,
    Summary,
    Content,
    Tags,
}

/// Raw values of the post form. Tags are kept as the comma separated input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostForm {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub date: String,
    pub image: String,
    pub summary: String,
    pub content: String,
    pub tags: String,
}

impl PostForm {
    fn from_post(post: &Post) -> Self {
        PostForm {
            id: post.id.0.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            date: post.date.clone(),
            image: post.image.clone().unwrap_or_default(),
            summary: post.summary.clone().unwrap_or_default(),
            content: post.content.clone(),
            tags: join_tags(&post.tags),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::Title => &self.title,
            Field::Slug => &self.slug,
            Field::Date => &self.date,
            Field::Image => &self.image,
            Field::Summary => &self.summary,
            Field::Content => &self.content,
            Field::Tags => &self.tags,
        }
    }

    fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Id => &mut self.id,
            Field::Title => &mut self.title,
            Field::Slug => &mut self.slug,
            Field::Date => &mut self.date,
            Field::Image => &mut self.image,
            Field::Summary => &mut self.summary,
            Field::Content => &mut self.content,
            Field::Tags => &mut self.tags,
        };
        *slot = value;
    }

    /// An empty id gets a freshly generated one.
    pub fn to_post(&self) -> Post {
        let id = PostId(self.id.trim().to_string());
        let id = if id.is_empty() { PostId::generate() } else { id };

        Post {
            id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            date: self.date.clone(),
            image: Some(self.image.clone()),
            summary: Some(self.summary.clone()),
            content: self.content.clone(),
            tags: parse_tags(&self.tags),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorMode {
    New,
    Edit(PostId),
}

#[derive(Debug)]
pub struct OpenEditor {
    pub mode: EditorMode,
    pub form: PostForm,
    focus: Option<Field>,
    slug_focused: bool,
}

impl OpenEditor {
    fn new(mode: EditorMode, form: PostForm) -> Self {
        OpenEditor { mode, form, focus: None, slug_focused: false }
    }

    /// The slug follows the title until the slug field gets focus once.
    fn derives_slug(&self) -> bool {
        self.focus != Some(Field::Slug) && !self.slug_focused
    }
}

#[derive(Debug, Default)]
pub enum EditorState {
    #[default]
    Closed,
    Open(OpenEditor),
}

/// Post editor: `Closed -> Open(New | Edit(id)) -> Closed`.
#[derive(Debug, Default)]
pub struct Editor {
    state: EditorState,
}

impl Editor {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, EditorState::Open(_))
    }

    pub fn mode(&self) -> Option<&EditorMode> {
        match self.state {
            EditorState::Open(ref open) => Some(&open.mode),
            EditorState::Closed => None,
        }
    }

    pub fn form(&self) -> Option<&PostForm> {
        match self.state {
            EditorState::Open(ref open) => Some(&open.form),
            EditorState::Closed => None,
        }
    }

    pub fn heading(&self) -> Option<&'static str> {
        match self.mode()? {
            EditorMode::New => Some("New Post"),
            EditorMode::Edit(_) => Some("Edit Post"),
        }
    }

    /// Blank form with a fresh id and `today` as date.
    pub fn open_new(&mut self, today: &str) {
        let form = PostForm {
            id: PostId::generate().0,
            date: today.to_string(),
            ..Default::default()
        };
        self.state = EditorState::Open(OpenEditor::new(EditorMode::New, form));
    }

    /// Form filled from the post with `id`. An unknown id leaves the form blank.
    pub fn open_edit(&mut self, posts: &PostCollection, id: &PostId) {
        let form = posts.find_by_id(id)
            .map(PostForm::from_post)
            .unwrap_or_default();
        self.state = EditorState::Open(OpenEditor::new(EditorMode::Edit(id.clone()), form));
    }

    pub fn focus(&mut self, field: Field) {
        if let EditorState::Open(ref mut open) = self.state {
            open.focus = Some(field);
            if field == Field::Slug {
                open.slug_focused = true;
            }
        }
    }

    pub fn blur(&mut self) {
        if let EditorState::Open(ref mut open) = self.state {
            open.focus = None;
        }
    }

    /// Typing into `field`; the field takes focus. Title input re-derives the slug.
    pub fn input(&mut self, field: Field, value: &str) {
        self.focus(field);
        if let EditorState::Open(ref mut open) = self.state {
            open.form.set(field, value.to_string());
            if field == Field::Title && open.derives_slug() {
                open.form.slug = slugify(value);
            }
        }
    }

    pub fn close(&mut self) {
        self.state = EditorState::Closed;
    }

    /// Builds the post from the form and closes the editor.
    pub fn submit(&mut self) -> Option<Post> {
        let post = match self.state {
            EditorState::Open(ref open) => open.form.to_post(),
            EditorState::Closed => return None,
        };
        self.close();
        Some(post)
    }
}
