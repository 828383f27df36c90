use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use spdlog::{error, info, warn};
use tokio::task::JoinHandle;

use crate::admin::editor::Editor;
use crate::admin::notifier::{Notice, Notifier};
use crate::config::Github;
use crate::github::codec::{decode_posts, encode_posts};
use crate::github::contents::{ContentSha, ContentsApi, FileLocation, PutFileRequest, SyncError};
use crate::post::{Post, PostId};
use crate::post_collection::PostCollection;
use crate::session::{SessionConfig, SessionStore};
use crate::text_utils::today;
use crate::view::card_renderer::{CardRenderer, LOADING_HTML};

pub const FETCHING_MSG: &str = "Fetching posts from GitHub...";
pub const UNINITIALIZED_MSG: &str = "No posts.json found. Create a post to initialize.";
pub const LOADED_MSG: &str = "Posts loaded successfully!";
pub const LOAD_ERROR_MSG: &str = "Error loading posts";
pub const SYNCING_MSG: &str = "Syncing to GitHub...";
pub const SAVED_MSG: &str = "Changes saved to GitHub!";
pub const SETTINGS_SAVED_MSG: &str = "Settings saved. Reloading...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded(usize),
    /// The file does not exist in the repository yet.
    Uninitialized,
}

#[derive(Debug)]
pub enum Startup {
    /// Token or repository missing, nothing was fetched.
    NeedsSettings,
    Synced(Result<FetchOutcome, SyncError>),
}

/// A persist task running in the background.
///
/// Dropping the handle does not cancel the task.
pub struct SaveHandle {
    task: JoinHandle<Result<ContentSha, SyncError>>,
}

impl SaveHandle {
    pub async fn wait(self) -> Result<ContentSha, SyncError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(SyncError::Task(e.to_string())),
        }
    }
}

/// The admin console: the post collection held in memory and kept in sync with
/// a file in a GitHub repository.
///
/// Every change is applied locally first, then committed by a spawned task.
/// Methods returning a [`SaveHandle`] must run inside a tokio runtime.
pub struct AdminConsole {
    api: Arc<dyn ContentsApi>,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    cards: CardRenderer<'static>,
    github: Github,
    reload_delay: Duration,
    session: SessionConfig,
    posts: PostCollection,
    sha: Arc<Mutex<Option<ContentSha>>>,
    editor: Editor,
    list_view: String,
    settings_open: bool,
}

impl AdminConsole {
    pub fn new(api: Arc<dyn ContentsApi>,
               store: Arc<dyn SessionStore>,
               notifier: Arc<dyn Notifier>,
               cards: CardRenderer<'static>,
               github: Github,
               reload_delay: Duration) -> Self {
        AdminConsole {
            api,
            store,
            notifier,
            cards,
            github,
            reload_delay,
            session: SessionConfig::default(),
            posts: PostCollection::new(),
            sha: Arc::new(Mutex::new(None)),
            editor: Editor::new(),
            list_view: LOADING_HTML.to_string(),
            settings_open: false,
        }
    }

    /// Loads the stored session and, when it is usable, the posts.
    pub async fn start(&mut self) -> io::Result<Startup> {
        self.session = self.store.load()?.unwrap_or_default();

        if !self.session.is_complete() {
            info!("No usable session stored, opening settings");
            self.settings_open = true;
            return Ok(Startup::NeedsSettings);
        }

        Ok(Startup::Synced(self.fetch_posts().await))
    }

    /// Stores the trimmed settings, then reloads the posts after the reload delay.
    pub async fn save_settings(&mut self, config: SessionConfig) -> io::Result<Result<FetchOutcome, SyncError>> {
        let config = config.trimmed();
        self.store.save(&config)?;
        self.session = config;
        self.settings_open = false;

        self.notifier.notify(Notice::success(SETTINGS_SAVED_MSG));
        tokio::time::sleep(self.reload_delay).await;

        Ok(self.fetch_posts().await)
    }

    pub async fn fetch_posts(&mut self) -> Result<FetchOutcome, SyncError> {
        self.notifier.notify(Notice::info(FETCHING_MSG));
        let location = self.location();

        match self.load_remote(&location).await {
            Ok(Some(posts)) => {
                info!("Loaded {} posts from {}", posts.len(), location);
                self.posts = posts;
                self.render_list();
                self.notifier.notify(Notice::success(LOADED_MSG));
                Ok(FetchOutcome::Loaded(self.posts.len()))
            }
            Ok(None) => {
                warn!("{} does not exist", location);
                self.posts = PostCollection::new();
                self.set_sha(None);
                self.render_list();
                self.notifier.notify(Notice::warning(UNINITIALIZED_MSG));
                Ok(FetchOutcome::Uninitialized)
            }
            Err(e) => {
                error!("Error loading posts from {}: {}", location, e);
                self.list_view = self.cards.render_error(&e.to_string());
                self.notifier.notify(Notice::error(LOAD_ERROR_MSG));
                Err(e)
            }
        }
    }

    async fn load_remote(&self, location: &FileLocation) -> Result<Option<PostCollection>, SyncError> {
        let Some(file) = self.api.get_file(location).await? else {
            return Ok(None);
        };

        self.set_sha(Some(file.sha));
        Ok(Some(decode_posts(&file.content)?))
    }

    /// Commits the current collection. The content SHA is taken now, the new
    /// one is stored when the commit succeeds.
    pub fn save_posts(&self) -> SaveHandle {
        self.notifier.notify(Notice::info(SYNCING_MSG));

        let api = self.api.clone();
        let notifier = self.notifier.clone();
        let sha_slot = self.sha.clone();
        let location = self.location();
        let posts = self.posts.clone();
        let message = self.github.commit_message.clone();
        let sha = self.sha();

        let task = tokio::spawn(async move {
            let result = persist(api.as_ref(), &location, &posts, message, sha).await;
            match result {
                Ok(ref new_sha) => {
                    info!("Saved {} posts to {}, sha {}", posts.len(), location, new_sha);
                    store_sha(&sha_slot, Some(new_sha.clone()));
                    notifier.notify(Notice::success(SAVED_MSG));
                }
                Err(ref e) => {
                    error!("Error saving posts to {}: {}", location, e);
                    notifier.notify(Notice::error(format!("Error saving: {}", e)));
                }
            }
            result
        });

        SaveHandle { task }
    }

    pub fn open_new(&mut self) {
        self.editor.open_new(&today());
    }

    pub fn open_edit(&mut self, id: &PostId) {
        self.editor.open_edit(&self.posts, id);
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Applies the editor form to the collection and persists it.
    pub fn submit_editor(&mut self) -> Option<SaveHandle> {
        let post = self.editor.submit()?;
        if self.posts.upsert(post) {
            info!("Post updated");
        } else {
            info!("Post created");
        }

        self.render_list();
        Some(self.save_posts())
    }

    /// Removes the post when `confirm` agrees, then persists the collection.
    pub fn delete_post<F>(&mut self, id: &PostId, confirm: F) -> Option<SaveHandle>
        where F: FnOnce(&Post) -> bool {
        let post = self.posts.find_by_id(id)?;
        if !confirm(post) {
            return None;
        }

        let removed = self.posts.remove(id)?;
        info!("Post {} deleted", removed.id);

        self.render_list();
        Some(self.save_posts())
    }

    pub fn posts(&self) -> &PostCollection {
        &self.posts
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    pub fn list_view(&self) -> &str {
        &self.list_view
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn open_settings(&mut self) {
        self.settings_open = true;
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
    }

    pub fn sha(&self) -> Option<ContentSha> {
        match self.sha.lock() {
            Ok(sha) => sha.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_sha(&self, sha: Option<ContentSha>) {
        store_sha(&self.sha, sha);
    }

    fn location(&self) -> FileLocation {
        FileLocation::new(&self.session, &self.github.path)
    }

    fn render_list(&mut self) {
        self.list_view = self.cards.render(&self.posts);
    }
}

fn store_sha(slot: &Mutex<Option<ContentSha>>, sha: Option<ContentSha>) {
    match slot.lock() {
        Ok(mut current) => *current = sha,
        Err(poisoned) => *poisoned.into_inner() = sha,
    }
}

async fn persist(api: &dyn ContentsApi,
                 location: &FileLocation,
                 posts: &PostCollection,
                 message: String,
                 sha: Option<ContentSha>) -> Result<ContentSha, SyncError> {
    let request = PutFileRequest {
        message,
        content: encode_posts(posts)?,
        branch: location.branch.clone(),
        sha,
    };
    api.put_file(location, &request).await
}
