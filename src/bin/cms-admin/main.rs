use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use std::{fs, io};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use spdlog::{info, warn};

use simplecms::admin::console::{AdminConsole, FetchOutcome, SaveHandle, Startup};
use simplecms::admin::editor::{Editor, Field};
use simplecms::admin::notifier::LogNotifier;
use simplecms::config::{open_config, Config};
use simplecms::github::client::GithubClient;
use simplecms::logger::configure_logger;
use simplecms::post::{Post, PostId};
use simplecms::session::{FileSessionStore, SessionConfig, SessionStore};
use simplecms::view::card_renderer::CardRenderer;
use simplecms::view::templates::{read_template, CARDS_TPL};

#[derive(Parser, Debug)]
#[command(version, about = "Edits the post collection stored in a GitHub repository", long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shows or changes the repository settings
    Settings {
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        repo: Option<String>,
        #[arg(long)]
        branch: Option<String>,
        /// Personal access token with write access to the repository
        #[arg(long)]
        token: Option<String>,
    },
    /// Lists the posts, newest first
    List {
        /// Print the card list HTML instead
        #[arg(long)]
        html: bool,
    },
    /// Prints a post as stored
    Show {
        #[arg(long)]
        id: String,
    },
    /// Creates a post
    New {
        #[command(flatten)]
        fields: PostFields,
    },
    /// Changes a post
    Edit {
        #[arg(long)]
        id: String,

        /// Keep the current slug when the title changes
        #[arg(long)]
        keep_slug: bool,

        #[command(flatten)]
        fields: PostFields,
    },
    /// Deletes a post
    Delete {
        #[arg(long)]
        id: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct PostFields {
    #[arg(long)]
    title: Option<String>,
    /// Derived from the title when not given
    #[arg(long)]
    slug: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    summary: Option<String>,
    /// HTML content
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,
    /// File with the HTML content
    #[arg(long)]
    content_file: Option<PathBuf>,
    /// Comma separated
    #[arg(long)]
    tags: Option<String>,
}

impl PostFields {
    fn apply(self, editor: &mut Editor) -> Result<()> {
        let content = match self.content_file {
            Some(path) => Some(fs::read_to_string(&path)
                .with_context(|| format!("Error reading {}", path.display()))?),
            None => self.content,
        };

        let fields = [
            (Field::Title, self.title),
            (Field::Slug, self.slug),
            (Field::Date, self.date),
            (Field::Image, self.image),
            (Field::Summary, self.summary),
            (Field::Content, content),
            (Field::Tags, self.tags),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                editor.input(field, &value);
            }
        }
        Ok(())
    }
}

fn build_console(config: &Config, store: Arc<dyn SessionStore>) -> Result<AdminConsole> {
    let cards_tpl = read_template(config.paths.template_dir.as_deref(), CARDS_TPL)?;

    Ok(AdminConsole::new(
        Arc::new(GithubClient::new(&config.github)?),
        store,
        Arc::new(LogNotifier),
        CardRenderer::new(cards_tpl)?,
        config.github.clone(),
        Duration::from_millis(config.admin.reload_delay_ms),
    ))
}

fn session_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    let path = match config.admin.session_file {
        Some(ref path) => path.clone(),
        None => FileSessionStore::default_path()?,
    };
    info!("Using session storage {}", path.display());
    Ok(Arc::new(FileSessionStore::new(path)))
}

async fn start(console: &mut AdminConsole) -> Result<()> {
    match console.start().await? {
        Startup::NeedsSettings => bail!("Repository settings missing. Please run cms-admin settings --repo <repo> --token <token>"),
        Startup::Synced(Err(e)) => Err(anyhow!(e).context("Error loading posts")),
        Startup::Synced(Ok(FetchOutcome::Uninitialized)) => {
            warn!("The repository has no post collection yet");
            Ok(())
        }
        Startup::Synced(Ok(FetchOutcome::Loaded(count))) => {
            info!("{} posts loaded", count);
            Ok(())
        }
    }
}

async fn wait_save(handle: SaveHandle) -> Result<()> {
    let sha = handle.wait().await.context("Error saving posts")?;
    println!("Saved, content sha {}", sha);
    Ok(())
}

fn confirm_delete(post: &Post) -> bool {
    print!("Are you sure you want to delete \"{}\"? [y/N] ", post.title);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

async fn settings(console: &mut AdminConsole,
                  store: &dyn SessionStore,
                  owner: Option<String>,
                  repo: Option<String>,
                  branch: Option<String>,
                  token: Option<String>) -> Result<()> {
    let current = store.load()?.unwrap_or_default();

    if owner.is_none() && repo.is_none() && branch.is_none() && token.is_none() {
        println!("{:?}", current);
        return Ok(());
    }

    let config = SessionConfig {
        owner: owner.unwrap_or(current.owner),
        repo: repo.unwrap_or(current.repo),
        branch: branch.unwrap_or(current.branch),
        token: token.unwrap_or(current.token),
    };

    match console.save_settings(config).await? {
        Ok(FetchOutcome::Loaded(count)) => println!("{} posts loaded", count),
        Ok(FetchOutcome::Uninitialized) => println!("No post collection found in the repository"),
        Err(e) => return Err(anyhow!(e).context("Error loading posts")),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run cms-admin --help");
            return Ok(());
        }
    };

    if let Err(err) = configure_logger(&config, "cms-admin") {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    let store = session_store(&config)?;
    let mut console = build_console(&config, store.clone())?;

    match args.command {
        Command::Settings { owner, repo, branch, token } => {
            settings(&mut console, store.as_ref(), owner, repo, branch, token).await?;
        }
        Command::List { html } => {
            start(&mut console).await?;
            if html {
                println!("{}", console.list_view());
            } else {
                for post in console.posts().sorted_by_date() {
                    println!("{}  {}  {}", post.id, post.date, post.title);
                }
            }
        }
        Command::Show { id } => {
            start(&mut console).await?;
            let id = PostId(id);
            match console.posts().find_by_id(&id) {
                Some(post) => println!("{}", serde_json::to_string_pretty(post)?),
                None => bail!("Post {} not found", id),
            }
        }
        Command::New { fields } => {
            start(&mut console).await?;
            console.open_new();
            fields.apply(console.editor_mut())?;
            if let Some(handle) = console.submit_editor() {
                wait_save(handle).await?;
            }
        }
        Command::Edit { id, keep_slug, fields } => {
            start(&mut console).await?;
            let id = PostId(id);
            if console.posts().find_by_id(&id).is_none() {
                bail!("Post {} not found", id);
            }

            console.open_edit(&id);
            if keep_slug {
                console.editor_mut().focus(Field::Slug);
            }
            fields.apply(console.editor_mut())?;
            if let Some(handle) = console.submit_editor() {
                wait_save(handle).await?;
            }
        }
        Command::Delete { id, yes } => {
            start(&mut console).await?;
            let id = PostId(id);
            if console.posts().find_by_id(&id).is_none() {
                bail!("Post {} not found", id);
            }

            match console.delete_post(&id, |post| yes || confirm_delete(post)) {
                Some(handle) => wait_save(handle).await?,
                None => println!("Nothing deleted"),
            }
        }
    }

    Ok(())
}
