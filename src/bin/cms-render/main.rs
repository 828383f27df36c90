use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spdlog::{info, warn};

use simplecms::config::open_config;
use simplecms::feed::HttpFeed;
use simplecms::logger::configure_logger;
use simplecms::public_renderer::PublicRenderer;
use simplecms::query_string::QueryString;
use simplecms::view::layout_renderer::LayoutRenderer;
use simplecms::view::templates::{read_template, LAYOUT_TPL};

#[derive(Parser, Debug)]
#[command(version, about = "Renders the blog pages from the post feed", long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    /// Write the page to this file instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Wrap the page in the HTML layout
    #[arg(short, long)]
    layout: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Every post, newest first
    List,
    /// A single post
    Post {
        /// Slug of the post
        #[arg(short, long, conflicts_with = "query")]
        slug: Option<String>,

        /// Raw query string, as in `post.html?slug=...`
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run cms-render --help");
            return Ok(());
        }
    };

    if let Err(err) = configure_logger(&config, "cms-render") {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    let template_dir = config.paths.template_dir.as_deref();
    let renderer = PublicRenderer::new(template_dir)?;
    let feed = HttpFeed::new(&config.feed);

    let page = match args.command {
        Command::List => renderer.render_list(&feed).await,
        Command::Post { slug, query } => {
            let query = match (slug, query) {
                (Some(slug), _) => QueryString::with_slug(&slug),
                (None, Some(query)) => QueryString::from(&query),
                (None, None) => QueryString::from(""),
            };
            renderer.render_single(&feed, &query).await
        }
    };

    let output = if args.layout {
        let layout = LayoutRenderer::new(read_template(template_dir, LAYOUT_TPL)?)?;
        layout.render(&page)
    } else {
        page.body
    };

    match args.out {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Error writing {}", path.display()))?;
            info!("Page written to {}", path.display());
        }
        None => println!("{}", output),
    }

    Ok(())
}
