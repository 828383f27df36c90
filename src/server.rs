use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ntex::http::StatusCode;
use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use spdlog::info;

use crate::config::Config;
use crate::feed::HttpFeed;
use crate::public_renderer::PublicRenderer;
use crate::query_string::QueryString;
use crate::view::layout_renderer::LayoutRenderer;
use crate::view::templates::{read_template, LAYOUT_TPL};
use crate::view::{PageStatus, RenderedPage};

pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

struct AppState {
    renderer: PublicRenderer<'static>,
    layout: LayoutRenderer<'static>,
    feed: HttpFeed,
    public_dir: Option<PathBuf>,
}

fn status_of(page: &RenderedPage) -> StatusCode {
    match page.status {
        PageStatus::Found => StatusCode::OK,
        PageStatus::NotFound => StatusCode::NOT_FOUND,
    }
}

fn html_page(state: &AppState, page: &RenderedPage) -> web::HttpResponse {
    web::HttpResponse::build(status_of(page))
        .content_type("text/html; charset=utf-8")
        .body(state.layout.render(page))
}

async fn list_page(state: &AppState) -> web::HttpResponse {
    let page = state.renderer.render_list(&state.feed).await;
    html_page(state, &page)
}

#[web::get("/")]
async fn index(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    list_page(&state).await
}

#[web::get("/index.html")]
async fn index_html(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    list_page(&state).await
}

#[web::get("/post.html")]
async fn post(req: HttpRequest, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let query = QueryString::from(req.uri().query().unwrap_or(""));
    let page = state.renderer.render_single(&state.feed, &query).await;
    html_page(&state, &page)
}

fn is_forbidden(file_name: &str) -> bool {
    file_name.contains("../") || file_name.contains("..\\") || file_name == ".."
}

fn public_file_path(public_dir: Option<&Path>, file_name: &str) -> Option<PathBuf> {
    if is_forbidden(file_name) {
        return None;
    }
    public_dir.map(|dir| dir.join(file_name))
}

#[web::get("/public/{file_name}")]
async fn public_files(path: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> Result<NamedFile, web::Error> {
    if is_forbidden(&path) {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    match public_file_path(state.public_dir.as_deref(), &path) {
        Some(file_path) => Ok(NamedFile::open(file_path)?),
        None => Err(web::error::ErrorNotFound("No public directory configured").into()),
    }
}

/// Serves the blog pages rendered from the configured feed.
pub async fn server_run(config: Config) -> io::Result<()> {
    let template_dir = config.paths.template_dir.as_deref();
    let renderer = PublicRenderer::new(template_dir)?;
    let layout = LayoutRenderer::new(read_template(template_dir, LAYOUT_TPL)?)?;

    let (bind_addr, bind_port) = match config.server {
        Some(ref server) => (server.address.clone(), server.port),
        None => (DEFAULT_ADDRESS.to_string(), DEFAULT_PORT),
    };
    info!("Serving posts from {}", config.feed.posts_url);

    let app_state = Arc::new(AppState {
        renderer,
        layout,
        feed: HttpFeed::new(&config.feed),
        public_dir: config.paths.public_dir.clone(),
    });

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(index)
            .service(index_html)
            .service(post)
            .service(public_files)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use async_trait::async_trait;

    use crate::feed::FeedSource;
    use crate::post_collection::PostCollection;
    use crate::test_data::POSTS_JSON;

    use super::*;

    struct StaticFeed;

    #[async_trait]
    impl FeedSource for StaticFeed {
        async fn fetch_posts(&self) -> Result<PostCollection> {
            Ok(PostCollection::from_json(POSTS_JSON)?)
        }
    }

    #[tokio::test]
    async fn test_page_status() {
        let renderer = PublicRenderer::new(None).unwrap();

        let page = renderer.render_single(&StaticFeed, &QueryString::with_slug("hello-world")).await;
        assert_eq!(status_of(&page), StatusCode::OK);

        let page = renderer.render_single(&StaticFeed, &QueryString::with_slug("missing")).await;
        assert_eq!(status_of(&page), StatusCode::NOT_FOUND);

        let page = renderer.render_single(&StaticFeed, &QueryString::from("")).await;
        assert_eq!(status_of(&page), StatusCode::OK);

        let page = renderer.render_list(&StaticFeed).await;
        assert_eq!(status_of(&page), StatusCode::OK);
    }

    #[test]
    fn test_public_file_path() {
        let dir = Path::new("/srv/public");
        assert_eq!(public_file_path(Some(dir), "blog.css"), Some(PathBuf::from("/srv/public/blog.css")));
        assert_eq!(public_file_path(Some(dir), "../secret"), None);
        assert_eq!(public_file_path(Some(dir), "..\\secret"), None);
        assert_eq!(public_file_path(Some(dir), ".."), None);
        assert_eq!(public_file_path(None, "blog.css"), None);
    }
}
