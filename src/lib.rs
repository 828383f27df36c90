pub mod admin;
pub mod config;
pub mod feed;
pub mod github;
pub mod logger;
pub mod post;
pub mod post_collection;
pub mod public_renderer;
pub mod query_string;
pub mod server;
pub mod session;
pub mod text_utils;
pub mod view;
mod test_data;
