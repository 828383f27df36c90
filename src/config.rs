use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

pub const CFG_FILE_NAME: &str = "simplecms.toml";

#[derive(Deserialize)]
pub struct Feed {
    pub posts_url: String,
    #[serde(default = "default_cache_bust")]
    pub cache_bust: bool,
}

#[derive(Deserialize, Default)]
pub struct Paths {
    /// Directory with template overrides. Missing templates fall back to the embedded ones.
    pub template_dir: Option<PathBuf>,
    pub public_dir: Option<PathBuf>,
}

#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct Github {
    pub api_base: String,
    pub path: String,
    pub commit_message: String,
    pub user_agent: String,
}

impl Default for Github {
    fn default() -> Self {
        Github {
            api_base: "https://api.github.com".to_string(),
            path: "posts.json".to_string(),
            commit_message: "Update posts [CMS]".to_string(),
            user_agent: "simplecms".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Admin {
    pub session_file: Option<PathBuf>,
    pub reload_delay_ms: u64,
}

impl Default for Admin {
    fn default() -> Self {
        Admin {
            session_file: None,
            reload_delay_ms: 1000,
        }
    }
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Config {
    pub feed: Feed,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub github: Github,
    #[serde(default)]
    pub admin: Admin,
    pub server: Option<Server>,
    pub log: Option<Log>,
}

fn default_cache_bust() -> bool {
    true
}

fn parse_path(path: PathBuf) -> PathBuf {
    if !path.starts_with("${exe_dir}") {
        return path;
    }

    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()));
    match (exe_dir, path.to_str()) {
        (Some(exe_dir), Some(str_path)) => {
            PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy()))
        }
        _ => path,
    }
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        template_dir: cfg.paths.template_dir.map(parse_path),
        public_dir: cfg.paths.public_dir.map(parse_path),
    };
    cfg.admin.session_file = cfg.admin.session_file.map(parse_path);
    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path);
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}

fn find_config_path() -> Option<PathBuf> {
    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()));
    let candidates = [
        exe_dir,
        env::current_dir().ok(),
        dirs::config_dir(),
    ];

    candidates.into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

/// Reads the configuration from `cfg_path`, or looks for `simplecms.toml` next to the
/// executable, in the current directory and in the user config directory, in that order.
pub fn open_config(cfg_path: Option<PathBuf>) -> Result<Config, String> {
    let config_path = match cfg_path.or_else(find_config_path) {
        None => return Err("Could not find SimpleCMS configuration".to_string()),
        Some(x) => x,
    };

    read_config(&config_path).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let cfg = parse_config(r##"
[feed]
posts_url = "https://raw.githubusercontent.com/someone/CMS/main/posts.json"
"##).unwrap();

        assert_eq!(cfg.feed.posts_url, "https://raw.githubusercontent.com/someone/CMS/main/posts.json");
        assert!(cfg.feed.cache_bust);
        assert_eq!(cfg.github.api_base, "https://api.github.com");
        assert_eq!(cfg.github.path, "posts.json");
        assert_eq!(cfg.github.commit_message, "Update posts [CMS]");
        assert_eq!(cfg.admin.reload_delay_ms, 1000);
        assert!(cfg.admin.session_file.is_none());
        assert!(cfg.paths.template_dir.is_none());
        assert!(cfg.server.is_none());
        assert!(cfg.log.is_none());
    }

    #[test]
    fn test_full_config() {
        let cfg = parse_config(r##"
[feed]
posts_url = "http://localhost/posts.json"
cache_bust = false

[paths]
template_dir = "template"
public_dir = "public"

[github]
path = "data/posts.json"

[admin]
session_file = "/tmp/storage.json"
reload_delay_ms = 0

[server]
address = "127.0.0.1"
port = 8001

[log]
level = "Debug"
log_to_console = true
"##).unwrap();

        assert!(!cfg.feed.cache_bust);
        assert_eq!(cfg.paths.template_dir, Some(PathBuf::from("template")));
        assert_eq!(cfg.github.path, "data/posts.json");
        assert_eq!(cfg.github.api_base, "https://api.github.com");
        assert_eq!(cfg.admin.session_file, Some(PathBuf::from("/tmp/storage.json")));
        assert_eq!(cfg.admin.reload_delay_ms, 0);
        assert_eq!(cfg.server.as_ref().unwrap().port, 8001);
        assert_eq!(cfg.log.as_ref().unwrap().level, LogLevel::Debug);
    }

    #[test]
    fn test_exe_dir_expansion() {
        let path = parse_path(PathBuf::from("${exe_dir}/template"));
        assert!(!path.to_string_lossy().contains("${exe_dir}"));
        assert!(path.ends_with("template"));

        let path = parse_path(PathBuf::from("relative/template"));
        assert_eq!(path, PathBuf::from("relative/template"));
    }

    #[test]
    fn test_missing_feed_is_an_error() {
        let err = parse_config("[server]\naddress = \"0.0.0.0\"\nport = 80\n").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
