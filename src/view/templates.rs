use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::Path;
use std::{fs, io};

use ramhorns::Template;
use spdlog::debug;

pub const LIST_TPL: &str = "list.tpl";
pub const POST_TPL: &str = "post.tpl";
pub const CARDS_TPL: &str = "cards.tpl";
pub const LAYOUT_TPL: &str = "layout.tpl";

fn embedded(file_name: &str) -> Option<&'static str> {
    match file_name {
        LIST_TPL => Some(include_str!("../../res/template/list.tpl")),
        POST_TPL => Some(include_str!("../../res/template/post.tpl")),
        CARDS_TPL => Some(include_str!("../../res/template/cards.tpl")),
        LAYOUT_TPL => Some(include_str!("../../res/template/layout.tpl")),
        _ => None,
    }
}

/// Template source from `template_dir` when the file exists there, the built-in one otherwise.
pub fn read_template(template_dir: Option<&Path>, file_name: &str) -> io::Result<Cow<'static, str>> {
    if let Some(dir) = template_dir {
        let full_path = dir.join(file_name);
        if full_path.is_file() {
            debug!("Using template {}", full_path.display());
            return fs::read_to_string(full_path).map(Cow::Owned);
        }
    }

    match embedded(file_name) {
        Some(src) => Ok(Cow::Borrowed(src)),
        None => Err(io::Error::new(ErrorKind::NotFound, format!("Unknown template {}", file_name))),
    }
}

/// Parses a template source, borrowed or owned. `kind` names the template in errors.
pub fn compile_template<'a>(src: Cow<'a, str>, kind: &str) -> io::Result<Template<'a>> {
    let parsed = match src {
        Cow::Borrowed(s) => Template::new(s),
        Cow::Owned(s) => Template::new(s),
    };

    parsed.map_err(|e| io::Error::new(ErrorKind::InvalidInput, format!("Error parsing {} template: {}", kind, e)))
}
