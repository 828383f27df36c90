use std::collections::HashMap;

#[derive(PartialEq, Debug, Default)]
pub struct QueryString {
    items: HashMap<String, String>,
}

impl QueryString {
    pub fn from(buf: &str) -> Self {
        let buf = buf.strip_prefix('?').unwrap_or(buf);
        let vs: Vec<(String, String)> = serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        let items: HashMap<String, String> = vs.into_iter().collect();

        QueryString {
            items,
        }
    }

    pub fn with_slug(slug: &str) -> Self {
        let items = HashMap::from([("slug".to_string(), slug.to_string())]);
        QueryString { items }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(|v| v.as_str())
    }

    /// The post selected by a single post page. An empty `slug=` counts as missing.
    pub fn get_slug(&self) -> Option<&str> {
        self.get("slug").filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_slug() {
        let qs = QueryString::from("slug=hello-world");
        assert_eq!(qs.get_slug(), Some("hello-world"));

        let qs = QueryString::from("?t=123&slug=caf%C3%A9");
        assert_eq!(qs.get_slug(), Some("café"));

        let qs = QueryString::from("slug=");
        assert_eq!(qs.get_slug(), None);

        let qs = QueryString::from("page=2");
        assert_eq!(qs.get_slug(), None);
    }

    #[test]
    fn test_parse_query_str() {
        let buf = "bread=baguette&cheese=comt%C3%A9&meat=ham&fat=butter";
        let meal = vec![
            ("bread".to_owned(), "baguette".to_owned()),
            ("cheese".to_owned(), "comté".to_owned()),
            ("meat".to_owned(), "ham".to_owned()),
            ("fat".to_owned(), "butter".to_owned()),
        ].into_iter().collect::<HashMap<_, _>>();

        let expected = QueryString {
            items: meal,
        };

        assert_eq!(QueryString::from(buf), expected);
    }

    #[test]
    fn test_parse_invalid_query_str() {
        let buf = "";
        let expected = QueryString {
            items: Default::default(),
        };
        assert_eq!(QueryString::from(buf), expected);
    }

    #[test]
    fn test_parse_key_only_query_str() {
        let buf = "key-only";
        let expected: HashMap<String, String> = vec![("key-only", "")].iter().map(|(x, y)| (x.to_string(), y.to_string())).collect::<HashMap<_, _>>();
        assert_eq!(QueryString::from(buf), QueryString { items: expected });
    }

    #[test]
    fn test_with_slug() {
        assert_eq!(QueryString::with_slug("abc").get_slug(), Some("abc"));
    }
}
