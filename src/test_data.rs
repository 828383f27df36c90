#[cfg(test)]
pub const POSTS_JSON: &str = r#"[
  {
    "id": "a63bd715-a3fe-4788-b0e1-2a3153778544",
    "title": "Hello World",
    "slug": "hello-world",
    "date": "2023-01-10",
    "image": "",
    "summary": "First post of the blog",
    "content": "<p>Welcome to the blog.</p>",
    "tags": ["intro", "meta"]
  },
  {
    "id": "cbca23f4-9cb9-11ea-a1df-83d8f0a5e3cb",
    "title": "Café com Rust ☕",
    "slug": "cafe-com-rust",
    "date": "2024-03-03",
    "image": "https://example.com/coffee.png",
    "summary": "Ownership explained over coffee",
    "content": "<p>Ownership – borrowing – lifetimes. 日本語もOK.</p>",
    "tags": ["rust"]
  },
  {
    "id": "dbe35a35-7e40-480f-9e7b-409e8d6d77c7",
    "title": "Mid year notes",
    "slug": "mid-year-notes",
    "date": "2023-07-15",
    "content": "<p>Half way there.</p>"
  }
]"#;
