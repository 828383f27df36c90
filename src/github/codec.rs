use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::github::contents::SyncError;
use crate::post_collection::PostCollection;

/// Decodes the `content` field of the Contents API into the post collection.
///
/// GitHub wraps the base64 payload every 60 characters, so line breaks are removed
/// first. The decoded bytes are UTF-8 JSON.
pub fn decode_posts(payload: &str) -> Result<PostCollection, SyncError> {
    let cleaned: String = payload.chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .collect();
    let bytes = STANDARD.decode(cleaned.as_bytes())?;
    let json = String::from_utf8(bytes)?;
    Ok(PostCollection::from_json(&json)?)
}

/// Pretty JSON, base64 encoded, ready for a PUT.
pub fn encode_posts(posts: &PostCollection) -> Result<String, SyncError> {
    let json = posts.to_json_pretty()?;
    Ok(STANDARD.encode(json.as_bytes()))
}
