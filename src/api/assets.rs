//! Embedded static assets
//!
//! Falls back to serving from the filesystem when an asset is not embedded.

use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;
use std::path::PathBuf;

const ASSET_DIR: &str = "assets";

#[derive(Embed)]
#[folder = "assets"]
struct Assets;

fn asset_response(path: &str, body: Vec<u8>) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    ([(header::CONTENT_TYPE, mime.to_string())], body).into_response()
}

/// Serve embedded static files, with filesystem fallback
pub async fn serve_static(Path(path): Path<String>) -> Response {
    if let Some(content) = Assets::get(&path) {
        return asset_response(&path, content.data.to_vec());
    }

    if !path.split('/').any(|segment| segment == "..") {
        let fs_path = PathBuf::from(ASSET_DIR).join(&path);
        if let Ok(content) = std::fs::read(&fs_path) {
            return asset_response(&path, content);
        }
    }

    (StatusCode::NOT_FOUND, Body::from("Not found")).into_response()
}

/// Get the index.html content (embedded or from filesystem)
pub fn get_index_html() -> Option<String> {
    if let Some(content) = Assets::get("index.html") {
        return String::from_utf8(content.data.to_vec()).ok();
    }

    std::fs::read_to_string(PathBuf::from(ASSET_DIR).join("index.html")).ok()
}
