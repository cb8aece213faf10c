//! Writes the service's OpenAPI document to disk.
//!
//! Usage: `openapi [path]` (defaults to `openapi.json`).

use eco_detective_api::router::ApiDoc;
use std::path::{Path, PathBuf};
use utoipa::OpenApi;

fn write_document(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let json = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(path, json)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));
    write_document(&path)?;
    println!("Wrote OpenAPI document to {}", path.display());
    Ok(())
}
