//! Renderer module — trait-based format dispatch.

pub mod html;
pub mod json;
pub mod text;

use crate::model::SourceDocument;
use anyhow::{anyhow, Result};

/// Trait for rendering a SourceDocument into a specific output format.
/// Renderers own their escaping and never touch the file system.
pub trait Renderer {
    fn render(&self, doc: &SourceDocument) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name. `color` only affects the
/// text renderer; it is passed explicitly so bulk processing can stay free
/// of process-wide state.
pub fn create_renderer(format: &str, color: bool) -> Result<Box<dyn Renderer>> {
    match format {
        "text" | "txt" => Ok(Box::new(text::TextRenderer { color })),
        "json" => Ok(Box::new(json::JsonRenderer)),
        "html" => Ok(Box::new(html::HtmlRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use text, json, or html",
            format
        )),
    }
}
