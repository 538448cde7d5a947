// src/ui/fonts.rs
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui;

const EXTRA_FONT: &str = "comment_text";

/// Font setup with `font_file` appended as a fallback for both families,
/// so glyphs missing from the built-in fonts (Japanese text) still render.
pub fn fonts_with_fallback(font_file: &Path) -> Result<egui::FontDefinitions> {
    let bytes = fs::read(font_file)
        .with_context(|| format!("Failed to read font file {}", font_file.display()))?;

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert(EXTRA_FONT.to_string(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push(EXTRA_FONT.to_string());
    }
    Ok(fonts)
}

pub fn install(ctx: &egui::Context, font_file: Option<&Path>) {
    let Some(path) = font_file else {
        return;
    };
    match fonts_with_fallback(path) {
        Ok(fonts) => {
            tracing::info!(font = %path.display(), "loaded fallback font");
            ctx.set_fonts(fonts);
        }
        Err(e) => tracing::warn!("keeping the default fonts: {:#}", e),
    }
}
