// src/ui/chart_panel.rs
//! Backend-rendered PN ratio images.
use anyhow::{Context, Result};
use base64::Engine;
use eframe::egui;

use crate::ui::charts::ChartSurfaces;

pub type PnSurfaces = ChartSurfaces<egui::TextureHandle>;

/// Decode a base64 PNG (optionally with a `data:` URL prefix).
pub fn decode_chart(payload: &str) -> Result<egui::ColorImage> {
    let encoded = match payload.split_once(";base64,") {
        Some((_, data)) => data,
        None => payload,
    };
    let encoded: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.as_bytes())
        .context("chart payload is not valid base64")?;
    let image = image::load_from_memory(&bytes).context("chart payload is not a readable image")?;
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// A titled chart image, or a placeholder when there is nothing to draw.
/// The image is decoded again only when `generation` moves on.
pub fn show_pn_chart(
    ui: &mut egui::Ui,
    surfaces: &mut PnSurfaces,
    surface: &str,
    generation: u64,
    title: &str,
    payload: Option<&str>,
) {
    let payload = payload.unwrap_or_default();
    if payload.is_empty() {
        surfaces.release(surface);
        ui.label("No data available.");
        return;
    }

    let ctx = ui.ctx().clone();
    let texture = surfaces.ensure(surface, generation, || match decode_chart(payload) {
        Ok(image) => Some(ctx.load_texture(format!("pn_{}", surface), image, egui::TextureOptions::default())),
        Err(e) => {
            tracing::warn!(surface, "could not decode chart image: {:#}", e);
            None
        }
    });

    ui.group(|ui| {
        ui.vertical(|ui| {
            ui.heading(title);
            match texture {
                Some(texture) => {
                    let sized = egui::load::SizedTexture::new(texture.id(), texture.size_vec2());
                    ui.add(egui::Image::new(sized));
                }
                None => {
                    ui.colored_label(egui::Color32::RED, "The chart image could not be displayed.");
                }
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_base64(width: u32, height: u32) -> String {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        base64::engine::general_purpose::STANDARD.encode(bytes.into_inner())
    }

    #[test]
    fn decodes_at_natural_size() {
        let payload = png_base64(4, 3);
        let image = decode_chart(&payload).unwrap();
        assert_eq!(image.size, [4, 3]);
        assert_eq!(image.pixels[0], egui::Color32::from_rgb(255, 0, 0));

        let image = decode_chart(&format!("data:image/png;base64,{}", payload)).unwrap();
        assert_eq!(image.size, [4, 3]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_chart("not base64 at all!").is_err());
        // valid base64, not an image
        assert!(decode_chart("aGVsbG8=").is_err());
    }
}
