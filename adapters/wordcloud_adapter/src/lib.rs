use ab_glyph::{FontVec, PxScale};
use chatstat_core::cloud::CloudLayout;
use chatstat_core::ports::{Result, TextMeasure, WordCloudRenderer};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::fs;
use std::path::Path;
use tracing::info;

/// Renders word clouds to PNG with a TrueType/OpenType font.
pub struct ImageWordCloudRenderer {
    font: FontVec,
}

impl ImageWordCloudRenderer {
    /// Loads the glyph font. For font collections (`.ttc`) the first face is used.
    pub fn from_file(font_path: &Path) -> Result<Self> {
        let bytes = fs::read(font_path)
            .map_err(|e| format!("cannot read font {}: {}", font_path.display(), e))?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec_and_index(bytes, 0)?;
        Ok(Self { font })
    }
}

impl TextMeasure for ImageWordCloudRenderer {
    fn measure(&self, text: &str, font_size: u32) -> (u32, u32) {
        text_size(PxScale::from(font_size as f32), &self.font, text)
    }
}

impl WordCloudRenderer for ImageWordCloudRenderer {
    fn render(&self, layout: &CloudLayout, output: &Path) -> Result<()> {
        let [r, g, b] = layout.background;
        // Fill the canvas with the background, then draw each placed word
        let mut image = RgbaImage::from_pixel(layout.width, layout.height, Rgba([r, g, b, 255]));

        for word in &layout.words {
            let [r, g, b] = word.color;
            draw_text_mut(
                &mut image,
                Rgba([r, g, b, 255]),
                word.x as i32,
                word.y as i32,
                PxScale::from(word.font_size as f32),
                &self.font,
                &word.text,
            );
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        image.save(output)?;

        info!(path = %output.display(), words = layout.words.len(), "wrote word cloud");
        Ok(())
    }
}
