//! Text label drawing for matrix-mode tiles.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{Font, Scale};

use heatmap_common::{TileError, TileResult};

use crate::scale::Rgb;

/// Styling applied to matrix-mode labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Glyph height in pixels
    pub font_size: f32,
    /// Fill color
    pub color: Rgb,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 24.0,
            color: Rgb::new(255, 255, 255),
        }
    }
}

/// Glyph-drawing collaborator.
///
/// Matrix mode needs one; the rest of the engine stays free of font
/// concerns. Implementations must be callable from parallel tile renders.
pub trait TextRenderer: Send + Sync {
    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw(&self, img: &mut RgbaImage, text: &str, x: i32, y: i32, style: &TextStyle);
}

/// TrueType implementation over a host-supplied font.
pub struct TrueTypeTextRenderer {
    font: Font<'static>,
}

impl TrueTypeTextRenderer {
    /// Parse a TrueType/OpenType font from raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> TileResult<Self> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| TileError::Render("unreadable font data".to_string()))?;
        Ok(Self { font })
    }
}

impl TextRenderer for TrueTypeTextRenderer {
    fn draw(&self, img: &mut RgbaImage, text: &str, x: i32, y: i32, style: &TextStyle) {
        let color = Rgba([style.color.r, style.color.g, style.color.b, 255]);
        let scale = Scale::uniform(style.font_size);
        draw_text_mut(img, color, x, y, scale, &self.font, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_font_bytes() {
        let result = TrueTypeTextRenderer::from_bytes(vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(TileError::Render(_))));
    }
}
