//! Minimal PNG writer for rendered tiles.
//!
//! Gradient tiles are continuous-color RGBA buffers, so only color type 6
//! (truecolor with alpha) is emitted.

use std::io::Write;

use image::RgbaImage;

use heatmap_common::{TileError, TileResult};

/// Encode an RGBA buffer as a PNG.
pub fn encode_png(img: &RgbaImage) -> TileResult<Vec<u8>> {
    let (width, height) = img.dimensions();
    let pixels = img.as_raw();

    let mut png = Vec::new();

    // PNG signature
    png.extend_from_slice(&[137, 80, 78, 71, 13, 10, 26, 10]);

    // IHDR chunk
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    // 8-bit depth, color type 6 (RGBA), deflate, no filter, no interlace
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);
    write_chunk(&mut png, b"IHDR", &ihdr);

    // IDAT chunk: each scanline gets a filter byte (0 = none), then zlib.
    let row_bytes = width as usize * 4;
    let mut scanlines = Vec::with_capacity(height as usize * (1 + row_bytes));
    for row in pixels.chunks_exact(row_bytes) {
        scanlines.push(0);
        scanlines.extend_from_slice(row);
    }
    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&scanlines)
        .map_err(|e| TileError::Render(format!("IDAT compression failed: {}", e)))?;
    let idat = encoder
        .finish()
        .map_err(|e| TileError::Render(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn write_chunk(png: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(kind);
    png.extend_from_slice(data);

    let mut crc = crc32fast::Hasher::new();
    crc.update(kind);
    crc.update(data);
    png.extend_from_slice(&crc.finalize().to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_structure() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let png = encode_png(&img).unwrap();

        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
        assert_eq!(&png[12..16], b"IHDR");
        assert_eq!(&png[png.len() - 8..png.len() - 4], b"IEND");
    }

    #[test]
    fn test_png_roundtrip() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([255, 128, 0, 255]));

        let png = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();

        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(1, 0), &Rgba([255, 128, 0, 255]));
        assert_eq!(decoded.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }
}
