//! PNG encoding and persistence for RGBA images.
//!
//! Output is always 8-bit RGBA (color type 6) with no scanline filtering.
//! Files are written through a temporary file in the destination directory
//! and renamed into place, so a reader never sees a partial image.

use std::fs;
use std::io::Write;
use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::error::{CompositeError, Result};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Encode RGBA pixels (4 bytes per pixel, row-major) as PNG.
pub fn encode_rgba(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let row_bytes = width as usize * 4;
    if pixels.len() != row_bytes * height as usize {
        return Err(CompositeError::Encode(format!(
            "expected {} bytes for {}x{} RGBA, got {}",
            row_bytes * height as usize,
            width,
            height,
            pixels.len()
        )));
    }

    let mut png = Vec::with_capacity(pixels.len() / 2 + 64);
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[
        8, // bit depth
        6, // color type: RGBA
        0, // compression method
        0, // filter method
        0, // interlace method
    ]);
    write_chunk(&mut png, b"IHDR", &ihdr);

    let idat = deflate_scanlines(pixels, row_bytes)
        .map_err(|e| CompositeError::Encode(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat);

    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encode and atomically write an image, creating parent directories.
pub fn write_png_atomic(path: &Path, image: &RgbaImage) -> Result<()> {
    let bytes = encode_rgba(image.as_raw(), image.width(), image.height())?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| CompositeError::persist(path, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| CompositeError::persist(path, e))?;
    tmp.write_all(&bytes)
        .and_then(|_| tmp.flush())
        .map_err(|e| CompositeError::persist(path, e))?;
    tmp.persist(path)
        .map_err(|e| CompositeError::persist(path, e.error))?;

    debug!(path = %path.display(), bytes = bytes.len(), "Wrote PNG");
    Ok(())
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

fn deflate_scanlines(pixels: &[u8], row_bytes: usize) -> std::io::Result<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    if row_bytes > 0 {
        for row in pixels.chunks_exact(row_bytes) {
            encoder.write_all(&[0])?; // filter type: none
            encoder.write_all(row)?;
        }
    }
    encoder.finish()
}
