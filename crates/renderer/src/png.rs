//! PNG encoding for the composite canvas.
//!
//! Images with at most 256 distinct colors are written as indexed PNG
//! (color type 3); everything else as 8-bit RGBA (color type 6). Textual
//! metadata such as the figure title goes into `tEXt` chunks ahead of the
//! image data.

use std::collections::HashMap;
use std::io::Write;

use thiserror::Error;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for indexed PNG
const MAX_PALETTE_SIZE: usize = 256;

/// Maximum keyword length for a tEXt chunk.
const MAX_KEYWORD_LEN: usize = 79;

#[derive(Debug, Error)]
pub enum PngError {
    #[error("pixel buffer holds {actual} bytes, expected {expected} for the image size")]
    BufferSize { expected: usize, actual: usize },

    #[error("invalid tEXt keyword '{0}'")]
    InvalidKeyword(String),

    #[error("IDAT compression failed: {0}")]
    Compression(#[from] std::io::Error),
}

/// A `tEXt` metadata entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub keyword: String,
    pub text: String,
}

impl TextChunk {
    pub fn new(keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            text: text.into(),
        }
    }

    /// Chunk payload: keyword, NUL separator, Latin-1 text.
    fn payload(&self) -> Result<Vec<u8>, PngError> {
        let keyword = self.keyword.as_bytes();
        if keyword.is_empty()
            || keyword.len() > MAX_KEYWORD_LEN
            || !keyword.iter().all(|b| (32..=126).contains(b))
        {
            return Err(PngError::InvalidKeyword(self.keyword.clone()));
        }

        let mut data = Vec::with_capacity(keyword.len() + 1 + self.text.len());
        data.extend_from_slice(keyword);
        data.push(0);
        // tEXt is Latin-1; anything outside it becomes '?'
        data.extend(self.text.chars().map(|c| if (c as u32) < 256 && c != '\0' { c as u8 } else { b'?' }));
        Ok(data)
    }
}

/// Encode RGBA pixels, choosing indexed or truecolor output automatically.
pub fn encode_png(pixels: &[u8], width: usize, height: usize, text: &[TextChunk]) -> Result<Vec<u8>, PngError> {
    let expected = width * height * 4;
    if pixels.len() != expected {
        return Err(PngError::BufferSize {
            expected,
            actual: pixels.len(),
        });
    }

    match extract_palette(pixels) {
        Some((palette, indices)) => encode_indexed(width, height, &palette, &indices, text),
        None => encode_rgba(pixels, width, height, text),
    }
}

#[inline(always)]
fn pack_color(px: &[u8]) -> u32 {
    u32::from_le_bytes([px[0], px[1], px[2], px[3]])
}

/// Palette and per-pixel indices, or `None` past 256 colors.
fn extract_palette(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<[u8; 4]> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let packed = pack_color(px);
        let index = match lookup.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push([px[0], px[1], px[2], px[3]]);
                lookup.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

fn ihdr(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&(width as u32).to_be_bytes());
    data.extend_from_slice(&(height as u32).to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression
    data.push(0); // filter
    data.push(0); // interlace
    data
}

fn write_text_chunks(png: &mut Vec<u8>, text: &[TextChunk]) -> Result<(), PngError> {
    for chunk in text {
        write_chunk(png, b"tEXt", &chunk.payload()?);
    }
    Ok(())
}

fn encode_indexed(
    width: usize,
    height: usize,
    palette: &[[u8; 4]],
    indices: &[u8],
    text: &[TextChunk],
) -> Result<Vec<u8>, PngError> {
    let mut png = SIGNATURE.to_vec();
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));
    write_text_chunks(&mut png, text)?;

    let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    write_chunk(&mut png, b"IDAT", &deflate_scanlines(indices, width, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn encode_rgba(pixels: &[u8], width: usize, height: usize, text: &[TextChunk]) -> Result<Vec<u8>, PngError> {
    let mut png = SIGNATURE.to_vec();
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6));
    write_text_chunks(&mut png, text)?;
    write_chunk(&mut png, b"IDAT", &deflate_scanlines(pixels, width * 4, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
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

/// Prefix every scanline with filter type 0 and deflate.
fn deflate_scanlines(rows: &[u8], row_bytes: usize, height: usize) -> Result<Vec<u8>, PngError> {
    let mut raw = Vec::with_capacity(height * (row_bytes + 1));
    for row in rows.chunks_exact(row_bytes).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&raw)?;
    Ok(encoder.finish()?)
}
