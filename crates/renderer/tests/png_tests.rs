//! Tests for PNG encoding, decoded back with the `image` crate.

use renderer::{encode_png, PngError, TextChunk};

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .expect("valid PNG")
        .to_rgba8()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

// ============================================================================
// Indexed output
// ============================================================================

#[test]
fn test_few_colors_use_palette() {
    let pixels = [
        255, 0, 0, 255, 0, 255, 0, 255, //
        0, 255, 0, 255, 255, 0, 0, 255,
    ];
    let png = encode_png(&pixels, 2, 2, &[]).unwrap();

    assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    // IHDR color type byte
    assert_eq!(png[25], 3);
    assert!(contains(&png, b"PLTE"));
    assert!(!contains(&png, b"tRNS"));
    assert_eq!(decode(&png).into_raw(), pixels.to_vec());
}

#[test]
fn test_palette_keeps_transparency() {
    let pixels = [10, 20, 30, 255, 0, 0, 0, 0];
    let png = encode_png(&pixels, 2, 1, &[]).unwrap();

    assert!(contains(&png, b"tRNS"));
    let decoded = decode(&png);
    assert_eq!(decoded.get_pixel(0, 0).0, [10, 20, 30, 255]);
    assert_eq!(decoded.get_pixel(1, 0).0[3], 0);
}

// ============================================================================
// Truecolor output
// ============================================================================

#[test]
fn test_many_colors_fall_back_to_rgba() {
    let width = 40;
    let height = 10;
    let pixels: Vec<u8> = (0..width * height)
        .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, (i % 7) as u8, 255])
        .collect();
    let png = encode_png(&pixels, width, height, &[]).unwrap();

    assert_eq!(png[25], 6);
    assert_eq!(decode(&png).into_raw(), pixels);
}

// ============================================================================
// Metadata and validation
// ============================================================================

#[test]
fn test_text_chunks_written() {
    let pixels = [0u8, 0, 0, 255];
    let text = [
        TextChunk::new("Title", "AIA-KCor-LASCO 2021-01-01T12:00:00"),
        TextChunk::new("Software", "corona-composite"),
    ];
    let png = encode_png(&pixels, 1, 1, &text).unwrap();

    assert!(contains(&png, b"tEXtTitle\0AIA-KCor-LASCO 2021-01-01T12:00:00"));
    assert!(contains(&png, b"tEXtSoftware\0corona-composite"));
    // Still decodes
    assert_eq!(decode(&png).dimensions(), (1, 1));
}

#[test]
fn test_buffer_size_mismatch() {
    let err = encode_png(&[0u8; 12], 2, 2, &[]).unwrap_err();
    assert!(matches!(err, PngError::BufferSize { expected: 16, actual: 12 }));
}

#[test]
fn test_invalid_keyword_rejected() {
    let err = encode_png(&[0u8; 4], 1, 1, &[TextChunk::new("", "x")]).unwrap_err();
    assert!(matches!(err, PngError::InvalidKeyword(_)));
}
