//! Low-level pixel drawing on RGBA buffers.

use image::{Rgba, RgbaImage};

/// White background.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Near-black for axes and outlines.
pub const INK: Rgba<u8> = Rgba([40, 40, 48, 255]);
/// Light grid gray.
pub const GRID: Rgba<u8> = Rgba([225, 225, 230, 255]);
/// Primary series blue.
pub const SERIES_BLUE: Rgba<u8> = Rgba([56, 116, 203, 255]);
/// Secondary series orange.
pub const SERIES_ORANGE: Rgba<u8> = Rgba([222, 135, 46, 255]);
/// Waveguide teal used in layout views.
pub const WAVEGUIDE: Rgba<u8> = Rgba([38, 140, 141, 255]);
/// Heater red used in layout views.
pub const HEATER: Rgba<u8> = Rgba([191, 68, 66, 255]);
/// Port marker gray.
pub const PORT: Rgba<u8> = Rgba([120, 120, 128, 255]);

/// Create a buffer filled with the background color.
pub fn canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, BACKGROUND)
}

/// Fill a rectangle, clipping to the buffer.
pub fn fill_rect(img: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, color: Rgba<u8>) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w).min(img.width() as i32);
    let y1 = (y + h).min(img.height() as i32);
    for py in y0..y1 {
        for px in x0..x1 {
            img.put_pixel(px as u32, py as u32, color);
        }
    }
}

/// Draw a 1px rectangle outline.
pub fn stroke_rect(img: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, color: Rgba<u8>) {
    line(img, x, y, x + w - 1, y, color);
    line(img, x, y + h - 1, x + w - 1, y + h - 1, color);
    line(img, x, y, x, y + h - 1, color);
    line(img, x + w - 1, y, x + w - 1, y + h - 1, color);
}

/// Draw a line with Bresenham's algorithm, clipping to the buffer.
pub fn line(img: &mut RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba<u8>) {
    let (mut x, mut y) = (x0, y0);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(img, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Draw a circle outline with the midpoint algorithm.
pub fn circle(img: &mut RgbaImage, cx: i32, cy: i32, radius: i32, color: Rgba<u8>) {
    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        for (px, py) in [
            (cx + x, cy + y),
            (cx - x, cy + y),
            (cx + x, cy - y),
            (cx - x, cy - y),
            (cx + y, cy + x),
            (cx - y, cy + x),
            (cx + y, cy - x),
            (cx - y, cy - x),
        ] {
            put(img, px, py, color);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

fn put(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Encode a buffer as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buf);
    image::DynamicImage::ImageRgba8(img.clone()).write_to(&mut cursor, image::ImageFormat::Png)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips() {
        let mut img = canvas(10, 10);
        fill_rect(&mut img, -5, -5, 8, 8, INK);
        assert_eq!(*img.get_pixel(0, 0), INK);
        assert_eq!(*img.get_pixel(3, 3), BACKGROUND);
    }

    #[test]
    fn test_line_endpoints() {
        let mut img = canvas(10, 10);
        line(&mut img, 1, 1, 8, 8, INK);
        assert_eq!(*img.get_pixel(1, 1), INK);
        assert_eq!(*img.get_pixel(8, 8), INK);
    }

    #[test]
    fn test_encode_png_decodable() {
        let img = canvas(4, 4);
        let png = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 4);
    }
}
