use crate::font::{self, GlyphFont};
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, Rgba, RgbaImage,
};
use rusttype::{point, Scale};
use std::{
    fs::{self, create_dir_all},
    io::Write,
    path::PathBuf,
    str::FromStr,
};

/// Generation options, filled in from the CLI.
#[derive(Debug)]
pub struct Options {
    pub output: PathBuf,
    pub letter: char,
    pub edge_color: String,
    pub center_color: String,
}

/// Every size gets its own `icon_<s>x<s>.png`; the primary size is written
/// twice more as `icon.png` and `icon@2x.png`.
pub const SIZES: [u32; 6] = [512, 256, 128, 64, 32, 16];
const PRIMARY_SIZE: u32 = 512;

const GRADIENT_STEPS: u32 = 50;
const DISK_RADIUS_RATIO: f32 = 0.45;
const FONT_RATIO: f32 = 0.6;
const VERTICAL_LIFT: f32 = 0.02;

const EDGE_TEAL: Rgba<u8> = Rgba([0x00, 0xD4, 0xAA, 0xFF]);
const CENTER_PURPLE: Rgba<u8> = Rgba([0x7B, 0x3F, 0xF2, 0xFF]);
const GLYPH_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const GLYPH_SHADOW: Rgba<u8> = Rgba([0, 0, 0, 100]);

pub fn generate_icons(opts: Options) -> Result<()> {
    ensure_png_codec()?;

    let edge = parse_color(&opts.edge_color, EDGE_TEAL);
    let center = parse_color(&opts.center_color, CENTER_PURPLE);
    let letter = opts.letter.to_ascii_uppercase();
    let font = font::resolve();

    create_dir_all(&opts.output).context("Can't create output directory")?;

    println!("Krigzis icon generator");
    println!("{}", "=".repeat(40));

    let mut primary = None;
    for size in SIZES {
        println!("Generating {size}x{size}...");
        let mut img = gradient_disk(size, edge, center);
        draw_glyph(&mut img, letter, &font);
        let encoded = encode_png(&img)?;

        let path = opts.output.join(format!("icon_{size}x{size}.png"));
        fs::write(&path, &encoded)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  ✓ Generated {}", path.display());

        if size == PRIMARY_SIZE {
            primary = Some(encoded);
        }
    }

    // The canonical names reuse the already-encoded primary buffer, so all
    // three files are byte-identical.
    let primary = primary.context("size list is missing the primary size")?;
    for name in ["icon.png", "icon@2x.png"] {
        let path = opts.output.join(name);
        fs::write(&path, &primary)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  ✓ Generated {}", path.display());
    }

    println!();
    println!("Icons written to {}", opts.output.display());
    println!();
    println!("Follow-up steps (not performed by this tool):");
    println!("  1. Convert icon_256x256.png to icon.ico for Windows, e.g. with ImageMagick");
    println!("  2. Convert icon_512x512.png to icon.icns for macOS, e.g. with iconutil");
    println!("  3. icon.png is ready for Linux desktops as-is");

    Ok(())
}

// The whole run is pointless without a working PNG codec, so a 1x1 probe is
// round-tripped in memory before anything touches the filesystem.
fn ensure_png_codec() -> Result<()> {
    let probe = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
    let encoded = encode_png(&probe).context("PNG encoder is unavailable")?;
    image::load_from_memory(&encoded).context("PNG decoder is unavailable")?;
    Ok(())
}

fn parse_color(spec: &str, fallback: Rgba<u8>) -> Rgba<u8> {
    css_color::Srgb::from_str(spec)
        .map(|color| {
            Rgba([
                (color.red * 255.) as u8,
                (color.green * 255.) as u8,
                (color.blue * 255.) as u8,
                255,
            ])
        })
        .unwrap_or(fallback)
}

/// Banded radial gradient: concentric filled circles, largest first, colors
/// stepped from `edge` to `center`. Band width is `radius / GRADIENT_STEPS`,
/// so banding gets more visible at larger sizes. The banded look is part of
/// the icon design, not an artifact to smooth out.
fn gradient_disk(size: u32, edge: Rgba<u8>, center: Rgba<u8>) -> RgbaImage {
    let mut img = RgbaImage::new(size, size);
    let mid = (size / 2) as i32;
    let radius = (size as f32 * DISK_RADIUS_RATIO) as i32;

    for step in 0..GRADIENT_STEPS {
        let ratio = step as f32 / GRADIENT_STEPS as f32;
        let ring = radius - (step as i32 * radius) / GRADIENT_STEPS as i32;
        if ring > 0 {
            fill_circle(&mut img, mid, mid, ring, lerp_color(edge, center, ratio));
        }
    }

    img
}

fn lerp_color(from: Rgba<u8>, to: Rgba<u8>, ratio: f32) -> Rgba<u8> {
    let mix = |a: u8, b: u8| (a as f32 * (1.0 - ratio) + b as f32 * ratio) as u8;
    Rgba([
        mix(from[0], to[0]),
        mix(from[1], to[1]),
        mix(from[2], to[2]),
        255,
    ])
}

fn fill_circle(img: &mut RgbaImage, cx: i32, cy: i32, radius: i32, color: Rgba<u8>) {
    let width = img.width() as i32;
    let height = img.height() as i32;

    for y in (cy - radius).max(0)..=(cy + radius).min(height - 1) {
        for x in (cx - radius).max(0)..=(cx + radius).min(width - 1) {
            let dx = x - cx;
            let dy = y - cy;
            if dx * dx + dy * dy <= radius * radius {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Draw the letter centered on the disk, shadow first, white glyph on top.
/// The box is lifted by 2% of the edge length to offset the typical glyph
/// baseline skew.
fn draw_glyph(img: &mut RgbaImage, letter: char, font: &GlyphFont) {
    let size = img.width();
    let offset = shadow_offset(size);
    let lift = (size as f32 * VERTICAL_LIFT) as i32;

    match font {
        GlyphFont::TrueType(face) => {
            let px = (size as f32 * FONT_RATIO) as u32;
            let glyph = face
                .glyph(letter)
                .scaled(Scale::uniform(px as f32))
                .positioned(point(0.0, 0.0));
            let bounds = match glyph.pixel_bounding_box() {
                Some(bounds) => bounds,
                // whitespace has no outline, nothing to draw
                None => return,
            };

            let left = (size as i32 - bounds.width()) / 2;
            let top = (size as i32 - bounds.height()) / 2 - lift;

            glyph.draw(|x, y, coverage| {
                blend_pixel(
                    img,
                    left + x as i32 + offset,
                    top + y as i32 + offset,
                    GLYPH_SHADOW,
                    coverage,
                );
            });
            glyph.draw(|x, y, coverage| {
                blend_pixel(img, left + x as i32, top + y as i32, GLYPH_WHITE, coverage);
            });
        }
        GlyphFont::Builtin => {
            println!(
                "  ⚠ No platform font found for {size}x{size}, the builtin font keeps a fixed glyph size"
            );
            draw_builtin_glyph(img, letter, offset, lift);
        }
    }
}

fn draw_builtin_glyph(img: &mut RgbaImage, letter: char, offset: i32, lift: i32) {
    let size = img.width() as i32;
    let rows = font::builtin_rows(letter);
    let glyph_w = (font::BUILTIN_COLS * font::BUILTIN_SCALE) as i32;
    let glyph_h = (font::BUILTIN_ROWS * font::BUILTIN_SCALE) as i32;
    let left = (size - glyph_w) / 2;
    let top = (size - glyph_h) / 2 - lift;

    stamp_builtin(img, &rows, left + offset, top + offset, GLYPH_SHADOW);
    stamp_builtin(img, &rows, left, top, GLYPH_WHITE);
}

fn stamp_builtin(img: &mut RgbaImage, rows: &[u8; 7], left: i32, top: i32, color: Rgba<u8>) {
    let scale = font::BUILTIN_SCALE as i32;

    for (row, bits) in rows.iter().enumerate() {
        for col in 0..font::BUILTIN_COLS {
            if (bits >> (font::BUILTIN_COLS - 1 - col)) & 1 == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let x = left + col as i32 * scale + dx;
                    let y = top + row as i32 * scale + dy;
                    blend_pixel(img, x, y, color, 1.0);
                }
            }
        }
    }
}

/// Shadow displacement down-and-right, never less than one pixel.
fn shadow_offset(size: u32) -> i32 {
    (size / 128).max(1) as i32
}

// Source-over blend with the glyph coverage folded into the source alpha.
fn blend_pixel(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
        return;
    }
    let alpha = coverage.clamp(0.0, 1.0) * (color[3] as f32 / 255.0);
    if alpha <= 0.0 {
        return;
    }

    let pixel = img.get_pixel_mut(x as u32, y as u32);
    for channel in 0..3 {
        pixel[channel] =
            (color[channel] as f32 * alpha + pixel[channel] as f32 * (1.0 - alpha)) as u8;
    }
    pixel[3] = (255.0 * alpha + pixel[3] as f32 * (1.0 - alpha)) as u8;
}

fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_png(img.as_raw(), &mut buf, img.width(), img.height())?;
    Ok(buf)
}

// Encode image data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, width: u32, height: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, width, height, ColorType::Rgba8)?;
    Ok(())
}
