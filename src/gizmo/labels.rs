//! Procedural face label textures.
//!
//! Each face gets a square RGBA image: a flat or vertically graded
//! background, a thin grey frame and the face name centred in bold
//! sans-serif, shaped and rasterized with cosmic-text through glyphon.

use glyphon::{Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache, Weight};

use super::face::CubeFace;

const MAIN_COLOR: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
const OTHER_COLOR: [u8; 4] = [0xcc, 0xcc, 0xcc, 0xff];
const STROKE_COLOR: [u8; 4] = [0xaa, 0xaa, 0xaa, 0xff];
const TEXT_COLOR: [u8; 4] = [0x99, 0x99, 0x99, 0xff];

/// Stroke width in texels at the reference size; the stroke is centred on
/// the image edge so half of it lands inside.
const STROKE_WIDTH: u32 = 2;
/// Label size the font size and stroke are designed for.
const REFERENCE_SIZE: u32 = 64;
/// Font size in texels at the reference size.
const FONT_SIZE: f32 = 10.0;

/// Tightly packed RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelImage {
    /// Edge length in texels.
    pub size: u32,
    /// `size * size * 4` bytes, rows top to bottom.
    pub pixels: Vec<u8>,
}

impl LabelImage {
    fn filled(size: u32, color: [u8; 4]) -> Self {
        Self {
            size,
            pixels: color.repeat((size * size) as usize),
        }
    }

    /// RGBA at (`x`, `y`), or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let i = ((y * self.size + x) * 4) as usize;
        self.pixels.get(i..i + 4).and_then(|p| p.try_into().ok())
    }

    fn set(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if x >= self.size || y >= self.size {
            return;
        }
        let i = ((y * self.size + x) * 4) as usize;
        if let Some(p) = self.pixels.get_mut(i..i + 4) {
            p.copy_from_slice(&color);
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: [u8; 4]) {
        for yy in y..y.saturating_add(h).min(self.size) {
            for xx in x..x.saturating_add(w).min(self.size) {
                self.set(xx, yy, color);
            }
        }
    }
}

fn lerp_color(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    let mut out = [0; 4];
    for (o, (&a, &b)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
    }
    out
}

/// Anti-aliased text coverage, cropped to the inked pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Coverage {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl Coverage {
    fn from_pixels(pixels: &[(i32, i32, u8)]) -> Option<Self> {
        let inked = pixels.iter().filter(|p| p.2 > 0);
        let (min_x, min_y, max_x, max_y) = inked.clone().fold(
            (i32::MAX, i32::MAX, i32::MIN, i32::MIN),
            |(x0, y0, x1, y1), &(x, y, _)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        );
        if min_x > max_x {
            return None;
        }
        let width = (max_x - min_x + 1) as u32;
        let height = (max_y - min_y + 1) as u32;
        let mut alpha = vec![0; (width * height) as usize];
        for &(x, y, a) in inked {
            let i = ((y - min_y) as u32 * width + (x - min_x) as u32) as usize;
            if let Some(dst) = alpha.get_mut(i) {
                *dst = (*dst).max(a);
            }
        }
        Some(Self {
            width,
            height,
            alpha,
        })
    }
}

/// Shapes and rasterizes label text. Holds the font database, so build one
/// and reuse it for every face.
pub struct LabelPainter {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl Default for LabelPainter {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelPainter {
    /// Load the system fonts.
    #[must_use]
    pub fn new() -> Self {
        let font_system = FontSystem::new();
        if font_system.db().is_empty() {
            log::warn!("no fonts available; view cube labels will have no text");
        }
        Self {
            font_system,
            swash_cache: SwashCache::new(),
        }
    }

    /// Whether any font face was found.
    #[must_use]
    pub fn has_fonts(&self) -> bool {
        !self.font_system.db().is_empty()
    }

    /// Draw the label for `face` at `size x size` texels.
    #[must_use]
    pub fn rasterize(&mut self, face: CubeFace, size: u32) -> LabelImage {
        let mut image = label_background(face, size);
        let font_size = FONT_SIZE * image.size as f32 / REFERENCE_SIZE as f32;
        if let Some(text) = self.text_coverage(face.label(), font_size) {
            draw_centered(&mut image, &text);
        }
        image
    }

    fn text_coverage(&mut self, text: &str, font_size: f32) -> Option<Coverage> {
        let font_system = &mut self.font_system;
        let mut buffer =
            Buffer::new(font_system, Metrics::new(font_size, font_size * 1.25));
        buffer.set_size(font_system, None, None);
        let attrs = Attrs::new().family(Family::SansSerif).weight(Weight::BOLD);
        buffer.set_text(font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(font_system, false);

        let mut pixels = Vec::new();
        buffer.draw(
            font_system,
            &mut self.swash_cache,
            Color::rgb(0, 0, 0),
            |x, y, w, h, color| {
                for dy in 0..h as i32 {
                    for dx in 0..w as i32 {
                        pixels.push((x + dx, y + dy, color.a()));
                    }
                }
            },
        );
        Coverage::from_pixels(&pixels)
    }
}

/// Background and frame of a label, without text.
fn label_background(face: CubeFace, size: u32) -> LabelImage {
    let size = size.max(8);
    let scale = (size / REFERENCE_SIZE).max(1);

    let mut image = match face {
        CubeFace::Top => LabelImage::filled(size, MAIN_COLOR),
        CubeFace::Bottom => LabelImage::filled(size, OTHER_COLOR),
        _ => {
            let mut image = LabelImage::filled(size, MAIN_COLOR);
            for y in 0..size {
                let t = (y as f32 + 0.5) / size as f32;
                let color = lerp_color(MAIN_COLOR, OTHER_COLOR, t);
                image.fill_rect(0, y, size, 1, color);
            }
            image
        }
    };

    let inset = (STROKE_WIDTH * scale) / 2;
    image.fill_rect(0, 0, size, inset, STROKE_COLOR);
    image.fill_rect(0, size - inset, size, inset, STROKE_COLOR);
    image.fill_rect(0, 0, inset, size, STROKE_COLOR);
    image.fill_rect(size - inset, 0, inset, size, STROKE_COLOR);
    image
}

/// Blend `text` in the text color over the middle of `image`.
fn draw_centered(image: &mut LabelImage, text: &Coverage) {
    let x0 = image.size.saturating_sub(text.width) / 2;
    let y0 = image.size.saturating_sub(text.height) / 2;
    for y in 0..text.height {
        for x in 0..text.width {
            let Some(&a) = text.alpha.get((y * text.width + x) as usize) else {
                continue;
            };
            let Some(under) = image.pixel(x0 + x, y0 + y) else {
                continue;
            };
            if a > 0 {
                let color = lerp_color(under, TEXT_COLOR, f32::from(a) / 255.0);
                image.set(x0 + x, y0 + y, color);
            }
        }
    }
}

/// Draw the label for `face` with a one-off [`LabelPainter`].
#[must_use]
pub fn rasterize_label(face: CubeFace, size: u32) -> LabelImage {
    LabelPainter::new().rasterize(face, size)
}

/// The six face labels as consecutive layers in [`CubeFace::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelAtlas {
    /// Edge length of each layer.
    pub size: u32,
    /// Six RGBA8 layers, back to back.
    pub data: Vec<u8>,
}

impl LabelAtlas {
    /// Rasterize every face at `size x size`.
    #[must_use]
    pub fn generate(size: u32) -> Self {
        Self::generate_with(&mut LabelPainter::new(), size)
    }

    /// Rasterize every face at `size x size` with an existing painter.
    #[must_use]
    pub fn generate_with(painter: &mut LabelPainter, size: u32) -> Self {
        let layers: Vec<LabelImage> = CubeFace::ALL
            .iter()
            .map(|&face| painter.rasterize(face, size))
            .collect();
        let size = layers.first().map_or(size, |l| l.size);
        let data = layers.into_iter().flat_map(|l| l.pixels).collect();
        Self { size, data }
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> u32 {
        CubeFace::ALL.len() as u32
    }

    /// Bytes of one layer.
    #[must_use]
    pub fn layer(&self, face: CubeFace) -> &[u8] {
        let len = (self.size * self.size * 4) as usize;
        let start = face.index() * len;
        self.data.get(start..start + len).unwrap_or_default()
    }
}
