//! Glyph cache: ASCII glyphs rasterized once into a single coverage atlas
//!
//! Metrics follow the classic bitmap-font convention: `bearing.x` is the
//! offset from the pen to the bitmap's left edge, `bearing.y` the distance
//! from the baseline up to its top row.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use glam::{IVec2, Vec2};

/// Padding between packed glyphs, in pixels
const GLYPH_PADDING: u32 = 1;
const MIN_ATLAS_SIZE: u32 = 256;
const MAX_ATLAS_SIZE: u32 = 4096;
/// Substitute for characters the cache doesn't hold
const FALLBACK_CHAR: char = '?';

#[derive(Debug)]
pub enum FontError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(String),
    /// Glyphs didn't fit even in the largest atlas
    AtlasFull { size: u32 },
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::Io { path, source } => {
                write!(f, "failed to read font {}: {source}", path.display())
            }
            FontError::Parse(msg) => write!(f, "failed to parse font: {msg}"),
            FontError::AtlasFull { size } => {
                write!(f, "glyphs do not fit in a {size}x{size} atlas")
            }
        }
    }
}

impl std::error::Error for FontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FontError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Metrics and atlas region of one character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Bitmap size in pixels
    pub size: IVec2,
    /// Offset from the pen position to the bitmap's left/top
    pub bearing: IVec2,
    /// Horizontal pen advance in pixels
    pub advance: f32,
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

/// A rasterized glyph before packing
#[derive(Debug, Clone)]
pub struct RasterGlyph {
    pub ch: char,
    pub width: u32,
    pub height: u32,
    /// Left edge relative to the pen
    pub xmin: i32,
    /// Bottom edge relative to the baseline (negative for descenders)
    pub ymin: i32,
    pub advance: f32,
    /// Row-major coverage, `width * height` bytes
    pub bitmap: Vec<u8>,
}

/// Single-channel atlas image
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Which way y grows in the target coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YAxis {
    /// Origin bottom-left; `origin.y` is the baseline
    Up,
    /// Origin top-left; `origin.y` is the top of the line
    Down,
}

/// A positioned glyph ready to become two triangles
///
/// `top_left` is where the bitmap's first row and column land and maps to
/// `uv_min`; `bottom_right` maps to `uv_max`. Under `YAxis::Up` the "top"
/// therefore has the larger y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    pub top_left: Vec2,
    pub bottom_right: Vec2,
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

/// Shelf packer: fills rows left to right, opening a new row when full
#[derive(Debug, Clone)]
pub struct AtlasPacker {
    pub width: u32,
    pub height: u32,
    cursor: (u32, u32),
    row_height: u32,
}

impl AtlasPacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cursor: (GLYPH_PADDING, GLYPH_PADDING),
            row_height: 0,
        }
    }

    /// Reserve a `w` x `h` region, returning its top-left corner
    pub fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w + 2 * GLYPH_PADDING > self.width {
            return None;
        }

        if self.cursor.0 + w + GLYPH_PADDING > self.width {
            self.cursor.1 += self.row_height + GLYPH_PADDING;
            self.cursor.0 = GLYPH_PADDING;
            self.row_height = 0;
        }

        if self.cursor.1 + h + GLYPH_PADDING > self.height {
            return None;
        }

        let pos = self.cursor;
        self.cursor.0 += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(pos)
    }
}

/// Character lookup built once at startup
#[derive(Debug, Clone)]
pub struct GlyphCache {
    glyphs: HashMap<char, Glyph>,
    atlas: GlyphAtlas,
    pixel_size: f32,
    ascent: f32,
    line_height: f32,
}

impl GlyphCache {
    /// Read a font file and build the cache
    pub fn load(path: &Path, pixel_size: f32) -> Result<Self, FontError> {
        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cache = Self::from_font_bytes(&bytes, pixel_size)?;
        log::info!(
            "Loaded font {} at {}px ({} glyphs, {}x{} atlas)",
            path.display(),
            pixel_size,
            cache.glyphs.len(),
            cache.atlas.width,
            cache.atlas.height
        );
        Ok(cache)
    }

    /// Parse a TrueType/OpenType font and rasterize ASCII 0..128
    pub fn from_font_bytes(bytes: &[u8], pixel_size: f32) -> Result<Self, FontError> {
        let font = fontdue::Font::from_bytes(
            bytes,
            fontdue::FontSettings {
                scale: pixel_size,
                ..fontdue::FontSettings::default()
            },
        )
        .map_err(|e| FontError::Parse(e.to_string()))?;

        let (ascent, line_height) = match font.horizontal_line_metrics(pixel_size) {
            Some(m) => (m.ascent, m.new_line_size),
            None => (pixel_size, pixel_size * 1.2),
        };

        let mut raster = Vec::with_capacity(128);
        for code in 0u8..128 {
            let ch = code as char;
            // Index 0 is the font's "missing glyph" box
            if font.lookup_glyph_index(ch) == 0 {
                log::debug!("Font has no glyph for {:?}, skipping", ch);
                continue;
            }
            let (metrics, bitmap) = font.rasterize(ch, pixel_size);
            raster.push(RasterGlyph {
                ch,
                width: metrics.width as u32,
                height: metrics.height as u32,
                xmin: metrics.xmin,
                ymin: metrics.ymin,
                advance: metrics.advance_width,
                bitmap,
            });
        }

        Self::from_raster(raster, pixel_size, ascent, line_height)
    }

    /// Pack already rasterized glyphs, growing the atlas until they fit
    pub fn from_raster(
        raster: Vec<RasterGlyph>,
        pixel_size: f32,
        ascent: f32,
        line_height: f32,
    ) -> Result<Self, FontError> {
        let mut size = MIN_ATLAS_SIZE;
        loop {
            if let Some(cache) = Self::pack(&raster, size, pixel_size, ascent, line_height) {
                return Ok(cache);
            }
            if size >= MAX_ATLAS_SIZE {
                return Err(FontError::AtlasFull { size });
            }
            size *= 2;
        }
    }

    fn pack(
        raster: &[RasterGlyph],
        size: u32,
        pixel_size: f32,
        ascent: f32,
        line_height: f32,
    ) -> Option<Self> {
        let mut packer = AtlasPacker::new(size, size);
        let mut pixels = vec![0u8; (size * size) as usize];
        let mut glyphs = HashMap::with_capacity(raster.len());
        let inv = 1.0 / size as f32;

        for g in raster {
            let (uv_min, uv_max) = if g.width == 0 || g.height == 0 {
                (Vec2::ZERO, Vec2::ZERO)
            } else {
                let (x, y) = packer.place(g.width, g.height)?;
                for row in 0..g.height {
                    let src = (row * g.width) as usize;
                    let dst = ((y + row) * size + x) as usize;
                    let len = g.width as usize;
                    pixels[dst..dst + len].copy_from_slice(&g.bitmap[src..src + len]);
                }
                (
                    Vec2::new(x as f32, y as f32) * inv,
                    Vec2::new((x + g.width) as f32, (y + g.height) as f32) * inv,
                )
            };

            glyphs.insert(
                g.ch,
                Glyph {
                    size: IVec2::new(g.width as i32, g.height as i32),
                    bearing: IVec2::new(g.xmin, g.ymin + g.height as i32),
                    advance: g.advance,
                    uv_min,
                    uv_max,
                },
            );
        }

        Some(Self {
            glyphs,
            atlas: GlyphAtlas {
                width: size,
                height: size,
                pixels,
            },
            pixel_size,
            ascent,
            line_height,
        })
    }

    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    /// The glyph for `ch`, or the fallback glyph when it isn't cached
    fn lookup(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch).or_else(|| self.glyphs.get(&FALLBACK_CHAR))
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Position one quad per visible character, starting at `origin`
    pub fn layout(&self, text: &str, origin: Vec2, scale: f32, axis: YAxis) -> Vec<GlyphQuad> {
        let mut quads = Vec::with_capacity(text.len());
        let mut x = origin.x;

        for ch in text.chars() {
            let Some(g) = self.lookup(ch) else {
                continue;
            };

            if g.size.x > 0 && g.size.y > 0 {
                let w = g.size.x as f32 * scale;
                let h = g.size.y as f32 * scale;
                let left = x + g.bearing.x as f32 * scale;

                let (top, bottom) = match axis {
                    YAxis::Up => {
                        let bottom = origin.y - (g.size.y - g.bearing.y) as f32 * scale;
                        (bottom + h, bottom)
                    }
                    YAxis::Down => {
                        let top = origin.y + (self.ascent - g.bearing.y as f32) * scale;
                        (top, top + h)
                    }
                };

                quads.push(GlyphQuad {
                    top_left: Vec2::new(left, top),
                    bottom_right: Vec2::new(left + w, bottom),
                    uv_min: g.uv_min,
                    uv_max: g.uv_max,
                });
            }

            x += g.advance * scale;
        }

        quads
    }

    /// Width of `text` in pixels: the sum of pen advances
    pub fn measure(&self, text: &str, scale: f32) -> f32 {
        text.chars()
            .filter_map(|ch| self.lookup(ch))
            .map(|g| g.advance * scale)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raster(
        ch: char,
        width: u32,
        height: u32,
        xmin: i32,
        ymin: i32,
        advance: f32,
    ) -> RasterGlyph {
        RasterGlyph {
            ch,
            width,
            height,
            xmin,
            ymin,
            advance,
            bitmap: vec![255; (width * height) as usize],
        }
    }

    /// 'A' sits on the baseline, 'g' descends 4px, space is empty, '?' exists
    fn test_cache() -> GlyphCache {
        GlyphCache::from_raster(
            vec![
                raster('A', 10, 12, 1, 0, 12.0),
                raster('g', 8, 12, 1, -4, 10.0),
                raster(' ', 0, 0, 0, 0, 6.0),
                raster('?', 7, 12, 1, 0, 9.0),
            ],
            16.0,
            13.0,
            19.0,
        )
        .unwrap()
    }

    #[test]
    fn test_bearing_from_raster_metrics() {
        let cache = test_cache();
        let a = cache.get('A').unwrap();
        assert_eq!(a.size, IVec2::new(10, 12));
        assert_eq!(a.bearing, IVec2::new(1, 12));

        let g = cache.get('g').unwrap();
        assert_eq!(g.bearing, IVec2::new(1, 8));
    }

    #[test]
    fn test_layout_y_up_matches_baseline_formula() {
        let cache = test_cache();
        let quads = cache.layout("Ag", Vec2::new(25.0, 25.0), 1.0, YAxis::Up);
        assert_eq!(quads.len(), 2);

        // 'A': ypos = y - (size.y - bearing.y) = 25
        assert_eq!(quads[0].top_left, Vec2::new(26.0, 37.0));
        assert_eq!(quads[0].bottom_right, Vec2::new(36.0, 25.0));

        // 'g' starts after A's advance and hangs 4px below the baseline
        assert_eq!(quads[1].top_left.x, 25.0 + 12.0 + 1.0);
        assert_eq!(quads[1].bottom_right.y, 21.0);
    }

    #[test]
    fn test_layout_y_down_hangs_from_line_top() {
        let cache = test_cache();
        let quads = cache.layout("A", Vec2::new(20.0, 20.0), 2.0, YAxis::Down);
        // top = y + (ascent - bearing.y) * s = 20 + (13 - 12) * 2
        assert_eq!(quads[0].top_left, Vec2::new(22.0, 22.0));
        assert_eq!(quads[0].bottom_right, Vec2::new(42.0, 46.0));
    }

    #[test]
    fn test_space_advances_without_quad() {
        let cache = test_cache();
        let quads = cache.layout("A A", Vec2::ZERO, 1.0, YAxis::Down);
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[1].top_left.x, 12.0 + 6.0 + 1.0);
        assert_eq!(cache.measure("A A", 1.0), 30.0);
    }

    #[test]
    fn test_missing_char_falls_back() {
        let cache = test_cache();
        let quads = cache.layout("é", Vec2::ZERO, 1.0, YAxis::Down);
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].uv_min, cache.get('?').unwrap().uv_min);
        assert_eq!(cache.measure("é", 1.0), 9.0);
    }

    #[test]
    fn test_missing_char_without_fallback_is_skipped() {
        let cache =
            GlyphCache::from_raster(vec![raster('A', 4, 4, 0, 0, 5.0)], 8.0, 7.0, 10.0).unwrap();
        assert!(cache.layout("zA", Vec2::ZERO, 1.0, YAxis::Down)[0].top_left.x == 0.0);
        assert_eq!(cache.measure("zzA", 1.0), 5.0);
    }

    #[test]
    fn test_atlas_grows_to_fit() {
        let glyphs: Vec<RasterGlyph> = (0..40u8)
            .map(|i| raster((b'0' + i) as char, 60, 60, 0, 0, 60.0))
            .collect();
        let cache = GlyphCache::from_raster(glyphs, 60.0, 50.0, 70.0).unwrap();
        assert!(cache.atlas().width > MIN_ATLAS_SIZE);
        assert_eq!(cache.len(), 40);
    }

    #[test]
    fn test_oversized_glyph_is_an_error() {
        let oversized = vec![raster('W', MAX_ATLAS_SIZE, 4, 0, 0, 1.0)];
        let result = GlyphCache::from_raster(oversized, 8.0, 7.0, 10.0);
        assert!(matches!(result, Err(FontError::AtlasFull { .. })));
    }

    #[test]
    fn test_garbage_font_is_parse_error() {
        let result = GlyphCache::from_font_bytes(b"not a font", 48.0);
        assert!(matches!(result, Err(FontError::Parse(_))));
    }

    #[test]
    fn test_missing_font_file_is_io_error() {
        let result = GlyphCache::load(Path::new("no/such/font.ttf"), 48.0);
        assert!(matches!(result, Err(FontError::Io { .. })));
    }

    proptest! {
        #[test]
        fn packed_regions_stay_inside_and_never_overlap(
            sizes in proptest::collection::vec((1u32..40, 1u32..40), 1..60)
        ) {
            let mut packer = AtlasPacker::new(256, 256);
            let mut placed: Vec<(u32, u32, u32, u32)> = Vec::new();
            for (w, h) in sizes {
                let Some((x, y)) = packer.place(w, h) else { break };
                prop_assert!(x + w <= 256 && y + h <= 256);
                for &(px, py, pw, ph) in &placed {
                    let apart = x + w <= px || px + pw <= x || y + h <= py || py + ph <= y;
                    prop_assert!(apart);
                }
                placed.push((x, y, w, h));
            }
        }

        #[test]
        fn layout_advances_monotonically(text in "[A g?]{0,24}", scale in 0.25f32..4.0) {
            let cache = test_cache();
            let quads = cache.layout(&text, Vec2::ZERO, scale, YAxis::Down);
            for pair in quads.windows(2) {
                prop_assert!(pair[1].top_left.x > pair[0].top_left.x);
            }
            let width = cache.measure(&text, scale);
            for q in &quads {
                prop_assert!(q.bottom_right.x <= width + 1e-3);
            }
        }
    }
}
