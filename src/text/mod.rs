//! Text support
//!
//! The CPU side of text rendering: glyph rasterization, atlas packing and
//! layout. Drawing lives in `renderer::text`.

pub mod glyph_cache;

pub use glyph_cache::{
    AtlasPacker, FontError, Glyph, GlyphAtlas, GlyphCache, GlyphQuad, RasterGlyph, YAxis,
};
