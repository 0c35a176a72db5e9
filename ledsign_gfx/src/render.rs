//! Text compositor. Places glyph bitmaps on a baseline into a sparse buffer,
//! then densifies into a [`Picture`].

use crate::font::GlyphStore;
use crate::picture::Picture;
use crate::types::{Dimension, Position};

use hashbrown::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Ignore the per-glyph horizontal shift, spacing glyphs exactly one
    /// column apart.
    pub ignore_shift_h: bool,
    /// Vertical gap in rows between stacked lines (multi-line only).
    pub distance: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ignore_shift_h: false,
            distance: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// A byte of the input text has no glyph in the store.
    MissingGlyph(u8),
    /// A glyph's baseline alignment produced a negative row, meaning the font
    /// and the requested height do not match.
    RowOutOfRange { code: u8, row: i64 },
}

impl core::fmt::Display for RenderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RenderError::MissingGlyph(code) => {
                write!(f, "no glyph defined for character code {}", code)
            }
            RenderError::RowOutOfRange { code, row } => {
                write!(f, "character code {} placed at negative row {}", code, row)
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Renders `text` as a single line of `height` rows.
///
/// The output width is the sum of every glyph's advance plus inter-glyph
/// spacing (`1 + shift_h`, or exactly 1 with `ignore_shift_h`), including the
/// spacing after the final glyph. Pixels above the visible area are clipped
/// silently; a pixel below the baseline origin is a hard error.
pub fn render(
    store: &GlyphStore,
    text: &[u8],
    height: u32,
    opts: RenderOptions,
) -> Result<Picture, RenderError> {
    // Sparse placement buffer keyed by (row, col), rows counting up from the
    // baseline.
    let mut buf: HashMap<(i64, i64), u8, rustc_hash::FxBuildHasher> =
        HashMap::with_hasher(rustc_hash::FxBuildHasher::default());
    let mut width: i64 = 0;

    for &code in text {
        let glyph = store.get(code).ok_or(RenderError::MissingGlyph(code))?;
        let add_shift_h = if opts.ignore_shift_h { 0 } else { glyph.shift_h };

        for (i, row) in glyph.bitmap.iter().enumerate() {
            for (j, &bit) in row.iter().enumerate() {
                let bit_row = glyph.shift_v - 1 - i as i64;
                if bit_row < 0 {
                    return Err(RenderError::RowOutOfRange { code, row: bit_row });
                }
                let bit_col = width + j as i64 + add_shift_h;
                buf.insert((bit_row, bit_col), bit);
            }
        }

        // Advance past the glyph, plus the interval between letters.
        width += glyph.advance() as i64;
        width += 1 + add_shift_h;
    }

    let mut pic = Picture::filled(Dimension::new(width as u32, height), 0);
    for (&(bit_row, col), &bit) in buf.iter() {
        let out_row = height as i64 - 1 - bit_row;
        if out_row < 0 || out_row >= height as i64 || col < 0 || col >= width {
            continue;
        }
        pic.set(Position::new(col, out_row), bit);
    }

    Ok(pic)
}

/// Renders several lines and stacks them below each other, each centered
/// within the width of the widest line.
pub fn render_multiline<T: AsRef<[u8]>>(
    store: &GlyphStore,
    lines: &[T],
    line_height: u32,
    opts: RenderOptions,
) -> Result<Picture, RenderError> {
    let mut line_pics = Vec::with_capacity(lines.len());
    for line in lines {
        line_pics.push(render(store, line.as_ref(), line_height, opts)?);
    }
    for pic in &line_pics {
        log::trace!("line:\n{}", pic.to_text());
    }

    let width = line_pics
        .iter()
        .map(|pic| pic.dimensions().width)
        .max()
        .unwrap_or(0);
    let line_shift = line_height + opts.distance;

    let mut canvas = Picture::filled(
        Dimension::new(width, line_shift * line_pics.len() as u32),
        0,
    );
    for (line_i, pic) in line_pics.iter().enumerate() {
        let dim = pic.dimensions();
        let origin = Position::new(
            ((width - dim.width) / 2) as i64,
            (line_i as u32 * line_shift) as i64,
        );
        for y in 0..dim.height as i64 {
            for x in 0..dim.width as i64 {
                let local = Position::new(x, y);
                canvas.set(origin + local, pic.get(local));
            }
        }
    }

    Ok(canvas)
}
