//! Glyph store built from simple textual font documents.
//!
//! A document is a sequence of glyph blocks. Each block starts with a header
//! line `<code> <shift_h> <shift_v>`, followed by one bitmap row per line
//! (`'0'` is an off pixel, any other character an on pixel), terminated by a
//! blank line. Anything between blocks that is not a header is skipped.

use hashbrown::HashMap;

use nom::{
    character::complete::{space1, u32 as number},
    combinator::all_consuming,
    sequence::tuple,
    IResult,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Horizontal offset applied at placement and folded into the advance.
    pub shift_h: i64,
    /// 1-based row index of the baseline, counted from the bitmap's top.
    pub shift_v: i64,
    /// 0/1 rows, top row first. Rows may differ in length.
    pub bitmap: Vec<Vec<u8>>,
}

impl Glyph {
    /// Horizontal advance. Only the first row counts, even if later rows are
    /// longer.
    pub fn advance(&self) -> usize {
        self.bitmap.first().map_or(0, Vec::len)
    }
}

enum ParseMode {
    NeedHeader,
    NeedLine,
}

fn header(input: &str) -> IResult<&str, (u32, u32, u32)> {
    let (input, (code, _, shift_h, _, shift_v)) =
        all_consuming(tuple((number, space1, number, space1, number)))(input)?;
    Ok((input, (code, shift_h, shift_v)))
}

fn parse_header(line: &str) -> Option<(u32, u32, u32)> {
    header(line.trim()).ok().map(|(_, fields)| fields)
}

/// Accumulates glyph definitions from one or more documents, later documents
/// superseding earlier ones per code, and finalizes into a read-only
/// [`GlyphStore`].
pub struct GlyphStoreBuilder {
    glyphs: HashMap<u8, Glyph, rustc_hash::FxBuildHasher>,
}

impl GlyphStoreBuilder {
    pub fn new() -> Self {
        Self {
            glyphs: HashMap::with_hasher(rustc_hash::FxBuildHasher::default()),
        }
    }

    /// Parses `document` and inserts its glyphs, overwriting any previous
    /// definition of the same code.
    pub fn load(&mut self, document: &str) -> &mut Self {
        let mut mode = ParseMode::NeedHeader;
        let mut pending: Option<(u8, Glyph)> = None;

        for line in document.lines() {
            match mode {
                ParseMode::NeedHeader => {
                    if let Some((code, shift_h, shift_v)) = parse_header(line) {
                        if code > u8::MAX as u32 {
                            log::warn!("glyph code {} exceeds the byte range, skipping", code);
                            pending = None;
                        } else {
                            pending = Some((
                                code as u8,
                                Glyph {
                                    shift_h: shift_h as i64,
                                    shift_v: shift_v as i64,
                                    bitmap: Vec::new(),
                                },
                            ));
                        }
                        mode = ParseMode::NeedLine;
                    } else if !line.is_empty() {
                        log::debug!("skipping non-header line {:?}", line);
                    }
                }
                ParseMode::NeedLine => {
                    if line.is_empty() {
                        if let Some((code, glyph)) = pending.take() {
                            self.glyphs.insert(code, glyph);
                        }
                        mode = ParseMode::NeedHeader;
                    } else if let Some((_, glyph)) = pending.as_mut() {
                        let row = line.chars().map(|c| u8::from(c != '0')).collect();
                        glyph.bitmap.push(row);
                    }
                }
            }
        }

        if let Some((code, glyph)) = pending.take() {
            self.glyphs.insert(code, glyph);
        }

        self
    }

    pub fn build(self) -> GlyphStore {
        GlyphStore {
            glyphs: self.glyphs,
        }
    }
}

impl Default for GlyphStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Finalized code-to-glyph mapping. Immutable once built, so it can be shared
/// freely between concurrent render calls.
#[derive(Debug)]
pub struct GlyphStore {
    glyphs: HashMap<u8, Glyph, rustc_hash::FxBuildHasher>,
}

impl GlyphStore {
    pub fn get(&self, code: u8) -> Option<&Glyph> {
        self.glyphs.get(&code)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
