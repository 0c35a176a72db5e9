pub mod types;
pub use types::*;

pub mod font;
pub use font::{Glyph, GlyphStore, GlyphStoreBuilder};

pub mod picture;
pub use picture::Picture;

pub mod render;
pub use render::{render, render_multiline, RenderError, RenderOptions};
