use crate::types::{Dimension, Position};
use serde::{Deserialize, Serialize};

/// Dense rectangular bit matrix, row-major with 0/1 bytes. This is what the
/// compositor produces and what gets serialized for the sign driver.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    dimensions: Dimension,
    data: Vec<u8>,
}

impl Picture {
    pub fn filled(dimensions: Dimension, bit: u8) -> Self {
        Self {
            dimensions,
            data: vec![bit; dimensions.area()],
        }
    }

    #[inline]
    pub const fn dimensions(&self) -> Dimension {
        self.dimensions
    }

    #[inline]
    pub fn get(&self, pos: Position) -> u8 {
        self.data[(pos.y * self.dimensions.width as i64 + pos.x) as usize]
    }

    #[inline]
    pub fn set(&mut self, pos: Position, bit: u8) {
        let offset = (pos.y * self.dimensions.width as i64 + pos.x) as usize;
        self.data[offset] = bit;
    }

    /// Iterates rows top to bottom. A zero-width picture still yields one
    /// (empty) slice per row.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let width = self.dimensions.width as usize;
        (0..self.dimensions.height as usize).map(move |y| &self.data[y * width..(y + 1) * width])
    }

    /// Wire serialization for the sign driver: one `'0'`/`'1'` character per
    /// bit, rows joined by `'\n'`, no trailing newline.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.data.len() + self.dimensions.height as usize);
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for &bit in row {
                out.push(if bit == 0 { '0' } else { '1' });
            }
        }
        out
    }
}

impl core::fmt::Debug for Picture {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Picture")
            .field("dimensions", &self.dimensions)
            .finish()
    }
}
