// color.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Color accumulation and palettes
use pix::rgb::{Rgb, SRgb8};
use std::ops::AddAssign;

/// Number of entries in a written color table
pub const TABLE_LEN: usize = 256;

/// Number of channels in a color table entry
const CHANNELS: usize = 3;

/// Additive RGB color
///
/// Channels are widened so that every pixel of a frame can be summed into
/// one node of the octree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    red: u64,
    green: u64,
    blue: u64,
}

/// Ordered set of colors referenced by palette index
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Palette {
    entries: Vec<SRgb8>,
}

impl From<[u8; 3]> for Color {
    fn from(rgb: [u8; 3]) -> Self {
        Color::new(rgb[0], rgb[1], rgb[2])
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        self.red += rhs.red;
        self.green += rhs.green;
        self.blue += rhs.blue;
    }
}

impl Color {
    /// Create a color from 8-bit channels
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Color {
            red: red.into(),
            green: green.into(),
            blue: blue.into(),
        }
    }

    /// Get the channel sums
    pub fn channels(self) -> [u64; 3] {
        [self.red, self.green, self.blue]
    }

    /// Average of `count` accumulated colors.
    ///
    /// Channels are truncated toward zero; a zero count yields black.
    pub fn normalized(self, count: u64) -> SRgb8 {
        if count == 0 {
            return SRgb8::default();
        }
        let [r, g, b] = self
            .channels()
            .map(|sum| (sum / count).min(u8::MAX.into()) as u8);
        SRgb8::new(r, g, b)
    }
}

/// Split an entry into `[red, green, blue]` bytes
pub fn rgb_bytes(clr: SRgb8) -> [u8; 3] {
    [
        u8::from(Rgb::red(clr)),
        u8::from(Rgb::green(clr)),
        u8::from(Rgb::blue(clr)),
    ]
}

impl FromIterator<SRgb8> for Palette {
    fn from_iter<I: IntoIterator<Item = SRgb8>>(iter: I) -> Self {
        Palette {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Palette {
    /// Build a palette from packed `[r, g, b, r, g, b, ...]` bytes
    pub fn from_rgb_bytes(bytes: &[u8]) -> Self {
        bytes
            .chunks_exact(CHANNELS)
            .map(|c| SRgb8::new(c[0], c[1], c[2]))
            .collect()
    }

    /// Append an entry, returning its index
    pub fn push(&mut self, clr: SRgb8) -> usize {
        self.entries.push(clr);
        self.entries.len() - 1
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the palette has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry
    pub fn entry(&self, idx: usize) -> Option<SRgb8> {
        self.entries.get(idx).copied()
    }

    /// Iterate over entries
    pub fn iter(&self) -> impl Iterator<Item = SRgb8> + '_ {
        self.entries.iter().copied()
    }

    /// Color table bytes, zero padded to 256 entries
    pub fn table_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(TABLE_LEN * CHANNELS);
        for clr in self.entries.iter().take(TABLE_LEN) {
            bytes.extend_from_slice(&rgb_bytes(*clr));
        }
        bytes.resize(TABLE_LEN * CHANNELS, 0);
        bytes
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accumulate() {
        let mut c = Color::default();
        c += Color::new(10, 20, 255);
        c += Color::new(11, 20, 255);
        c += Color::new(12, 20, 255);
        assert_eq!(c.channels(), [33, 60, 765]);
        assert_eq!(c.normalized(3), SRgb8::new(11, 20, 255));
        assert_eq!(c.normalized(0), SRgb8::new(0, 0, 0));
    }

    #[test]
    fn truncated_average() {
        let mut c = Color::new(1, 2, 3);
        c += Color::new(2, 3, 4);
        assert_eq!(c.normalized(2), SRgb8::new(1, 2, 3));
    }

    #[test]
    fn table_padding() {
        let p = Palette::from_rgb_bytes(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(p.len(), 2);
        let t = p.table_bytes();
        assert_eq!(t.len(), 768);
        assert_eq!(&t[..6], &[1, 2, 3, 4, 5, 6]);
        assert!(t[6..].iter().all(|b| *b == 0));
    }
}
