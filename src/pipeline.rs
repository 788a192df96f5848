// pipeline.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Frame pipeline: change detection, quantization and transparency
use crate::color::{rgb_bytes, Palette};
use crate::error::{Error, Result};
use crate::quant::{Algorithm, BuildParams, Quantizer, RGBA};

/// Number of possible palette indices
const INDICES: usize = 256;

/// Per-frame parameters taken from encoder settings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameParams {
    /// Quantization algorithm
    pub algorithm: Algorithm,
    /// Palette build parameters
    pub build: BuildParams,
    /// Compare each frame with the previous one
    pub change_detection: bool,
    /// Minimum match percentage to reuse the palette (0-100)
    pub threshold: u8,
    /// Color replacing fully transparent pixels
    pub transparent: Option<[u8; 3]>,
}

/// Frame mapped onto a palette
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedFrame {
    /// One palette index per pixel
    pub indexed: Vec<u8>,
    /// Was the palette rebuilt for this frame?
    pub rebuilt: bool,
    /// Palette index of the transparent color
    pub transparent_index: Option<u8>,
    /// Bits per index
    pub color_depth: u8,
}

/// Frame pipeline state
pub struct FramePipeline {
    /// Frame width in pixels
    width: u16,
    /// Frame height in pixels
    height: u16,
    /// Previous frame (RGBA)
    prev: Option<Vec<u8>>,
    /// Quantizer for the active palette
    quantizer: Option<Quantizer>,
    /// Palette entries referenced by any pixel since the last rebuild
    used: [bool; INDICES],
    /// Number of palette builds
    generation: u64,
}

/// Percentage of pixels whose color matches between two RGBA frames.
///
/// Alpha is ignored; the changed fraction is rounded up.
pub fn match_percent(prev: &[u8], cur: &[u8]) -> u8 {
    let total = cur.len() / RGBA;
    if total == 0 {
        return 100;
    }
    let changed = prev
        .chunks_exact(RGBA)
        .zip(cur.chunks_exact(RGBA))
        .filter(|(p, c)| p[..3] != c[..3])
        .count();
    let changed_pct = (100 * changed).div_ceil(total);
    100 - changed_pct.min(100) as u8
}

/// Check whether two frames are similar enough to share a palette
pub fn reuse_palette(prev: &[u8], cur: &[u8], threshold: u8) -> bool {
    match_percent(prev, cur) >= threshold
}

/// Find the used palette entry nearest to a color.
///
/// Entries never referenced by a pixel are skipped; if none are used,
/// index 0 is returned.
pub fn closest_used(palette: &Palette, used: &[bool], rgb: [u8; 3]) -> u8 {
    let mut best = 0;
    let mut dmin = u32::MAX;
    for (i, clr) in palette.iter().enumerate().take(INDICES) {
        if !used.get(i).copied().unwrap_or(false) {
            continue;
        }
        let d: u32 = rgb_bytes(clr)
            .iter()
            .zip(rgb.iter())
            .map(|(a, b)| u32::from(a.abs_diff(*b)).pow(2))
            .sum();
        if d < dmin {
            dmin = d;
            best = i as u8;
        }
    }
    best
}

impl FramePipeline {
    /// Create a new frame pipeline
    pub fn new(width: u16, height: u16) -> Self {
        FramePipeline {
            width,
            height,
            prev: None,
            quantizer: None,
            used: [false; INDICES],
            generation: 0,
        }
    }

    /// Get the expected pixel buffer length
    pub fn buffer_len(&self) -> usize {
        usize::from(self.width) * usize::from(self.height) * RGBA
    }

    /// Get the active palette
    pub fn palette(&self) -> Option<&Palette> {
        self.quantizer.as_ref().map(|q| q.palette())
    }

    /// Get the number of palettes built so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Process one RGBA frame.
    ///
    /// The frame is kept for comparison with the next one.  On error,
    /// pipeline state is left unchanged.
    pub fn process(
        &mut self,
        pixels: Vec<u8>,
        params: &FrameParams,
    ) -> Result<IndexedFrame> {
        let expected = self.buffer_len();
        if pixels.len() != expected {
            return Err(Error::PixelBufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        if expected == 0 {
            return Err(Error::EmptyImage);
        }
        let reuse = match (&self.prev, &self.quantizer) {
            (Some(prev), Some(_)) if params.change_detection => {
                let pct = match_percent(prev, &pixels);
                debug!("frame match: {}% (threshold {})", pct, params.threshold);
                pct >= params.threshold
            }
            _ => false,
        };
        let built = if reuse {
            None
        } else {
            Some(Quantizer::build(params.algorithm, &pixels, params.build)?)
        };
        let quantizer = built
            .as_ref()
            .or(self.quantizer.as_ref())
            .ok_or(Error::QuantizerNotBuilt)?;
        let mut used = if reuse {
            self.used
        } else {
            [false; INDICES]
        };
        let mut indexed = Vec::with_capacity(pixels.len() / RGBA);
        for p in pixels.chunks_exact(RGBA) {
            let idx = quantizer.lookup([p[0], p[1], p[2]])?;
            used[usize::from(idx)] = true;
            indexed.push(idx);
        }
        let transparent_index = params
            .transparent
            .map(|rgb| closest_used(quantizer.palette(), &used, rgb));
        if let Some(ti) = transparent_index {
            for (idx, p) in indexed.iter_mut().zip(pixels.chunks_exact(RGBA)) {
                if p[3] == 0 {
                    *idx = ti;
                }
            }
        }
        let color_depth = quantizer.color_depth();
        debug!(
            "palette: {} colors, depth {}",
            quantizer.palette().len(),
            color_depth
        );
        if let Some(q) = built {
            self.quantizer = Some(q);
            self.generation += 1;
        }
        self.used = used;
        self.prev = Some(pixels);
        Ok(IndexedFrame {
            indexed,
            rebuilt: !reuse,
            transparent_index,
            color_depth,
        })
    }
}
