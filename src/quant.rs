// quant.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Color quantizers
use crate::color::Palette;
use crate::error::{Error, Result};
use crate::octree::Octree;
use color_quant::NeuQuant;

/// Number of RGBA channels in a pixel buffer
pub const RGBA: usize = 4;

/// Maximum NeuQuant sample factor
const MAX_SAMPLE_FACTOR: i32 = 30;

/// Color quantization algorithm
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// Neural network quantizer, always 256 colors
    #[default]
    NeuQuant,
    /// Octree quantizer, bounded by the palette size hint
    Octree,
}

/// Parameters for building a palette
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildParams {
    /// Octree palette size hint (4-7); palette holds `2 << size` colors
    pub palette_size: u8,
    /// NeuQuant sample factor (1 is best / slowest)
    pub sample_factor: i32,
}

/// Neural network quantizer with its color map
pub struct NeuQuantizer {
    net: NeuQuant,
    palette: Palette,
}

/// Quantizer built from one frame
pub enum Quantizer {
    /// Octree palette builder
    Octree {
        /// Reduced tree
        tree: Octree,
        /// Bits per index
        color_depth: u8,
    },
    /// Neural network quantizer
    NeuQuant(NeuQuantizer),
}

impl Default for BuildParams {
    fn default() -> Self {
        BuildParams {
            palette_size: 7,
            sample_factor: 10,
        }
    }
}

impl NeuQuantizer {
    /// Bits per index
    const COLOR_DEPTH: u8 = 8;

    /// Number of colors in the network
    const COLORS: usize = 256;

    /// Train a network on RGBA pixels
    fn build(rgba: &[u8], sample_factor: i32) -> Self {
        // alpha only flags transparency; train on opaque pixels
        let opaque: Vec<u8> = rgba
            .chunks_exact(RGBA)
            .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
            .collect();
        let sample_factor = sample_factor.clamp(1, MAX_SAMPLE_FACTOR);
        let net = NeuQuant::new(sample_factor, Self::COLORS, &opaque);
        let palette = Palette::from_rgb_bytes(&net.color_map_rgb());
        NeuQuantizer { net, palette }
    }

    /// Get the nearest palette index
    fn nearest_index(&self, rgb: [u8; 3]) -> u8 {
        self.net.index_of(&[rgb[0], rgb[1], rgb[2], u8::MAX]) as u8
    }
}

impl Quantizer {
    /// Build a quantizer from an RGBA pixel buffer
    pub fn build(
        algorithm: Algorithm,
        rgba: &[u8],
        params: BuildParams,
    ) -> Result<Self> {
        if rgba.len() < RGBA {
            return Err(Error::EmptyImage);
        }
        match algorithm {
            Algorithm::Octree => {
                let mut tree = Octree::new();
                for p in rgba.chunks_exact(RGBA) {
                    tree.insert([p[0], p[1], p[2]]);
                }
                let color_depth = params.palette_size.clamp(4, 7) + 1;
                tree.reduce(1 << color_depth)?;
                Ok(Quantizer::Octree { tree, color_depth })
            }
            Algorithm::NeuQuant => Ok(Quantizer::NeuQuant(NeuQuantizer::build(
                rgba,
                params.sample_factor,
            ))),
        }
    }

    /// Get the palette
    pub fn palette(&self) -> &Palette {
        match self {
            Quantizer::Octree { tree, .. } => tree.palette(),
            Quantizer::NeuQuant(nq) => &nq.palette,
        }
    }

    /// Get the number of bits needed for each index
    pub fn color_depth(&self) -> u8 {
        match self {
            Quantizer::Octree { color_depth, .. } => *color_depth,
            Quantizer::NeuQuant(_) => NeuQuantizer::COLOR_DEPTH,
        }
    }

    /// Map a color to a palette index
    pub fn lookup(&self, rgb: [u8; 3]) -> Result<u8> {
        match self {
            Quantizer::Octree { tree, .. } => tree.lookup(rgb),
            Quantizer::NeuQuant(nq) => Ok(nq.nearest_index(rgb)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn gradient(width: usize, height: usize) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(width * height * RGBA);
        for y in 0..height {
            for x in 0..width {
                let r = (x * 255 / (width - 1)) as u8;
                let g = (y * 255 / (height - 1)) as u8;
                rgba.extend_from_slice(&[r, g, 128, 255]);
            }
        }
        rgba
    }

    #[test]
    fn empty() {
        for algorithm in [Algorithm::Octree, Algorithm::NeuQuant] {
            let res = Quantizer::build(algorithm, &[], BuildParams::default());
            assert!(matches!(res, Err(Error::EmptyImage)));
        }
    }

    #[test]
    fn octree_depth() -> Result<()> {
        let rgba = gradient(32, 32);
        let params = BuildParams {
            palette_size: 4,
            ..Default::default()
        };
        let q = Quantizer::build(Algorithm::Octree, &rgba, params)?;
        assert_eq!(q.color_depth(), 5);
        assert!(q.palette().len() <= 32);
        for p in rgba.chunks_exact(RGBA) {
            let idx = q.lookup([p[0], p[1], p[2]])?;
            assert!(usize::from(idx) < q.palette().len());
        }
        Ok(())
    }

    #[test]
    fn neuquant() -> Result<()> {
        let rgba = gradient(16, 16);
        let params = BuildParams::default();
        let q = Quantizer::build(Algorithm::NeuQuant, &rgba, params)?;
        assert_eq!(q.color_depth(), 8);
        assert_eq!(q.palette().len(), 256);
        let idx = q.lookup([255, 255, 128])?;
        assert_eq!(q.lookup([255, 255, 128])?, idx);
        assert!(q.palette().entry(idx.into()).is_some());
        Ok(())
    }
}
