// private.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! Private module for top-level items
use crate::block::*;
use crate::color::Palette;
use crate::encode::BlockEnc;
use crate::error::{Error, Result};
use crate::pipeline::{FrameParams, FramePipeline, IndexedFrame};
use crate::quant::Algorithm;
use crate::sink::{Backpressure, Sink, Subscription};
use pix::rgb::SRgba8;
use pix::Raster;

/// Encoder state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Waiting for `start`
    Idle,
    /// Accepting frames
    Started,
    /// Trailer written
    Finished,
}

/// Progress callback
type Progress = Box<dyn FnMut(u8) + Send>;

/// Animated GIF encoder
///
/// Frames are RGBA pixel buffers.  Each frame is quantized to a palette of
/// at most 256 colors, either with a neural network ([NeuQuant], the
/// default) or an [Octree].  With change detection enabled, a frame close
/// enough to the previous one reuses its palette.
///
/// Output is available through [data] / [into_bytes], or streamed to
/// [subscribe]rs as each frame is encoded.
///
/// ## Example
/// ```
/// use gifsmith::{Algorithm, Encoder};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut enc = Encoder::new(2, 2).with_algorithm(Algorithm::Octree);
/// enc.set_delay_ms(100);
/// enc.start()?;
/// enc.add_frame(vec![
///     0x00, 0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0xFF,
///     0x00, 0xFF, 0x00, 0xFF, 0x00, 0x00, 0xFF, 0xFF,
/// ])?;
/// enc.finish()?;
/// let gif = enc.into_bytes();
/// assert_eq!(&gif[..6], b"GIF89a");
/// # Ok(())
/// # }
/// ```
///
/// [data]: struct.Encoder.html#method.data
/// [into_bytes]: struct.Encoder.html#method.into_bytes
/// [NeuQuant]: enum.Algorithm.html#variant.NeuQuant
/// [Octree]: enum.Algorithm.html#variant.Octree
/// [subscribe]: struct.Encoder.html#method.subscribe
pub struct Encoder {
    /// Frame width in pixels
    width: u16,
    /// Frame height in pixels
    height: u16,
    /// Frame pipeline parameters
    params: FrameParams,
    /// Frame delay in centiseconds
    delay_cs: u16,
    /// Loop count (`None` for no looping extension)
    repeat: Option<u16>,
    /// Disposal method override
    dispose: Option<DisposalMethod>,
    /// Expected number of frames, for progress
    total_frames: Option<usize>,
    /// Progress callback
    progress: Option<Progress>,
    /// Encoder state
    state: State,
    /// Number of frames written
    frames_written: usize,
    /// Frame pipeline
    pipeline: FramePipeline,
    /// Block encoder for output
    block_enc: BlockEnc<Sink>,
}

impl Encoder {
    /// Default reuse threshold (percent)
    const THRESHOLD: u8 = 90;

    /// Create a new GIF encoder.
    ///
    /// Defaults: NeuQuant palettes, no change detection, loop forever.
    pub fn new(width: u16, height: u16) -> Self {
        Encoder {
            width,
            height,
            params: FrameParams {
                threshold: Self::THRESHOLD,
                ..Default::default()
            },
            delay_cs: 0,
            repeat: Some(0),
            dispose: None,
            total_frames: None,
            progress: None,
            state: State::Idle,
            frames_written: 0,
            pipeline: FramePipeline::new(width, height),
            block_enc: BlockEnc::new(Sink::new()),
        }
    }

    /// Set the quantization algorithm
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.params.algorithm = algorithm;
        self
    }

    /// Enable or disable palette reuse for similar frames
    pub fn with_change_detection(mut self, enabled: bool) -> Self {
        self.params.change_detection = enabled;
        self
    }

    /// Set the expected number of frames, for progress reporting
    pub fn with_total_frames(mut self, total_frames: usize) -> Self {
        self.total_frames = Some(total_frames);
        self
    }

    /// Get the frame width
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get the frame height
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Set the frame delay in milliseconds (rounded to centiseconds)
    pub fn set_delay_ms(&mut self, ms: u32) {
        let cs = ms.saturating_add(5) / 10;
        self.delay_cs = u16::try_from(cs).unwrap_or(u16::MAX);
    }

    /// Set the frame delay from a frame rate.
    ///
    /// Rates which are not positive are ignored.
    pub fn set_frame_rate(&mut self, fps: f32) {
        if fps.is_finite() && fps > 0.0 {
            let cs = (100.0 / fps).round();
            self.delay_cs = cs.min(f32::from(u16::MAX)) as u16;
        }
    }

    /// Get the frame delay in centiseconds
    pub fn delay_cs(&self) -> u16 {
        self.delay_cs
    }

    /// Set the disposal method code (ignored if negative)
    pub fn set_dispose(&mut self, code: i32) {
        if code >= 0 {
            self.dispose = Some(DisposalMethod::from((code & 0b111) as u8));
        }
    }

    /// Set the repeat count.
    ///
    /// Zero loops forever; a negative count omits the looping extension.
    pub fn set_repeat(&mut self, repeat: i32) {
        self.repeat = u32::try_from(repeat)
            .ok()
            .map(|r| u16::try_from(r).unwrap_or(u16::MAX));
    }

    /// Set the transparent color (`0xRRGGBB`).
    ///
    /// Fully transparent pixels are replaced by the nearest used palette
    /// entry, which is flagged as transparent.
    pub fn set_transparent(&mut self, rgb: Option<u32>) {
        self.params.transparent =
            rgb.map(|c| [(c >> 16) as u8, (c >> 8) as u8, c as u8]);
    }

    /// Set NeuQuant quality (sample factor; 1 is best)
    pub fn set_quality(&mut self, quality: i32) {
        self.params.build.sample_factor = quality.max(1);
    }

    /// Set the palette reuse threshold (percent of matching pixels)
    pub fn set_threshold(&mut self, threshold: i32) {
        self.params.threshold = threshold.clamp(0, 100) as u8;
    }

    /// Set the octree palette size (4-7); the palette holds up to
    /// `2 << size` colors
    pub fn set_palette_size(&mut self, size: i32) {
        self.params.build.palette_size = size.clamp(4, 7) as u8;
    }

    /// Set a callback for progress (percent of total frames)
    pub fn on_progress<F>(&mut self, callback: F)
    where
        F: FnMut(u8) + Send + 'static,
    {
        self.progress = Some(Box::new(callback));
    }

    /// Subscribe to encoded output.
    ///
    /// Only bytes flushed after subscribing are received.
    pub fn subscribe(
        &mut self,
        capacity: usize,
        backpressure: Backpressure,
    ) -> Subscription {
        self.block_enc.writer_mut().subscribe(capacity, backpressure)
    }

    /// Get the bytes not yet sent to subscribers.
    ///
    /// Without subscribers, this is the whole output.
    pub fn data(&self) -> &[u8] {
        self.block_enc.writer().as_bytes()
    }

    /// Consume the encoder, returning the bytes not yet sent to subscribers
    pub fn into_bytes(self) -> Vec<u8> {
        self.block_enc.into_inner().into_bytes()
    }

    /// Get the number of palettes built so far
    pub fn palette_generation(&self) -> u64 {
        self.pipeline.generation()
    }

    /// Get the active palette
    pub fn palette(&self) -> Option<&Palette> {
        self.pipeline.palette()
    }

    /// Get the number of frames written
    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Start encoding, writing the GIF header
    pub fn start(&mut self) -> Result<()> {
        if self.state != State::Idle {
            return Err(Error::InvalidBlockSequence);
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::EmptyImage);
        }
        info!("start: {}x{}", self.width, self.height);
        self.block_enc.encode(Header::default())?;
        self.block_enc.writer_mut().flush();
        self.state = State::Started;
        Ok(())
    }

    /// Add a raster as the next frame
    pub fn add_raster(&mut self, raster: &Raster<SRgba8>) -> Result<()> {
        let width = u16::try_from(raster.width())?;
        let height = u16::try_from(raster.height())?;
        if width != self.width || height != self.height {
            return Err(Error::InvalidRasterDimensions);
        }
        self.add_frame(raster.as_u8_slice().to_vec())
    }

    /// Add the next frame.
    ///
    /// `pixels` must hold `width * height` RGBA pixels.  If an error is
    /// returned, nothing is written and the frame is discarded.
    pub fn add_frame(&mut self, pixels: Vec<u8>) -> Result<()> {
        if self.state != State::Started {
            return Err(Error::InvalidBlockSequence);
        }
        let frame = self.pipeline.process(pixels, &self.params)?;
        debug!(
            "frame {}: palette {}",
            self.frames_written,
            if frame.rebuilt { "rebuilt" } else { "reused" }
        );
        self.encode_frame(frame)?;
        self.block_enc.writer_mut().flush();
        self.frames_written += 1;
        self.report_progress();
        Ok(())
    }

    /// Encode blocks for one frame
    fn encode_frame(&mut self, frame: IndexedFrame) -> Result<()> {
        let palette = self.pipeline.palette().ok_or(Error::QuantizerNotBuilt)?;
        let first = self.frames_written == 0;
        let enc = &mut self.block_enc;
        let tbl = ColorTableConfig::new(ColorTableExistence::Present, 256);
        if first {
            enc.encode(
                LogicalScreenDesc::default()
                    .with_screen_width(self.width)
                    .with_screen_height(self.height)
                    .with_color_table_config(&tbl),
            )?;
            enc.encode(GlobalColorTable::with_palette(palette))?;
            if let Some(repeat) = self.repeat {
                enc.encode(Application::with_loop_count(repeat))?;
            }
        }
        let mut control = GraphicControl::default();
        control.set_delay_time_cs(self.delay_cs);
        let disposal = match (self.dispose, frame.transparent_index) {
            (Some(dispose), _) => dispose,
            (None, Some(_)) => DisposalMethod::Background,
            (None, None) => DisposalMethod::NoAction,
        };
        control.set_disposal_method(disposal);
        if let Some(idx) = frame.transparent_index {
            control.set_transparent(true);
            control.set_transparent_color_idx(idx);
        }
        enc.encode(control)?;
        let desc = ImageDesc::default()
            .with_width(self.width)
            .with_height(self.height);
        if first {
            enc.encode(desc.with_color_table_config(&Default::default()))?;
        } else {
            enc.encode(desc.with_color_table_config(&tbl))?;
            enc.encode(LocalColorTable::with_palette(palette))?;
        }
        enc.encode(ImageData::with_indices(frame.color_depth, frame.indexed))?;
        Ok(())
    }

    /// Report progress, if total frames is known
    fn report_progress(&mut self) {
        if let (Some(total), Some(progress)) =
            (self.total_frames, self.progress.as_mut())
        {
            if total > 0 {
                let pct = (100 * self.frames_written / total).min(100);
                progress(pct as u8);
            }
        }
    }

    /// Finish encoding, writing the trailer and closing the output
    pub fn finish(&mut self) -> Result<()> {
        if self.state != State::Started {
            return Err(Error::InvalidBlockSequence);
        }
        self.block_enc.encode(Trailer::default())?;
        self.block_enc.writer_mut().close();
        self.state = State::Finished;
        info!("finish: {} frame(s)", self.frames_written);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Offset of the looping extension in a single-palette stream
    const LOOP_EXT: usize = 6 + 7 + 768;
    /// Length of the looping extension
    const LOOP_EXT_LEN: usize = 19;

    fn four_colors() -> Vec<u8> {
        vec![
            0, 0, 0, 255, //
            255, 0, 0, 255, //
            0, 255, 0, 255, //
            0, 0, 255, 255, //
        ]
    }

    fn solid(n_pixels: usize, rgba: [u8; 4]) -> Vec<u8> {
        rgba.iter().copied().cycle().take(n_pixels * 4).collect()
    }

    fn encode_once(mut enc: Encoder, pixels: Vec<u8>) -> Result<Vec<u8>> {
        enc.start()?;
        enc.add_frame(pixels)?;
        enc.finish()?;
        Ok(enc.into_bytes())
    }

    #[test]
    fn four_color_octree() -> Result<()> {
        let mut enc = Encoder::new(2, 2).with_algorithm(Algorithm::Octree);
        enc.set_palette_size(7);
        enc.start()?;
        enc.add_frame(four_colors())?;
        assert_eq!(enc.palette().map(|p| p.len()), Some(4));
        enc.finish()?;
        let gif = enc.into_bytes();
        assert_eq!(&gif[..6], b"GIF89a");
        assert_eq!(gif.last(), Some(&0x3B));
        // screen descriptor advertises a 256 entry table
        assert_eq!(gif[6..11], [2, 0, 2, 0, 0xF7]);
        // first frame has no local table
        let desc = LOOP_EXT + LOOP_EXT_LEN + 8;
        assert_eq!(gif[desc], 0x2C);
        assert_eq!(gif[desc + 9], 0);
        // minimum code size: palette size + 1
        assert_eq!(gif[desc + 10], 8);

        let params = FrameParams {
            algorithm: Algorithm::Octree,
            ..Default::default()
        };
        let mut pipe = FramePipeline::new(2, 2);
        let mut indexed = pipe.process(four_colors(), &params)?.indexed;
        indexed.sort();
        indexed.dedup();
        assert_eq!(indexed.len(), 4);
        Ok(())
    }

    #[test]
    fn repeat_extension() -> Result<()> {
        let new = || Encoder::new(2, 2).with_algorithm(Algorithm::Octree);
        let mut enc = new();
        enc.set_repeat(0);
        let looped = encode_once(enc, four_colors())?;
        let mut enc = new();
        enc.set_repeat(-1);
        let once = encode_once(enc, four_colors())?;
        assert_eq!(looped.len(), once.len() + LOOP_EXT_LEN);
        assert_eq!(looped[..LOOP_EXT], once[..LOOP_EXT]);
        assert_eq!(looped[LOOP_EXT + LOOP_EXT_LEN..], once[LOOP_EXT..]);
        assert_eq!(&looped[LOOP_EXT + 3..LOOP_EXT + 14], b"NETSCAPE2.0");
        let mut enc = new();
        enc.set_repeat(0x10203);
        let clamped = encode_once(enc, four_colors())?;
        assert_eq!(clamped[LOOP_EXT + 16..LOOP_EXT + 18], [0xFF, 0xFF]);
        Ok(())
    }

    #[test]
    fn reused_palette_still_written() -> Result<()> {
        let mut enc = Encoder::new(4, 4)
            .with_algorithm(Algorithm::Octree)
            .with_change_detection(true);
        enc.set_threshold(50);
        enc.start()?;
        enc.add_frame(solid(16, [20, 40, 60, 255]))?;
        let len = enc.data().len();
        assert_eq!(enc.palette_generation(), 1);
        enc.add_frame(solid(16, [20, 40, 60, 255]))?;
        assert_eq!(enc.palette_generation(), 1);
        let gif = enc.data();
        let global = &gif[13..13 + 768];
        let frame = &gif[len..];
        assert_eq!(frame[..2], [0x21, 0xF9]);
        assert_eq!(frame[8], 0x2C);
        assert_eq!(frame[17], 0x87);
        assert_eq!(&frame[18..18 + 768], global);
        Ok(())
    }

    #[test]
    fn changed_frame_rebuilds() -> Result<()> {
        let mut enc = Encoder::new(2, 2)
            .with_algorithm(Algorithm::Octree)
            .with_change_detection(true);
        enc.start()?;
        enc.add_frame(four_colors())?;
        enc.add_frame(solid(4, [9, 9, 9, 255]))?;
        assert_eq!(enc.palette_generation(), 2);
        assert_eq!(enc.palette().map(|p| p.len()), Some(1));
        Ok(())
    }

    #[test]
    fn graphic_control() -> Result<()> {
        let gce = LOOP_EXT + LOOP_EXT_LEN;
        let mut enc = Encoder::new(2, 2).with_algorithm(Algorithm::Octree);
        enc.set_delay_ms(125);
        let mut pixels = four_colors();
        pixels[15] = 0;
        let gif = encode_once(enc, pixels.clone())?;
        assert_eq!(gif[gce..gce + 8], [0x21, 0xF9, 4, 0, 13, 0, 0, 0]);

        let mut enc = Encoder::new(2, 2).with_algorithm(Algorithm::Octree);
        enc.set_frame_rate(30.0);
        enc.set_transparent(Some(0x0000F0));
        let gif = encode_once(enc, pixels.clone())?;
        // blue is index 1 in branch order
        assert_eq!(gif[gce..gce + 8], [0x21, 0xF9, 4, 0x09, 3, 0, 1, 0]);

        let mut enc = Encoder::new(2, 2).with_algorithm(Algorithm::Octree);
        enc.set_transparent(Some(0x0000F0));
        enc.set_dispose(1);
        enc.set_dispose(-1);
        let gif = encode_once(enc, pixels)?;
        assert_eq!(gif[gce + 3], 0x05);
        Ok(())
    }

    #[test]
    fn settings() {
        let mut enc = Encoder::new(1, 1);
        enc.set_delay_ms(14);
        assert_eq!(enc.delay_cs(), 1);
        enc.set_delay_ms(15);
        assert_eq!(enc.delay_cs(), 2);
        enc.set_delay_ms(u32::MAX);
        assert_eq!(enc.delay_cs(), u16::MAX);
        enc.set_delay_ms(15);
        enc.set_frame_rate(0.0);
        assert_eq!(enc.delay_cs(), 2);
        enc.set_frame_rate(3.0);
        assert_eq!(enc.delay_cs(), 33);
        enc.set_threshold(120);
        assert_eq!(enc.params.threshold, 100);
        enc.set_threshold(-5);
        assert_eq!(enc.params.threshold, 0);
        enc.set_palette_size(9);
        assert_eq!(enc.params.build.palette_size, 7);
        enc.set_palette_size(1);
        assert_eq!(enc.params.build.palette_size, 4);
        enc.set_quality(-3);
        assert_eq!(enc.params.build.sample_factor, 1);
        enc.set_transparent(Some(0x123456));
        assert_eq!(enc.params.transparent, Some([0x12, 0x34, 0x56]));
    }

    #[test]
    fn sequencing() -> Result<()> {
        let mut enc = Encoder::new(2, 2);
        assert!(matches!(
            enc.add_frame(four_colors()),
            Err(Error::InvalidBlockSequence)
        ));
        assert!(matches!(enc.finish(), Err(Error::InvalidBlockSequence)));
        enc.start()?;
        assert!(matches!(enc.start(), Err(Error::InvalidBlockSequence)));
        enc.finish()?;
        assert!(matches!(
            enc.add_frame(four_colors()),
            Err(Error::InvalidBlockSequence)
        ));
        assert!(matches!(enc.finish(), Err(Error::InvalidBlockSequence)));
        assert!(matches!(
            Encoder::new(0, 2).start(),
            Err(Error::EmptyImage)
        ));
        Ok(())
    }

    #[test]
    fn failed_frame() -> Result<()> {
        let mut enc = Encoder::new(2, 2).with_algorithm(Algorithm::Octree);
        enc.start()?;
        let len = enc.data().len();
        assert!(matches!(
            enc.add_frame(vec![0; 12]),
            Err(Error::PixelBufferSize {
                expected: 16,
                actual: 12
            })
        ));
        assert_eq!(enc.data().len(), len);
        assert_eq!(enc.frames_written(), 0);
        let raster = Raster::<SRgba8>::with_clear(4, 4);
        assert!(matches!(
            enc.add_raster(&raster),
            Err(Error::InvalidRasterDimensions)
        ));
        let raster = Raster::<SRgba8>::with_clear(70_000, 1);
        assert!(matches!(
            enc.add_raster(&raster),
            Err(Error::TryFromInt(_))
        ));
        let raster = Raster::<SRgba8>::with_clear(2, 2);
        enc.add_raster(&raster)?;
        assert_eq!(enc.frames_written(), 1);
        Ok(())
    }

    #[test]
    fn subscribers() -> Result<()> {
        let mut enc = Encoder::new(2, 2).with_algorithm(Algorithm::Octree);
        drop(enc.subscribe(4, Backpressure::Block));
        drop(enc.subscribe(4, Backpressure::DropOldest));
        let gif = encode_once(enc, four_colors())?;
        assert_eq!(&gif[..6], b"GIF89a");
        assert_eq!(gif.last(), Some(&0x3B));

        let mut enc = Encoder::new(2, 2).with_algorithm(Algorithm::Octree);
        let a = enc.subscribe(16, Backpressure::Block);
        let b = enc.subscribe(16, Backpressure::DropOldest);
        enc.start()?;
        let c = enc.subscribe(16, Backpressure::Block);
        enc.add_frame(four_colors())?;
        enc.finish()?;
        assert!(enc.data().is_empty());
        let a: Vec<u8> = a.map(|c| c.unwrap()).flatten().collect();
        let b: Vec<u8> = b.map(|c| c.unwrap()).flatten().collect();
        let c: Vec<u8> = c.map(|c| c.unwrap()).flatten().collect();
        assert_eq!(a, b);
        assert_eq!(&a[..6], b"GIF89a");
        assert_eq!(a.last(), Some(&0x3B));
        assert_eq!(a[6..], c[..]);
        Ok(())
    }

    #[test]
    fn progress() -> Result<()> {
        let seen = Arc::new(Mutex::new(vec![]));
        let mut enc = Encoder::new(2, 2)
            .with_algorithm(Algorithm::Octree)
            .with_total_frames(3);
        let s = Arc::clone(&seen);
        enc.on_progress(move |pct| s.lock().unwrap().push(pct));
        enc.start()?;
        for _ in 0..3 {
            enc.add_frame(four_colors())?;
        }
        enc.finish()?;
        assert_eq!(*seen.lock().unwrap(), [33, 66, 100]);
        Ok(())
    }

    #[test]
    fn neuquant() -> Result<()> {
        let mut pixels = Vec::with_capacity(16 * 16 * 4);
        for y in 0..16u8 {
            for x in 0..16u8 {
                pixels.extend_from_slice(&[x * 16, y * 16, 128, 255]);
            }
        }
        let mut enc = Encoder::new(16, 16);
        enc.set_quality(1);
        enc.start()?;
        enc.add_frame(pixels.clone())?;
        enc.add_frame(pixels)?;
        assert_eq!(enc.palette_generation(), 2);
        enc.finish()?;
        let gif = enc.into_bytes();
        assert_eq!(&gif[..6], b"GIF89a");
        assert_eq!(gif[LOOP_EXT + LOOP_EXT_LEN + 8 + 10], 8);
        assert_eq!(gif.last(), Some(&0x3B));
        Ok(())
    }

    /// Make a frame of pseudo-random pixels, some fully transparent
    fn noise(width: usize, height: usize, seed: u32) -> Vec<u8> {
        let mut x = seed.max(1);
        let mut pixels = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            let [r, g, b, a] = x.to_le_bytes();
            let alpha = if a < 16 { 0 } else { 255 };
            pixels.extend_from_slice(&[r, g, b, alpha]);
        }
        pixels
    }

    /// Encode frames and check that a GIF decoder yields the same indices
    fn decode_indices(
        mut enc: Encoder,
        frames: &[Vec<u8>],
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let params = enc.params;
        let mut pipe = FramePipeline::new(enc.width(), enc.height());
        let mut expected = vec![];
        for frame in frames {
            expected.push(pipe.process(frame.clone(), &params)?.indexed);
        }
        enc.start()?;
        for frame in frames {
            enc.add_frame(frame.clone())?;
        }
        enc.finish()?;
        let bytes = enc.into_bytes();
        let mut opts = gif::DecodeOptions::new();
        opts.set_color_output(gif::ColorOutput::Indexed);
        let mut dec = opts.read_info(&bytes[..])?;
        let mut decoded = vec![];
        while let Some(frame) = dec.read_next_frame()? {
            decoded.push(frame.buffer.to_vec());
        }
        assert_eq!(decoded.len(), frames.len());
        assert!(decoded == expected);
        Ok(())
    }

    #[test]
    fn decode_octree() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut enc = Encoder::new(300, 200).with_algorithm(Algorithm::Octree);
        enc.set_transparent(Some(0x808080));
        let frames: Vec<_> = (1..=3).map(|s| noise(300, 200, s)).collect();
        decode_indices(enc, &frames)
    }

    #[test]
    fn decode_reused() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut enc = Encoder::new(64, 64)
            .with_algorithm(Algorithm::Octree)
            .with_change_detection(true);
        enc.set_palette_size(4);
        let frame = noise(64, 64, 7);
        decode_indices(enc, &[frame.clone(), frame])
    }

    #[test]
    fn decode_neuquant() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let enc = Encoder::new(120, 90);
        let frames = [noise(120, 90, 3), noise(120, 90, 4)];
        decode_indices(enc, &frames)
    }

    #[test]
    fn decode_single_pixel(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let enc = Encoder::new(1, 1).with_algorithm(Algorithm::Octree);
        let frames = [vec![10, 20, 30, 255], vec![200, 100, 0, 255]];
        decode_indices(enc, &frames)
    }
}
