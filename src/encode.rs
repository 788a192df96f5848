// encode.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! Block formatting
use crate::block::*;
use crate::lzw::Compressor;
use std::io::{self, Write};

/// Maximum length of a data sub-block
const SUB_BLOCK_LEN: usize = 0xFF;

/// Block encoder
///
/// Writes each [Block] in its GIF wire format.
///
/// [Block]: ../block/enum.Block.html
pub struct BlockEnc<W: Write> {
    /// Writer for output data
    writer: W,
}

impl<W: Write> BlockEnc<W> {
    /// Create a new block encoder
    pub fn new(writer: W) -> Self {
        BlockEnc { writer }
    }

    /// Get a reference to the writer
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Get a mutable reference to the writer
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consume the encoder, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Encode one block
    pub fn encode<B>(&mut self, block: B) -> io::Result<()>
    where
        B: Into<Block>,
    {
        use crate::block::Block::*;
        let w = &mut self.writer;
        match block.into() {
            Header(b) => b.format(w),
            LogicalScreenDesc(b) => b.format(w),
            GlobalColorTable(b) => b.format(w),
            GraphicControl(b) => b.format(w),
            Application(b) => b.format(w),
            ImageDesc(b) => b.format(w),
            LocalColorTable(b) => b.format(w),
            ImageData(b) => b.format(w),
            Trailer(b) => b.format(w),
        }
    }
}

/// Write data as a sequence of sub-blocks, ending with a zero-length block
fn write_sub_blocks<W: Write>(w: &mut W, data: &[u8]) -> io::Result<()> {
    for chunk in data.chunks(SUB_BLOCK_LEN) {
        w.write_all(&[chunk.len() as u8])?; // block size
        w.write_all(chunk)?;
    }
    w.write_all(&[0]) // block terminator
}

impl Header {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"GIF")?;
        w.write_all(&self.version())
    }
}

impl LogicalScreenDesc {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(7);
        buf.extend_from_slice(&self.screen_width().to_le_bytes());
        buf.extend_from_slice(&self.screen_height().to_le_bytes());
        buf.push(self.flags());
        buf.push(self.background_color_idx());
        buf.push(self.pixel_aspect_ratio());
        w.write_all(&buf)
    }
}

impl GlobalColorTable {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.colors())
    }
}

impl GraphicControl {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(BlockCode::Extension_.signature())?;
        let mut buf = Vec::with_capacity(7);
        buf.push(ExtensionCode::GraphicControl_.into());
        buf.push(4); // block size
        buf.push(self.flags());
        buf.extend_from_slice(&self.delay_time_cs().to_le_bytes());
        buf.push(self.transparent_color_idx());
        buf.push(0); // block terminator
        w.write_all(&buf)
    }
}

impl Application {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(BlockCode::Extension_.signature())?;
        w.write_all(&[ExtensionCode::Application_.into()])?;
        for c in self.app_data() {
            debug_assert!(c.len() <= SUB_BLOCK_LEN);
            w.write_all(&[c.len() as u8])?; // block size
            w.write_all(c)?;
        }
        w.write_all(&[0]) // block terminator
    }
}

impl ImageDesc {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(BlockCode::ImageDesc_.signature())?;
        let mut buf = Vec::with_capacity(9);
        buf.extend_from_slice(&self.left().to_le_bytes());
        buf.extend_from_slice(&self.top().to_le_bytes());
        buf.extend_from_slice(&self.width().to_le_bytes());
        buf.extend_from_slice(&self.height().to_le_bytes());
        buf.push(self.flags());
        w.write_all(&buf)
    }
}

impl LocalColorTable {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.colors())
    }
}

impl ImageData {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let min_code_size = self.min_code_size();
        let mut buffer = Vec::with_capacity(self.data().len());
        Compressor::new(min_code_size).compress(self.data(), &mut buffer);
        w.write_all(&[min_code_size])?;
        write_sub_blocks(w, &buffer)
    }
}

impl Trailer {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(BlockCode::Trailer_.signature())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::Palette;

    fn encode<B: Into<Block>>(block: B) -> Vec<u8> {
        let mut enc = BlockEnc::new(vec![]);
        enc.encode(block).unwrap();
        enc.into_inner()
    }

    #[test]
    fn header_trailer() {
        assert_eq!(encode(Header::default()), b"GIF89a");
        assert_eq!(encode(Trailer::default()), [0x3B]);
    }

    #[test]
    fn screen_desc() {
        let tbl = ColorTableConfig::new(ColorTableExistence::Present, 256);
        let b = LogicalScreenDesc::default()
            .with_screen_width(0x0102)
            .with_screen_height(3)
            .with_color_table_config(&tbl);
        assert_eq!(encode(b), [0x02, 0x01, 0x03, 0x00, 0xF7, 0x00, 0x00]);
    }

    #[test]
    fn color_tables() {
        let palette = Palette::from_rgb_bytes(&[1, 2, 3]);
        let out = encode(GlobalColorTable::with_palette(&palette));
        assert_eq!(out.len(), 768);
        assert_eq!(out[..4], [1, 2, 3, 0]);
        let out = encode(LocalColorTable::with_palette(&palette));
        assert_eq!(out.len(), 768);
    }

    #[test]
    fn graphic_control() {
        let mut b = GraphicControl::default();
        b.set_disposal_method(DisposalMethod::Background);
        b.set_transparent(true);
        b.set_transparent_color_idx(5);
        b.set_delay_time_cs(0x0132);
        assert_eq!(
            encode(b),
            [0x21, 0xF9, 0x04, 0x09, 0x32, 0x01, 0x05, 0x00]
        );
    }

    #[test]
    fn looping() {
        let mut expected = vec![0x21, 0xFF, 0x0B];
        expected.extend_from_slice(b"NETSCAPE2.0");
        expected.extend_from_slice(&[0x03, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(encode(Application::with_loop_count(0)), expected);
    }

    #[test]
    fn image_desc() {
        let tbl = ColorTableConfig::new(ColorTableExistence::Present, 256);
        let b = ImageDesc::default()
            .with_width(10)
            .with_height(0x0201)
            .with_color_table_config(&tbl);
        assert_eq!(
            encode(b),
            [0x2C, 0, 0, 0, 0, 0x0A, 0x00, 0x01, 0x02, 0x87]
        );
    }

    #[test]
    fn image_data() {
        let out = encode(ImageData::with_indices(1, vec![0, 0, 0, 0]));
        assert_eq!(out, [0x02, 0x02, 0x84, 0x51, 0x00]);
    }

    #[test]
    fn sub_blocks() {
        let mut out = vec![];
        let data: Vec<u8> = (0..=255).cycle().take(600).collect();
        write_sub_blocks(&mut out, &data).unwrap();
        assert_eq!(out.len(), 600 + 4);
        assert_eq!(out[0], 0xFF);
        assert_eq!(out[256], 0xFF);
        assert_eq!(out[512], 90);
        assert_eq!(out[603], 0);
    }
}
