// block.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! GIF blocks written by the encoder
use crate::color::Palette;

/// Number of channels in a color table entry
const CHANNELS: usize = 3;

/// Color table existence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTableExistence {
    /// Color table is absent
    Absent,
    /// Color table is present
    Present,
}

/// Color table configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTableConfig {
    existence: ColorTableExistence,
    table_len: usize, // must be between 2...256
}

/// Disposal method
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DisposalMethod {
    /// No disposal specified
    #[default]
    NoAction,
    /// Leave graphic in place
    Keep,
    /// Restore to background color
    Background,
    /// Restore to previous graphic
    Previous,
    /// Reserved value
    Reserved(u8),
}

/// Block code (signature)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BlockCode {
    Extension_,
    ImageDesc_,
    Trailer_,
}

/// Extension code
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ExtensionCode {
    GraphicControl_,
    Application_,
}

/// Header block (signature and version)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    version: [u8; 3],
}

/// Logical screen descriptor block
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogicalScreenDesc {
    screen_width: u16,
    screen_height: u16,
    flags: u8,
    background_color_idx: u8, // index into global color table
    pixel_aspect_ratio: u8,
}

/// Global color table block
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalColorTable {
    colors: Vec<u8>,
}

/// Graphic control extension block
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphicControl {
    flags: u8,
    delay_time_cs: u16, // delay in centiseconds (hundredths of a second)
    transparent_color_idx: u8,
}

/// Application extension block
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Application {
    app_data: Vec<Vec<u8>>, // sequence of sub-blocks
}

/// Image descriptor block
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageDesc {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    flags: u8,
}

/// Local color table block
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalColorTable {
    colors: Vec<u8>,
}

/// Image data block (uncompressed color indices)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    min_code_size: u8,
    data: Vec<u8>,
}

/// Trailer block
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trailer {}

/// A block within a GIF file
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Header block
    Header(Header),
    /// Logical screen descriptor block
    LogicalScreenDesc(LogicalScreenDesc),
    /// Global color table block
    GlobalColorTable(GlobalColorTable),
    /// Graphic control extension block
    GraphicControl(GraphicControl),
    /// Application extension block
    Application(Application),
    /// Image descriptor block
    ImageDesc(ImageDesc),
    /// Local color table block
    LocalColorTable(LocalColorTable),
    /// Image data block
    ImageData(ImageData),
    /// Trailer block
    Trailer(Trailer),
}

impl Default for ColorTableConfig {
    fn default() -> Self {
        ColorTableConfig {
            existence: ColorTableExistence::Absent,
            table_len: 2,
        }
    }
}

impl ColorTableConfig {
    /// Create a color table configuration
    pub fn new(existence: ColorTableExistence, table_len: u16) -> Self {
        let table_len =
            usize::from(table_len).max(2).next_power_of_two().min(256);
        ColorTableConfig {
            existence,
            table_len,
        }
    }

    /// Get the existence of the color table
    pub fn existence(&self) -> ColorTableExistence {
        self.existence
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        match self.existence {
            ColorTableExistence::Absent => 0,
            ColorTableExistence::Present => self.table_len,
        }
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the table size field (log2 of length, minus 1)
    fn len_bits(&self) -> u8 {
        (self.table_len.trailing_zeros().max(1) - 1) as u8
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.len() * CHANNELS
    }
}

impl From<u8> for DisposalMethod {
    fn from(n: u8) -> Self {
        use self::DisposalMethod::*;
        match n & 0b0111 {
            0 => NoAction,
            1 => Keep,
            2 => Background,
            3 => Previous,
            _ => Reserved(n & 0b0111),
        }
    }
}

impl From<DisposalMethod> for u8 {
    fn from(d: DisposalMethod) -> Self {
        use self::DisposalMethod::*;
        match d {
            NoAction => 0,
            Keep => 1,
            Background => 2,
            Previous => 3,
            Reserved(n) => n & 0b0111,
        }
    }
}

impl BlockCode {
    /// Get the block signature
    pub fn signature(self) -> &'static [u8] {
        use self::BlockCode::*;
        match self {
            Extension_ => b"!", // (0x21) Extension introducer
            ImageDesc_ => b",", // (0x2C) Image separator
            Trailer_ => b";",   // (0x3B) GIF trailer
        }
    }
}

impl From<ExtensionCode> for u8 {
    fn from(t: ExtensionCode) -> Self {
        use self::ExtensionCode::*;
        match t {
            GraphicControl_ => 0xF9,
            Application_ => 0xFF,
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Header::with_version(*b"89a")
    }
}

impl Header {
    /// Create a header with a version
    pub fn with_version(version: [u8; 3]) -> Self {
        Header { version }
    }

    /// Get the version
    pub fn version(&self) -> [u8; 3] {
        self.version
    }
}

impl LogicalScreenDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const COLOR_RESOLUTION: u8 = 0b0111_0000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    /// Adjust the screen width
    pub fn with_screen_width(mut self, screen_width: u16) -> Self {
        self.screen_width = screen_width;
        self
    }

    /// Get the screen width
    pub fn screen_width(&self) -> u16 {
        self.screen_width
    }

    /// Adjust the screen height
    pub fn with_screen_height(mut self, screen_height: u16) -> Self {
        self.screen_height = screen_height;
        self
    }

    /// Get the screen height
    pub fn screen_height(&self) -> u16 {
        self.screen_height
    }

    /// Get the packed flags
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// Adjust the global color table configuration.
    ///
    /// Color resolution is set to the table size.
    pub fn with_color_table_config(mut self, tbl: &ColorTableConfig) -> Self {
        let mut flags = tbl.len_bits() & Self::COLOR_TABLE_SIZE;
        flags |= (flags << 4) & Self::COLOR_RESOLUTION;
        if tbl.existence == ColorTableExistence::Present {
            flags |= Self::COLOR_TABLE_PRESENT;
        }
        self.flags = flags;
        self
    }

    /// Get the background color index
    pub fn background_color_idx(&self) -> u8 {
        self.background_color_idx
    }

    /// Get the pixel aspect ratio
    pub fn pixel_aspect_ratio(&self) -> u8 {
        self.pixel_aspect_ratio
    }
}

impl GlobalColorTable {
    /// Create a global color table from a palette
    pub fn with_palette(palette: &Palette) -> Self {
        GlobalColorTable {
            colors: palette.table_bytes(),
        }
    }

    /// Get the color bytes
    pub fn colors(&self) -> &[u8] {
        &self.colors
    }
}

impl GraphicControl {
    const DISPOSAL_METHOD: u8 = 0b0001_1100;
    const TRANSPARENT_COLOR: u8 = 0b0000_0001;

    /// Get the packed flags
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// Get the disposal method
    pub fn disposal_method(&self) -> DisposalMethod {
        ((self.flags & Self::DISPOSAL_METHOD) >> 2).into()
    }

    /// Set the disposal method
    pub fn set_disposal_method(&mut self, disposal_method: DisposalMethod) {
        let d = (u8::from(disposal_method) << 2) & Self::DISPOSAL_METHOD;
        self.flags = (self.flags & !Self::DISPOSAL_METHOD) | d;
    }

    /// Get the delay time in centiseconds
    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time_cs
    }

    /// Set the delay time in centiseconds
    pub fn set_delay_time_cs(&mut self, delay_time_cs: u16) {
        self.delay_time_cs = delay_time_cs;
    }

    /// Get the transparent color index (if transparency is enabled)
    pub fn transparent_color(&self) -> Option<u8> {
        if self.flags & Self::TRANSPARENT_COLOR != 0 {
            Some(self.transparent_color_idx)
        } else {
            None
        }
    }

    /// Get the transparent color index field
    pub fn transparent_color_idx(&self) -> u8 {
        self.transparent_color_idx
    }

    /// Set the transparent color index field
    pub fn set_transparent_color_idx(&mut self, transparent_color_idx: u8) {
        self.transparent_color_idx = transparent_color_idx;
    }

    /// Set or clear the transparency flag
    pub fn set_transparent(&mut self, transparent: bool) {
        if transparent {
            self.flags |= Self::TRANSPARENT_COLOR;
        } else {
            self.flags &= !Self::TRANSPARENT_COLOR;
        }
    }
}

impl Application {
    /// Application identifier for looping animations
    const LOOPING_ID: &'static [u8] = b"NETSCAPE2.0";

    /// Create a looping extension (zero means loop forever)
    pub fn with_loop_count(loop_count: u16) -> Self {
        let [lo, hi] = loop_count.to_le_bytes();
        Application {
            app_data: vec![Self::LOOPING_ID.to_vec(), vec![1, lo, hi]],
        }
    }

    /// Get the sub-blocks
    pub fn app_data(&self) -> &[Vec<u8>] {
        &self.app_data
    }

    /// Get the loop count, if this is a looping extension
    pub fn loop_count(&self) -> Option<u16> {
        match &self.app_data[..] {
            [id, data]
                if id == Self::LOOPING_ID && data.len() == 3 && data[0] == 1 =>
            {
                Some(u16::from_le_bytes([data[1], data[2]]))
            }
            _ => None,
        }
    }
}

impl ImageDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    /// Adjust the width
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    /// Adjust the height
    pub fn with_height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }

    /// Get the left position
    pub fn left(&self) -> u16 {
        self.left
    }

    /// Get the top position
    pub fn top(&self) -> u16 {
        self.top
    }

    /// Get the width
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get the height
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the packed flags
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// Adjust the local color table configuration
    pub fn with_color_table_config(mut self, tbl: &ColorTableConfig) -> Self {
        let mut flags = 0;
        if tbl.existence == ColorTableExistence::Present {
            flags |= Self::COLOR_TABLE_PRESENT;
            flags |= tbl.len_bits() & Self::COLOR_TABLE_SIZE;
        }
        self.flags = flags;
        self
    }
}

impl LocalColorTable {
    /// Create a local color table from a palette
    pub fn with_palette(palette: &Palette) -> Self {
        LocalColorTable {
            colors: palette.table_bytes(),
        }
    }

    /// Get the color bytes
    pub fn colors(&self) -> &[u8] {
        &self.colors
    }
}

impl ImageData {
    /// Create image data from color indices.
    ///
    /// `color_depth` is the number of bits needed for each index.
    pub fn with_indices(color_depth: u8, data: Vec<u8>) -> Self {
        ImageData {
            min_code_size: color_depth.clamp(2, 8), // must be >= 2
            data,
        }
    }

    /// Get the LZW minimum code size
    pub fn min_code_size(&self) -> u8 {
        self.min_code_size
    }

    /// Get the color indices
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

macro_rules! block_from {
    ($($name:ident),*) => {
        $(
            impl From<$name> for Block {
                fn from(b: $name) -> Self {
                    Block::$name(b)
                }
            }
        )*
    };
}

block_from!(
    Header,
    LogicalScreenDesc,
    GlobalColorTable,
    GraphicControl,
    Application,
    ImageDesc,
    LocalColorTable,
    ImageData,
    Trailer
);
