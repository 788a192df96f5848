// error.rs
//
// Copyright (c) 2026  Douglas Lau
//
use std::fmt;
use std::io;
use std::num::TryFromIntError;

/// Errors encountered while encoding
#[derive(Debug)]
pub enum Error {
    /// A wrapped I/O error.
    Io(io::Error),
    /// Integer out of bounds.
    TryFromInt(TryFromIntError),
    /// Operation called out of sequence (`start` twice, frames before
    /// `start` or after `finish`).
    InvalidBlockSequence,
    /// Raster dimensions do not match the encoder.
    InvalidRasterDimensions,
    /// Pixel buffer length is not `width * height * 4`.
    PixelBufferSize {
        /// Expected length, in bytes
        expected: usize,
        /// Actual length, in bytes
        actual: usize,
    },
    /// No colors to build a palette from.
    EmptyImage,
    /// Palette lookup before the quantizer was built.
    QuantizerNotBuilt,
    /// Subscriber fell behind; number of chunks dropped.
    SubscriberLagged(u64),
}

/// Gifsmith result type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(fmt),
            Error::TryFromInt(err) => err.fmt(fmt),
            Error::PixelBufferSize { expected, actual } => write!(
                fmt,
                "pixel buffer size: expected {expected} bytes, got {actual}"
            ),
            Error::SubscriberLagged(n) => {
                write!(fmt, "subscriber lagged: {n} chunk(s) dropped")
            }
            _ => fmt::Debug::fmt(self, fmt),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::TryFromInt(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<TryFromIntError> for Error {
    fn from(err: TryFromIntError) -> Self {
        Error::TryFromInt(err)
    }
}
