// lib.rs      gifsmith crate.
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! # gifsmith
//!
//! An animated GIF encoder.
//!
//! RGBA frames are quantized with either a NeuQuant network or an octree,
//! optionally reusing the previous palette when consecutive frames are
//! similar.  Output can be read after encoding, or streamed to any number
//! of subscribers with bounded queues.
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

pub mod block;
mod color;
mod encode;
mod error;
mod lzw;
mod octree;
mod pipeline;
mod private;
mod quant;
mod sink;

pub use crate::color::Palette;
pub use crate::encode::BlockEnc;
pub use crate::error::{Error, Result};
pub use crate::octree::Octree;
pub use crate::pipeline::{match_percent, reuse_palette};
pub use crate::private::Encoder;
pub use crate::quant::Algorithm;
pub use crate::sink::{Backpressure, Sink, Subscription};
