/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! An OpenEXR header decoder
//!
//! This crate decodes everything in an EXR file that comes before the pixel data,
//! - The magic number and the version flags
//! - Every part header, with attribute values decoded into typed values
//! - The channel list, data window and chunk layout of the part
//! - The chunk offset table that locates compressed pixel blocks
//!
//! Decompressing the pixel blocks is left to a separate stage which can use
//! the offsets to decode chunks independently of each other.
//!
//! # Features
//! - No unsafe
//! - Forward compatible, attributes of unknown types are kept as raw bytes
//! - Fuzz tested decoder
//!
//! # Usage
//! ```no_run
//! use zune_core::bytestream::ZCursor;
//! use zune_exr::ExrDecoder;
//!
//! let data = std::fs::read("image.exr").unwrap();
//! let mut decoder = ExrDecoder::new(ZCursor::new(&data));
//! let bundle = decoder.decode().unwrap();
//!
//! for channel in bundle.channels() {
//!     println!("{} {:?}", channel.name, channel.pixel_type);
//! }
//! println!("{} chunks", bundle.offsets().len());
//! ```
//!
//! # Limits
//! The data window is checked against `max_width` and `max_height` of the
//! [`DecoderOptions`](zune_core::options::DecoderOptions) the decoder was created with.
//! Larger windows fail with [`ExrDecodeErrors::TooLargeDimensions`], of kind
//! [`ErrorKind::Limits`], even when the file is otherwise valid. Raise the
//! limits to decode such files.
//!
//! # Unsupported
//! Tiled, deep and multi-part files have their headers decoded by
//! [`ExrDecoder::decode_headers`] but [`ExrDecoder::decode`] reports them as
//! unsupported since their chunks are addressed differently.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![macro_use]
extern crate alloc;
extern crate core;
pub extern crate zune_core;

pub use attributes::{
    decode_attribute_value, AttributeValue, Box2f, Box2i, Chromaticities, Compression, DataWindow,
    EnvironmentMap, KeyCode, LevelMode, LineOrder, Preview, Rational, RoundingMode,
    TileDescription, TimeCode
};
pub use channels::{decode_channel_list, Channel, PixelType};
pub use decoder::{decode, ChunkOffsetTable, ExrDecoder, ExrHeaderBundle};
pub use errors::{ErrorKind, ExrDecodeErrors};
pub use header::{validate_header, Attribute, Header};
pub use layout::{lines_per_chunk, resolve_layout, ChunkLayout};
pub use version::VersionFlags;

mod attributes;
mod channels;
pub mod constants;
mod decoder;
mod errors;
mod header;
mod layout;
mod version;
