/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Chunk layout of scanline parts
use zune_core::log::trace;
use zune_core::options::DecoderOptions;

use crate::attributes::{Compression, DataWindow};
use crate::errors::ExrDecodeErrors;
use crate::header::Header;
use crate::version::VersionFlags;

/// How the scanlines of a part are split into chunks
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChunkLayout {
    pub compression:     Compression,
    /// Scanlines stored in one chunk, the last chunk may hold fewer
    pub lines_per_chunk: usize,
    /// Scanlines in the data window
    pub num_lines:       usize,
    /// Entries in the chunk offset table
    pub num_chunks:      usize
}

/// Number of scanlines each chunk holds for a compression method
///
/// Returns `None` for methods this decoder has no chunk height for.
pub const fn lines_per_chunk(compression: Compression) -> Option<usize> {
    match compression {
        Compression::NoCompression | Compression::RLE | Compression::ZIPS => Some(1),
        Compression::ZIP | Compression::PXR24 => Some(16),
        Compression::PIZ | Compression::B44 | Compression::B44A => Some(32),
        _ => None
    }
}

/// Compute how many chunks a scanline part of the given data window
/// and compression is split into.
///
/// # Errors
/// - An empty or inverted data window
/// - A data window larger than the configured maximum width or height
/// - A compression method without a known chunk height
pub fn resolve_layout(
    data_window: DataWindow, compression: Compression, options: &DecoderOptions
) -> Result<ChunkLayout, ExrDecodeErrors> {
    let width = data_window.width();
    let height = data_window.height();

    if width <= 0 || height <= 0 {
        return Err(ExrDecodeErrors::InvalidDataWindow(
            data_window.x_min,
            data_window.y_min,
            data_window.x_max,
            data_window.y_max
        ));
    }
    // saturate so 32 bit targets still hit the dimension limits below
    let width = usize::try_from(width).unwrap_or(usize::MAX);
    let height = usize::try_from(height).unwrap_or(usize::MAX);

    if width > options.max_width() {
        return Err(ExrDecodeErrors::TooLargeDimensions(
            "width",
            options.max_width(),
            width
        ));
    }
    if height > options.max_height() {
        return Err(ExrDecodeErrors::TooLargeDimensions(
            "height",
            options.max_height(),
            height
        ));
    }
    let block_lines = lines_per_chunk(compression)
        .ok_or(ExrDecodeErrors::UnsupportedCompression(compression.to_int()))?;

    let num_chunks = height.div_ceil(block_lines);

    trace!("Compression: {:?}", compression);
    trace!("Number of chunks: {} = {}/{}", num_chunks, height, block_lines);

    Ok(ChunkLayout {
        compression,
        lines_per_chunk: block_lines,
        num_lines: height,
        num_chunks
    })
}

/// Resolve the chunk layout of a validated part header
///
/// Tiled and deep parts are addressed differently and are rejected
/// as unsupported.
pub(crate) fn resolve_header_layout(
    header: &Header, flags: &VersionFlags, options: &DecoderOptions
) -> Result<ChunkLayout, ExrDecodeErrors> {
    if flags.tiled {
        return Err(ExrDecodeErrors::UnsupportedFeature("tiled images"));
    }
    if flags.deep {
        return Err(ExrDecodeErrors::UnsupportedFeature("deep images"));
    }
    // validation guarantees both exist with the right type
    let data_window = header
        .data_window()
        .ok_or(ExrDecodeErrors::MissingAttribute("dataWindow"))?;
    let compression = header
        .compression()
        .ok_or(ExrDecodeErrors::MissingAttribute("compression"))?;

    resolve_layout(data_window, compression, options)
}
