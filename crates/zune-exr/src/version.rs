/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Magic number and version word handling

use zune_core::bytestream::{ZByteReaderTrait, ZReader};
use zune_core::log::trace;

use crate::constants::{
    DEEP_FLAG, EXR_MAGIC, EXR_VERSION, KNOWN_FLAGS, LONG_NAMES_FLAG, MAX_LONG_NAME_LENGTH,
    MAX_SHORT_NAME_LENGTH, MULTI_PART_FLAG, TILED_FLAG
};
use crate::errors::ExrDecodeErrors;

/// Structural flags carried by the version word
/// that follows the magic number.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct VersionFlags {
    /// File format version, 2 for every file written so far
    pub version:    u8,
    /// Single part file storing tiles instead of scanlines
    pub tiled:      bool,
    /// Names may be up to 255 bytes instead of 31
    pub long_names: bool,
    /// At least one part holds deep data
    pub deep:       bool,
    /// The file holds more than one header
    pub multi_part: bool
}

impl VersionFlags {
    /// Split a version word into its flags
    ///
    /// The low byte is the version number, bits 9..=12 are
    /// tiled, long names, deep and multi-part respectively.
    ///
    /// # Arguments
    /// - `word`: The four version bytes read as a little endian u32
    /// - `strict`: Whether to reject versions other than 2 and unknown flag bits
    pub fn from_word(word: u32, strict: bool) -> Result<VersionFlags, ExrDecodeErrors> {
        let flags = VersionFlags {
            version:    (word & 0xFF) as u8,
            tiled:      word & TILED_FLAG != 0,
            long_names: word & LONG_NAMES_FLAG != 0,
            deep:       word & DEEP_FLAG != 0,
            multi_part: word & MULTI_PART_FLAG != 0
        };

        if flags.tiled && flags.deep {
            return Err(ExrDecodeErrors::InvalidVersionFlags(
                "single tile bit is on, non-image bit should be off"
            ));
        }
        if flags.tiled && flags.multi_part {
            return Err(ExrDecodeErrors::InvalidVersionFlags(
                "single tile bit is on, multi-part bit should be off"
            ));
        }
        if strict {
            if flags.version != EXR_VERSION {
                return Err(ExrDecodeErrors::InvalidVersionFlags(
                    "unknown file format version"
                ));
            }
            if (word & !0xFF) & !KNOWN_FLAGS != 0 {
                return Err(ExrDecodeErrors::InvalidVersionFlags("unknown flag bits set"));
            }
        }
        Ok(flags)
    }

    /// Longest name this file is allowed to use for attributes and channels
    pub const fn max_name_length(&self) -> usize {
        if self.long_names {
            MAX_LONG_NAME_LENGTH
        } else {
            MAX_SHORT_NAME_LENGTH
        }
    }
}

/// Read and validate the magic number and the version word
/// from the start of the stream.
pub(crate) fn read_magic_and_version<T: ZByteReaderTrait>(
    stream: &mut ZReader<T>, strict: bool
) -> Result<VersionFlags, ExrDecodeErrors> {
    let magic = stream.get_u32_le_err()?;

    if magic != EXR_MAGIC {
        return Err(ExrDecodeErrors::InvalidMagicBytes(magic));
    }
    let word = stream.get_u32_le_err()?;
    let flags = VersionFlags::from_word(word, strict)?;

    trace!("Version: {}", flags.version);
    trace!("Tiled: {}", flags.tiled);
    trace!("Long names: {}", flags.long_names);
    trace!("Deep: {}", flags.deep);
    trace!("Multi part: {}", flags.multi_part);

    Ok(flags)
}
