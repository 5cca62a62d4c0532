/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoding of the `chlist` attribute
use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::constants::MAX_LONG_NAME_LENGTH;
use crate::errors::ExrDecodeErrors;

/// Size of the fixed part of a channel entry following its name
const CHANNEL_RECORD_SIZE: usize = 16;

/// Storage type of the samples of one channel
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PixelType {
    /// 32 bit unsigned integer
    UInt,
    /// 16 bit IEEE float
    Half,
    /// 32 bit IEEE float
    Float
}

impl PixelType {
    pub fn from_int(int: i32) -> Option<PixelType> {
        match int {
            0 => Some(PixelType::UInt),
            1 => Some(PixelType::Half),
            2 => Some(PixelType::Float),
            _ => None
        }
    }

    /// Number of bytes a single sample of this type occupies
    pub const fn size(self) -> usize {
        match self {
            PixelType::UInt | PixelType::Float => 4,
            PixelType::Half => 2
        }
    }
}

/// A single channel description from the channel list.
///
/// Order within the list is the order channels are stored in a chunk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Channel {
    pub name:       String,
    pub pixel_type: PixelType,
    /// Hint to lossy codecs that values should be quantized linearly
    pub p_linear:   bool,
    pub x_sampling: i32,
    pub y_sampling: i32
}

fn malformed(reason: &str) -> ExrDecodeErrors {
    ExrDecodeErrors::MalformedChannelList(reason.to_owned())
}

/// Decode the raw bytes of a `chlist` attribute into
/// channels, keeping the order they appear in.
///
/// The list is a sequence of `name\0` followed by a 16 byte record,
/// closed by a single null byte. A lone null byte is an empty list.
///
/// # Errors
/// - A missing terminator or a truncated record
/// - An unknown pixel type or a sampling value below 1
/// - Names longer than 255 bytes
pub fn decode_channel_list(bytes: &[u8]) -> Result<Vec<Channel>, ExrDecodeErrors> {
    let mut channels = Vec::new();
    let mut remaining = bytes;

    loop {
        let Some(end) = remaining.iter().position(|x| *x == 0) else {
            return Err(malformed("channels must be separated by a terminator"));
        };
        let (name, rest) = remaining.split_at(end);
        // skip the null byte
        let rest = &rest[1..];

        if name.is_empty() {
            if !rest.is_empty() {
                return Err(malformed("channels must be separated by a terminator"));
            }
            break;
        }
        if name.len() > MAX_LONG_NAME_LENGTH {
            return Err(ExrDecodeErrors::NameTooLong(MAX_LONG_NAME_LENGTH, name.len()));
        }
        if rest.len() < CHANNEL_RECORD_SIZE {
            return Err(malformed("truncated channel record"));
        }
        let (record, rest) = rest.split_at(CHANNEL_RECORD_SIZE);
        let name = String::from_utf8_lossy(name).into_owned();

        let raw_type = i32::from_le_bytes([record[0], record[1], record[2], record[3]]);
        let pixel_type = PixelType::from_int(raw_type).ok_or_else(|| {
            ExrDecodeErrors::MalformedChannelList(format!(
                "unknown pixel type {raw_type} for channel {name:?}"
            ))
        })?;
        let p_linear = record[4] != 0;
        // record[5..8] is reserved
        let x_sampling = i32::from_le_bytes([record[8], record[9], record[10], record[11]]);
        let y_sampling = i32::from_le_bytes([record[12], record[13], record[14], record[15]]);

        if x_sampling < 1 || y_sampling < 1 {
            return Err(ExrDecodeErrors::MalformedChannelList(format!(
                "channel {name:?} has invalid sampling ({x_sampling},{y_sampling})"
            )));
        }
        channels.push(Channel {
            name,
            pixel_type,
            p_linear,
            x_sampling,
            y_sampling
        });
        remaining = rest;
    }
    Ok(channels)
}
