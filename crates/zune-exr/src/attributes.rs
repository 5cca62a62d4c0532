/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Typed attribute values
//!
//! Every header attribute carries a type name, the mapping from
//! type name and raw bytes to a value lives in [`decode_attribute_value`].
//! Type names this crate doesn't know end up as [`AttributeValue::Opaque`]
//! so newer files still decode.
#![allow(clippy::upper_case_acronyms)]

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::channels::{decode_channel_list, Channel};
use crate::errors::ExrDecodeErrors;

/// An integer rectangle, inclusive on both ends.
///
/// Used for the data and display windows.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Box2i {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32
}

impl Box2i {
    /// Number of columns covered, zero or negative for inverted boxes
    pub const fn width(&self) -> i64 {
        self.x_max as i64 - self.x_min as i64 + 1
    }
    /// Number of rows covered, zero or negative for inverted boxes
    pub const fn height(&self) -> i64 {
        self.y_max as i64 - self.y_min as i64 + 1
    }
}

/// The data window of a part
pub type DataWindow = Box2i;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Box2f {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32
}

/// A numerator and denominator pair
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Rational {
    pub numerator:   i32,
    pub denominator: u32
}

/// CIE x,y coordinates of the primaries and the white point
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Chromaticities {
    pub red:   [f32; 2],
    pub green: [f32; 2],
    pub blue:  [f32; 2],
    pub white: [f32; 2]
}

/// Compression method used by every chunk of a part
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Compression {
    NoCompression,
    RLE,
    ZIPS,
    ZIP,
    PIZ,
    PXR24,
    B44,
    B44A,
    DWAA,
    DWAB,
    /// A method newer than this decoder
    Unknown(u8)
}

impl Compression {
    pub const fn from_int(int: u8) -> Compression {
        match int {
            0 => Compression::NoCompression,
            1 => Compression::RLE,
            2 => Compression::ZIPS,
            3 => Compression::ZIP,
            4 => Compression::PIZ,
            5 => Compression::PXR24,
            6 => Compression::B44,
            7 => Compression::B44A,
            8 => Compression::DWAA,
            9 => Compression::DWAB,
            _ => Compression::Unknown(int)
        }
    }

    pub const fn to_int(self) -> u8 {
        match self {
            Compression::NoCompression => 0,
            Compression::RLE => 1,
            Compression::ZIPS => 2,
            Compression::ZIP => 3,
            Compression::PIZ => 4,
            Compression::PXR24 => 5,
            Compression::B44 => 6,
            Compression::B44A => 7,
            Compression::DWAA => 8,
            Compression::DWAB => 9,
            Compression::Unknown(int) => int
        }
    }
}

/// Order in which scanline chunks were written
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineOrder {
    IncreasingY,
    DecreasingY,
    RandomY,
    Unknown(u8)
}

impl LineOrder {
    pub const fn from_int(int: u8) -> LineOrder {
        match int {
            0 => LineOrder::IncreasingY,
            1 => LineOrder::DecreasingY,
            2 => LineOrder::RandomY,
            _ => LineOrder::Unknown(int)
        }
    }
}

/// Projection of an environment map
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EnvironmentMap {
    LatitudeLongitude,
    Cube,
    Unknown(u8)
}

impl EnvironmentMap {
    pub const fn from_int(int: u8) -> EnvironmentMap {
        match int {
            0 => EnvironmentMap::LatitudeLongitude,
            1 => EnvironmentMap::Cube,
            _ => EnvironmentMap::Unknown(int)
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LevelMode {
    OneLevel,
    MipmapLevels,
    RipmapLevels,
    Unknown(u8)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RoundingMode {
    RoundDown,
    RoundUp,
    Unknown(u8)
}

/// Tile size and level layout of a tiled part
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TileDescription {
    pub x_size: u32,
    pub y_size: u32,
    /// Level mode in the low nibble, rounding mode in the high nibble
    pub mode:   u8
}

impl TileDescription {
    pub const fn level_mode(&self) -> LevelMode {
        match self.mode & 0x0F {
            0 => LevelMode::OneLevel,
            1 => LevelMode::MipmapLevels,
            2 => LevelMode::RipmapLevels,
            x => LevelMode::Unknown(x)
        }
    }

    pub const fn rounding_mode(&self) -> RoundingMode {
        match self.mode >> 4 {
            0 => RoundingMode::RoundDown,
            1 => RoundingMode::RoundUp,
            x => RoundingMode::Unknown(x)
        }
    }
}

/// SMPTE time code packed as two words
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TimeCode {
    pub time_and_flags: u32,
    pub user_data:      u32
}

impl TimeCode {
    // bcd digits, units in the low nibble, tens above
    const fn bcd(&self, shift: u32, tens_bits: u32) -> u8 {
        let units = (self.time_and_flags >> shift) & 0x0F;
        let tens = (self.time_and_flags >> (shift + 4)) & ((1 << tens_bits) - 1);
        (tens * 10 + units) as u8
    }

    pub const fn hours(&self) -> u8 {
        self.bcd(24, 2)
    }
    pub const fn minutes(&self) -> u8 {
        self.bcd(16, 3)
    }
    pub const fn seconds(&self) -> u8 {
        self.bcd(8, 3)
    }
    pub const fn frame(&self) -> u8 {
        self.bcd(0, 2)
    }
    pub const fn drop_frame(&self) -> bool {
        self.time_and_flags & (1 << 6) != 0
    }
}

/// Film key code
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct KeyCode {
    pub film_mfc_code:   i32,
    pub film_type:       i32,
    pub prefix:          i32,
    pub count:           i32,
    pub perf_offset:     i32,
    pub perfs_per_frame: i32,
    pub perfs_per_count: i32
}

/// A small RGBA8 thumbnail stored in the header
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Preview {
    pub width:  u32,
    pub height: u32,
    /// `4 * width * height` bytes, rows top to bottom
    pub pixels: Vec<u8>
}

/// A decoded attribute value
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    F32(f32),
    F64(f64),
    I32(i32),
    Box2i(Box2i),
    Box2f(Box2f),
    V2i([i32; 2]),
    V2f([f32; 2]),
    V3i([i32; 3]),
    V3f([f32; 3]),
    M33f([f32; 9]),
    M44f([f32; 16]),
    Rational(Rational),
    ChannelList(Vec<Channel>),
    Compression(Compression),
    LineOrder(LineOrder),
    TileDescription(TileDescription),
    TimeCode(TimeCode),
    KeyCode(KeyCode),
    Chromaticities(Chromaticities),
    EnvironmentMap(EnvironmentMap),
    Text(String),
    Preview(Preview),
    /// Raw bytes of a type this decoder doesn't understand
    Opaque(Vec<u8>)
}

/// Check that `bytes` holds exactly `N` bytes
fn exact<'a, const N: usize>(type_name: &str, bytes: &'a [u8]) -> Result<&'a [u8; N], ExrDecodeErrors> {
    bytes
        .try_into()
        .map_err(|_| ExrDecodeErrors::MalformedValue(type_name.to_string(), N, bytes.len()))
}

/// Decode `N` little endian 4 byte floats
fn floats<const N: usize>(type_name: &str, bytes: &[u8]) -> Result<[f32; N], ExrDecodeErrors> {
    if bytes.len() != N * 4 {
        return Err(ExrDecodeErrors::MalformedValue(
            type_name.to_string(),
            N * 4,
            bytes.len()
        ));
    }
    let mut out = [0.0; N];
    for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
        *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Ok(out)
}

/// Decode `N` little endian 4 byte signed integers
fn ints<const N: usize>(type_name: &str, bytes: &[u8]) -> Result<[i32; N], ExrDecodeErrors> {
    if bytes.len() != N * 4 {
        return Err(ExrDecodeErrors::MalformedValue(
            type_name.to_string(),
            N * 4,
            bytes.len()
        ));
    }
    let mut out = [0; N];
    for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
        *value = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Ok(out)
}

fn decode_box2i(bytes: &[u8]) -> Result<Box2i, ExrDecodeErrors> {
    let [x_min, y_min, x_max, y_max] = ints::<4>("box2i", bytes)?;

    Ok(Box2i {
        x_min,
        y_min,
        x_max,
        y_max
    })
}

fn decode_box2f(bytes: &[u8]) -> Result<Box2f, ExrDecodeErrors> {
    let [x_min, y_min, x_max, y_max] = floats::<4>("box2f", bytes)?;

    Ok(Box2f {
        x_min,
        y_min,
        x_max,
        y_max
    })
}

fn decode_rational(bytes: &[u8]) -> Result<Rational, ExrDecodeErrors> {
    let b = exact::<8>("rational", bytes)?;

    Ok(Rational {
        numerator:   i32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        denominator: u32::from_le_bytes([b[4], b[5], b[6], b[7]])
    })
}

fn decode_chromaticities(bytes: &[u8]) -> Result<Chromaticities, ExrDecodeErrors> {
    let v = floats::<8>("chromaticities", bytes)?;

    Ok(Chromaticities {
        red:   [v[0], v[1]],
        green: [v[2], v[3]],
        blue:  [v[4], v[5]],
        white: [v[6], v[7]]
    })
}

fn decode_tile_description(bytes: &[u8]) -> Result<TileDescription, ExrDecodeErrors> {
    let b = exact::<9>("tiledesc", bytes)?;

    Ok(TileDescription {
        x_size: u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        y_size: u32::from_le_bytes([b[4], b[5], b[6], b[7]]),
        mode:   b[8]
    })
}

fn decode_time_code(bytes: &[u8]) -> Result<TimeCode, ExrDecodeErrors> {
    let b = exact::<8>("timecode", bytes)?;

    Ok(TimeCode {
        time_and_flags: u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        user_data:      u32::from_le_bytes([b[4], b[5], b[6], b[7]])
    })
}

fn decode_key_code(bytes: &[u8]) -> Result<KeyCode, ExrDecodeErrors> {
    let v = ints::<7>("keycode", bytes)?;

    Ok(KeyCode {
        film_mfc_code:   v[0],
        film_type:       v[1],
        prefix:          v[2],
        count:           v[3],
        perf_offset:     v[4],
        perfs_per_frame: v[5],
        perfs_per_count: v[6]
    })
}

fn decode_preview(bytes: &[u8]) -> Result<Preview, ExrDecodeErrors> {
    if bytes.len() < 8 {
        return Err(ExrDecodeErrors::MalformedValue(
            "preview".to_string(),
            8,
            bytes.len()
        ));
    }
    let width = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let height = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

    let pixels = &bytes[8..];
    let expected = u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|x| x.checked_mul(4))
        .and_then(|x| usize::try_from(x).ok());

    if expected != Some(pixels.len()) {
        return Err(ExrDecodeErrors::MalformedValue(
            "preview".to_string(),
            expected.map_or(usize::MAX, |x| x.saturating_add(8)),
            bytes.len()
        ));
    }
    Ok(Preview {
        width,
        height,
        pixels: pixels.to_vec()
    })
}

fn single_byte(type_name: &str, bytes: &[u8]) -> Result<u8, ExrDecodeErrors> {
    Ok(exact::<1>(type_name, bytes)?[0])
}

/// Decode the raw value of an attribute given its type name
///
/// # Arguments
/// - `type_name`: The type name stored next to the attribute name, e.g `box2i`
/// - `bytes`: The attribute value exactly as stored in the file
///
/// # Returns
/// - `Ok(AttributeValue)`: The decoded value, unknown type names
///   return [`AttributeValue::Opaque`] holding a copy of `bytes`
/// - `Err(ExrDecodeErrors)`: The value's size doesn't match its type
///   or, for `chlist`, the channel list is malformed
pub fn decode_attribute_value(
    type_name: &str, bytes: &[u8]
) -> Result<AttributeValue, ExrDecodeErrors> {
    let value = match type_name {
        "float" => AttributeValue::F32(f32::from_le_bytes(*exact::<4>(type_name, bytes)?)),
        "double" => AttributeValue::F64(f64::from_le_bytes(*exact::<8>(type_name, bytes)?)),
        "int" => AttributeValue::I32(i32::from_le_bytes(*exact::<4>(type_name, bytes)?)),
        "box2i" => AttributeValue::Box2i(decode_box2i(bytes)?),
        "box2f" => AttributeValue::Box2f(decode_box2f(bytes)?),
        "v2i" => AttributeValue::V2i(ints::<2>(type_name, bytes)?),
        "v2f" => AttributeValue::V2f(floats::<2>(type_name, bytes)?),
        "v3i" => AttributeValue::V3i(ints::<3>(type_name, bytes)?),
        "v3f" => AttributeValue::V3f(floats::<3>(type_name, bytes)?),
        "m33f" => AttributeValue::M33f(floats::<9>(type_name, bytes)?),
        "m44f" => AttributeValue::M44f(floats::<16>(type_name, bytes)?),
        "rational" => AttributeValue::Rational(decode_rational(bytes)?),
        "string" => AttributeValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        "compression" => {
            AttributeValue::Compression(Compression::from_int(single_byte(type_name, bytes)?))
        }
        "lineOrder" => AttributeValue::LineOrder(LineOrder::from_int(single_byte(type_name, bytes)?)),
        "envmap" => {
            AttributeValue::EnvironmentMap(EnvironmentMap::from_int(single_byte(type_name, bytes)?))
        }
        "chlist" => AttributeValue::ChannelList(decode_channel_list(bytes)?),
        "chromaticities" => AttributeValue::Chromaticities(decode_chromaticities(bytes)?),
        "tiledesc" => AttributeValue::TileDescription(decode_tile_description(bytes)?),
        "timecode" => AttributeValue::TimeCode(decode_time_code(bytes)?),
        "keycode" => AttributeValue::KeyCode(decode_key_code(bytes)?),
        "preview" => AttributeValue::Preview(decode_preview(bytes)?),
        _ => AttributeValue::Opaque(bytes.to_vec())
    };
    Ok(value)
}
