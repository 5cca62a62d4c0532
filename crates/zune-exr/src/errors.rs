/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::string::String;
use core::fmt::{Debug, Display, Formatter};

use zune_core::bytestream::ZByteIoError;

/// Broad classification of [`ExrDecodeErrors`]
///
/// Callers that want to route files to a different decoder
/// only need to look at this.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The byte stream breaks a structural or cross-field rule of the format.
    Format,
    /// The stream is valid but uses something this decoder doesn't implement.
    Unsupported,
    /// The stream exceeds a limit set in the decoder options
    Limits,
    /// The underlying byte source failed or ended early.
    Io
}

/// EXR decoding errors
pub enum ExrDecodeErrors {
    /// The file doesn't start with the EXR magic number,
    /// the argument is the number that was found instead.
    InvalidMagicBytes(u32),
    /// The version word contains an illegal flag combination
    InvalidVersionFlags(&'static str),
    /// An attribute, type or channel name is longer than allowed
    ///
    /// # Arguments
    /// - maximum allowed length
    /// - length found
    NameTooLong(usize, usize),
    /// An attribute appears twice in one header (strict mode only)
    DuplicateAttribute(String),
    /// A required attribute is not present in a part header
    MissingAttribute(&'static str),
    /// A required attribute carries the wrong type
    ///
    /// # Arguments
    /// - attribute name
    /// - expected type
    /// - type found
    WrongAttributeType(&'static str, &'static str, String),
    /// A value has a size that does not match its type
    ///
    /// # Arguments
    /// - type name
    /// - expected size in bytes
    /// - size found
    MalformedValue(String, usize, usize),
    /// A required attribute has the right type but its value
    /// doesn't match the layout of that type
    ///
    /// # Arguments
    /// - attribute name
    /// - expected size in bytes
    /// - size found
    MalformedAttribute(&'static str, usize, usize),
    /// The `channels` attribute could not be decoded
    MalformedChannelList(String),
    /// The data window is empty or inverted
    InvalidDataWindow(i32, i32, i32, i32),
    /// The data window is larger than the configured
    /// `max_width`/`max_height` of the decoder options.
    ///
    /// The file may be valid, raising the limits allows decoding it.
    ///
    /// # Arguments
    /// - dimension name
    /// - configured maximum
    /// - value found
    TooLargeDimensions(&'static str, usize, usize),
    /// The compression method has no known chunk height
    UnsupportedCompression(u8),
    /// The file uses a feature this decoder doesn't implement
    UnsupportedFeature(&'static str),
    IoErrors(ZByteIoError)
}

impl ExrDecodeErrors {
    /// Return which error class this error belongs to
    pub const fn kind(&self) -> ErrorKind {
        match self {
            ExrDecodeErrors::UnsupportedCompression(_) | ExrDecodeErrors::UnsupportedFeature(_) => {
                ErrorKind::Unsupported
            }
            ExrDecodeErrors::TooLargeDimensions(..) => ErrorKind::Limits,
            ExrDecodeErrors::IoErrors(_) => ErrorKind::Io,
            _ => ErrorKind::Format
        }
    }
}

impl Debug for ExrDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ExrDecodeErrors::InvalidMagicBytes(found) => {
                writeln!(
                    f,
                    "Invalid magic number {found}, expected {}",
                    crate::constants::EXR_MAGIC
                )
            }
            ExrDecodeErrors::InvalidVersionFlags(reason) => {
                writeln!(f, "Invalid version flags: {reason}")
            }
            ExrDecodeErrors::NameTooLong(expected, found) => {
                writeln!(
                    f,
                    "Name of length {found} is longer than the allowed {expected} bytes"
                )
            }
            ExrDecodeErrors::DuplicateAttribute(name) => {
                writeln!(f, "Attribute {name:?} appears more than once in a header")
            }
            ExrDecodeErrors::MissingAttribute(name) => {
                writeln!(f, "Header does not have the required {name:?} attribute")
            }
            ExrDecodeErrors::WrongAttributeType(name, expected, found) => {
                writeln!(
                    f,
                    "Attribute {name:?} should have type {expected:?} but has {found:?}"
                )
            }
            ExrDecodeErrors::MalformedValue(type_name, expected, found) => {
                writeln!(
                    f,
                    "Value of type {type_name:?} should be {expected} bytes but found {found}"
                )
            }
            ExrDecodeErrors::MalformedAttribute(name, expected, found) => {
                writeln!(
                    f,
                    "Attribute {name:?} should be {expected} bytes but found {found}"
                )
            }
            ExrDecodeErrors::MalformedChannelList(reason) => {
                writeln!(f, "Malformed channel list: {reason}")
            }
            ExrDecodeErrors::InvalidDataWindow(x_min, y_min, x_max, y_max) => {
                writeln!(
                    f,
                    "Invalid data window [{x_min}, {y_min}, {x_max}, {y_max}], image would be empty"
                )
            }
            ExrDecodeErrors::TooLargeDimensions(dimension, expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions for {dimension} , {found} exceeds {expected}"
                )
            }
            ExrDecodeErrors::UnsupportedCompression(method) => {
                writeln!(f, "Unsupported compression method {method}")
            }
            ExrDecodeErrors::UnsupportedFeature(feature) => {
                writeln!(f, "Unsupported feature: {feature}")
            }
            ExrDecodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {:?}", err)
            }
        }
    }
}

impl From<ZByteIoError> for ExrDecodeErrors {
    fn from(value: ZByteIoError) -> Self {
        ExrDecodeErrors::IoErrors(value)
    }
}

impl Display for ExrDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ExrDecodeErrors {}
