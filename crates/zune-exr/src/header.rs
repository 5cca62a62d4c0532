/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Part headers and their validation

use alloc::string::String;
use alloc::vec::Vec;

use zune_core::log::warn;

use crate::attributes::{decode_attribute_value, AttributeValue, Compression, DataWindow, LineOrder};
use crate::channels::Channel;
use crate::constants::{
    MULTI_PART_REQUIRED_ATTRIBUTES, REQUIRED_ATTRIBUTES, STRICT_REQUIRED_ATTRIBUTES
};
use crate::errors::ExrDecodeErrors;
use crate::version::VersionFlags;

/// A named, typed attribute of a part header
///
/// Both the bytes as stored in the file and their decoded
/// form are kept. A known type whose bytes don't match its layout
/// is kept as [`AttributeValue::Opaque`].
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    /// Name with invalid UTF-8 replaced, for display
    pub name:       String,
    /// Name exactly as stored, attributes are told apart by these bytes
    pub name_bytes: Vec<u8>,
    pub type_name:  String,
    pub raw:        Vec<u8>,
    pub value:      AttributeValue
}

/// The attributes of one part, in the order they were first seen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Header {
    attributes: Vec<Attribute>
}

impl Header {
    pub const fn new() -> Header {
        Header {
            attributes: Vec::new()
        }
    }

    /// Add an attribute, replacing one with the same name.
    ///
    /// A replaced attribute keeps its original position.
    /// Returns true if an attribute was replaced
    pub(crate) fn insert(&mut self, attribute: Attribute) -> bool {
        match self
            .attributes
            .iter_mut()
            .find(|x| x.name_bytes == attribute.name_bytes)
        {
            Some(existing) => {
                warn!("Duplicate attribute {:?}, keeping the last one", attribute.name);
                *existing = attribute;
                true
            }
            None => {
                self.attributes.push(attribute);
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.get_by_bytes(name.as_bytes())
    }

    /// Look up an attribute by its stored name bytes,
    /// for names that aren't valid UTF-8
    pub fn get_by_bytes(&self, name: &[u8]) -> Option<&Attribute> {
        self.attributes.iter().find(|x| x.name_bytes == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over attributes in file order
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// The ordered channel list, if present
    pub fn channels(&self) -> Option<&[Channel]> {
        match self.get("channels").map(|x| &x.value) {
            Some(AttributeValue::ChannelList(channels)) => Some(channels),
            _ => None
        }
    }

    pub fn compression(&self) -> Option<Compression> {
        match self.get("compression").map(|x| &x.value) {
            Some(AttributeValue::Compression(compression)) => Some(*compression),
            _ => None
        }
    }

    pub fn data_window(&self) -> Option<DataWindow> {
        self.box2i("dataWindow")
    }

    pub fn display_window(&self) -> Option<DataWindow> {
        self.box2i("displayWindow")
    }

    pub fn line_order(&self) -> Option<LineOrder> {
        match self.get("lineOrder").map(|x| &x.value) {
            Some(AttributeValue::LineOrder(order)) => Some(*order),
            _ => None
        }
    }

    pub fn pixel_aspect_ratio(&self) -> Option<f32> {
        match self.get("pixelAspectRatio").map(|x| &x.value) {
            Some(AttributeValue::F32(ratio)) => Some(*ratio),
            _ => None
        }
    }

    /// The `name` attribute of a part in a multi-part file
    pub fn part_name(&self) -> Option<&str> {
        match self.get("name").map(|x| &x.value) {
            Some(AttributeValue::Text(name)) => Some(name),
            _ => None
        }
    }

    fn box2i(&self, name: &str) -> Option<DataWindow> {
        match self.get(name).map(|x| &x.value) {
            Some(AttributeValue::Box2i(b)) => Some(*b),
            _ => None
        }
    }
}

fn check_present(
    header: &Header, required: &[(&'static str, &'static str)]
) -> Result<(), ExrDecodeErrors> {
    for &(name, type_name) in required {
        let Some(attribute) = header.get(name) else {
            return Err(ExrDecodeErrors::MissingAttribute(name));
        };
        if attribute.type_name != type_name {
            return Err(ExrDecodeErrors::WrongAttributeType(
                name,
                type_name,
                attribute.type_name.clone()
            ));
        }
        // every required type is known, so an opaque value failed to decode
        if let AttributeValue::Opaque(raw) = &attribute.value {
            return Err(malformed(name, type_name, raw));
        }
    }
    Ok(())
}

/// Decode the value again to report why it didn't match its type
fn malformed(name: &'static str, type_name: &str, raw: &[u8]) -> ExrDecodeErrors {
    match decode_attribute_value(type_name, raw) {
        Err(ExrDecodeErrors::MalformedValue(_, expected, found)) => {
            ExrDecodeErrors::MalformedAttribute(name, expected, found)
        }
        Err(err) => err,
        Ok(_) => ExrDecodeErrors::MalformedAttribute(name, 0, raw.len())
    }
}

/// Check that a part header carries every attribute needed to
/// locate its pixel data.
///
/// `channels`, `compression`, `dataWindow` and `lineOrder` are always
/// required. In strict mode the display window, pixel aspect ratio and screen
/// window attributes are required too, and so are `name` and `type`
/// for multi-part files. Channel names are also checked against the
/// short name limit in strict mode.
pub fn validate_header(
    header: &Header, flags: &VersionFlags, strict: bool
) -> Result<(), ExrDecodeErrors> {
    check_present(header, &REQUIRED_ATTRIBUTES)?;

    if strict {
        check_present(header, &STRICT_REQUIRED_ATTRIBUTES)?;

        if flags.multi_part {
            check_present(header, &MULTI_PART_REQUIRED_ATTRIBUTES)?;
        }
        let max_length = flags.max_name_length();

        for channel in header.channels().unwrap_or_default() {
            if channel.name.len() > max_length {
                return Err(ExrDecodeErrors::NameTooLong(max_length, channel.name.len()));
            }
        }
    }
    Ok(())
}
