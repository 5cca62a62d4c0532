/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Fixed values of the OpenEXR container

/// The first four bytes of every OpenEXR file, read as a little endian `u32`
pub const EXR_MAGIC: u32 = 20_000_630;

/// Version word bit set for single part tiled files
pub const TILED_FLAG: u32 = 0x200;
/// Version word bit set when attribute and channel names may be up to 255 bytes
pub const LONG_NAMES_FLAG: u32 = 0x400;
/// Version word bit set for files containing deep data
pub const DEEP_FLAG: u32 = 0x800;
/// Version word bit set for multi-part files
pub const MULTI_PART_FLAG: u32 = 0x1000;

/// Every flag bit this decoder understands
pub(crate) const KNOWN_FLAGS: u32 = TILED_FLAG | LONG_NAMES_FLAG | DEEP_FLAG | MULTI_PART_FLAG;

/// The only file format version in use
pub const EXR_VERSION: u8 = 2;

/// Longest attribute/channel name when the long names flag is set
pub const MAX_LONG_NAME_LENGTH: usize = 255;
/// Longest attribute/channel name when the long names flag is clear
pub const MAX_SHORT_NAME_LENGTH: usize = 31;

/// Attributes every part header must carry.
///
/// Each entry is `(attribute name, expected type name)`
pub const REQUIRED_ATTRIBUTES: [(&str, &str); 4] = [
    ("channels", "chlist"),
    ("compression", "compression"),
    ("dataWindow", "box2i"),
    ("lineOrder", "lineOrder")
];

/// Attributes the OpenEXR file layout document additionally requires,
/// checked only in strict mode.
pub const STRICT_REQUIRED_ATTRIBUTES: [(&str, &str); 4] = [
    ("displayWindow", "box2i"),
    ("pixelAspectRatio", "float"),
    ("screenWindowCenter", "v2f"),
    ("screenWindowWidth", "float")
];

/// Attributes every header of a multi-part file must carry in strict mode
pub const MULTI_PART_REQUIRED_ATTRIBUTES: [(&str, &str); 2] =
    [("name", "string"), ("type", "string")];
