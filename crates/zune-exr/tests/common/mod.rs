/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Helpers that write small EXR files in memory
#![allow(dead_code)]

pub const MAGIC: [u8; 4] = 20_000_630_u32.to_le_bytes();

pub const FLOAT: i32 = 2;
pub const HALF: i32 = 1;

pub const NO_COMPRESSION: u8 = 0;
pub const RLE: u8 = 1;
pub const ZIP: u8 = 3;
pub const PIZ: u8 = 4;

pub struct ExrWriter {
    bytes: Vec<u8>
}

impl ExrWriter {
    /// Start a file with the magic number and the given version word
    pub fn new(version_word: u32) -> ExrWriter {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&version_word.to_le_bytes());
        ExrWriter { bytes }
    }

    pub fn attribute(self, name: &str, type_name: &str, value: &[u8]) -> ExrWriter {
        self.attribute_bytes(name.as_bytes(), type_name, value)
    }

    /// Like [`attribute`](Self::attribute) for names that aren't valid UTF-8
    pub fn attribute_bytes(mut self, name: &[u8], type_name: &str, value: &[u8]) -> ExrWriter {
        self.bytes.extend_from_slice(name);
        self.bytes.push(0);
        self.bytes.extend_from_slice(type_name.as_bytes());
        self.bytes.push(0);
        self.bytes
            .extend_from_slice(&(value.len() as u32).to_le_bytes());
        self.bytes.extend_from_slice(value);
        self
    }

    /// Add `channels`, `compression`, `dataWindow` and `lineOrder`
    pub fn required(self, compression: u8, window: [i32; 4], channels: &[(&str, i32)]) -> ExrWriter {
        self.attribute("channels", "chlist", &channel_list(channels))
            .attribute("compression", "compression", &[compression])
            .attribute("dataWindow", "box2i", &box2i(window))
            .attribute("lineOrder", "lineOrder", &[0])
    }

    /// Close the current header with a null byte
    pub fn end_header(mut self) -> ExrWriter {
        self.bytes.push(0);
        self
    }

    pub fn offsets(mut self, offsets: &[u64]) -> ExrWriter {
        for offset in offsets {
            self.bytes.extend_from_slice(&offset.to_le_bytes());
        }
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> ExrWriter {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

pub fn box2i(window: [i32; 4]) -> Vec<u8> {
    window.iter().flat_map(|x| x.to_le_bytes()).collect()
}

/// Channels with sampling 1,1 and linear flag off
pub fn channel_list(channels: &[(&str, i32)]) -> Vec<u8> {
    let mut out = Vec::new();

    for (name, pixel_type) in channels {
        out.extend_from_slice(name.as_bytes());
        out.push(0);
        out.extend_from_slice(&pixel_type.to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&1_i32.to_le_bytes());
        out.extend_from_slice(&1_i32.to_le_bytes());
    }
    out.push(0);
    out
}

/// Offsets that look like a real file, increasing by a fixed chunk size
pub fn fake_offsets(count: usize) -> Vec<u64> {
    (0..count as u64).map(|x| 400 + x * 128).collect()
}

/// A valid single part scanline file
pub fn simple_file(compression: u8, window: [i32; 4], num_chunks: usize) -> Vec<u8> {
    ExrWriter::new(2)
        .required(compression, window, &[("R", FLOAT)])
        .end_header()
        .offsets(&fake_offsets(num_chunks))
        .finish()
}
