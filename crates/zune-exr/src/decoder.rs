/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::string::String;
use alloc::vec::Vec;

use zune_core::bytestream::{ZByteReaderTrait, ZReader};
use zune_core::log::{trace, warn};
use zune_core::options::DecoderOptions;

use crate::attributes::{decode_attribute_value, AttributeValue, DataWindow};
use crate::channels::Channel;
use crate::constants::MAX_LONG_NAME_LENGTH;
use crate::errors::ExrDecodeErrors;
use crate::header::{validate_header, Attribute, Header};
use crate::layout::{resolve_header_layout, ChunkLayout};
use crate::version::{read_magic_and_version, VersionFlags};

/// Byte offsets of every chunk of a part, in file order
pub type ChunkOffsetTable = Vec<u64>;

/// Largest piece of an attribute value read at once.
///
/// Values are read in steps of this size so a corrupt length field
/// fails with an I/O error instead of a huge allocation.
const VALUE_READ_STEP: usize = 1 << 16;

/// Where the header parser is in the stream
enum ParseState {
    /// Expecting an attribute name or the null byte closing a header.
    ///
    /// Carries the first byte of the name if it was already consumed
    /// while looking for a part separator.
    ReadingAttribute(Option<u8>),
    /// A multi-part header ended, a null byte ends the part list
    AwaitingPartSeparator,
    Finished
}

/// Everything needed to locate and interpret the pixel data of
/// a single part scanline file.
#[derive(Clone, Debug, PartialEq)]
pub struct ExrHeaderBundle {
    flags:       VersionFlags,
    header:      Header,
    channels:    Vec<Channel>,
    data_window: DataWindow,
    layout:      ChunkLayout,
    offsets:     ChunkOffsetTable
}

impl ExrHeaderBundle {
    pub const fn version_flags(&self) -> VersionFlags {
        self.flags
    }
    /// The validated attributes of the part
    pub const fn header(&self) -> &Header {
        &self.header
    }
    /// Channels in storage order
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }
    pub const fn data_window(&self) -> DataWindow {
        self.data_window
    }
    pub const fn layout(&self) -> ChunkLayout {
        self.layout
    }
    /// Chunk offsets, one per chunk in [`layout`](Self::layout)
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }
}

/// An OpenEXR header decoder
///
/// The decoder reads the magic number, version flags and every part header,
/// and for single part scanline files the chunk offset table following them.
/// Pixel data itself is left untouched.
pub struct ExrDecoder<T: ZByteReaderTrait> {
    stream:          ZReader<T>,
    options:         DecoderOptions,
    flags:           VersionFlags,
    headers:         Vec<Header>,
    decoded_headers: bool
}

impl<T> ExrDecoder<T>
where
    T: ZByteReaderTrait
{
    /// Create a new EXR decoder
    ///
    /// # Arguments
    ///
    /// * `data`: Raw EXR file contents
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use zune_exr::ExrDecoder;
    /// let file_data = std::io::BufReader::new(std::fs::File::open("sample.exr").unwrap());
    /// let decoder = ExrDecoder::new(file_data);
    /// ```
    pub fn new(data: T) -> ExrDecoder<T> {
        Self::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new EXR decoder with the specified options
    ///
    /// The decoder respects `max_width`, `max_height` and `strict_mode`.
    /// Strict mode rejects duplicate attributes, over long short names,
    /// unknown version bits and headers missing any attribute the
    /// file layout document lists as required.
    ///
    /// # Examples
    ///
    /// ```
    /// use zune_core::bytestream::ZCursor;
    /// use zune_core::options::DecoderOptions;
    /// use zune_exr::ExrDecoder;
    ///
    /// let options = DecoderOptions::default().set_strict_mode(true);
    /// let decoder = ExrDecoder::new_with_options(ZCursor::new(Vec::<u8>::new()), options);
    /// ```
    pub fn new_with_options(data: T, options: DecoderOptions) -> ExrDecoder<T> {
        ExrDecoder {
            stream: ZReader::new(data),
            options,
            flags: VersionFlags::default(),
            headers: Vec::new(),
            decoded_headers: false
        }
    }

    /// Decode the magic number, version word and every part header
    ///
    /// The stream is left positioned right after the header section,
    /// at the start of the chunk offset table.
    pub fn decode_headers(&mut self) -> Result<(), ExrDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        let strict = self.options.strict_mode();
        let flags = read_magic_and_version(&mut self.stream, strict)?;

        let mut headers = Vec::new();
        let mut current = Header::new();
        let mut state = ParseState::ReadingAttribute(None);

        loop {
            state = match state {
                ParseState::ReadingAttribute(first_byte) => {
                    match self.read_attribute(first_byte, &flags)? {
                        Some(attribute) => {
                            if strict && current.get_by_bytes(&attribute.name_bytes).is_some() {
                                return Err(ExrDecodeErrors::DuplicateAttribute(attribute.name));
                            }
                            current.insert(attribute);
                            ParseState::ReadingAttribute(None)
                        }
                        None => {
                            validate_header(&current, &flags, strict)?;
                            trace!("Part {} has {} attributes", headers.len(), current.len());
                            headers.push(core::mem::take(&mut current));

                            if flags.multi_part {
                                ParseState::AwaitingPartSeparator
                            } else {
                                ParseState::Finished
                            }
                        }
                    }
                }
                ParseState::AwaitingPartSeparator => match self.stream.read_u8_err()? {
                    0 => ParseState::Finished,
                    byte => ParseState::ReadingAttribute(Some(byte))
                },
                ParseState::Finished => break
            };
        }

        self.flags = flags;
        self.headers = headers;
        self.decoded_headers = true;

        Ok(())
    }

    /// Decode the headers and the chunk offset table
    ///
    /// # Returns
    /// - `Ok(ExrHeaderBundle)`: The validated header, channels, data window
    ///   chunk layout and offsets
    /// - `Err(ExrDecodeErrors)`: The file is malformed, truncated or
    ///   uses a layout (multi-part, tiled, deep) this decoder doesn't handle
    pub fn decode(&mut self) -> Result<ExrHeaderBundle, ExrDecodeErrors> {
        self.decode_headers()?;

        if self.flags.multi_part {
            return Err(ExrDecodeErrors::UnsupportedFeature("multi-part images"));
        }
        let header = self
            .headers
            .first()
            .ok_or(ExrDecodeErrors::UnsupportedFeature("files without a header"))?;

        let layout = resolve_header_layout(header, &self.flags, &self.options)?;
        let data_window = header
            .data_window()
            .ok_or(ExrDecodeErrors::MissingAttribute("dataWindow"))?;
        let channels = header
            .channels()
            .ok_or(ExrDecodeErrors::MissingAttribute("channels"))?
            .to_vec();
        let header = header.clone();

        let offsets = self.read_offsets(layout.num_chunks)?;

        Ok(ExrHeaderBundle {
            flags: self.flags,
            header,
            channels,
            data_window,
            layout,
            offsets
        })
    }

    /// Version flags, or `None` if headers haven't been decoded
    pub const fn version_flags(&self) -> Option<VersionFlags> {
        if self.decoded_headers {
            Some(self.flags)
        } else {
            None
        }
    }

    /// One header per part, empty until headers are decoded
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Get image dimensions of the first part as a tuple of width and height
    /// or `None` if the headers haven't been decoded.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        let window = self.headers.first()?.data_window()?;

        let width = usize::try_from(window.width()).ok()?;
        let height = usize::try_from(window.height()).ok()?;

        Some((width, height))
    }

    /// Read one attribute, or `None` at the null byte closing a header
    fn read_attribute(
        &mut self, first_byte: Option<u8>, flags: &VersionFlags
    ) -> Result<Option<Attribute>, ExrDecodeErrors> {
        let name = self.read_name(first_byte, flags)?;

        if name.is_empty() {
            return Ok(None);
        }
        let type_name = self.read_name(None, flags)?;
        let length = self.stream.get_u32_le_err()? as usize;
        let raw = self.read_value(length)?;

        let name_bytes = name;
        let name = String::from_utf8_lossy(&name_bytes).into_owned();
        let type_name = String::from_utf8_lossy(&type_name).into_owned();

        // a bad value only matters for required attributes,
        // which validation checks
        let value = decode_attribute_value(&type_name, &raw).unwrap_or_else(|_| {
            warn!(
                "Attribute {:?} doesn't match the layout of {:?}, keeping raw bytes",
                name, type_name
            );
            AttributeValue::Opaque(raw.clone())
        });

        trace!("Attribute {:?} of type {:?}: {:?}", name, type_name, value);

        Ok(Some(Attribute {
            name,
            name_bytes,
            type_name,
            raw,
            value
        }))
    }

    /// Read a null terminated name, without the terminator
    fn read_name(
        &mut self, first_byte: Option<u8>, flags: &VersionFlags
    ) -> Result<Vec<u8>, ExrDecodeErrors> {
        let mut name = Vec::new();
        let mut byte = match first_byte {
            Some(byte) => byte,
            None => self.stream.read_u8_err()?
        };

        while byte != 0 {
            if name.len() == MAX_LONG_NAME_LENGTH {
                return Err(ExrDecodeErrors::NameTooLong(
                    MAX_LONG_NAME_LENGTH,
                    MAX_LONG_NAME_LENGTH + 1
                ));
            }
            name.push(byte);
            byte = self.stream.read_u8_err()?;
        }

        if self.options.strict_mode() && name.len() > flags.max_name_length() {
            return Err(ExrDecodeErrors::NameTooLong(
                flags.max_name_length(),
                name.len()
            ));
        }
        Ok(name)
    }

    fn read_value(&mut self, length: usize) -> Result<Vec<u8>, ExrDecodeErrors> {
        let mut value = Vec::with_capacity(length.min(VALUE_READ_STEP));

        while value.len() < length {
            let start = value.len();
            let end = start + (length - start).min(VALUE_READ_STEP);

            value.resize(end, 0);
            self.stream.read_exact_bytes(&mut value[start..end])?;
        }
        Ok(value)
    }

    fn read_offsets(&mut self, num_chunks: usize) -> Result<ChunkOffsetTable, ExrDecodeErrors> {
        let mut offsets = Vec::with_capacity(num_chunks);

        for _ in 0..num_chunks {
            offsets.push(self.stream.get_u64_le_err()?);
        }
        trace!("Chunk offsets: {:?}", offsets);

        Ok(offsets)
    }
}

/// Decode the header bundle of a single part scanline EXR file
///
/// Shorthand for [`ExrDecoder::new`] followed by [`ExrDecoder::decode`]
pub fn decode<T: ZByteReaderTrait>(source: T) -> Result<ExrHeaderBundle, ExrDecodeErrors> {
    ExrDecoder::new(source).decode()
}
