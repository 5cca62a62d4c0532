/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

mod common;

use common::*;
use zune_core::bytestream::ZCursor;
use zune_core::options::DecoderOptions;
use zune_exr::{Compression, ErrorKind, ExrDecodeErrors, ExrDecoder};

const MULTI_PART: u32 = 2 | 0x1000;

fn part(writer: ExrWriter, name: &str, compression: u8) -> ExrWriter {
    writer
        .attribute("name", "string", name.as_bytes())
        .attribute("type", "string", b"scanlineimage")
        .required(compression, [0, 0, 15, 15], &[("R", HALF), ("G", HALF)])
        .end_header()
}

fn two_parts() -> Vec<u8> {
    let writer = part(ExrWriter::new(MULTI_PART), "left", ZIP);
    part(writer, "right", PIZ)
        // closes the part list
        .raw(&[0])
        .offsets(&fake_offsets(2))
        .finish()
}

#[test]
fn every_part_header_is_collected() {
    let mut decoder = ExrDecoder::new(ZCursor::new(two_parts()));
    decoder.decode_headers().unwrap();

    let headers = decoder.headers();
    assert_eq!(headers.len(), 2);
    assert_eq!(headers[0].part_name(), Some("left"));
    assert_eq!(headers[1].part_name(), Some("right"));
    assert_eq!(headers[0].compression(), Some(Compression::ZIP));
    assert_eq!(headers[1].compression(), Some(Compression::PIZ));
    assert!(decoder.version_flags().unwrap().multi_part);
}

#[test]
fn strict_mode_checks_every_part() {
    let options = DecoderOptions::default().set_strict_mode(true);
    let mut decoder = ExrDecoder::new_with_options(ZCursor::new(two_parts()), options);

    // strict mode wants display attributes which these parts don't carry
    let err = decoder.decode_headers().unwrap_err();
    assert!(matches!(err, ExrDecodeErrors::MissingAttribute("displayWindow")));
}

#[test]
fn single_part_list() {
    let data = part(ExrWriter::new(MULTI_PART), "only", NO_COMPRESSION)
        .raw(&[0])
        .finish();
    let mut decoder = ExrDecoder::new(ZCursor::new(data));
    decoder.decode_headers().unwrap();

    assert_eq!(decoder.headers().len(), 1);
}

#[test]
fn pixel_layout_of_multi_part_files_is_unsupported() {
    let err = ExrDecoder::new(ZCursor::new(two_parts()))
        .decode()
        .unwrap_err();

    assert!(matches!(err, ExrDecodeErrors::UnsupportedFeature(_)));
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

#[test]
fn missing_part_separator_is_an_io_error() {
    let data = part(ExrWriter::new(MULTI_PART), "cut", RLE).finish();

    let err = ExrDecoder::new(ZCursor::new(data))
        .decode_headers()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn each_part_is_validated() {
    let writer = part(ExrWriter::new(MULTI_PART), "good", ZIP);
    let data = writer
        .attribute("name", "string", b"bad")
        .attribute("channels", "chlist", &channel_list(&[("R", FLOAT)]))
        .end_header()
        .raw(&[0])
        .finish();

    let err = ExrDecoder::new(ZCursor::new(data))
        .decode_headers()
        .unwrap_err();
    assert!(matches!(err, ExrDecodeErrors::MissingAttribute("compression")));
}
