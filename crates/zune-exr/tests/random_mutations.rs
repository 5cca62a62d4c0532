/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Corrupt valid files at random and make sure the decoder returns
//! instead of panicking

mod common;

use common::*;
use nanorand::{Rng, WyRand};
use zune_core::bytestream::ZCursor;
use zune_core::options::DecoderOptions;
use zune_exr::ExrDecoder;

fn seed_files() -> Vec<Vec<u8>> {
    vec![
        simple_file(NO_COMPRESSION, [0, 0, 9, 9], 10),
        simple_file(PIZ, [-4, 10, 27, 90], 3),
        ExrWriter::new(2 | 0x400)
            .attribute("comments", "string", b"random mutations")
            .attribute("preview", "preview", &[1, 0, 0, 0, 1, 0, 0, 0, 9, 9, 9, 255])
            .attribute("timeCode", "timecode", &[0x12, 0x34, 0x56, 0x08, 0, 0, 0, 0])
            .required(ZIP, [0, 0, 31, 31], &[("B", HALF), ("G", HALF), ("R", HALF)])
            .end_header()
            .offsets(&fake_offsets(2))
            .finish(),
        ExrWriter::new(2 | 0x1000)
            .attribute("name", "string", b"a")
            .required(RLE, [0, 0, 1, 1], &[("Y", FLOAT)])
            .end_header()
            .attribute("name", "string", b"b")
            .required(RLE, [0, 0, 1, 1], &[("Y", FLOAT)])
            .end_header()
            .raw(&[0])
            .finish(),
    ]
}

fn decode_both_modes(data: &[u8]) {
    let _ = ExrDecoder::new(ZCursor::new(data)).decode();

    let options = DecoderOptions::default().set_strict_mode(true);
    let _ = ExrDecoder::new_with_options(ZCursor::new(data), options).decode();
}

#[test]
fn flipped_bytes_never_panic() {
    let mut rand = WyRand::new_seed(0x5EED);

    for file in seed_files() {
        for _ in 0..2000 {
            let mut data = file.clone();
            let flips = rand.generate_range(1_usize..=4);

            for _ in 0..flips {
                let position = rand.generate_range(0..data.len());
                data[position] = rand.generate::<u8>();
            }
            decode_both_modes(&data);
        }
    }
}

#[test]
fn truncated_files_never_panic() {
    for file in seed_files() {
        for length in 0..file.len() {
            decode_both_modes(&file[..length]);
        }
    }
}

#[test]
fn random_bytes_after_the_magic_never_panic() {
    let mut rand = WyRand::new_seed(42);

    for length in [0, 1, 7, 64, 512, 4096] {
        for _ in 0..200 {
            let mut data = MAGIC.to_vec();
            data.extend_from_slice(&2_u32.to_le_bytes());
            data.extend((0..length).map(|_| rand.generate::<u8>()));

            decode_both_modes(&data);
        }
    }
}
