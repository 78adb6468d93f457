//! Fixture helpers shared by the unit tables and the randomized tests.
//!
//! Keys in the tables are written as left-to-right bit streams such as
//! `"0101_0101"`, where the first character is the lowest bit of the first
//! byte: the order in which the bit cursor consumes them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Parses a left-to-right bit stream into bytes; underscores are ignored.
pub(crate) fn bits(stream: &str) -> Vec<u8> {
    let stream: Vec<u8> = stream.bytes().filter(|&b| b != b'_').collect();
    assert!(
        stream.len() % 8 == 0,
        "bit stream length must be a multiple of 8"
    );

    stream
        .chunks(8)
        .map(|chunk| {
            chunk.iter().enumerate().fold(0u8, |byte, (i, bit)| match bit {
                b'0' => byte,
                b'1' => byte | 1 << i,
                _ => panic!("bad bit character {bit:?}"),
            })
        })
        .collect()
}

/// Renders bytes back as a left-to-right bit stream with byte separators.
#[allow(dead_code)]
pub(crate) fn to_bits(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| {
            (0..8)
                .map(|i| if byte >> i & 1 == 1 { '1' } else { '0' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// Packs up to eight bytes into a u64, byte `i` at bit offset `8 * i`; the
/// layout fan prefixes and embedded keys use.
pub(crate) fn pack_bytes(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &byte)| acc | u64::from(byte) << (8 * i))
}

const WORDS: &[&str] = &[
    "banjo", "lo-fi", "brooklyn", "mlkshk", "cliche", "lomo", "DIY", "whatever", "street",
    "kickstarter", "distillery", "echo", "kogi", "biodiesel", "dreamcatcher", "mumblecore",
    "irony", "selvage", "selfies", "godard", "tattooed", "kombucha", "artisan", "gluten-free",
    "heirloom", "narwhal", "tilde", "waistcoat", "flannel", "chillwave", "fixie", "vinegar",
];

/// Deterministic sentence-like key/value pairs; the same seed always yields
/// the same sequence. Duplicate keys are possible and callers are expected
/// to apply last-write-wins.
pub(crate) fn fake_pairs(seed: u64, total: usize) -> Vec<(String, String)> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..total)
        .map(|_| {
            let words: Vec<&str> = (0..5).map(|_| WORDS[rng.gen_range(0..WORDS.len())]).collect();
            let mut key = words.join(" ");
            key.push('.');

            let val: String = (0..rng.gen_range(4..12))
                .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
                .collect();

            (key, val)
        })
        .collect()
}
