//! # Identifier Generator
//!
//! Ids are a base-36 millisecond timestamp followed by a random base-36 suffix:
//!
//! ```text
//! 0lsx8k2p0 4f9q2z1ab
//! └───┬───┘ └───┬───┘
//!  timestamp  random
//! ```
//!
//! The timestamp is zero-padded so ids sort by creation time when compared as
//! strings, which keeps store documents readable when debugging. Ordering
//! guarantees in the store come from record timestamps, never from ids.
//!
//! Uniqueness is probabilistic: two ids minted in the same millisecond collide
//! only if their 9-character suffixes match (1 in 36^9). Nothing checks for an
//! existing row with the same id.

use crate::model::{Id, Timestamp};
use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TIMESTAMP_WIDTH: usize = 9;
const SUFFIX_LEN: usize = 9;

/// Mint a new id for a record created at `now`.
pub fn new_id(now: Timestamp) -> Id {
    let mut rng = rand::thread_rng();
    let mut id = to_base36(now.max(0) as u64, TIMESTAMP_WIDTH);
    for _ in 0..SUFFIX_LEN {
        id.push(ALPHABET[rng.gen_range(0..ALPHABET.len())] as char);
    }
    Id::new(id)
}

fn to_base36(mut value: u64, width: usize) -> String {
    let mut digits = Vec::with_capacity(width);
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    while digits.len() < width {
        digits.push(b'0');
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
