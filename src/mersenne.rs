//! MT19937 with the string seeding used by the selection stage.
//!
//! A string seed is hashed together with its own SHA-512, read as one
//! big-endian integer, split into little-endian 32-bit words and fed to
//! `init_by_array`. Draws below a bound use bit-length rejection sampling,
//! so identical seeds always yield identical indices.

use rand_mt::Mt;
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

pub struct SeededMt {
    inner: Mt,
}

impl SeededMt {
    pub fn from_key(key: &[u32]) -> Self {
        Self {
            inner: Mt::new_with_key(key.iter().copied()),
        }
    }

    pub fn from_str_seed(seed: &str) -> Self {
        let key = string_seed_key(seed);
        Self::from_key(&key)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    /// Top `bits` bits of the next output. `bits` is clamped to 32.
    pub fn next_bits(&mut self, bits: u32) -> u32 {
        match bits {
            0 => 0,
            1..=31 => self.next_u32() >> (32 - bits),
            _ => self.next_u32(),
        }
    }

    /// Uniform value in `[0, bound)`; returns 0 for an empty range.
    pub fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }

        let bits = u32::BITS - bound.leading_zeros();
        loop {
            let r = self.next_bits(bits);
            if r < bound {
                return r;
            }
        }
    }
}

/// Key words for `init_by_array` derived from a string seed.
///
/// The seed bytes followed by their SHA-512 form one big-endian integer;
/// the words are that integer's minimal little-endian 32-bit limbs.
fn string_seed_key(seed: &str) -> Zeroizing<Vec<u32>> {
    let mut bytes = Zeroizing::new(Vec::with_capacity(seed.len() + 64));
    bytes.extend_from_slice(seed.as_bytes());
    bytes.extend_from_slice(&Sha512::digest(seed.as_bytes()));

    let significant = bytes
        .iter()
        .position(|&b| b != 0)
        .map_or(&[][..], |start| &bytes[start..]);

    let mut key = Zeroizing::new(Vec::with_capacity(significant.len().div_ceil(4).max(1)));
    for chunk in significant.rchunks(4) {
        let mut word = [0u8; 4];
        for (dst, src) in word.iter_mut().zip(chunk.iter().rev()) {
            *dst = *src;
        }
        key.push(u32::from_le_bytes(word));
    }

    if key.is_empty() {
        key.push(0);
    }

    key
}
