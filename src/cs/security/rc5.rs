//! DISCLAIMER: This is a teaching implementation of the RC5 block cipher (RC5-32/r/b).
//! It is not audited and has no side-channel hardening. Do not use it to protect real data.
//!
//! Words are 32 bits, blocks are 64 bits. Keys are 8, 16 or 32 bytes and the
//! default is 20 rounds. Keys are packed little-endian into words, so 12-round
//! instances reproduce the published RC5-32/12/16 test vectors.

use log::debug;

use crate::cs::security::cbc::{BlockCipher, Cbc, IvFraming};
use crate::error::{Error, Result};

/// RC5-32 operates on 64-bit blocks (8 bytes).
pub const RC5_BLOCK_SIZE: usize = 8;
/// Rounds used unless configured otherwise.
pub const RC5_DEFAULT_ROUNDS: u8 = 20;
/// Accepted key lengths in bytes.
pub const RC5_KEY_LENGTHS: [usize; 3] = [8, 16, 32];

/// Magic constants for 32-bit words: Odd((e - 2) * 2^32) and Odd((phi - 1) * 2^32).
const P32: u32 = 0xB7E15163;
const Q32: u32 = 0x9E3779B9;

const WORD_BYTES: usize = 4;

/// An RC5 key schedule. Immutable once built, so it can be shared between threads.
#[derive(Clone)]
pub struct Rc5 {
    s: Vec<u32>,
    rounds: usize,
}

impl std::fmt::Debug for Rc5 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // the expanded table is key material
        f.debug_struct("Rc5").field("rounds", &self.rounds).finish_non_exhaustive()
    }
}

impl Rc5 {
    /// Builds a 20-round key schedule from an 8, 16 or 32 byte key.
    pub fn new(key: &[u8]) -> Result<Self> {
        Self::with_rounds(key, RC5_DEFAULT_ROUNDS)
    }

    /// Builds a key schedule with a custom round count (1..=255).
    pub fn with_rounds(key: &[u8], rounds: u8) -> Result<Self> {
        if !RC5_KEY_LENGTHS.contains(&key.len()) {
            return Err(Error::invalid(format!(
                "The key must be 8, 16 or 32 bytes, got {}",
                key.len()
            )));
        }
        if rounds == 0 {
            return Err(Error::invalid("RC5 needs at least one round"));
        }

        let rounds = rounds as usize;
        let s = key_schedule(key, rounds);
        debug!(
            "rc5: expanded {}-byte key into {} words ({} rounds)",
            key.len(),
            s.len(),
            rounds
        );
        Ok(Rc5 { s, rounds })
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Encrypt a single 64-bit block in place.
    pub fn encrypt_block(&self, block: &mut [u8; RC5_BLOCK_SIZE]) {
        let (mut a, mut b) = split_words(block);

        a = a.wrapping_add(self.s[0]);
        b = b.wrapping_add(self.s[1]);

        for i in 1..=self.rounds {
            a = (a ^ b).rotate_left(b & 31).wrapping_add(self.s[2 * i]);
            b = (b ^ a).rotate_left(a & 31).wrapping_add(self.s[2 * i + 1]);
        }

        join_words(a, b, block);
    }

    /// Decrypt a single 64-bit block in place.
    pub fn decrypt_block(&self, block: &mut [u8; RC5_BLOCK_SIZE]) {
        let (mut a, mut b) = split_words(block);

        for i in (1..=self.rounds).rev() {
            b = b.wrapping_sub(self.s[2 * i + 1]).rotate_right(a & 31) ^ a;
            a = a.wrapping_sub(self.s[2 * i]).rotate_right(b & 31) ^ b;
        }

        b = b.wrapping_sub(self.s[1]);
        a = a.wrapping_sub(self.s[0]);

        join_words(a, b, block);
    }

    /// CBC-encrypts `plaintext` with a fresh random IV, sent encrypted as the first block.
    pub fn encrypt_cbc(&self, plaintext: &[u8]) -> Vec<u8> {
        Cbc::new(self, IvFraming::EncryptedIv).encrypt(plaintext)
    }

    /// Reverses [`Rc5::encrypt_cbc`].
    pub fn decrypt_cbc(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        Cbc::new(self, IvFraming::EncryptedIv).decrypt(ciphertext)
    }
}

impl BlockCipher for Rc5 {
    const BLOCK_SIZE: usize = RC5_BLOCK_SIZE;

    fn encrypt_block(&self, block: &mut [u8]) {
        let mut buf = [0u8; RC5_BLOCK_SIZE];
        buf.copy_from_slice(block);
        Rc5::encrypt_block(self, &mut buf);
        block.copy_from_slice(&buf);
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        let mut buf = [0u8; RC5_BLOCK_SIZE];
        buf.copy_from_slice(block);
        Rc5::decrypt_block(self, &mut buf);
        block.copy_from_slice(&buf);
    }
}

/// RC5 key expansion:
/// 1) Pack the key into little-endian words L.
/// 2) Fill S with the arithmetic progression P, P+Q, P+2Q, ...
/// 3) Mix L into S over 3 * max(t, c) steps.
fn key_schedule(key: &[u8], rounds: usize) -> Vec<u32> {
    let t = 2 * (rounds + 1);
    let c = (key.len() / WORD_BYTES).max(1);

    let mut l = vec![0u32; c];
    for (i, &byte) in key.iter().enumerate() {
        l[i / WORD_BYTES] |= (byte as u32) << (8 * (i % WORD_BYTES));
    }

    let mut s = vec![0u32; t];
    s[0] = P32;
    for i in 1..t {
        s[i] = s[i - 1].wrapping_add(Q32);
    }

    let (mut a, mut b) = (0u32, 0u32);
    let (mut i, mut j) = (0usize, 0usize);
    for _ in 0..3 * t.max(c) {
        s[i] = s[i].wrapping_add(a).wrapping_add(b).rotate_left(3);
        a = s[i];
        l[j] = l[j].wrapping_add(a).wrapping_add(b).rotate_left(a.wrapping_add(b) & 31);
        b = l[j];
        i = (i + 1) % t;
        j = (j + 1) % c;
    }

    s
}

fn split_words(block: &[u8; RC5_BLOCK_SIZE]) -> (u32, u32) {
    (
        u32::from_le_bytes([block[0], block[1], block[2], block[3]]),
        u32::from_le_bytes([block[4], block[5], block[6], block[7]]),
    )
}

fn join_words(a: u32, b: u32, block: &mut [u8; RC5_BLOCK_SIZE]) {
    block[..4].copy_from_slice(&a.to_le_bytes());
    block[4..].copy_from_slice(&b.to_le_bytes());
}
