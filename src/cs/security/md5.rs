//! DISCLAIMER: MD5 is broken as a cryptographic hash. This implementation exists for
//! teaching and for deriving keys in the RC5 lab; do not use it to protect anything.
//!
//! Two front ends share one compression function:
//!
//! - [`Md5`] is an owned hashing context. [`Md5::finalize`] consumes it, so a finished
//!   context cannot be fed more data.
//! - [`DigestEngine`] is the long-lived service form (`initialize` / `update` / `finalize`).
//!   It tracks whether it is open and rejects use after finalization with
//!   [`Error::NotConfigured`] until it is initialized again.

use std::io::Read;

use log::debug;

use crate::error::{Error, Result};

/// The size of the MD5 digest in bytes (128 bits = 16 bytes).
pub const MD5_OUTPUT_SIZE: usize = 16;

/// MD5 processes its input in 512-bit blocks.
pub const MD5_BLOCK_SIZE: usize = 64;

/// Chunk size used when hashing readers.
const READ_CHUNK_SIZE: usize = 81920;

/// The initial values for (A, B, C, D) from RFC 1321.
const INIT_A: u32 = 0x67452301;
const INIT_B: u32 = 0xEFCDAB89;
const INIT_C: u32 = 0x98BADCFE;
const INIT_D: u32 = 0x10325476;

/// The sine table constants (T) in MD5 (32 bits).
/// T[i] = floor(2^32 * abs(sin(i+1))) for i=0..63
static T: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee,
    0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be,
    0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa,
    0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed,
    0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c,
    0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05,
    0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039,
    0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1,
    0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// The amount of left rotation performed in each MD5 step, in four bands of 16.
static S: [u32; 64] = [
    // Round 1
    7, 12, 17, 22,  7, 12, 17, 22,  7, 12, 17, 22,  7, 12, 17, 22,
    // Round 2
    5, 9, 14, 20,   5, 9, 14, 20,   5, 9, 14, 20,   5, 9, 14, 20,
    // Round 3
    4, 11, 16, 23,  4, 11, 16, 23,  4, 11, 16, 23,  4, 11, 16, 23,
    // Round 4
    6, 10, 15, 21,  6, 10, 15, 21,  6, 10, 15, 21,  6, 10, 15, 21,
];

/// An MD5 hashing context.
#[derive(Debug, Clone)]
pub struct Md5 {
    /// State (A, B, C, D) each 32 bits.
    a: u32,
    b: u32,
    c: u32,
    d: u32,
    /// Unconsumed tail, always shorter than one block between calls.
    buffer: [u8; MD5_BLOCK_SIZE],
    buffer_len: usize,
    /// Total number of bytes ever submitted.
    total_len: u64,
}

impl Default for Md5 {
    fn default() -> Self {
        Self::new()
    }
}

impl Md5 {
    /// Creates a new MD5 context.
    pub fn new() -> Self {
        Self {
            a: INIT_A,
            b: INIT_B,
            c: INIT_C,
            d: INIT_D,
            buffer: [0u8; MD5_BLOCK_SIZE],
            buffer_len: 0,
            total_len: 0,
        }
    }

    /// Feeds `data` into the context.
    ///
    /// Splitting input across several calls yields the same digest as one call with the
    /// concatenation.
    pub fn update(&mut self, mut data: &[u8]) {
        self.total_len = self.total_len.wrapping_add(data.len() as u64);

        if self.buffer_len > 0 {
            let take = (MD5_BLOCK_SIZE - self.buffer_len).min(data.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&data[..take]);
            self.buffer_len += take;
            data = &data[take..];

            if self.buffer_len < MD5_BLOCK_SIZE {
                return;
            }
            let block = self.buffer;
            self.process_block(&block);
            self.buffer_len = 0;
        }

        let mut blocks = data.chunks_exact(MD5_BLOCK_SIZE);
        for block in &mut blocks {
            self.process_block(block);
        }

        let rest = blocks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.buffer_len = rest.len();
    }

    /// Applies the final padding and returns the raw 16-byte digest.
    pub fn finalize(mut self) -> [u8; MD5_OUTPUT_SIZE] {
        let bit_len = self.total_len.wrapping_mul(8);

        // append the 0x80
        self.buffer[self.buffer_len] = 0x80;
        self.buffer_len += 1;

        // if there's not enough room for the 8-byte length, flush a block first
        if self.buffer_len > 56 {
            self.buffer[self.buffer_len..].fill(0);
            let block = self.buffer;
            self.process_block(&block);
            self.buffer_len = 0;
        }
        self.buffer[self.buffer_len..56].fill(0);
        self.buffer[56..].copy_from_slice(&bit_len.to_le_bytes());
        let block = self.buffer;
        self.process_block(&block);

        let mut output = [0u8; MD5_OUTPUT_SIZE];
        output[0..4].copy_from_slice(&self.a.to_le_bytes());
        output[4..8].copy_from_slice(&self.b.to_le_bytes());
        output[8..12].copy_from_slice(&self.c.to_le_bytes());
        output[12..16].copy_from_slice(&self.d.to_le_bytes());
        output
    }

    /// Like [`Md5::finalize`], hex encoded in lowercase.
    pub fn finalize_hex(self) -> String {
        hex::encode(self.finalize())
    }

    /// Hashes everything `reader` yields.
    pub fn digest_reader<R: Read>(mut reader: R) -> Result<[u8; MD5_OUTPUT_SIZE]> {
        let mut hasher = Md5::new();
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];
        loop {
            let read = reader
                .read(&mut chunk)
                .map_err(|e| Error::invalid(format!("failed to read input: {}", e)))?;
            if read == 0 {
                break;
            }
            hasher.update(&chunk[..read]);
        }
        debug!("md5: hashed {} bytes from reader", hasher.total_len);
        Ok(hasher.finalize())
    }

    /// Processes a 512-bit (64-byte) block, updating the internal state.
    /// The block is divided into 16 32-bit words in little-endian.
    fn process_block(&mut self, block: &[u8]) {
        let mut m = [0u32; 16];
        for (word, bytes) in m.iter_mut().zip(block.chunks_exact(4)) {
            *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }

        let (mut a, mut b, mut c, mut d) = (self.a, self.b, self.c, self.d);

        for i in 0..64 {
            let (f, g) = if i < 16 {
                // F function
                ((b & c) | ((!b) & d), i)
            } else if i < 32 {
                // G function
                ((b & d) | (c & (!d)), (5 * i + 1) % 16)
            } else if i < 48 {
                // H function
                (b ^ c ^ d, (3 * i + 5) % 16)
            } else {
                // I function
                (c ^ (b | (!d)), (7 * i) % 16)
            };

            let temp = a.wrapping_add(f).wrapping_add(m[g]).wrapping_add(T[i]);
            let temp = temp.rotate_left(S[i]).wrapping_add(b);

            a = d;
            d = c;
            c = b;
            b = temp;
        }

        self.a = self.a.wrapping_add(a);
        self.b = self.b.wrapping_add(b);
        self.c = self.c.wrapping_add(c);
        self.d = self.d.wrapping_add(d);
    }
}

/// Computes the MD5 digest of `data` in a single shot.
pub fn md5_digest(data: &[u8]) -> [u8; MD5_OUTPUT_SIZE] {
    let mut hasher = Md5::new();
    hasher.update(data);
    hasher.finalize()
}

/// Computes the lowercase hex MD5 digest of `data`.
pub fn md5_hex(data: &[u8]) -> String {
    hex::encode(md5_digest(data))
}

#[derive(Debug, Clone)]
enum DigestState {
    Open(Md5),
    Closed,
}

/// A reusable hashing session: `initialize`, any number of `update`s, one `finalize`.
///
/// Each session must own its engine exclusively.
#[derive(Debug, Clone)]
pub struct DigestEngine {
    state: DigestState,
}

impl Default for DigestEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DigestEngine {
    /// Creates an engine that is already initialized.
    pub fn new() -> Self {
        Self {
            state: DigestState::Open(Md5::new()),
        }
    }

    /// Resets the registers, accumulator and byte counter.
    pub fn initialize(&mut self) {
        self.state = DigestState::Open(Md5::new());
    }

    /// Returns `true` until `finalize` has been called.
    pub fn is_open(&self) -> bool {
        matches!(self.state, DigestState::Open(_))
    }

    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        match &mut self.state {
            DigestState::Open(hasher) => {
                hasher.update(data);
                Ok(())
            }
            DigestState::Closed => Err(Error::NotConfigured(
                "digest engine was finalized; call initialize() first".to_string(),
            )),
        }
    }

    /// Finishes the session and returns the lowercase hex digest.
    ///
    /// The engine is closed afterwards.
    pub fn finalize(&mut self) -> Result<String> {
        match std::mem::replace(&mut self.state, DigestState::Closed) {
            DigestState::Open(hasher) => Ok(hasher.finalize_hex()),
            DigestState::Closed => Err(Error::NotConfigured(
                "digest engine was already finalized; call initialize() first".to_string(),
            )),
        }
    }

    /// One-shot raw digest. Discards any session in progress and leaves the
    /// engine freshly initialized.
    pub fn hash_to_bytes(&mut self, data: &[u8]) -> [u8; MD5_OUTPUT_SIZE] {
        self.initialize();
        md5_digest(data)
    }
}
