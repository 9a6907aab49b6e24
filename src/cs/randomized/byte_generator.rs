//! Byte-oriented congruential generators. Neither is cryptographically secure.
//!
//! - [`ByteGenerator`]: 64-bit state, `state = A * state + C (mod 2^64)`, emits the top byte.
//! - [`generate_pseudo_random`]: a stateless 31-bit LCG, fully determined by its seed.

use rand::RngCore;

/// Multiplier of the 64-bit generator (Knuth's MMIX constant).
pub const BYTE_GEN_MULTIPLIER: u64 = 6364136223846793005;
/// Increment of the 64-bit generator.
pub const BYTE_GEN_INCREMENT: u64 = 1442695040888963407;
/// State a default generator starts from.
pub const BYTE_GEN_DEFAULT_STATE: u64 = 0x123456789ABCDEF0;

const LCG31_MULTIPLIER: u32 = 1103515245;
const LCG31_INCREMENT: u32 = 12345;
const LCG31_MASK: u32 = 0x7FFF_FFFF;

/// A 64-bit linear congruential byte generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteGenerator {
    state: u64,
}

impl Default for ByteGenerator {
    fn default() -> Self {
        Self::with_state(BYTE_GEN_DEFAULT_STATE)
    }
}

impl ByteGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: u64) -> Self {
        ByteGenerator { state }
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    /// Steps the state once and returns its most significant byte.
    pub fn next_byte(&mut self) -> u8 {
        self.state = BYTE_GEN_MULTIPLIER
            .wrapping_mul(self.state)
            .wrapping_add(BYTE_GEN_INCREMENT);
        (self.state >> 56) as u8
    }

    pub fn next_bytes(&mut self, count: usize) -> Vec<u8> {
        (0..count).map(|_| self.next_byte()).collect()
    }
}

impl RngCore for ByteGenerator {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest {
            *byte = self.next_byte();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Produces `count` bytes from a 31-bit LCG seeded with `seed`.
///
/// The output depends only on `count` and `seed`:
///
/// ```
/// use cryptolabs::randomized::generate_pseudo_random;
///
/// assert_eq!(generate_pseudo_random(16, 7), generate_pseudo_random(16, 7));
/// assert_eq!(generate_pseudo_random(3, 42), vec![27, 184, 145]);
/// ```
pub fn generate_pseudo_random(count: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = LCG31_MULTIPLIER
                .wrapping_mul(state)
                .wrapping_add(LCG31_INCREMENT)
                & LCG31_MASK;
            (state & 0xFF) as u8
        })
        .collect()
}
