//! Passphrase to RC5 key derivation built on MD5.
//!
//! | key size | key bytes                         |
//! |----------|-----------------------------------|
//! | 64       | `MD5(pw)[0..8]`                   |
//! | 128      | `MD5(pw)`                         |
//! | 256      | `MD5(MD5(pw)) \|\| MD5(pw)`       |

use std::fmt;

use crate::cs::security::md5::md5_digest;
use crate::error::{Error, Result};

/// The supported RC5 key sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeySize {
    /// 8-byte key.
    Bits64,
    /// 16-byte key.
    #[default]
    Bits128,
    /// 32-byte key.
    Bits256,
}

impl KeySize {
    pub fn bits(self) -> u32 {
        match self {
            KeySize::Bits64 => 64,
            KeySize::Bits128 => 128,
            KeySize::Bits256 => 256,
        }
    }

    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }
}

impl TryFrom<u32> for KeySize {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        match bits {
            64 => Ok(KeySize::Bits64),
            128 => Ok(KeySize::Bits128),
            256 => Ok(KeySize::Bits256),
            other => Err(Error::invalid(format!("Unsupported key size: {}", other))),
        }
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Derives an RC5 key of the requested size from `password` (hashed as UTF-8).
pub fn derive_key(password: &str, key_size: KeySize) -> Vec<u8> {
    let first = md5_digest(password.as_bytes());
    match key_size {
        KeySize::Bits64 => first[..8].to_vec(),
        KeySize::Bits128 => first.to_vec(),
        KeySize::Bits256 => {
            let second = md5_digest(&first);
            let mut key = Vec::with_capacity(32);
            key.extend_from_slice(&second);
            key.extend_from_slice(&first);
            key
        }
    }
}

/// [`derive_key`] with the size given in bits; anything but 64, 128 or 256 is rejected.
pub fn derive_key_bits(password: &str, bits: u32) -> Result<Vec<u8>> {
    Ok(derive_key(password, KeySize::try_from(bits)?))
}
