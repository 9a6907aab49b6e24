//! Cipher Block Chaining over any [`BlockCipher`], with PKCS-style padding.
//!
//! Output layout is always `IV block | ciphertext blocks`. How the IV block is
//! written is chosen by [`IvFraming`]:
//!
//! - [`IvFraming::EncryptedIv`]: the random IV is itself ECB-encrypted before it is
//!   prepended. This is the format of every artifact the RC5 lab produces.
//! - [`IvFraming::PlainIv`]: textbook CBC, IV in the clear.

use log::{debug, warn};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Error, Result};

/// A block cipher usable by [`Cbc`].
///
/// # Panics
///
/// `encrypt_block` and `decrypt_block` may panic when `block` is not exactly
/// `BLOCK_SIZE` bytes long. [`Cbc`] only ever hands them whole blocks.
pub trait BlockCipher {
    const BLOCK_SIZE: usize;

    fn encrypt_block(&self, block: &mut [u8]);

    fn decrypt_block(&self, block: &mut [u8]);
}

/// How the IV travels in front of the ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IvFraming {
    /// First block is `E(IV)`.
    #[default]
    EncryptedIv,
    /// First block is the IV itself.
    PlainIv,
}

/// CBC mode bound to a borrowed cipher.
#[derive(Debug, Clone, Copy)]
pub struct Cbc<'a, C: BlockCipher> {
    cipher: &'a C,
    framing: IvFraming,
}

impl<'a, C: BlockCipher> Cbc<'a, C> {
    pub fn new(cipher: &'a C, framing: IvFraming) -> Self {
        Cbc { cipher, framing }
    }

    pub fn framing(&self) -> IvFraming {
        self.framing
    }

    /// Encrypts `plaintext` under a fresh IV from the operating system RNG.
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        let mut iv = vec![0u8; C::BLOCK_SIZE];
        OsRng.fill_bytes(&mut iv);
        // length matches BLOCK_SIZE by construction
        self.chain(plaintext, &iv)
    }

    /// Encrypts with a caller supplied IV, which must be exactly one block long.
    pub fn encrypt_with_iv(&self, plaintext: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        if iv.len() != C::BLOCK_SIZE {
            return Err(Error::invalid(format!(
                "IV must be {} bytes, got {}",
                C::BLOCK_SIZE,
                iv.len()
            )));
        }
        Ok(self.chain(plaintext, iv))
    }

    fn chain(&self, plaintext: &[u8], iv: &[u8]) -> Vec<u8> {
        let bs = C::BLOCK_SIZE;
        let padded = pad(plaintext, bs);

        let mut out = Vec::with_capacity(bs + padded.len());
        out.extend_from_slice(iv);
        if self.framing == IvFraming::EncryptedIv {
            self.cipher.encrypt_block(&mut out[..bs]);
        }

        let mut previous = iv.to_vec();
        for chunk in padded.chunks_exact(bs) {
            let mut block: Vec<u8> = chunk.iter().zip(&previous).map(|(p, v)| p ^ v).collect();
            self.cipher.encrypt_block(&mut block);
            out.extend_from_slice(&block);
            previous = block;
        }

        debug!(
            "cbc: encrypted {} bytes into {} ({:?})",
            plaintext.len(),
            out.len(),
            self.framing
        );
        out
    }

    /// Decrypts `IV block | ciphertext blocks` and strips the padding.
    ///
    /// A wrong key is not detected as such: it yields garbage that usually fails
    /// the padding check.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let bs = C::BLOCK_SIZE;
        if ciphertext.len() < 2 * bs {
            return Err(Error::invalid(format!(
                "Encrypted data is too short: {} bytes, need at least {}",
                ciphertext.len(),
                2 * bs
            )));
        }
        if ciphertext.len() % bs != 0 {
            return Err(Error::invalid(format!(
                "The length of the encrypted data must be a multiple of {} bytes",
                bs
            )));
        }

        let mut previous = ciphertext[..bs].to_vec();
        if self.framing == IvFraming::EncryptedIv {
            self.cipher.decrypt_block(&mut previous);
        }

        let mut plain = Vec::with_capacity(ciphertext.len() - bs);
        for chunk in ciphertext[bs..].chunks_exact(bs) {
            let mut block = chunk.to_vec();
            self.cipher.decrypt_block(&mut block);
            plain.extend(block.iter().zip(&previous).map(|(c, v)| c ^ v));
            previous.copy_from_slice(chunk);
        }

        unpad(plain, bs)
    }
}

/// Appends `n` bytes of value `n`; a full block when `data` is already aligned.
pub fn pad(data: &[u8], block_size: usize) -> Vec<u8> {
    let n = block_size - data.len() % block_size;
    let mut out = Vec::with_capacity(data.len() + n);
    out.extend_from_slice(data);
    out.resize(data.len() + n, n as u8);
    out
}

/// Validates and removes the padding written by [`pad`].
///
/// Only the final byte is checked, and it must lie in `[1, block_size]`.
pub fn unpad(mut data: Vec<u8>, block_size: usize) -> Result<Vec<u8>> {
    let n = match data.last() {
        Some(&n) => n as usize,
        None => return Err(Error::corrupted("no padding block")),
    };
    if n < 1 || n > block_size || n > data.len() {
        warn!("cbc: rejecting padding byte {}", n);
        return Err(Error::corrupted(format!("Incorrect padding byte {}", n)));
    }
    data.truncate(data.len() - n);
    Ok(data)
}
