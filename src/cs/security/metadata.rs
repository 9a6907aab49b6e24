//! File envelopes: an encrypted metadata record followed by the encrypted payload.
//!
//! ```text
//! u32 LE  metadata ciphertext length
//! [..]    metadata ciphertext  (CBC, own random IV)
//! [..]    payload ciphertext   (CBC, own random IV)
//! ```
//!
//! The metadata record is a UTF-8 JSON object.

use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cs::security::cbc::{BlockCipher, Cbc};
use crate::cs::security::kdf::KeySize;
use crate::error::{Error, Result};

const LENGTH_PREFIX: usize = 4;

/// What is remembered about an encrypted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileMetadata {
    /// File name without its extension.
    pub original_file_name: String,
    /// Extension including the leading dot, or empty.
    pub original_extension: String,
    pub original_size: u64,
    /// Seconds since the Unix epoch.
    pub encrypted_at: u64,
    /// Key size in bits.
    pub key_size: u32,
}

impl FileMetadata {
    /// Describes `data` about to be encrypted under `file_name`.
    pub fn describe(file_name: &str, data: &[u8], key_size: KeySize) -> Self {
        let (stem, extension) = split_file_name(file_name);
        let encrypted_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        FileMetadata {
            original_file_name: stem,
            original_extension: extension,
            original_size: data.len() as u64,
            encrypted_at,
            key_size: key_size.bits(),
        }
    }

    /// The original name, `stem + extension`.
    pub fn file_name(&self) -> String {
        format!("{}{}", self.original_file_name, self.original_extension)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Splits `dir/report.final.pdf` into `("report.final", ".pdf")`.
///
/// Everything from the last dot is the extension, so `.bashrc` has an empty stem
/// and extension `.bashrc`. A trailing dot yields an empty extension.
pub fn split_file_name(file_name: &str) -> (String, String) {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match name.rfind('.') {
        Some(i) if i + 1 == name.len() => (name[..i].to_string(), String::new()),
        Some(i) => (name[..i].to_string(), name[i..].to_string()),
        None => (name.to_string(), String::new()),
    }
}

/// Encrypts the metadata and the payload independently and frames them together.
pub fn seal_with_metadata<C: BlockCipher>(
    cbc: &Cbc<'_, C>,
    data: &[u8],
    metadata: &FileMetadata,
) -> Result<Vec<u8>> {
    let sealed_meta = cbc.encrypt(&metadata.to_bytes()?);
    let sealed_data = cbc.encrypt(data);

    let meta_len = u32::try_from(sealed_meta.len())
        .map_err(|_| Error::invalid("file metadata is too large to frame"))?;

    let mut out = Vec::with_capacity(LENGTH_PREFIX + sealed_meta.len() + sealed_data.len());
    out.extend_from_slice(&meta_len.to_le_bytes());
    out.extend_from_slice(&sealed_meta);
    out.extend_from_slice(&sealed_data);

    debug!(
        "envelope: {} metadata + {} payload ciphertext bytes",
        sealed_meta.len(),
        sealed_data.len()
    );
    Ok(out)
}

/// Splits an envelope, decrypts both parts and parses the metadata.
pub fn open_with_metadata<C: BlockCipher>(
    cbc: &Cbc<'_, C>,
    envelope: &[u8],
) -> Result<(Vec<u8>, FileMetadata)> {
    if envelope.len() < LENGTH_PREFIX {
        return Err(Error::invalid(format!(
            "Envelope is too short: {} bytes",
            envelope.len()
        )));
    }
    let (prefix, rest) = envelope.split_at(LENGTH_PREFIX);
    let meta_len = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
    if meta_len > rest.len() {
        return Err(Error::corrupted(format!(
            "metadata length {} points past the end of a {}-byte envelope",
            meta_len,
            envelope.len()
        )));
    }

    let (sealed_meta, sealed_data) = rest.split_at(meta_len);
    let metadata = FileMetadata::from_bytes(&cbc.decrypt(sealed_meta)?)?;
    let data = cbc.decrypt(sealed_data)?;
    Ok((data, metadata))
}
