//! Password-level RC5 operations: text, raw bytes and files with metadata.
//!
//! Every call derives the key from the password, builds a fresh key schedule
//! and runs CBC with the configured IV framing.

use log::{debug, warn};

use crate::cs::security::cbc::{Cbc, IvFraming};
use crate::cs::security::kdf::{derive_key, KeySize};
use crate::cs::security::metadata::{open_with_metadata, seal_with_metadata, split_file_name, FileMetadata};
use crate::cs::security::rc5::{Rc5, RC5_DEFAULT_ROUNDS};
use crate::error::Result;

/// Extension given to encrypted file downloads.
pub const ENCRYPTED_FILE_EXTENSION: &str = "rc5encrypted";

/// Configuration for [`Rc5Service`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rc5Config {
    pub key_size: KeySize,
    pub rounds: u8,
    pub framing: IvFraming,
}

impl Default for Rc5Config {
    fn default() -> Self {
        Rc5Config {
            key_size: KeySize::Bits128,
            rounds: RC5_DEFAULT_ROUNDS,
            framing: IvFraming::EncryptedIv,
        }
    }
}

impl Rc5Config {
    pub fn with_key_size(key_size: KeySize) -> Self {
        Rc5Config {
            key_size,
            ..Default::default()
        }
    }
}

/// Stateless front end over key derivation, RC5 and CBC.
#[derive(Debug, Clone, Default)]
pub struct Rc5Service {
    config: Rc5Config,
}

impl Rc5Service {
    pub fn new(config: Rc5Config) -> Self {
        Rc5Service { config }
    }

    pub fn config(&self) -> &Rc5Config {
        &self.config
    }

    fn cipher(&self, password: &str) -> Result<Rc5> {
        Rc5::with_rounds(&derive_key(password, self.config.key_size), self.config.rounds)
    }

    pub fn encrypt_text(&self, text: &str, password: &str) -> Result<Vec<u8>> {
        self.encrypt_bytes(text.as_bytes(), password)
    }

    /// Decrypts and checks that the result is UTF-8.
    pub fn decrypt_text(&self, ciphertext: &[u8], password: &str) -> Result<String> {
        let plain = self.decrypt_bytes(ciphertext, password)?;
        Ok(String::from_utf8(plain)?)
    }

    pub fn encrypt_bytes(&self, data: &[u8], password: &str) -> Result<Vec<u8>> {
        let rc5 = self.cipher(password)?;
        Ok(Cbc::new(&rc5, self.config.framing).encrypt(data))
    }

    pub fn decrypt_bytes(&self, ciphertext: &[u8], password: &str) -> Result<Vec<u8>> {
        let rc5 = self.cipher(password)?;
        Cbc::new(&rc5, self.config.framing)
            .decrypt(ciphertext)
            .inspect_err(|e| warn!("rc5: decryption failed: {}", e))
    }

    /// Encrypts `data` into a metadata envelope remembering `file_name`.
    pub fn encrypt_file(&self, data: &[u8], file_name: &str, password: &str) -> Result<Vec<u8>> {
        let rc5 = self.cipher(password)?;
        let metadata = FileMetadata::describe(file_name, data, self.config.key_size);
        debug!("rc5: encrypting file {:?} ({} bytes)", file_name, data.len());
        seal_with_metadata(&Cbc::new(&rc5, self.config.framing), data, &metadata)
    }

    /// Opens an envelope produced by [`Rc5Service::encrypt_file`].
    pub fn decrypt_file(&self, envelope: &[u8], password: &str) -> Result<(Vec<u8>, FileMetadata)> {
        let rc5 = self.cipher(password)?;
        open_with_metadata(&Cbc::new(&rc5, self.config.framing), envelope)
            .inspect_err(|e| warn!("rc5: failed to open file envelope: {}", e))
    }
}

/// Download name for an encrypted file: `report.pdf` becomes `report.rc5encrypted`.
pub fn encrypted_file_name(file_name: &str) -> String {
    let (stem, _) = split_file_name(file_name);
    format!("{}.{}", stem, ENCRYPTED_FILE_EXTENSION)
}

/// MIME type for a restored file, looked up by extension (with or without the dot).
pub fn content_type_for(extension: &str) -> &'static str {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "zip" => "application/zip",
        "rar" => "application/x-rar-compressed",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}
