pub mod cbc;
pub mod kdf;
pub mod md5;
pub mod metadata;
pub mod rc5;
pub mod rc5_service;

// Re-export MD5 functionality
pub use md5::{md5_digest, md5_hex, DigestEngine, Md5, MD5_OUTPUT_SIZE};

// Re-export key derivation
pub use kdf::{derive_key, derive_key_bits, KeySize};

// Re-export RC5 and CBC functionality
pub use cbc::{BlockCipher, Cbc, IvFraming};
pub use rc5::{Rc5, RC5_BLOCK_SIZE, RC5_DEFAULT_ROUNDS};

// Re-export file envelope functionality
pub use metadata::{open_with_metadata, seal_with_metadata, FileMetadata};
pub use rc5_service::{content_type_for, encrypted_file_name, Rc5Config, Rc5Service};
