//! Teaching implementations of a few classic cryptographic building blocks.
//!
//! Nothing here delegates to a platform crypto library:
//!
//! - [`cs::security::md5`]: a streaming MD5 digest.
//! - [`cs::security::rc5`]: RC5-32 with a 20 round default, plus CBC
//!   chaining ([`cs::security::cbc`]) and passphrase key derivation.
//! - [`cs::randomized`]: linear congruential generators with period and
//!   coprimality analysis.
//!
//! None of it is fit for protecting real data.

pub mod cs;
pub mod error;

pub use cs::{randomized, security};
pub use error::{Error, Result};
