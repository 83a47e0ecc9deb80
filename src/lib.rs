//! Apache-style `$apr1$` salted MD5 password hashing.
//!
//! This crate reimplements the MD5 routines of the Apache Portable Runtime
//! utility library: hashing a password into the `$apr1$<salt>$<encoded>`
//! crypt format (as produced by `htpasswd -m`) and validating a plaintext
//! candidate against such a hash. The incremental [`Md5`] digest engine the
//! derivation is built on is exposed as well.
//!
//! MD5 is used here strictly for byte-for-byte compatibility with existing
//! Apache credential files, not for its (long since broken) cryptographic
//! strength. Do not use this format for new systems.
//!
//! ```
//! use aprmd5::{encode_password, validate_password};
//!
//! let hash = encode_password(b"foo", b"mYJd83wW").unwrap();
//! assert_eq!(hash, "$apr1$mYJd83wW$IO.6aK3G0d4mHxcImhPX50");
//! assert!(validate_password(b"foo", &hash));
//! assert!(!validate_password(b"bar", &hash));
//! ```

pub mod apr1;
pub mod codec;
pub mod error;
pub mod md5;
pub mod validate;

// Re-export the error type
pub use error::{Error, Result};

// Re-export MD5 digest engine functionality
pub use md5::{md5_digest, md5_hex, Md5, MD5_BLOCK_SIZE, MD5_DIGEST_SIZE};

// Re-export apr1 derivation functionality
pub use apr1::{derive, encode_digest, encode_password};

// Re-export hash string format functionality
pub use codec::{AprHash, APR1_PREFIX, ENCODED_LEN, SALT_MAX_LEN};

// Re-export password validation functionality
pub use validate::validate_password;
