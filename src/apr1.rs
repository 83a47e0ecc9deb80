//! The Apache `$apr1$` salted MD5 password-hash derivation.
//!
//! This is the algorithm behind `htpasswd -m` and Apache's `apr_md5_encode`:
//! a fixed 1000-round construction over MD5, salted with up to 8 bytes, whose
//! output is rendered as 22 characters of a crypt-specific base64 alphabet.
//! The construction (including its historically accidental bit-scan step) is
//! reproduced exactly; interoperability with existing credential files
//! requires bit-for-bit agreement, quirks included.

use crate::codec;
use crate::error::{Error, Result};
use crate::md5::{Md5, MD5_DIGEST_SIZE};

/// Number of rounds in the stretching loop, fixed by the format.
const ROUNDS: usize = 1000;

/// The crypt base64 alphabet. Note this is neither standard nor URL-safe
/// base64; the symbol order is the historical crypt(3) one.
const CRYPT_ALPHABET: &[u8; 64] =
    b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Digest byte indices in output order: five triples followed by the lone
/// trailing byte. Each triple becomes 4 output characters, the lone byte 2.
const ENCODE_ORDER: [[usize; 3]; 5] = [[0, 6, 12], [1, 7, 13], [2, 8, 14], [3, 9, 15], [4, 10, 5]];

/// Derives the 16-byte `$apr1$` digest for `password` and `salt`.
///
/// Only the first [`codec::SALT_MAX_LEN`] bytes of `salt` participate; any
/// excess is ignored, matching `apr_md5_encode`. An empty salt is valid. The
/// derivation is total: every `(password, salt)` pair yields a digest.
pub fn derive(password: &[u8], salt: &[u8]) -> [u8; MD5_DIGEST_SIZE] {
    let salt = &salt[..salt.len().min(codec::SALT_MAX_LEN)];

    // Seed digest over password, salt, password.
    let mut seed = Md5::new();
    seed.update(password);
    seed.update(salt);
    seed.update(password);
    let seed = seed.finalize();

    // Primary context: password, then the literal prefix, then the salt.
    let mut ctx = Md5::new();
    ctx.update(password);
    ctx.update(codec::APR1_PREFIX.as_bytes());
    ctx.update(salt);

    // One byte of the seed digest per password byte, fed in 16-byte chunks.
    let mut remaining = password.len();
    while remaining > 0 {
        let take = remaining.min(MD5_DIGEST_SIZE);
        ctx.update(&seed[..take]);
        remaining -= take;
    }

    // Scan the password length LSB-first: a zero byte for each 1 bit, the
    // first password byte for each 0 bit. This step is a historical accident
    // of the original implementation, kept for compatibility.
    let mut bits = password.len();
    while bits > 0 {
        if bits & 1 == 1 {
            ctx.update(&[0u8]);
        } else {
            ctx.update(&password[..1]);
        }
        bits >>= 1;
    }

    let mut digest = ctx.finalize();

    // Stretching: 1000 rounds, each re-hashing some permutation of the
    // password, salt, and previous digest chosen by the round index.
    for round in 0..ROUNDS {
        let mut ctx = Md5::new();

        if round & 1 == 1 {
            ctx.update(password);
        } else {
            ctx.update(&digest);
        }
        if round % 3 != 0 {
            ctx.update(salt);
        }
        if round % 7 != 0 {
            ctx.update(password);
        }
        if round & 1 == 1 {
            ctx.update(&digest);
        } else {
            ctx.update(password);
        }

        digest = ctx.finalize();
    }

    digest
}

/// Encodes a derived 16-byte digest as the 22-character crypt-base64 segment
/// of the hash string.
pub fn encode_digest(digest: &[u8; MD5_DIGEST_SIZE]) -> String {
    let mut out = String::with_capacity(codec::ENCODED_LEN);

    for [b0, b1, b2] in ENCODE_ORDER {
        // 24-bit packing as in apr_md5_encode, low 6 bits out first.
        let mut value = (digest[b0] as u32) << 16 | (digest[b1] as u32) << 8 | digest[b2] as u32;
        for _ in 0..4 {
            out.push(CRYPT_ALPHABET[(value & 0x3f) as usize] as char);
            value >>= 6;
        }
    }

    // The lone trailing byte yields two characters.
    let mut value = digest[11] as u32;
    for _ in 0..2 {
        out.push(CRYPT_ALPHABET[(value & 0x3f) as usize] as char);
        value >>= 6;
    }

    out
}

/// Hashes `password` with `salt` and returns the full
/// `$apr1$<salt>$<encoded>` string.
///
/// The salt is truncated to [`codec::SALT_MAX_LEN`] bytes before use. After
/// truncation it must consist of ASCII bytes other than `$`; anything else
/// cannot appear in the hash-string grammar (the produced string would not
/// re-parse) and is rejected before any hashing takes place.
pub fn encode_password(password: &[u8], salt: &[u8]) -> Result<String> {
    let salt = &salt[..salt.len().min(codec::SALT_MAX_LEN)];
    if salt.iter().any(|&b| b == b'$' || !b.is_ascii()) {
        return Err(Error::InvalidInput(
            "salt must contain only ASCII bytes other than '$'".to_string(),
        ));
    }

    let digest = derive(password, salt);
    let hash = codec::AprHash {
        // Checked ASCII above, so this cannot fail
        salt: String::from_utf8(salt.to_vec()).unwrap(),
        encoded: encode_digest(&digest),
    };
    Ok(hash.format())
}
