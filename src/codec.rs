//! Formatting and parsing of the `$apr1$<salt>$<encoded>` hash string.
//!
//! The grammar is strict: the literal prefix, 0 to 8 non-`$` salt characters,
//! a `$` delimiter, and exactly 22 trailing characters — nothing more,
//! nothing less. Anything that deviates is "not an apr1 hash", which is a
//! negative parse result, never an error.

/// The literal prefix identifying the Apache-modified MD5 crypt format.
pub const APR1_PREFIX: &str = "$apr1$";

/// Maximum number of salt bytes that participate in the derivation.
pub const SALT_MAX_LEN: usize = 8;

/// Length of the encoded digest segment of the hash string.
pub const ENCODED_LEN: usize = 22;

/// A parsed `$apr1$` hash string: the salt and the encoded digest segment.
///
/// Values of this type only exist for well-formed hash strings;
/// [`AprHash::parse`] never constructs one from input that fails the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AprHash {
    /// Salt segment, 0 to 8 non-`$` ASCII characters.
    pub salt: String,
    /// Encoded digest segment, exactly 22 characters.
    pub encoded: String,
}

impl AprHash {
    /// Renders the hash in its external form: `$apr1$<salt>$<encoded>`.
    pub fn format(&self) -> String {
        format!("{}{}${}", APR1_PREFIX, self.salt, self.encoded)
    }

    /// Parses a hash string, returning `None` unless it matches the grammar
    /// `^\$apr1\$([^$]{0,8})\$(.{22})$` exactly.
    ///
    /// Rejected inputs include a wrong, empty, or overlong prefix, a missing
    /// salt delimiter, a salt longer than 8 characters, an encoded segment
    /// that is not exactly 22 characters, trailing data, and the empty
    /// string. The grammar is defined over the ASCII hash alphabet, so
    /// non-ASCII input never matches.
    pub fn parse(hash: &str) -> Option<Self> {
        if !hash.is_ascii() {
            return None;
        }

        let rest = hash.strip_prefix(APR1_PREFIX)?;

        // The salt runs up to the next '$', which must appear within the
        // first SALT_MAX_LEN + 1 bytes.
        let delim = rest.find('$')?;
        if delim > SALT_MAX_LEN {
            return None;
        }

        let (salt, encoded) = (&rest[..delim], &rest[delim + 1..]);
        if encoded.len() != ENCODED_LEN {
            return None;
        }

        Some(AprHash {
            salt: salt.to_string(),
            encoded: encoded.to_string(),
        })
    }
}
