//! Validation of plaintext passwords against `$apr1$` hash strings.

use constant_time_eq::constant_time_eq;

use crate::apr1;
use crate::codec::AprHash;

/// Checks whether `password` is the password behind `hash`.
///
/// The hash string is parsed against the strict `$apr1$<salt>$<encoded>`
/// grammar first; a malformed hash is simply not a match (`false`, never an
/// error) and no derivation is attempted for it. For a well-formed hash the
/// derivation is recomputed with the parsed salt and the encoded segments are
/// compared in constant time, so the outcome's timing does not leak how much
/// of the encoded segment matched.
pub fn validate_password(password: &[u8], hash: &str) -> bool {
    let parsed = match AprHash::parse(hash) {
        Some(parsed) => parsed,
        None => return false,
    };

    let digest = apr1::derive(password, parsed.salt.as_bytes());
    let encoded = apr1::encode_digest(&digest);

    // Both sides are exactly ENCODED_LEN bytes here.
    constant_time_eq(encoded.as_bytes(), parsed.encoded.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_succeeds() {
        assert!(validate_password(
            b"foo",
            "$apr1$mYJd83wW$IO.6aK3G0d4mHxcImhPX50"
        ));
    }

    #[test]
    fn test_validate_fails_for_wrong_password() {
        assert!(!validate_password(
            b"bar",
            "$apr1$mYJd83wW$IO.6aK3G0d4mHxcImhPX50"
        ));
        assert!(!validate_password(
            b"foo",
            "$apr1$mYJd83wW$xxxxxxxxxxxxxxxxxxxxxx"
        ));
    }

    #[test]
    fn test_validate_empty_password() {
        assert!(validate_password(b"", "$apr1$7n4Iu7Bq$jsH1cRc.tyRPvJpZjxUjV."));
        assert!(!validate_password(b"x", "$apr1$7n4Iu7Bq$jsH1cRc.tyRPvJpZjxUjV."));
    }

    #[test]
    fn test_validate_empty_salt() {
        assert!(validate_password(b"foo", "$apr1$$vGRl2mLvDG8pptkZ9Cyum."));
    }

    #[test]
    fn test_validate_any_single_character_change_fails() {
        let good = "$apr1$mYJd83wW$IO.6aK3G0d4mHxcImhPX50";
        let encoded_start = good.len() - 22;
        for i in encoded_start..good.len() {
            let mut bad = good.to_string().into_bytes();
            bad[i] = if bad[i] == b'z' { b'a' } else { b'z' };
            let bad = String::from_utf8(bad).unwrap();
            assert!(!validate_password(b"foo", &bad), "accepted {bad}");
        }
    }

    #[test]
    fn test_validate_malformed_hash_is_false_not_error() {
        let malformed = [
            "$apr2$mYJd83wW$IO.6aK3G0d4mHxcImhPX50",
            "$$mYJd83wW$IO.6aK3G0d4mHxcImhPX50",
            "mYJd83wW$IO.6aK3G0d4mHxcImhPX50",
            "$apr1234567890$mYJd83wW$IO.6aK3G0d4mHxcImhPX50",
            "$apr1$vGRl2mLvDG8pptkZ9Cyum.",
            "$apr1$mYJd83wW9876543210$IO.6aK3G0d4mHxcImhPX50",
            "$apr1$mYJd83wW$",
            "$apr1$mYJd83wW",
            "$apr1$mYJd83wW$IO.6aK3G0d4mHxcImhPX501234567890",
            "",
        ];
        for hash in malformed {
            assert!(!validate_password(b"foo", hash), "accepted {hash:?}");
        }
    }

    #[test]
    fn test_validate_round_trip_with_encoder() {
        let hash = apr1::encode_password(b"hunter2", b"NaCl").unwrap();
        assert!(validate_password(b"hunter2", &hash));
        assert!(!validate_password(b"hunter3", &hash));
    }

    #[test]
    fn test_validate_is_case_sensitive() {
        let hash = apr1::encode_password(b"Secret", b"saltsalt").unwrap();
        assert!(validate_password(b"Secret", &hash));
        assert!(!validate_password(b"secret", &hash));
    }
}
