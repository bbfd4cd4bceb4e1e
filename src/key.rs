//! Access code generation and keyword validation.

use Error;
use data_encoding::HEXLOWER;
use rand::{thread_rng, Rng};

/// Random bytes behind a generated code; hex-encoded they make an
/// 8-character string, which spans 16^8 possible codes.
const CODE_BYTES: usize = 4;

/// Longest keyword accepted from a caller.
const MAX_KEY_LEN: usize = 64;

/// Generates a fresh access code: 8 lowercase hexadecimal characters,
/// uniformly distributed.
pub fn generate() -> String {
    let bytes: [u8; CODE_BYTES] = thread_rng().gen();
    HEXLOWER.encode(&bytes)
}

/// Checks that a key is usable as a keyword.
///
/// Keys end up as file names in the filesystem backend, so only
/// `[0-9A-Za-z_-]` is accepted, up to 64 characters. Generated codes
/// pass by construction.
pub fn validate(key: &str) -> Result<(), Error> {
    let usable = !key.is_empty() && key.len() <= MAX_KEY_LEN
                 && key.bytes()
                       .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if usable {
        Ok(())
    } else {
        Err(Error::InvalidKey(key.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_codes_are_8_hex_chars() {
        for _ in 0..10_000 {
            let code = generate();
            assert_eq!(8, code.len(), "Bad code {:?}", code);
            assert!(code.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()),
                    "Bad code {:?}",
                    code);
        }
    }

    #[test]
    fn generated_codes_dont_repeat_much() {
        // With 16^8 possible codes a repetition among 10k draws is already
        // a rarity; more than a couple would mean a broken generator.
        let draws: HashSet<_> = (0..10_000).map(|_| generate()).collect();
        assert!(draws.len() >= 9_998, "Too many collisions: {}", 10_000 - draws.len());
    }

    #[test]
    fn generated_codes_pass_validation() {
        for _ in 0..100 {
            validate(&generate()).unwrap();
        }
    }

    #[test]
    fn reasonable_keywords_pass() {
        validate("notes").unwrap();
        validate("my-stuff_2").unwrap();
        validate("A").unwrap();
    }

    #[test]
    fn bad_keywords_are_rejected() {
        for bad in &["", " ", "a b", "a/b", "../etc", "a.b", "ключ", "q?x"] {
            match validate(bad) {
                Err(Error::InvalidKey(_)) => {}
                x => panic!("Keyword {:?} should be rejected, got {:?}", bad, x),
            }
        }
    }

    #[test]
    fn overlong_keywords_are_rejected() {
        let long: String = (0..65).map(|_| 'a').collect();
        assert!(validate(&long).is_err());
        let just_fits: String = (0..64).map(|_| 'a').collect();
        validate(&just_fits).unwrap();
    }
}
