//! Encode/decode engine for credential strings.
//!
//! Pipeline: a fresh salt and the master seed feed key derivation, the
//! username/password pair is framed into a byte message, transformed with a
//! bit-reorder plus key-stream XOR, and wrapped in a base64 envelope that
//! carries the salt as a positional header.

pub mod envelope;
pub mod kdf;
pub mod message;

pub use kdf::derive_key;

use crate::config::Config;
use crate::error::CredError;
use getrandom::fill;
use zeroize::Zeroizing;

/// Length of the derived key (64 bytes, one SHA-512 digest).
pub const KEY_LEN: usize = 64;

/// Characters eligible for salt bytes. A subset of the base64 alphabet, so
/// the plaintext salt header blends into the encoded body.
const SALT_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates a fresh random salt of `len` bytes from the salt alphabet.
///
/// Uses rejection sampling over OS randomness so every alphabet character is
/// equally likely.
pub fn generate_salt(len: usize) -> Result<Vec<u8>, CredError> {
    let mut salt = Vec::with_capacity(len);
    let mut buf = [0u8; 32];
    while salt.len() < len {
        fill(&mut buf)
            .map_err(|_| CredError::Encode("OS random generator unavailable".to_string()))?;
        for b in buf {
            // 248 is the largest multiple of 62 below 256; anything above
            // it would bias the draw.
            if b < 248 {
                salt.push(SALT_ALPHABET[(b % 62) as usize]);
                if salt.len() == len {
                    break;
                }
            }
        }
    }
    Ok(salt)
}

/// Encodes a username/password pair into a credential string.
///
/// Draws a fresh random salt, so two encodes of the same inputs produce
/// different strings that decode to the same pair.
///
/// # Errors
///
/// `InvalidData` for non-ASCII or over-long fields (checked before any
/// cryptographic work), `Encode` for anything that fails afterwards.
pub fn encode(
    seed: &[u8],
    username: &str,
    password: &str,
    signer: &str,
    config: &Config,
) -> Result<String, CredError> {
    message::validate(username, "username")?;
    message::validate(password, "password")?;

    let salt = generate_salt(config.salt_len())?;
    let key = kdf::derive_key(seed, &salt, signer, config)?;

    let plaintext = Zeroizing::new(message::frame(&salt, username, password));
    let cipher = message::transform(&plaintext, &key);

    Ok(envelope::render(&salt, &cipher))
}

/// Decodes a credential string back into `(username, password)`.
///
/// The salt recovered from inside the decrypted message must match the
/// envelope's header salt; that equality is the only tamper/wrong-key
/// detector in the scheme.
///
/// # Errors
///
/// `Decode` for malformed base64, truncated buffers, out-of-range length
/// bytes, or a salt mismatch (wrong seed, wrong signer, or corruption).
pub fn decode(
    seed: &[u8],
    credentials: &str,
    signer: &str,
    config: &Config,
) -> Result<(String, Zeroizing<String>), CredError> {
    let (salt, cipher) = envelope::parse(credentials, config.salt_len())?;

    let key = kdf::derive_key(seed, &salt, signer, config)
        .map_err(|_| CredError::Decode("unable to derive key for decode".to_string()))?;

    let plaintext = Zeroizing::new(message::untransform(&cipher, &key));
    let (embedded_salt, username, password) = message::unframe(&plaintext, config.salt_len())?;

    if embedded_salt != salt {
        return Err(CredError::Decode(
            "salt mismatch: wrong seed, wrong signer, or corrupted credential string".to_string(),
        ));
    }

    Ok((username, password))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn encode_decode_roundtrip() {
        let config = Config::default();
        let creds = encode(SEED, "alice", "s3cret!", "tester", &config).unwrap();

        let (username, password) = decode(SEED, &creds, "tester", &config).unwrap();
        assert_eq!(username, "alice");
        assert_eq!(password.as_str(), "s3cret!");
    }

    #[test]
    fn fresh_salt_per_encode() {
        let config = Config::default();
        let a = encode(SEED, "alice", "s3cret!", "tester", &config).unwrap();
        let b = encode(SEED, "alice", "s3cret!", "tester", &config).unwrap();

        assert_ne!(a, b);

        let (ua, pa) = decode(SEED, &a, "tester", &config).unwrap();
        let (ub, pb) = decode(SEED, &b, "tester", &config).unwrap();
        assert_eq!((ua, pa.as_str().to_string()), (ub, pb.as_str().to_string()));
    }

    #[test]
    fn wrong_signer_is_rejected() {
        let config = Config::default();
        let creds = encode(SEED, "alice", "s3cret!", "a", &config).unwrap();

        match decode(SEED, &creds, "b", &config) {
            Err(CredError::Decode(_)) => {}
            other => panic!("expected Decode error, got: {other:?}"),
        }
    }

    #[test]
    fn wrong_seed_is_rejected() {
        let config = Config::default();
        let creds = encode(SEED, "alice", "s3cret!", "tester", &config).unwrap();

        let other_seed = [7u8; 32];
        match decode(&other_seed, &creds, "tester", &config) {
            Err(CredError::Decode(_)) => {}
            other => panic!("expected Decode error, got: {other:?}"),
        }
    }

    #[test]
    fn empty_fields_roundtrip() {
        let config = Config::default();
        let creds = encode(SEED, "", "", "tester", &config).unwrap();
        let (username, password) = decode(SEED, &creds, "tester", &config).unwrap();
        assert_eq!(username, "");
        assert_eq!(password.as_str(), "");
    }

    #[test]
    fn max_length_fields_roundtrip() {
        let config = Config::default();
        let long = "x".repeat(255);
        let creds = encode(SEED, &long, &long, "tester", &config).unwrap();
        let (username, password) = decode(SEED, &creds, "tester", &config).unwrap();
        assert_eq!(username, long);
        assert_eq!(password.as_str(), long);
    }

    #[test]
    fn overlong_username_fails_before_crypto() {
        let config = Config::default();
        let long = "x".repeat(256);
        // An empty seed would fail key derivation, so reaching InvalidData
        // proves validation ran first.
        match encode(&[], &long, "pw", "tester", &config) {
            Err(CredError::InvalidData(_)) => {}
            other => panic!("expected InvalidData error, got: {other:?}"),
        }
    }

    #[test]
    fn non_ascii_input_fails() {
        let config = Config::default();
        match encode(SEED, "u\u{00e9}ser", "pw", "tester", &config) {
            Err(CredError::InvalidData(_)) => {}
            other => panic!("expected InvalidData error, got: {other:?}"),
        }
    }

    #[test]
    fn password_may_contain_separator() {
        let config = Config::default();
        let creds = encode(SEED, "alice", "pa;ss;word", "tester", &config).unwrap();
        let (_, password) = decode(SEED, &creds, "tester", &config).unwrap();
        assert_eq!(password.as_str(), "pa;ss;word");
    }

    #[test]
    fn concrete_scenario_fixed_seed() {
        let config = Config::default();
        let creds = encode(SEED, "alice", "s3cret!", "tester", &config).unwrap();

        // salt(12) + framed message (12 + 1 + 5 + 1 + 7 = 26) base64-encoded
        let raw_len = config.salt_len() + config.salt_len() + 1 + 5 + 1 + 7;
        assert_eq!(creds.len(), raw_len.div_ceil(3) * 4);

        let (username, password) = decode(SEED, &creds, "tester", &config).unwrap();
        assert_eq!(username, "alice");
        assert_eq!(password.as_str(), "s3cret!");

        assert!(matches!(
            decode(SEED, &creds, "mallory", &config),
            Err(CredError::Decode(_))
        ));
    }

    #[test]
    fn generated_salt_stays_in_alphabet() {
        let salt = generate_salt(64).unwrap();
        assert_eq!(salt.len(), 64);
        assert!(salt.iter().all(|b| SALT_ALPHABET.contains(b)));
    }
}
