//! Key derivation.
//!
//! The key is a SHA-512 digest chain seeded by `master_seed XOR (salt ‖
//! signer)`, with the round count chosen deterministically from the salt.
//! Identical inputs must always yield an identical key; decoding depends on
//! reproducing encode-time derivation bit for bit.

use super::KEY_LEN;
use crate::config::Config;
use crate::error::CredError;
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

/// Derives the 64-byte symmetric key from seed, salt, signer, and config.
///
/// The XOR step cycles the shorter of seed and `salt ‖ signer` against the
/// longer one; the output keeps the longer length. Changing this
/// reconciliation rule breaks every previously issued credential string.
///
/// # Errors
///
/// Fails if the seed is empty.
pub fn derive_key(
    seed: &[u8],
    salt: &[u8],
    signer: &str,
    config: &Config,
) -> Result<[u8; KEY_LEN], CredError> {
    if seed.is_empty() {
        return Err(CredError::Encode(
            "cannot derive key from an empty master seed".to_string(),
        ));
    }

    let mut mask = Vec::with_capacity(salt.len() + signer.len());
    mask.extend_from_slice(salt);
    mask.extend_from_slice(signer.as_bytes());

    let (long, short) = if seed.len() >= mask.len() {
        (seed, mask.as_slice())
    } else {
        (mask.as_slice(), seed)
    };
    let input: Zeroizing<Vec<u8>> = Zeroizing::new(
        long.iter()
            .enumerate()
            .map(|(i, &b)| b ^ short[i % short.len()])
            .collect(),
    );

    let mut digest = Sha512::digest(input.as_slice());
    for _ in 1..hash_rounds(salt, config) {
        digest = Sha512::digest(digest);
    }

    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&digest);
    Ok(key)
}

/// Round count in `[min, max]`, driven by the salt interpreted as a
/// big-endian integer. The reduction is done incrementally so arbitrary salt
/// lengths never overflow.
fn hash_rounds(salt: &[u8], config: &Config) -> u32 {
    let span = u64::from(config.max_hash_rounds() - config.min_hash_rounds()) + 1;
    let residue = salt
        .iter()
        .fold(0u64, |acc, &b| ((acc << 8) | u64::from(b)) % span);
    config.min_hash_rounds() + residue as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let config = Config::default();
        let seed = [42u8; 32];

        let k1 = derive_key(&seed, b"saltsaltsalt", "tester", &config).unwrap();
        let k2 = derive_key(&seed, b"saltsaltsalt", "tester", &config).unwrap();

        assert_eq!(k1, k2);
    }

    #[test]
    fn empty_seed_fails() {
        let config = Config::default();
        match derive_key(&[], b"saltsaltsalt", "tester", &config) {
            Err(CredError::Encode(_)) => {}
            other => panic!("expected Encode error, got: {other:?}"),
        }
    }

    #[test]
    fn signer_changes_key() {
        let config = Config::default();
        let seed = [42u8; 32];

        let k1 = derive_key(&seed, b"saltsaltsalt", "alice", &config).unwrap();
        let k2 = derive_key(&seed, b"saltsaltsalt", "bob", &config).unwrap();

        assert_ne!(k1, k2);
    }

    #[test]
    fn salt_changes_key() {
        let config = Config::default();
        let seed = [42u8; 32];

        let k1 = derive_key(&seed, b"saltsaltsal1", "tester", &config).unwrap();
        let k2 = derive_key(&seed, b"saltsaltsal2", "tester", &config).unwrap();

        assert_ne!(k1, k2);
    }

    #[test]
    fn mask_longer_than_seed_cycles_seed() {
        let config = Config::default();
        // 2-byte seed against a 12-byte salt plus signer; the seed is the
        // cycled side here.
        let k = derive_key(b"ab", b"saltsaltsalt", "averylongsignername", &config).unwrap();
        assert_eq!(k.len(), KEY_LEN);
    }

    #[test]
    fn rounds_stay_within_bounds() {
        let config = Config::new(12, 3, 24).unwrap();
        for fill in 0u8..=255 {
            let salt = [fill; 12];
            let rounds = hash_rounds(&salt, &config);
            assert!((3..=24).contains(&rounds), "rounds out of range: {rounds}");
        }
    }

    #[test]
    fn degenerate_round_span_is_constant() {
        let config = Config::new(12, 5, 5).unwrap();
        assert_eq!(hash_rounds(b"anythingatall", &config), 5);
    }

    #[test]
    fn rounds_follow_big_endian_salt_value() {
        let config = Config::new(12, 1, 8).unwrap();
        // span = 8; one trailing byte decides the residue since 256 % 8 == 0
        assert_eq!(hash_rounds(&[0, 0, 0, 0], &config), 1);
        assert_eq!(hash_rounds(&[0, 0, 0, 5], &config), 6);
    }
}
