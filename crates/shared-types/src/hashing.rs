//! Permit hashing.
//!
//! The ledger only ever stores `sha256(secret)` as lowercase hex. Voters keep
//! the secret; the tally never sees either.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a permit secret.
pub fn permit_hash(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_vector() {
        assert_eq!(
            permit_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_distinct_secrets_distinct_hashes() {
        assert_ne!(permit_hash("secret1"), permit_hash("secret2"));
        assert_eq!(permit_hash("secret1").len(), 64);
    }

    proptest! {
        #[test]
        fn prop_hash_is_lowercase_hex(secret in ".{1,64}") {
            let hash = permit_hash(&secret);
            prop_assert_eq!(hash.len(), 64);
            prop_assert!(hash.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
            prop_assert_ne!(hash, secret);
        }
    }
}
