//! Short identifiers for entries.
//!
//! Ids are 6 characters over `0-9a-z`, drawn from a non-cryptographic PRNG.
//! They are short enough to type from a printed label and carry no
//! uniqueness guarantee of their own.

use rand::Rng;

/// Length of a short id.
pub const SHORT_ID_LEN: usize = 6;

/// Base-36 alphabet, digits first.
pub const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a short id from the thread-local generator.
#[must_use]
pub fn generate_short_id() -> String {
    generate_short_id_with(&mut rand::rng())
}

/// Generate a short id from the given generator.
pub fn generate_short_id_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SHORT_ID_LEN)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect()
}

/// Check whether `s` has the shape of a short id.
#[must_use]
pub fn is_short_id(s: &str) -> bool {
    s.len() == SHORT_ID_LEN && s.bytes().all(|b| ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_generated_id_shape() {
        for _ in 0..200 {
            let id = generate_short_id();
            assert_eq!(id.len(), SHORT_ID_LEN);
            assert!(is_short_id(&id), "bad id: {id}");
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = generate_short_id_with(&mut StdRng::seed_from_u64(7));
        let b = generate_short_id_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_ids_vary() {
        let mut rng = StdRng::seed_from_u64(42);
        let ids: std::collections::HashSet<String> =
            (0..50).map(|_| generate_short_id_with(&mut rng)).collect();
        assert!(ids.len() > 45);
    }

    #[test]
    fn test_alphabet_is_base36() {
        assert_eq!(ALPHABET.len(), 36);
        assert!(ALPHABET.iter().all(u8::is_ascii_alphanumeric));
        assert!(!ALPHABET.iter().any(u8::is_ascii_uppercase));
    }

    #[test]
    fn test_is_short_id() {
        assert!(is_short_id("a1b2c3"));
        assert!(is_short_id("000000"));
        assert!(!is_short_id("A1B2C3"));
        assert!(!is_short_id("a1b2c"));
        assert!(!is_short_id("a1b2c3d"));
        assert!(!is_short_id("a1-2c3"));
        assert!(!is_short_id(""));
    }
}
