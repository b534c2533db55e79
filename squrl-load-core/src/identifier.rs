//! Random alphanumeric codes matching the service's short-code format

use crate::error::{ProbeError, Result};
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// The 62-character code alphabet
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of codes submitted as `custom_code` on create
pub const CUSTOM_CODE_LEN: usize = 8;

/// Length of codes the service generates itself
pub const SHORT_CODE_LEN: usize = 6;

/// Fixed-length code over [`ALPHABET`]. Uniqueness is not guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn generate(len: usize) -> Self {
        Self::generate_with(&mut rand::rng(), len)
    }

    /// Draw each character uniformly from [`ALPHABET`]
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Self {
        let code = (0..len)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    pub fn custom_code() -> Self {
        Self::generate(CUSTOM_CODE_LEN)
    }

    pub fn short_code() -> Self {
        Self::generate(SHORT_CODE_LEN)
    }

    /// Accept `value` only if it has exactly `len` alphabet characters
    pub fn parse(value: &str, len: usize) -> Result<Self> {
        if value.len() == len && value.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Ok(Self(value.to_string()))
        } else {
            Err(ProbeError::MalformedIdentifier {
                value: value.to_string(),
                expected_len: len,
            })
        }
    }

    /// Re-check the format contract, returning the identifier unchanged
    pub fn validated(self, len: usize) -> Result<Self> {
        Self::parse(&self.0, len)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_generated_length_and_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in [0, 1, SHORT_CODE_LEN, CUSTOM_CODE_LEN, 32] {
            for _ in 0..200 {
                let id = Identifier::generate_with(&mut rng, len);
                assert_eq!(id.as_str().len(), len);
                assert!(id.as_str().bytes().all(|b| ALPHABET.contains(&b)));
            }
        }
        assert_eq!(Identifier::custom_code().as_str().len(), 8);
        assert_eq!(Identifier::short_code().as_str().len(), 6);
    }

    #[test]
    fn test_every_character_appears_at_every_position() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen: Vec<HashSet<u8>> = vec![HashSet::new(); SHORT_CODE_LEN];

        for _ in 0..10_000 {
            let id = Identifier::generate_with(&mut rng, SHORT_CODE_LEN);
            for (position, byte) in id.as_str().bytes().enumerate() {
                seen[position].insert(byte);
            }
        }

        for position in seen {
            assert_eq!(position.len(), ALPHABET.len());
        }
    }

    #[test]
    fn test_alphabet_is_alphanumeric_and_distinct() {
        let distinct: HashSet<u8> = ALPHABET.iter().copied().collect();
        assert_eq!(distinct.len(), 62);
        assert!(ALPHABET.iter().all(u8::is_ascii_alphanumeric));
    }

    #[test]
    fn test_parse() {
        assert!(Identifier::parse("abc123", SHORT_CODE_LEN).is_ok());
        assert!(Identifier::parse("abc12", SHORT_CODE_LEN).is_err());
        assert!(Identifier::parse("abc-12", SHORT_CODE_LEN).is_err());
        assert!(Identifier::parse("abcdé1", SHORT_CODE_LEN).is_err());

        let err = Identifier::parse("nope", CUSTOM_CODE_LEN).unwrap_err();
        assert!(matches!(
            err,
            ProbeError::MalformedIdentifier { expected_len: 8, .. }
        ));
    }
}
