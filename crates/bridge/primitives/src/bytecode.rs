//! Versioned bytecode hashing.

use alloy_primitives::{B256, hex};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    BYTECODE_HASH_VERSION, BytecodeError, BytecodeResult, InputError, MAX_BYTECODE_WORDS,
    WORD_SIZE,
};

/// Content hash of an L2 contract's bytecode.
///
/// Layout: `version (1) || 0x00 || length in words (u16, big-endian) || sha256(bytecode)[4..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BytecodeHash(B256);

impl BytecodeHash {
    /// Parses a bytecode hash from a 32-byte slice, checking its version prefix.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, InputError> {
        if bytes.len() != 32 {
            return Err(InputError::InvalidHash { len: bytes.len() });
        }
        if bytes[0] != BYTECODE_HASH_VERSION || bytes[1] != 0 {
            return Err(InputError::UnknownHashVersion { version: bytes[0], marker: bytes[1] });
        }
        Ok(Self(B256::from_slice(bytes)))
    }

    /// Returns the length of the hashed bytecode in words.
    pub const fn len_in_words(&self) -> u16 {
        u16::from_be_bytes([self.0.0[2], self.0.0[3]])
    }

    /// Returns the hash as a raw 32-byte word.
    pub const fn as_b256(&self) -> B256 {
        self.0
    }

    /// Returns the hash bytes.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl From<BytecodeHash> for B256 {
    fn from(hash: BytecodeHash) -> Self {
        hash.0
    }
}

impl std::fmt::Display for BytecodeHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode_prefixed(self.0))
    }
}

/// Computes bytecode hashes, rejecting bytecode the execution environment cannot deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BytecodeHasher {
    max_words: u16,
}

impl Default for BytecodeHasher {
    fn default() -> Self {
        Self { max_words: MAX_BYTECODE_WORDS }
    }
}

impl BytecodeHasher {
    /// Creates a hasher accepting bytecode of at most `max_words` words.
    pub const fn with_max_words(max_words: u16) -> Self {
        Self { max_words }
    }

    /// Returns the largest accepted bytecode length in words.
    pub const fn max_words(&self) -> u16 {
        self.max_words
    }

    /// Hashes `bytecode`.
    pub fn hash(&self, bytecode: &[u8]) -> BytecodeResult<BytecodeHash> {
        if bytecode.is_empty() {
            return Err(BytecodeError::Empty);
        }
        if bytecode.len() % WORD_SIZE != 0 {
            return Err(BytecodeError::NotWordAligned { len: bytecode.len() });
        }

        let words = bytecode.len() / WORD_SIZE;
        if words > usize::from(self.max_words) {
            return Err(BytecodeError::TooLong { words, max: self.max_words });
        }
        if words % 2 == 0 {
            return Err(BytecodeError::EvenWordCount { words });
        }

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&Sha256::digest(bytecode));
        hash[0] = BYTECODE_HASH_VERSION;
        hash[1] = 0;
        // `words` is bounded by `max_words`, so it fits the 2-byte field.
        hash[2..4].copy_from_slice(&(words as u16).to_be_bytes());

        Ok(BytecodeHash(B256::from(hash)))
    }
}

/// Hashes `bytecode` with the default size limit.
pub fn hash_bytecode(bytecode: &[u8]) -> BytecodeResult<BytecodeHash> {
    BytecodeHasher::default().hash(bytecode)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::b256;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_hash_single_zero_word() {
        let hash = hash_bytecode(&[0u8; 32]).unwrap();
        assert_eq!(
            hash.as_b256(),
            b256!("01000001f862bd776c8fc18b8e9f8e20089714856ee233b3902a591d0d5f2925")
        );
        assert_eq!(hash.len_in_words(), 1);
    }

    #[test]
    fn test_hash_three_words() {
        let bytecode: Vec<u8> = (0u8..96).collect();
        let hash = hash_bytecode(&bytecode).unwrap();
        assert_eq!(
            hash.as_b256(),
            b256!("010000038fa567f5dcf319fa3434da6abbc1d595f426372666447f09cc5a87dc")
        );
        assert_eq!(hash.len_in_words(), 3);
    }

    #[test]
    fn test_hash_keeps_digest_tail() {
        let bytecode = [0xffu8; 96];
        let digest = Sha256::digest(bytecode);
        let hash = hash_bytecode(&bytecode).unwrap();
        assert_eq!(&hash.as_slice()[4..], &digest[4..]);
        assert_eq!(
            hash.as_b256(),
            b256!("01000003c564ce3d8cb72d46bc44cd5495afbad7bc61b5edfa0799baa5063191")
        );
    }

    #[rstest]
    #[case::empty(vec![], BytecodeError::Empty)]
    #[case::unaligned(vec![0u8; 33], BytecodeError::NotWordAligned { len: 33 })]
    #[case::even_words(vec![0u8; 64], BytecodeError::EvenWordCount { words: 2 })]
    fn test_hash_rejects_invalid_bytecode(#[case] bytecode: Vec<u8>, #[case] err: BytecodeError) {
        assert_eq!(hash_bytecode(&bytecode), Err(err));
    }

    #[test]
    fn test_hash_rejects_oversized_bytecode() {
        let hasher = BytecodeHasher::with_max_words(3);
        assert!(hasher.hash(&[1u8; 96]).is_ok());
        assert_eq!(
            hasher.hash(&[1u8; 160]),
            Err(BytecodeError::TooLong { words: 5, max: 3 })
        );
    }

    #[test]
    fn test_default_limit_accepts_largest_odd_length() {
        let bytecode = vec![0u8; usize::from(MAX_BYTECODE_WORDS) * WORD_SIZE];
        let hash = hash_bytecode(&bytecode).unwrap();
        assert_eq!(hash.len_in_words(), MAX_BYTECODE_WORDS);
    }

    #[test]
    fn test_from_slice_round_trip() {
        let hash = hash_bytecode(&[7u8; 32]).unwrap();
        assert_eq!(BytecodeHash::from_slice(hash.as_slice()), Ok(hash));
    }

    #[rstest]
    #[case::short(&[1u8; 31], InputError::InvalidHash { len: 31 })]
    #[case::long(&[1u8; 33], InputError::InvalidHash { len: 33 })]
    #[case::wrong_version(&[2u8; 32], InputError::UnknownHashVersion { version: 2, marker: 2 })]
    fn test_from_slice_rejects(#[case] bytes: &[u8], #[case] err: InputError) {
        assert_eq!(BytecodeHash::from_slice(bytes), Err(err));
    }

    #[test]
    fn test_display_is_prefixed_hex() {
        let hash = hash_bytecode(&[0u8; 32]).unwrap();
        assert_eq!(
            hash.to_string(),
            "0x01000001f862bd776c8fc18b8e9f8e20089714856ee233b3902a591d0d5f2925"
        );
    }
}
