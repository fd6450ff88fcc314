//! Object identifiers.
//!
//! Every object in a project file is keyed by a 24-character uppercase
//! hexadecimal token (96 bits). The same token is embedded in other objects
//! as a cross-reference.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::error::IdError;

/// Length of an identifier token in characters.
pub const ID_LEN: usize = 24;

/// A 24-character object identifier.
///
/// Stored as its ASCII token so that formatting is free and ordering matches
/// the textual order used in the on-disk object table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; ID_LEN]);

/// The all-zero identifier.
pub const NIL_ID: ObjectId = ObjectId([b'0'; ID_LEN]);

impl Default for ObjectId {
    fn default() -> Self {
        NIL_ID
    }
}

impl ObjectId {
    /// Parses an identifier token. Lowercase hex digits are accepted and
    /// normalised to uppercase.
    pub fn parse(s: &str) -> Result<ObjectId, IdError> {
        let len = s.chars().count();
        if len != ID_LEN {
            return Err(IdError::InvalidLength { len });
        }
        let mut token = [0u8; ID_LEN];
        for (slot, c) in token.iter_mut().zip(s.chars()) {
            if !c.is_ascii_hexdigit() {
                return Err(IdError::InvalidChar { char: c });
            }
            *slot = c.to_ascii_uppercase() as u8;
        }
        Ok(ObjectId(token))
    }

    /// Builds an identifier from 12 raw bytes.
    pub fn from_bytes(bytes: [u8; 12]) -> ObjectId {
        const HEX: &[u8; 16] = b"0123456789ABCDEF";
        let mut token = [0u8; ID_LEN];
        for (i, byte) in bytes.iter().enumerate() {
            token[i * 2] = HEX[(byte >> 4) as usize];
            token[i * 2 + 1] = HEX[(byte & 0x0F) as usize];
        }
        ObjectId(token)
    }

    /// Derives a deterministic identifier from arbitrary seed bytes.
    ///
    /// ```text
    /// id = hex(SHA-256(seed)[0:12])
    /// ```
    pub fn derived(seed: &[u8]) -> ObjectId {
        let hash = Sha256::digest(seed);
        let mut bytes = [0u8; 12];
        bytes.copy_from_slice(&hash[..12]);
        ObjectId::from_bytes(bytes)
    }

    /// Generates a fresh random identifier (UUIDv4 entropy).
    pub fn random() -> ObjectId {
        let uuid = uuid::Uuid::new_v4();
        let mut bytes = [0u8; 12];
        bytes.copy_from_slice(&uuid.as_bytes()[..12]);
        ObjectId::from_bytes(bytes)
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        // The token only ever holds ASCII hex digits.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.as_str())
    }
}

impl FromStr for ObjectId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalises_case() {
        let id = ObjectId::parse("0a1b2c3d4e5f60718293a4b5").unwrap();
        assert_eq!(id.as_str(), "0A1B2C3D4E5F60718293A4B5");
        assert_eq!(id, ObjectId::parse("0A1B2C3D4E5F60718293A4B5").unwrap());
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        assert_eq!(
            ObjectId::parse("ABC"),
            Err(IdError::InvalidLength { len: 3 })
        );
        assert_eq!(
            ObjectId::parse("0A1B2C3D4E5F60718293A4BZ"),
            Err(IdError::InvalidChar { char: 'Z' })
        );
    }

    #[test]
    fn test_parse_counts_characters() {
        assert_eq!(
            ObjectId::parse(&"é".repeat(12)),
            Err(IdError::InvalidLength { len: 12 })
        );
        assert_eq!(
            ObjectId::parse(&"é".repeat(24)),
            Err(IdError::InvalidChar { char: 'é' })
        );
    }

    #[test]
    fn test_derived_is_deterministic() {
        let a = ObjectId::derived(b"Sources/App.swift");
        let b = ObjectId::derived(b"Sources/App.swift");
        let c = ObjectId::derived(b"Sources/Other.swift");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(ObjectId::parse(a.as_str()).is_ok());
    }

    #[test]
    fn test_random_is_well_formed() {
        let a = ObjectId::random();
        let b = ObjectId::random();
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), ID_LEN);
        assert_eq!(a.to_string().parse::<ObjectId>().unwrap(), a);
    }

    #[test]
    fn test_nil_id() {
        assert_eq!(ObjectId::default().as_str(), "000000000000000000000000");
        assert_eq!(ObjectId::from_bytes([0; 12]), NIL_ID);
    }

    #[test]
    fn test_from_bytes_formats_hex() {
        let id = ObjectId::from_bytes([0xAB; 12]);
        assert_eq!(id.as_str(), "ABABABABABABABABABABABAB");
    }
}
