//! Core type definitions for the CLAMM toolkit

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{DecodeError, Error};

/// Length of a canonical address in hex digits (32 bytes)
pub const ADDRESS_LENGTH: usize = 64;

/// Sui object identifier, stored in canonical form (`0x` + 64 lowercase hex digits)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and canonicalize an object identifier.
    ///
    /// Accepts with or without a `0x` prefix and left-pads short addresses.
    /// Fails with [`Error::InvalidIdentifier`] before any I/O is attempted.
    pub fn parse(id: &str) -> Result<Self, Error> {
        let canonical =
            normalize_address(id).map_err(|_| Error::InvalidIdentifier(id.to_string()))?;
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonicalize an address to `0x` + 64 lowercase hex digits.
pub fn normalize_address(address: &str) -> Result<String, Error> {
    let digits = address.strip_prefix("0x").unwrap_or(address);
    if digits.is_empty()
        || digits.len() > ADDRESS_LENGTH
        || !digits.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return Err(Error::InvalidIdentifier(address.to_string()));
    }
    Ok(format!(
        "0x{:0>width$}",
        digits.to_ascii_lowercase(),
        width = ADDRESS_LENGTH
    ))
}

/// Canonicalize a `package::module::Type` coin tag.
///
/// The tag must split into exactly three segments; the package segment is
/// normalized with [`normalize_address`]. Anything else is rejected with
/// [`DecodeError::MalformedCoinType`].
pub fn normalize_coin_type(tag: &str) -> Result<String, DecodeError> {
    let parts: Vec<&str> = tag.split("::").collect();
    if parts.len() != 3 || parts[1].is_empty() || parts[2].is_empty() {
        return Err(DecodeError::MalformedCoinType(tag.to_string()));
    }
    let address = normalize_address(parts[0])
        .map_err(|_| DecodeError::MalformedCoinType(tag.to_string()))?;
    Ok(format!("{}::{}::{}", address, parts[1], parts[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address_pads_short_form() {
        let canonical = normalize_address("0x2").unwrap();
        assert_eq!(canonical.len(), 2 + ADDRESS_LENGTH);
        assert!(canonical.ends_with("0002"));
        assert!(canonical.starts_with("0x00"));
    }

    #[test]
    fn test_normalize_address_accepts_missing_prefix() {
        let a = normalize_address("2").unwrap();
        let b = normalize_address("0x2").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalize_address_rejects_garbage() {
        assert!(normalize_address("").is_err());
        assert!(normalize_address("0x").is_err());
        assert!(normalize_address("0xzz").is_err());
        // 65 hex digits is one too many
        let too_long = "1".repeat(ADDRESS_LENGTH + 1);
        assert!(normalize_address(&too_long).is_err());
    }

    #[test]
    fn test_normalize_coin_type_idempotent() {
        let tags = [
            "0x2::sui::SUI",
            "0xb97fc1bf5fb56a3b45dd312dbefbb5c9fb4453205ff67a05c73f3ba9964b5b66::usdc::USDC",
            "ae870af23dda8285a5f11e8136190568796bb76a6e7f3b4061f7ded0c1ebe889::usdt::USDT",
        ];
        for tag in tags {
            let once = normalize_coin_type(tag).unwrap();
            let twice = normalize_coin_type(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_normalize_coin_type_rejects_wrong_arity() {
        assert!(normalize_coin_type("0x2::sui").is_err());
        assert!(normalize_coin_type("0x2::sui::SUI::extra").is_err());
        assert!(normalize_coin_type("0x2::::SUI").is_err());
        assert!(normalize_coin_type("not a coin type").is_err());
    }

    #[test]
    fn test_object_id_parse_canonicalizes() {
        let id = ObjectId::parse("0xAB").unwrap();
        assert!(id.as_str().ends_with("00ab"));
        assert_eq!(id.as_str().len(), 2 + ADDRESS_LENGTH);
    }

    #[test]
    fn test_object_id_parse_rejects_invalid() {
        assert!(ObjectId::parse("not-an-id").is_err());
        assert!(ObjectId::parse("0x12g4").is_err());
    }
}
