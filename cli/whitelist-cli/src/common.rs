use sha3::{Digest, Keccak256};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::WhitelistError;

/// A 32-byte Keccak-256 digest: a leaf, an interior node, or a root.
pub type Hash = [u8; 32];

/// Computes the Keccak-256 digest of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Hashes two nodes after putting them in byte-lexicographic order.
///
/// Because the pair is sorted first, a verifier only needs the sibling value,
/// never its left/right position.
pub fn hash_sorted_pair(a: &Hash, b: &Hash) -> Hash {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    Keccak256::new()
        .chain_update(first)
        .chain_update(second)
        .finalize()
        .into()
}

/// Returns the bytes an allow-list entry is hashed from.
///
/// A `0x`-prefixed string made only of hex digits is decoded (an odd digit
/// count gets one leading zero); any other string is taken as UTF-8. Hex
/// digit casing therefore never changes the result.
pub fn entry_bytes(entry: &str) -> Vec<u8> {
    if let Some(digits) = entry.strip_prefix("0x") {
        if digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            let padded = if digits.len() % 2 == 1 {
                format!("0{digits}")
            } else {
                digits.to_string()
            };
            // Every character was checked above, so decoding cannot fail.
            if let Ok(bytes) = hex::decode(padded) {
                return bytes;
            }
        }
    }
    entry.as_bytes().to_vec()
}

/// True when `entry` encodes to exactly two concatenated node hashes.
///
/// Such an entry hashes to the same value as an interior node, so it can
/// never be treated as a leaf.
pub fn is_node_preimage(entry: &str) -> bool {
    entry_bytes(entry).len() == 64
}

/// Hashes a single allow-list entry into a Merkle leaf.
pub fn leaf_hash(entry: &str) -> Hash {
    keccak256(&entry_bytes(entry))
}

/// Parses an Ethereum address from a hex string.
///
/// # Arguments
/// * `addr_str` - The address string, with or without "0x" prefix
///
/// # Errors
/// Returns [`WhitelistError::InvalidAddressFormat`] if the address is not 40
/// hex characters, contains invalid hex, or is the zero address.
pub fn parse_address(addr_str: &str) -> Result<[u8; 20], WhitelistError> {
    let trimmed = addr_str.trim();
    let cleaned = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if cleaned.len() != 40 {
        return Err(WhitelistError::InvalidAddressFormat(format!(
            "expected 40 hex chars, got {} in '{}'",
            cleaned.len(),
            trimmed
        )));
    }
    let mut address = [0u8; 20];
    hex::decode_to_slice(cleaned, &mut address).map_err(|e| {
        WhitelistError::InvalidAddressFormat(format!("invalid hex in '{trimmed}': {e}"))
    })?;
    if address == [0u8; 20] {
        return Err(WhitelistError::InvalidAddressFormat(
            "zero address not allowed".to_string(),
        ));
    }
    Ok(address)
}

/// Parses a 32-byte hash (root, leaf or proof element) from hex.
pub fn parse_hash(hash_str: &str) -> Result<Hash, WhitelistError> {
    let trimmed = hash_str.trim();
    let cleaned = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if cleaned.len() != 64 {
        return Err(WhitelistError::InvalidHash(format!(
            "expected 64 hex chars, got {}",
            cleaned.len()
        )));
    }
    let mut hash = [0u8; 32];
    hex::decode_to_slice(cleaned, &mut hash)
        .map_err(|e| WhitelistError::InvalidHash(format!("invalid hex encoding: {e}")))?;
    Ok(hash)
}

/// Lowercase hex with a `0x` prefix, the form the mint contract expects.
pub fn hex_encode(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Writes `contents` to a sibling temp file and renames it over `path`.
pub fn write_file_atomic(path: &Path, contents: &str) -> Result<(), WhitelistError> {
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    std::fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty_input() {
        // Well-known Keccak-256 of the empty string.
        assert_eq!(
            hex_encode(keccak256(b"")),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_hash_sorted_pair_is_symmetric() {
        let left: Hash = [1u8; 32];
        let right: Hash = [2u8; 32];
        assert_eq!(hash_sorted_pair(&left, &right), hash_sorted_pair(&right, &left));
    }

    #[test]
    fn test_hash_sorted_pair_matches_concatenation() {
        let low: Hash = [1u8; 32];
        let high: Hash = [2u8; 32];
        let mut concat = Vec::with_capacity(64);
        concat.extend_from_slice(&low);
        concat.extend_from_slice(&high);
        assert_eq!(hash_sorted_pair(&high, &low), keccak256(&concat));
    }

    #[test]
    fn test_entry_bytes_decodes_hex() {
        assert_eq!(entry_bytes("0xdeadBEEF"), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_entry_bytes_pads_odd_hex() {
        assert_eq!(entry_bytes("0xabc"), vec![0x0a, 0xbc]);
    }

    #[test]
    fn test_entry_bytes_empty_hex() {
        assert!(entry_bytes("0x").is_empty());
    }

    #[test]
    fn test_entry_bytes_falls_back_to_utf8() {
        assert_eq!(entry_bytes("alice.eth"), b"alice.eth".to_vec());
        assert_eq!(entry_bytes("0xZZ"), b"0xZZ".to_vec());
        // Without the prefix even valid hex is treated as text.
        assert_eq!(entry_bytes("abcd"), b"abcd".to_vec());
    }

    #[test]
    fn test_is_node_preimage() {
        let pair = format!("0x{}{}", hex::encode([1u8; 32]), hex::encode([2u8; 32]));
        assert!(is_node_preimage(&pair));
        assert!(!is_node_preimage("0x1111111111111111111111111111111111111111"));
        assert!(!is_node_preimage(&"a".repeat(63)));
    }

    #[test]
    fn test_leaf_hash_ignores_hex_casing() {
        let checksummed = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        let lower = checksummed.to_lowercase();
        assert_eq!(leaf_hash(checksummed), leaf_hash(&lower));
    }

    #[test]
    fn test_leaf_hash_text_is_case_sensitive() {
        assert_ne!(leaf_hash("Alice"), leaf_hash("alice"));
    }

    #[test]
    fn test_parse_address_with_prefix() {
        let addr = "0x1234567890abcdef1234567890abcdef12345678";
        let result = parse_address(addr).unwrap();
        assert_eq!(result[0], 0x12);
        assert_eq!(result[19], 0x78);
    }

    #[test]
    fn test_parse_address_without_prefix() {
        let addr = "1234567890abcdef1234567890abcdef12345678";
        assert!(parse_address(addr).is_ok());
    }

    #[test]
    fn test_parse_address_invalid_length() {
        let result = parse_address("0x1234");
        assert!(matches!(result, Err(WhitelistError::InvalidAddressFormat(_))));
    }

    #[test]
    fn test_parse_address_invalid_hex() {
        let addr = "0xghijklmnopqrstuvwxyz1234567890abcdefabcd";
        assert!(parse_address(addr).is_err());
    }

    #[test]
    fn test_parse_address_rejects_zero() {
        let addr = "0x0000000000000000000000000000000000000000";
        assert!(parse_address(addr).is_err());
    }

    #[test]
    fn test_parse_hash_roundtrip() {
        let hash = keccak256(b"root");
        assert_eq!(parse_hash(&hex_encode(hash)).unwrap(), hash);
    }

    #[test]
    fn test_parse_hash_rejects_short_input() {
        assert!(matches!(
            parse_hash("0xabcd"),
            Err(WhitelistError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_write_file_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("root.txt");
        write_file_atomic(&path, "0xabc\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0xabc\n");
        assert!(!path.with_extension("tmp").exists());
    }
}
