use thiserror::Error;

/// Errors produced while loading an allow-list or building its Merkle tree.
///
/// An address that is simply absent from the allow-list is not an error; see
/// [`crate::whitelist::ProofLookup::NotFound`].
#[derive(Error, Debug)]
pub enum WhitelistError {
    #[error("Allow-list is empty")]
    EmptyAllowList,
    #[error("Invalid address format: {0}")]
    InvalidAddressFormat(String),
    #[error("Invalid hash: {0}")]
    InvalidHash(String),
    #[error("Leaf index {index} is out of bounds for tree with {len} leaves")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Invalid allow-list entry at line {line}: {source}")]
    InvalidEntry {
        line: usize,
        #[source]
        source: Box<WhitelistError>,
    },
    #[error("io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serde Error: {0}")]
    Json(#[from] serde_json::Error),
}
