pub mod allowlist;
pub mod common;
pub mod error;
pub mod tree;
pub mod whitelist;

pub use allowlist::AllowList;
pub use common::{
    entry_bytes, hash_sorted_pair, hex_encode, is_node_preimage, keccak256, leaf_hash, parse_address,
    parse_hash, write_file_atomic, Hash,
};
pub use error::WhitelistError;
pub use tree::{verify_proof, MerkleTree, OddNodePolicy, Proof, TreeOptions};
pub use whitelist::{
    build_hex_proof, build_hex_root, build_proof, build_root, build_tree, lookup_in_tree, verify,
    ProofLookup,
};
