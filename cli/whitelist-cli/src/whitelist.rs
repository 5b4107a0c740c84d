//! Root and proof generation for a mint allow-list.
//!
//! Both operations rebuild the tree from the full list on every call. Nothing
//! is cached between calls, so the functions are pure and can be called from
//! any thread.

use crate::common::{hex_encode, is_node_preimage, leaf_hash, Hash};
use crate::error::WhitelistError;
use crate::tree::{verify_proof, MerkleTree, Proof, TreeOptions};

/// Outcome of a proof request.
///
/// `NotFound` is the "not whitelisted" signal. It is a normal result, not an
/// error, and must never be confused with an empty but valid proof (a
/// single-entry allow-list yields `Found` with no siblings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofLookup {
    Found(Proof),
    NotFound,
}

impl ProofLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, ProofLookup::Found(_))
    }

    pub fn proof(&self) -> Option<&Proof> {
        match self {
            ProofLookup::Found(proof) => Some(proof),
            ProofLookup::NotFound => None,
        }
    }

    pub fn into_proof(self) -> Option<Proof> {
        match self {
            ProofLookup::Found(proof) => Some(proof),
            ProofLookup::NotFound => None,
        }
    }
}

/// Hashes every entry into a leaf and builds the tree.
pub fn build_tree<S: AsRef<str>>(
    allow_list: &[S],
    options: TreeOptions,
) -> Result<MerkleTree, WhitelistError> {
    let leaves = allow_list.iter().map(|a| leaf_hash(a.as_ref())).collect();
    MerkleTree::new(leaves, options)
}

/// Computes the Merkle root of `allow_list`.
///
/// # Errors
/// Returns [`WhitelistError::EmptyAllowList`] for an empty list.
pub fn build_root<S: AsRef<str>>(
    allow_list: &[S],
    options: TreeOptions,
) -> Result<Hash, WhitelistError> {
    build_tree(allow_list, options).map(|tree| tree.root())
}

/// Builds the inclusion proof for `target`.
///
/// `target` is hashed exactly like the allow-list entries, so a `0x` hex
/// address matches regardless of digit casing. A target that encodes to 64
/// bytes is never found; see [`verify`].
pub fn build_proof<S: AsRef<str>>(
    allow_list: &[S],
    target: &str,
    options: TreeOptions,
) -> ProofLookup {
    let tree = match build_tree(allow_list, options) {
        Ok(tree) => tree,
        Err(_) => return ProofLookup::NotFound,
    };
    lookup_in_tree(&tree, target)
}

/// Looks `target` up in an already built tree.
pub fn lookup_in_tree(tree: &MerkleTree, target: &str) -> ProofLookup {
    if is_node_preimage(target) {
        tracing::debug!(target_entry = target, "entry encodes to a node preimage");
        return ProofLookup::NotFound;
    }
    let leaf = leaf_hash(target);
    match tree.proof_for_leaf(&leaf) {
        Some(proof) => {
            tracing::debug!(target_entry = target, siblings = proof.len(), "proof built");
            ProofLookup::Found(proof)
        }
        None => {
            tracing::debug!(target_entry = target, "entry not in allow-list");
            ProofLookup::NotFound
        }
    }
}

/// Checks that `proof` links `target` to `root`.
///
/// Targets that encode to 64 bytes are rejected: their hash equals the parent
/// of two nodes, so a proof taken from an interior node would otherwise
/// verify them.
pub fn verify(root: &Hash, target: &str, proof: &Proof) -> bool {
    if is_node_preimage(target) {
        return false;
    }
    verify_proof(root, &leaf_hash(target), proof)
}

/// [`build_root`] as a `0x` hex string.
pub fn build_hex_root<S: AsRef<str>>(
    allow_list: &[S],
    options: TreeOptions,
) -> Result<String, WhitelistError> {
    build_root(allow_list, options).map(hex_encode)
}

/// [`build_proof`] as `0x` hex strings; empty when `target` is not listed.
pub fn build_hex_proof<S: AsRef<str>>(
    allow_list: &[S],
    target: &str,
    options: TreeOptions,
) -> Vec<String> {
    build_proof(allow_list, target, options)
        .into_proof()
        .map(|proof| proof.to_hex())
        .unwrap_or_default()
}
