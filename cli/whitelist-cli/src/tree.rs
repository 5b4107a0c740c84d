use std::collections::HashSet;
use std::fmt;

use crate::common::{hash_sorted_pair, hex_encode, parse_hash, Hash};
use crate::error::WhitelistError;

/// What happens to the last node of a level with an odd number of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OddNodePolicy {
    /// Pair the node with itself. Its proof step records the node as its own sibling.
    #[default]
    Duplicate,
    /// Carry the node up unchanged. Its proof skips that level.
    Promote,
}

impl fmt::Display for OddNodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OddNodePolicy::Duplicate => f.write_str("duplicate"),
            OddNodePolicy::Promote => f.write_str("promote"),
        }
    }
}

/// Knobs that change the shape, and therefore the root, of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Sort leaves before building, making the root independent of list order.
    pub sort_leaves: bool,
    /// Drop repeated leaves, keeping the first occurrence.
    pub dedup_leaves: bool,
    pub odd_node: OddNodePolicy,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            sort_leaves: true,
            dedup_leaves: false,
            odd_node: OddNodePolicy::Duplicate,
        }
    }
}

/// Sibling hashes from a leaf up to the root, leaf-adjacent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proof(Vec<Hash>);

impl Proof {
    pub fn new(siblings: Vec<Hash>) -> Self {
        Self(siblings)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hash> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Hash] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Hash> {
        self.0
    }

    /// `0x`-prefixed hex strings, ready to pass as a `bytes32[]` argument.
    pub fn to_hex(&self) -> Vec<String> {
        self.0.iter().map(hex_encode).collect()
    }

    pub fn from_hex<S: AsRef<str>>(elements: &[S]) -> Result<Self, WhitelistError> {
        elements
            .iter()
            .map(|e| parse_hash(e.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// A binary Keccak-256 Merkle tree whose parents hash their children in
/// sorted order.
///
/// `layers[0]` holds the leaves and the last layer holds only the root.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    layers: Vec<Vec<Hash>>,
    options: TreeOptions,
}

impl MerkleTree {
    /// Builds a tree from leaf hashes.
    ///
    /// # Errors
    /// Returns [`WhitelistError::EmptyAllowList`] when `leaves` is empty.
    pub fn new(mut leaves: Vec<Hash>, options: TreeOptions) -> Result<Self, WhitelistError> {
        if leaves.is_empty() {
            return Err(WhitelistError::EmptyAllowList);
        }

        if options.sort_leaves {
            leaves.sort_unstable();
        }
        if options.dedup_leaves {
            if options.sort_leaves {
                leaves.dedup();
            } else {
                let mut seen = HashSet::with_capacity(leaves.len());
                leaves.retain(|leaf| seen.insert(*leaf));
            }
        }

        let mut layers = vec![leaves];
        loop {
            let level = &layers[layers.len() - 1];
            if level.len() <= 1 {
                break;
            }
            let next_level = parent_level(level, options.odd_node);
            layers.push(next_level);
        }

        let tree = Self { layers, options };
        tracing::debug!(
            leaves = tree.leaves().len(),
            depth = tree.depth(),
            odd_node = %options.odd_node,
            "built merkle tree"
        );
        Ok(tree)
    }

    pub fn root(&self) -> Hash {
        // `new` never produces an empty tree.
        self.layers[self.layers.len() - 1][0]
    }

    pub fn leaves(&self) -> &[Hash] {
        &self.layers[0]
    }

    pub fn layers(&self) -> &[Vec<Hash>] {
        &self.layers
    }

    /// Number of levels above the leaves.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Position of the first leaf equal to `leaf`.
    pub fn leaf_index(&self, leaf: &Hash) -> Option<usize> {
        self.leaves().iter().position(|l| l == leaf)
    }

    /// Generates the proof for the leaf at `leaf_index`.
    pub fn proof(&self, leaf_index: usize) -> Result<Proof, WhitelistError> {
        let len = self.leaves().len();
        if leaf_index >= len {
            return Err(WhitelistError::IndexOutOfRange {
                index: leaf_index,
                len,
            });
        }

        let mut siblings = Vec::with_capacity(self.depth());
        let mut current_index = leaf_index;

        for level in &self.layers[..self.depth()] {
            let sibling_index = if current_index.is_multiple_of(2) {
                current_index + 1
            } else {
                current_index - 1
            };

            match level.get(sibling_index) {
                Some(sibling) => siblings.push(*sibling),
                None => {
                    if self.options.odd_node == OddNodePolicy::Duplicate {
                        siblings.push(level[current_index]);
                    }
                }
            }

            current_index /= 2;
        }

        Ok(Proof(siblings))
    }

    /// Generates the proof for `leaf`, or `None` if it is not in the tree.
    pub fn proof_for_leaf(&self, leaf: &Hash) -> Option<Proof> {
        let index = self.leaf_index(leaf)?;
        self.proof(index).ok()
    }
}

fn parent_level(level: &[Hash], odd_node: OddNodePolicy) -> Vec<Hash> {
    level
        .chunks(2)
        .map(|chunk| {
            let left = chunk[0];
            match (chunk.get(1), odd_node) {
                (Some(right), _) => hash_sorted_pair(&left, right),
                (None, OddNodePolicy::Duplicate) => hash_sorted_pair(&left, &left),
                (None, OddNodePolicy::Promote) => left,
            }
        })
        .collect()
}

/// Recomputes the root from `leaf` and `proof` and compares it with `root`.
pub fn verify_proof(root: &Hash, leaf: &Hash, proof: &Proof) -> bool {
    let computed = proof
        .iter()
        .fold(*leaf, |node, sibling| hash_sorted_pair(&node, sibling));
    computed == *root
}
