use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use whitelist_cli::{
    build_tree, hex_encode, leaf_hash, lookup_in_tree, write_file_atomic, AllowList, ProofLookup,
    TreeOptions,
};

use crate::tree_args::TreeArgs;

#[derive(Parser, Debug)]
#[command(about = "Generate the whitelist proof for one address", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    tree: TreeArgs,

    /// Address to prove membership for
    #[arg(short, long)]
    address: String,

    /// Output JSON file (printed to stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Proof bundle handed to the mint transaction.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProofOutput {
    pub merkle_root: String,
    pub address: String,
    pub leaf: String,
    pub eligible: bool,
    pub leaf_index: Option<usize>,
    pub merkle_proof: Vec<String>,
}

pub fn generate(list: &AllowList, address: &str, options: TreeOptions) -> Result<ProofOutput> {
    let tree = build_tree(list.entries(), options).context("Failed to build Merkle tree")?;
    let leaf = leaf_hash(address);

    let (leaf_index, merkle_proof) = match lookup_in_tree(&tree, address) {
        ProofLookup::Found(proof) => (tree.leaf_index(&leaf), Some(proof.to_hex())),
        ProofLookup::NotFound => (None, None),
    };

    Ok(ProofOutput {
        merkle_root: hex_encode(tree.root()),
        address: address.to_string(),
        leaf: hex_encode(leaf),
        eligible: merkle_proof.is_some(),
        leaf_index,
        merkle_proof: merkle_proof.unwrap_or_default(),
    })
}

pub fn run(cli: Cli) -> Result<()> {
    let list = cli.tree.load_allow_list()?;

    let output = generate(&list, cli.address.trim(), cli.tree.options())?;
    if output.eligible {
        tracing::info!(
            address = %output.address,
            siblings = output.merkle_proof.len(),
            "address is whitelisted"
        );
    } else {
        tracing::warn!(address = %output.address, "address is not on the allow-list");
    }

    let json_output = serde_json::to_string_pretty(&output).context("Failed to serialize JSON")?;
    match &cli.output {
        Some(path) => {
            write_file_atomic(path, &json_output).context("Failed to write proof file")?;
            tracing::info!(path = %path.display(), "wrote proof");
        }
        None => println!("{json_output}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> AllowList {
        AllowList::from_entries([
            "0x1111111111111111111111111111111111111111",
            "0x2222222222222222222222222222222222222222",
            "0x3333333333333333333333333333333333333333",
        ])
    }

    #[test]
    fn test_generate_for_member() {
        let output = generate(
            &list(),
            "0x2222222222222222222222222222222222222222",
            TreeOptions::default(),
        )
        .unwrap();
        assert!(output.eligible);
        assert_eq!(output.merkle_proof.len(), 2);
        assert!(output.leaf_index.is_some());
        assert!(output.merkle_root.starts_with("0x"));
    }

    #[test]
    fn test_generate_for_non_member() {
        let output = generate(
            &list(),
            "0x4444444444444444444444444444444444444444",
            TreeOptions::default(),
        )
        .unwrap();
        assert!(!output.eligible);
        assert!(output.merkle_proof.is_empty());
        assert_eq!(output.leaf_index, None);
    }

    #[test]
    fn test_generate_proof_matches_leaf_index() {
        let list = list();
        let address = "0x3333333333333333333333333333333333333333";
        let output = generate(&list, address, TreeOptions::default()).unwrap();

        let tree = build_tree(list.entries(), TreeOptions::default()).unwrap();
        let index = output.leaf_index.unwrap();
        assert_eq!(tree.leaves()[index], leaf_hash(address));
        assert_eq!(tree.proof(index).unwrap().to_hex(), output.merkle_proof);
    }

    #[test]
    fn test_output_json_shape() {
        let output = generate(
            &list(),
            "0x1111111111111111111111111111111111111111",
            TreeOptions::default(),
        )
        .unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["eligible"], serde_json::Value::Bool(true));
        assert!(json["merkle_proof"].is_array());
    }
}
