use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use whitelist_cli::{parse_hash, verify, Proof};

use crate::prove::ProofOutput;

#[derive(Parser, Debug)]
#[command(about = "Check a whitelist proof against a Merkle root", long_about = None)]
pub struct Cli {
    /// Merkle root (hex format); defaults to the root stored in --proof-file
    #[arg(short, long)]
    root: Option<String>,

    /// Address the proof claims membership for; defaults to the one in --proof-file
    #[arg(short, long)]
    address: Option<String>,

    /// Comma-separated sibling hashes, leaf side first
    #[arg(short, long, value_delimiter = ',', conflicts_with = "proof_file")]
    proof: Vec<String>,

    /// Proof JSON written by `prove`
    #[arg(short = 'f', long)]
    proof_file: Option<PathBuf>,
}

/// Resolved verification inputs.
#[derive(Debug)]
struct Claim {
    root: String,
    address: String,
    proof: Vec<String>,
}

fn resolve(cli: Cli) -> Result<Claim> {
    let from_file = match &cli.proof_file {
        Some(path) => {
            let content = fs::read_to_string(path).context("Failed to read proof file")?;
            let output: ProofOutput =
                serde_json::from_str(&content).context("Failed to parse proof JSON")?;
            Some(output)
        }
        None => None,
    };

    let root = cli
        .root
        .or_else(|| from_file.as_ref().map(|o| o.merkle_root.clone()))
        .context("A Merkle root is required (--root or --proof-file)")?;
    let address = cli
        .address
        .or_else(|| from_file.as_ref().map(|o| o.address.clone()))
        .context("An address is required (--address or --proof-file)")?;
    let proof = match from_file {
        Some(output) => output.merkle_proof,
        None => cli.proof,
    };

    Ok(Claim {
        root,
        address,
        proof,
    })
}

pub fn check(root: &str, address: &str, proof: &[String]) -> Result<bool> {
    let root = parse_hash(root).context("Invalid Merkle root")?;
    let proof = Proof::from_hex(proof).context("Invalid proof element")?;
    Ok(verify(&root, address.trim(), &proof))
}

pub fn run(cli: Cli) -> Result<()> {
    let claim = resolve(cli)?;
    tracing::debug!(?claim, "verifying proof");

    if !check(&claim.root, &claim.address, &claim.proof)? {
        anyhow::bail!(
            "Proof does not link {} to root {}",
            claim.address,
            claim.root
        );
    }

    println!("valid");
    tracing::info!(address = %claim.address, "proof verified");
    Ok(())
}
