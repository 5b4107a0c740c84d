#![forbid(unsafe_code)]
#![allow(unreachable_pub)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod build_tree;
mod prove;
mod tree_args;
mod verify;

#[derive(Parser, Debug)]
#[command(name = "whitelist")]
#[command(about = "Merkle allow-list tools for NFT mints", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the tree and print the root hash
    BuildTree(build_tree::Cli),
    /// Generate a proof for one address
    Prove(prove::Cli),
    /// Verify a proof against a root
    Verify(verify::Cli),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::BuildTree(args) => build_tree::run(args)?,
        Commands::Prove(args) => prove::run(args)?,
        Commands::Verify(args) => verify::run(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_prove_flags() {
        let cli = Cli::try_parse_from([
            "whitelist",
            "prove",
            "-i",
            "list.txt",
            "-a",
            "0x1111111111111111111111111111111111111111",
            "--odd-node",
            "promote",
            "--preserve-order",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Prove(_)));
    }

    #[test]
    fn test_verify_proof_flags_conflict() {
        let result = Cli::try_parse_from([
            "whitelist",
            "verify",
            "-p",
            "0x01",
            "-f",
            "proof.json",
        ]);
        assert!(result.is_err());
    }
}
