use anyhow::{Context, Result};
use clap::Parser;
use std::fmt::Write as _;
use std::path::PathBuf;

use whitelist_cli::{build_tree, hex_encode, leaf_hash, write_file_atomic, MerkleTree};

use crate::tree_args::TreeArgs;

#[derive(Parser, Debug)]
#[command(about = "Build the allow-list Merkle tree and print its root", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    tree: TreeArgs,

    /// Output file for Merkle root
    #[arg(short, long)]
    root_output: Option<PathBuf>,

    /// Output file for index map (entry -> leaf index)
    #[arg(long)]
    index_output: Option<PathBuf>,

    /// Output file for every tree level (level:index:hash)
    #[arg(short, long)]
    tree_output: Option<PathBuf>,
}

/// One `entry:index` line per allow-list entry, in file order.
fn render_index_map(entries: &[String], tree: &MerkleTree) -> String {
    let mut out = String::new();
    for entry in entries {
        if let Some(index) = tree.leaf_index(&leaf_hash(entry)) {
            let _ = writeln!(out, "{entry}:{index}");
        }
    }
    out
}

fn render_tree(tree: &MerkleTree) -> String {
    let mut out = String::new();
    for (level_num, level) in tree.layers().iter().enumerate() {
        for (i, hash) in level.iter().enumerate() {
            let _ = writeln!(out, "{}:{}:{}", level_num, i, hex_encode(hash));
        }
    }
    out
}

pub fn run(cli: Cli) -> Result<()> {
    let list = cli.tree.load_allow_list()?;
    let options = cli.tree.options();

    tracing::info!(entries = list.len(), ?options, "building merkle tree");
    let tree = build_tree(list.entries(), options).context("Failed to build Merkle tree")?;
    let root = hex_encode(tree.root());

    tracing::info!(
        leaves = tree.leaves().len(),
        depth = tree.depth(),
        root = %root,
        "merkle tree built"
    );
    println!("{root}");

    if let Some(path) = &cli.root_output {
        write_file_atomic(path, &format!("{root}\n")).context("Failed to write root")?;
        tracing::info!(path = %path.display(), "wrote root");
    }

    if let Some(path) = &cli.index_output {
        write_file_atomic(path, &render_index_map(list.entries(), &tree))
            .context("Failed to write index map")?;
        tracing::info!(path = %path.display(), "wrote index map");
    }

    if let Some(path) = &cli.tree_output {
        write_file_atomic(path, &render_tree(&tree)).context("Failed to write tree")?;
        tracing::info!(path = %path.display(), "wrote merkle tree");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use whitelist_cli::TreeOptions;

    #[test]
    fn test_render_tree_lists_every_level() {
        let entries = vec!["0x01".to_string(), "0x02".to_string(), "0x03".to_string()];
        let tree = build_tree(&entries, TreeOptions::default()).unwrap();
        let rendered = render_tree(&tree);
        let lines: Vec<&str> = rendered.lines().collect();
        // 3 leaves, 2 parents, 1 root
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("0:0:0x"));
        assert_eq!(lines[5], format!("2:0:{}", hex_encode(tree.root())));
    }

    #[test]
    fn test_render_index_map_points_at_leaves() {
        let entries = vec!["0x01".to_string(), "0x02".to_string()];
        let tree = build_tree(&entries, TreeOptions::default()).unwrap();
        let rendered = render_index_map(&entries, &tree);
        for line in rendered.lines() {
            let (entry, index) = line.rsplit_once(':').unwrap();
            let index: usize = index.parse().unwrap();
            assert_eq!(tree.leaves()[index], leaf_hash(entry));
        }
        assert_eq!(rendered.lines().count(), 2);
    }
}
