use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use whitelist_cli::{AllowList, OddNodePolicy, TreeOptions};

/// `--odd-node` values.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OddNodeArg {
    /// Pair the last node of an odd level with itself
    Duplicate,
    /// Carry the last node of an odd level up unchanged
    Promote,
}

impl From<OddNodeArg> for OddNodePolicy {
    fn from(arg: OddNodeArg) -> Self {
        match arg {
            OddNodeArg::Duplicate => OddNodePolicy::Duplicate,
            OddNodeArg::Promote => OddNodePolicy::Promote,
        }
    }
}

/// Allow-list input and tree-shape flags shared by `build-tree` and `prove`.
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Allow-list file: one address per line, or a JSON array when the name ends in .json
    #[arg(short, long)]
    pub input: PathBuf,

    /// Keep the file order of leaves instead of sorting them
    #[arg(long)]
    pub preserve_order: bool,

    /// Drop entries that hash to an already seen leaf
    #[arg(long)]
    pub dedup: bool,

    /// How the last node of an odd-sized level is handled
    #[arg(long, value_enum, default_value_t = OddNodeArg::Duplicate)]
    pub odd_node: OddNodeArg,

    /// Reject entries that are not 20-byte hex addresses
    #[arg(long)]
    pub strict: bool,
}

impl TreeArgs {
    pub fn options(&self) -> TreeOptions {
        TreeOptions {
            sort_leaves: !self.preserve_order,
            dedup_leaves: self.dedup,
            odd_node: self.odd_node.into(),
        }
    }

    /// Loads the allow-list and applies the strict/duplicate checks.
    pub fn load_allow_list(&self) -> Result<AllowList> {
        let list = AllowList::load(&self.input)
            .with_context(|| format!("Failed to load allow-list from {:?}", self.input))?;

        if self.strict {
            list.validate_addresses()
                .context("Allow-list contains an invalid address")?;
        }

        for group in list.duplicates() {
            tracing::warn!(entries = ?group, "allow-list entries hash to the same leaf");
        }

        Ok(list)
    }
}
