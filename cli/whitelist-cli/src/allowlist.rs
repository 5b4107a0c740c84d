use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::{leaf_hash, parse_address};
use crate::error::WhitelistError;

/// The configured set of entries allowed to mint, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    entries: Vec<String>,
}

impl AllowList {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Loads an allow-list from disk.
    ///
    /// `.json` files must hold an array of strings. Any other file is read
    /// one entry per line; blank lines and `#` comments are skipped.
    pub fn load(path: &Path) -> Result<Self, WhitelistError> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let list = if is_json {
            let file = File::open(path)?;
            let entries: Vec<String> = serde_json::from_reader(BufReader::new(file))?;
            Self::from_entries(entries.iter().map(|e| e.trim()))
        } else {
            Self::from_reader(BufReader::new(File::open(path)?))?
        };

        if list.is_empty() {
            return Err(WhitelistError::EmptyAllowList);
        }
        tracing::info!(entries = list.len(), path = %path.display(), "loaded allow-list");
        Ok(list)
    }

    /// Parses the line-per-entry format.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, WhitelistError> {
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.split('#').next().unwrap_or_default().trim();
            if trimmed.is_empty() {
                continue;
            }
            entries.push(trimmed.to_string());
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Requires every entry to be a well-formed, non-zero EVM address.
    ///
    /// The error reports the 1-based position of the first bad entry.
    pub fn validate_addresses(&self) -> Result<(), WhitelistError> {
        for (i, entry) in self.entries.iter().enumerate() {
            parse_address(entry).map_err(|e| WhitelistError::InvalidEntry {
                line: i + 1,
                source: Box::new(e),
            })?;
        }
        Ok(())
    }

    /// Groups of entries that hash to the same leaf, in first-seen order.
    pub fn duplicates(&self) -> Vec<Vec<&str>> {
        let mut groups: HashMap<[u8; 32], Vec<&str>> = HashMap::new();
        let mut order = Vec::new();
        for entry in &self.entries {
            let leaf = leaf_hash(entry);
            let group = groups.entry(leaf).or_default();
            if group.is_empty() {
                order.push(leaf);
            }
            group.push(entry.as_str());
        }
        order
            .into_iter()
            .filter_map(|leaf| groups.remove(&leaf))
            .filter(|group| group.len() > 1)
            .collect()
    }
}
