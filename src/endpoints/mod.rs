//! SPARQL endpoint table
//!
//! Loads the named SPARQL endpoints from a CSV file (header row followed by
//! `display_name,url` rows) into an immutable lookup keyed by canonical
//! identifier. The table is built once at startup and shared read-only.

use crate::error::{BridgeError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Derive the canonical lookup key from a display name.
///
/// Lower-cases the name and strips spaces and hyphens. The mapping is
/// deterministic and idempotent: `"UniProt KB"` becomes `"uniprotkb"`,
/// and re-normalizing `"uniprotkb"` yields itself. Configuration files
/// in the wild depend on this exact rule, so it must not change.
pub fn canonical_key(name: &str) -> String {
    name.to_lowercase().replace([' ', '-'], "")
}

/// Immutable mapping from canonical database key to SPARQL endpoint URL
#[derive(Debug, Clone)]
pub struct EndpointTable {
    entries: HashMap<String, String>,
}

impl EndpointTable {
    /// Load the endpoint table from a CSV file.
    ///
    /// The whole load is atomic: a malformed row or a duplicate canonical
    /// key fails the load, since a broken endpoint table makes the server
    /// unusable.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::config(format!(
                "Failed to read endpoint table {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    /// Parse the endpoint table from CSV content.
    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = HashMap::new();

        // First row is the header, discarded
        for (line_no, line) in content.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }

            let fields = split_csv_row(line);
            if fields.len() != 2 {
                return Err(BridgeError::config(format!(
                    "Malformed endpoint table row {} (expected 2 columns, got {}): {}",
                    line_no + 1,
                    fields.len(),
                    line
                )));
            }

            let key = canonical_key(&fields[0]);
            let url = fields[1].trim().to_string();
            if key.is_empty() {
                return Err(BridgeError::config(format!(
                    "Endpoint table row {} has an empty database name",
                    line_no + 1
                )));
            }

            if entries.insert(key.clone(), url).is_some() {
                // Two display names normalizing to the same key would make
                // dispatch ambiguous, so the load fails instead of letting
                // the last row win.
                return Err(BridgeError::config(format!(
                    "Duplicate canonical endpoint key '{}' in endpoint table",
                    key
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Resolve the endpoint URL for a canonical database key
    pub fn url(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Check whether a canonical key is present
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// All canonical keys, sorted for stable listings
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Iterate over (canonical key, url) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split one CSV row into fields, honoring double-quoted fields.
///
/// The endpoint table only ever has two columns, but display names are
/// commonly quoted (`"UniProt KB",https://...`), and quoted fields may
/// contain commas and doubled quotes.
fn split_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(field.trim().to_string());
                field = String::new();
            }
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}
