//! The input document model and per-entry validation.
//!
//! Block entries are kept as raw JSON values so that a malformed entry can
//! be skipped with a warning instead of failing the whole document parse.

use serde::Deserialize;
use serde_json::Value;
use snafu::ensure;
use tracing::warn;

use crate::grid::{AbsoluteBlock, BlockPos};
use crate::{EmptyNamespacesSnafu, Result};

/// Vertical offset applied to every entry's `dy`. The source data treats
/// `dy` as relative to the build platform, which sits three blocks up.
pub const Y_OFFSET: i32 = 3;

/// The top-level JSON document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub namespaces: Vec<String>,
    #[serde(default)]
    pub total_blocks: Option<u64>,
    #[serde(default)]
    pub chunked_blocks: Vec<Chunk>,
}

/// A group of blocks sharing a common origin offset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    #[serde(default)]
    pub start_x: i32,
    #[serde(default)]
    pub start_z: i32,
    /// Raw `[namespaceIndex, specialValue, dx, dy, dz]` tuples.
    #[serde(default)]
    pub blocks: Vec<Value>,
}

impl Document {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Checks the document-level invariant that must hold before any block
    /// can be resolved.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.namespaces.is_empty(), EmptyNamespacesSnafu);
        Ok(())
    }

    /// Resolves every well-formed entry to an absolute block.
    ///
    /// Entries with fewer than five fields, non-integer fields, or a
    /// namespace index outside the namespace list are skipped with a
    /// warning and do not affect surrounding entries.
    pub fn resolve_blocks(&self) -> Vec<AbsoluteBlock> {
        let mut blocks = Vec::new();
        for chunk in &self.chunked_blocks {
            for raw in &chunk.blocks {
                let Some([index, special_value, dx, dy, dz]) = decode_entry(raw) else {
                    warn!(entry = %raw, "skipping malformed block entry");
                    continue;
                };
                if index < 0 || index as usize >= self.namespaces.len() {
                    warn!(index, "skipping entry with out-of-range namespace index");
                    continue;
                }
                blocks.push(AbsoluteBlock {
                    pos: BlockPos::new(
                        chunk.start_x + dx as i32,
                        dy as i32 + Y_OFFSET,
                        chunk.start_z + dz as i32,
                    ),
                    namespace: self.namespaces[index as usize].clone(),
                    special_value: special_value as i32,
                });
            }
        }
        blocks
    }
}

fn decode_entry(raw: &Value) -> Option<[i64; 5]> {
    let fields = raw.as_array()?;
    if fields.len() < 5 {
        return None;
    }
    let mut entry = [0i64; 5];
    for (slot, field) in entry.iter_mut().zip(fields) {
        *slot = field.as_i64()?;
    }
    Some(entry)
}
