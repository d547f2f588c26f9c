//! Absolute block positions and the grouping step that precedes run
//! compaction.

use std::collections::BTreeMap;

use nalgebra::Point3;

/// An absolute block position in the game world.
pub type BlockPos = Point3<i32>;

/// A block entry resolved against its chunk origin and the namespace list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsoluteBlock {
    pub pos: BlockPos,
    pub namespace: String,
    pub special_value: i32,
}

/// The identity under which blocks may be merged along the x-axis.
///
/// Two blocks sharing a key sit on the same line; whether they actually
/// merge depends on their x-coordinates being consecutive. The derived
/// `Ord` is the documented output ordering: groups are emitted sorted by
/// `(z, namespace, special_value, y)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub z: i32,
    pub namespace: String,
    pub special_value: i32,
    pub y: i32,
}

impl AbsoluteBlock {
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            z: self.pos.z,
            namespace: self.namespace.clone(),
            special_value: self.special_value,
            y: self.pos.y,
        }
    }
}

/// Buckets blocks by [`GroupKey`], collecting the x-coordinate of every
/// member. Grouping is global across all chunks so that runs spanning a
/// chunk boundary still merge.
pub fn group_blocks(blocks: &[AbsoluteBlock]) -> BTreeMap<GroupKey, Vec<i32>> {
    let mut groups: BTreeMap<GroupKey, Vec<i32>> = BTreeMap::new();
    for block in blocks {
        groups.entry(block.group_key()).or_default().push(block.pos.x);
    }
    groups
}
