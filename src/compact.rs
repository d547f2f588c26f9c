//! Run detection and the planning step that turns coordinate groups into
//! point and fill operations.

use std::collections::BTreeMap;

use derive_more::derive::Constructor;
use itertools::Itertools;

use crate::grid::GroupKey;

/// A maximal run of consecutive x-coordinates within one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct Run {
    pub start: i32,
    pub end: i32,
}

impl Run {
    pub fn len(&self) -> u64 {
        (self.end - self.start) as u64 + 1
    }

    pub fn is_point(&self) -> bool {
        self.start == self.end
    }
}

/// Partitions a coordinate list into maximal runs of consecutive integers.
///
/// Duplicates are dropped so no position is ever covered twice. Runs never
/// overlap and cannot be extended without skipping a missing coordinate.
pub fn runs(xs: &[i32]) -> Vec<Run> {
    xs.iter()
        .copied()
        .sorted_unstable()
        .dedup()
        .map(|x| Run::new(x, x))
        .coalesce(|left, right| {
            if right.start == left.end + 1 {
                Ok(Run::new(left.start, right.end))
            } else {
                Err((left, right))
            }
        })
        .collect()
}

/// How multi-length runs within one group become fill operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunPolicy {
    /// Every run becomes its own fill covering exactly its span.
    #[default]
    PerRun,
    /// Legacy behavior of the older batch scripts: all multi-length runs in a
    /// group collapse into one fill from the first run's start to the last
    /// run's end, silently bridging any gaps between them. Kept only for
    /// byte-compatible output; the filled region can exceed the input.
    MergedSpan,
}

/// A single game command to be typed into the chat field.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct Operation {
    pub kind: OpKind,
    pub y: i32,
    pub z: i32,
    pub namespace: String,
    pub special_value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// `/setblock` at one x-coordinate.
    Point(i32),
    /// `/fill` covering an inclusive x-range.
    Fill(i32, i32),
}

impl Operation {
    /// How many blocks this operation claims to place.
    pub fn block_count(&self) -> u64 {
        match self.kind {
            OpKind::Point(_) => 1,
            OpKind::Fill(start, end) => (end - start) as u64 + 1,
        }
    }
}

/// Turns every group into its operation list.
///
/// Under [`RunPolicy::PerRun`] operations appear in ascending x-order;
/// under [`RunPolicy::MergedSpan`] single blocks come first and the merged
/// fill last, matching the shape of the legacy script.
pub fn plan(groups: &BTreeMap<GroupKey, Vec<i32>>, policy: RunPolicy) -> Vec<Operation> {
    let mut operations = Vec::new();
    for (key, xs) in groups {
        let group_runs = runs(xs);
        match policy {
            RunPolicy::PerRun => {
                for run in &group_runs {
                    operations.push(operation_for(key, run));
                }
            }
            RunPolicy::MergedSpan => {
                let fills: Vec<&Run> = group_runs.iter().filter(|run| !run.is_point()).collect();
                for run in group_runs.iter().filter(|run| run.is_point()) {
                    operations.push(operation_for(key, run));
                }
                if let (Some(first), Some(last)) = (fills.first(), fills.last()) {
                    operations.push(Operation::new(
                        OpKind::Fill(first.start, last.end),
                        key.y,
                        key.z,
                        key.namespace.clone(),
                        key.special_value,
                    ));
                }
            }
        }
    }
    operations
}

fn operation_for(key: &GroupKey, run: &Run) -> Operation {
    let kind = if run.is_point() {
        OpKind::Point(run.start)
    } else {
        OpKind::Fill(run.start, run.end)
    };
    Operation::new(kind, key.y, key.z, key.namespace.clone(), key.special_value)
}
