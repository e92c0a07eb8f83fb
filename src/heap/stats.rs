//! Heap statistics - allocation counters for leak checks

use std::collections::BTreeMap;
use std::fmt;

/// Snapshot of heap state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapStats {
    /// Objects currently alive, immortal ones included
    pub live_objects: usize,
    pub immortal_objects: usize,
    pub total_created: u64,
    pub total_destroyed: u64,
    /// Empty slots waiting for reuse
    pub free_slots: usize,
    pub total_slots: usize,
    /// Live objects per payload type ("Int", "List", ...)
    pub objects_by_type: BTreeMap<&'static str, usize>,
}

impl HeapStats {
    /// Objects alive that are subject to refcounting
    pub fn counted_objects(&self) -> usize {
        self.live_objects - self.immortal_objects
    }

    /// Difference between `self` ("before") and `after`
    pub fn diff(&self, after: &Self) -> HeapDiff {
        let mut objects_by_type_delta = BTreeMap::new();
        for name in self.objects_by_type.keys().chain(after.objects_by_type.keys()) {
            let before = self.objects_by_type.get(name).copied().unwrap_or(0);
            let now = after.objects_by_type.get(name).copied().unwrap_or(0);
            objects_by_type_delta.insert(*name, delta(before, now));
        }

        HeapDiff {
            live_objects_delta: delta(self.live_objects, after.live_objects),
            objects_by_type_delta,
        }
    }
}

/// Difference between two heap snapshots; positive means growth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapDiff {
    pub live_objects_delta: isize,
    pub objects_by_type_delta: BTreeMap<&'static str, isize>,
}

impl HeapDiff {
    /// True when nothing was leaked or freed between the snapshots
    pub fn is_empty(&self) -> bool {
        self.live_objects_delta == 0 && self.objects_by_type_delta.values().all(|&d| d == 0)
    }
}

impl fmt::Display for HeapDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "HeapDiff: no changes");
        }

        write!(f, "HeapDiff: {:+} live objects", self.live_objects_delta)?;
        for (name, delta) in &self.objects_by_type_delta {
            if *delta != 0 {
                write!(f, "\n  {}: {:+}", name, delta)?;
            }
        }
        Ok(())
    }
}

fn delta(before: usize, after: usize) -> isize {
    after as isize - before as isize
}
