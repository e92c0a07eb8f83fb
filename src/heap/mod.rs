//! Object heap - slot arena owning every object of one runtime
//!
//! Design: Objects live in a `Vec` of slots and are addressed by
//! generation-checked [`ObjRef`] handles:
//! 1. Allocation pops a free slot or appends a new one
//! 2. Destruction empties the slot and bumps its generation
//! 3. Any later use of the old handle is a fatal use-after-free
//!
//! Reference counting itself lives in [`refcount`].

mod header;
mod refcount;
mod stats;


pub use header::{Destructor, ObjectHeader, RefPolicy, TypeInfo};
pub use stats::{HeapDiff, HeapStats};

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::mem;

use crate::builtins::boolean::Booleans;
use crate::error::{fatal, Violation};
use crate::logging::{self, debug};
use crate::objects::{ObjRef, ObjectType, Payload};

/// A live object: header + payload
#[derive(Debug)]
pub(crate) struct Entry {
    pub(crate) header: ObjectHeader,
    pub(crate) payload: Payload,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Reference-counted arena backing all runtime objects
///
/// Single-threaded: one heap is owned by one thread, and every operation
/// runs to completion before returning.
pub struct Heap {
    slots: Vec<Slot>,
    /// Indices of empty slots available for reuse
    free_list: Vec<u32>,
    pub(crate) booleans: Option<Booleans>,
    total_created: u64,
    total_destroyed: u64,
}

impl Heap {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a heap with room for `slots` objects before reallocating
    pub fn with_capacity(slots: usize) -> Self {
        Self {
            slots: Vec::with_capacity(slots),
            free_list: Vec::new(),
            booleans: None,
            total_created: 0,
            total_destroyed: 0,
        }
    }

    /// Create a new object.
    ///
    /// Returns one owned reference (refcount 1). `destructor(heap, payload)`
    /// runs when the object is destroyed; without one the payload is simply
    /// dropped.
    pub fn create(
        &mut self,
        type_name: impl Into<Cow<'static, str>>,
        destructor: Option<Destructor>,
        payload: Payload,
    ) -> ObjRef {
        self.insert(ObjectHeader::new(type_name.into(), destructor), payload)
    }

    /// Create an object exempt from refcount-driven destruction
    pub(crate) fn create_immortal(
        &mut self,
        type_name: &'static str,
        destructor: Option<Destructor>,
        payload: Payload,
    ) -> ObjRef {
        self.insert(ObjectHeader::immortal(Cow::Borrowed(type_name), destructor), payload)
    }

    fn insert(&mut self, header: ObjectHeader, payload: Payload) -> ObjRef {
        let object_type = payload.object_type();
        let entry = Entry { header, payload };

        let handle = match self.free_list.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                debug_assert!(slot.entry.is_none(), "free slot still occupied");
                slot.entry = Some(entry);
                ObjRef::new(index, slot.generation)
            }
            None => {
                let index = u32::try_from(self.slots.len())
                    .unwrap_or_else(|_| fatal(Violation::HeapExhausted));
                self.slots.push(Slot { generation: 0, entry: Some(entry) });
                ObjRef::new(index, 0)
            }
        };

        self.total_created += 1;
        debug!(event = "object_new", handle = %handle, object_type = %object_type, "object created");
        handle
    }

    /// Look up a live entry, failing loudly on stale or foreign handles
    pub(crate) fn entry(&self, op: &'static str, obj: ObjRef) -> &Entry {
        let slot = self
            .slots
            .get(obj.index as usize)
            .unwrap_or_else(|| fatal(Violation::DanglingHandle { op, handle: obj }));
        let generation = slot.generation;
        match &slot.entry {
            Some(entry) if generation == obj.generation => entry,
            _ => fatal(Violation::UseAfterFree { op, handle: obj }),
        }
    }

    pub(crate) fn entry_mut(&mut self, op: &'static str, obj: ObjRef) -> &mut Entry {
        let slot = self
            .slots
            .get_mut(obj.index as usize)
            .unwrap_or_else(|| fatal(Violation::DanglingHandle { op, handle: obj }));
        let generation = slot.generation;
        match &mut slot.entry {
            Some(entry) if generation == obj.generation => entry,
            _ => fatal(Violation::UseAfterFree { op, handle: obj }),
        }
    }

    /// Empty the slot of a validated handle and hand back its entry
    pub(crate) fn take_entry(&mut self, obj: ObjRef) -> Entry {
        let slot = &mut self.slots[obj.index as usize];
        let entry = match slot.entry.take() {
            Some(entry) => entry,
            None => fatal(Violation::UseAfterFree { op: "release", handle: obj }),
        };

        // A slot whose generation would wrap is retired instead of reused
        if slot.generation < u32::MAX {
            slot.generation += 1;
            self.free_list.push(obj.index);
        }

        self.total_destroyed += 1;
        entry
    }

    pub fn payload(&self, obj: ObjRef) -> &Payload {
        &self.entry("payload", obj).payload
    }

    pub fn payload_mut(&mut self, obj: ObjRef) -> &mut Payload {
        &mut self.entry_mut("payload", obj).payload
    }

    pub fn header(&self, obj: ObjRef) -> &ObjectHeader {
        &self.entry("header", obj).header
    }

    pub fn type_name(&self, obj: ObjRef) -> &str {
        &self.entry("type_name", obj).header.type_name
    }

    pub fn object_type(&self, obj: ObjRef) -> ObjectType {
        self.payload(obj).object_type()
    }

    /// Whether `obj` still refers to a live object of this heap
    pub fn is_live(&self, obj: ObjRef) -> bool {
        self.slots
            .get(obj.index as usize)
            .map_or(false, |slot| slot.generation == obj.generation && slot.entry.is_some())
    }

    pub fn is_immortal(&self, obj: ObjRef) -> bool {
        self.header(obj).policy == RefPolicy::Immortal
    }

    /// Number of objects currently alive, immortal ones included
    pub fn live_objects(&self) -> usize {
        self.slots.iter().filter(|slot| slot.entry.is_some()).count()
    }

    /// Snapshot of heap state
    pub fn stats(&self) -> HeapStats {
        let mut live_objects = 0;
        let mut immortal_objects = 0;
        let mut objects_by_type: BTreeMap<&'static str, usize> = BTreeMap::new();

        for entry in self.slots.iter().filter_map(|slot| slot.entry.as_ref()) {
            live_objects += 1;
            if entry.header.policy == RefPolicy::Immortal {
                immortal_objects += 1;
            }
            *objects_by_type.entry(entry.payload.object_type().name()).or_insert(0) += 1;
        }

        HeapStats {
            live_objects,
            immortal_objects,
            total_created: self.total_created,
            total_destroyed: self.total_destroyed,
            free_slots: self.free_list.len(),
            total_slots: self.slots.len(),
            objects_by_type,
        }
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Heap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("live_objects", &self.live_objects())
            .field("total_slots", &self.slots.len())
            .field("booleans", &self.booleans.is_some())
            .finish()
    }
}

/// Objects still referenced when the heap goes away are leaked: neither their
/// destructors nor their payload drops run.
impl Drop for Heap {
    fn drop(&mut self) {
        let mut leaked = 0;
        for entry in self.slots.drain(..).filter_map(|slot| slot.entry) {
            if entry.header.policy == RefPolicy::Counted {
                leaked += 1;
            }
            mem::forget(entry.payload);
        }
        if leaked > 0 {
            logging::log_leaks(leaked);
        }
    }
}
