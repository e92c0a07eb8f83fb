//! Reference counting - increment, decrement and explicit destruction
//!
//! Non-atomic: the heap has exactly one owner thread. Every operation checks
//! the handle generation first, so touching a destroyed object is caught in
//! all build profiles, not only in debug builds.

use super::{Entry, Heap, RefPolicy};
use crate::error::{fatal, Violation};
use crate::logging::{debug, trace};
use crate::objects::ObjRef;

impl Heap {
    /// Take another owned reference to `obj`.
    ///
    /// No-op for immortal objects.
    #[inline]
    pub fn increment(&mut self, obj: ObjRef) {
        let header = &mut self.entry_mut("increment", obj).header;
        if header.policy == RefPolicy::Immortal {
            return;
        }

        header.refcount = header
            .refcount
            .checked_add(1)
            .unwrap_or_else(|| fatal(Violation::RefcountOverflow { handle: obj }));

        trace!(event = "incref", handle = %obj, count = header.refcount);
    }

    /// Give up one owned reference to `obj`, destroying it on the last one.
    ///
    /// No-op for immortal objects.
    #[inline]
    pub fn decrement(&mut self, obj: ObjRef) {
        let header = &mut self.entry_mut("decrement", obj).header;
        if header.policy == RefPolicy::Immortal {
            return;
        }

        debug_assert!(header.refcount > 0, "live object with zero refcount");
        header.refcount -= 1;
        trace!(event = "decref", handle = %obj, count = header.refcount);

        if header.refcount == 0 {
            self.release(obj);
        }
    }

    /// Destroy `obj` regardless of its refcount.
    ///
    /// Meant for immortal objects, whose lifetime ends at runtime teardown.
    pub fn destroy(&mut self, obj: ObjRef) {
        // validate before tearing down
        self.entry("destroy", obj);
        self.release(obj);
    }

    /// Current refcount of a live object
    #[inline]
    pub fn refcount(&self, obj: ObjRef) -> usize {
        self.entry("refcount", obj).header.refcount
    }

    /// Destroy object (cold path, separated for better code generation)
    #[cold]
    #[inline(never)]
    fn release(&mut self, obj: ObjRef) {
        let Entry { header, payload } = self.take_entry(obj);

        debug!(
            event = "object_destroy",
            handle = %obj,
            type_name = %header.type_name,
            "destroying object"
        );

        match header.destructor {
            Some(destructor) => destructor(self, payload),
            None => drop(payload),
        }
    }
}
