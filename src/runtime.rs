//! Runtime lifecycle - the per-thread object heap
//!
//! Design: The object graph has a single owner thread. `init` installs a heap
//! (with the boolean singletons) in thread-local storage, `with_heap` lends it
//! out, and `cleanup` tears it down and reports what was left behind. Call
//! `init` and `cleanup` exactly once each, in that order.

use std::cell::RefCell;

use crate::builtins;
use crate::error::{fatal, Violation};
use crate::heap::{Heap, HeapStats};
use crate::logging::{self, debug};

thread_local! {
    static RUNTIME: RefCell<Option<Heap>> = const { RefCell::new(None) };
}

/// Initialize the runtime on the calling thread
pub fn init() {
    logging::init();
    logging::log_runtime_init();

    RUNTIME.with(|runtime| {
        let mut slot = runtime.borrow_mut();
        if slot.is_some() {
            fatal(Violation::RuntimeAlreadyInitialized);
        }

        let mut heap = Heap::new();
        builtins::init(&mut heap);
        *slot = Some(heap);
    });
    debug!("runtime ready");
}

/// Tear down the runtime, returning the final heap statistics.
///
/// Objects the program never released are reported as leaks and stay
/// allocated: their destructors (C destructors included) do not run.
pub fn cleanup() -> HeapStats {
    let mut heap = RUNTIME
        .with(|runtime| runtime.borrow_mut().take())
        .unwrap_or_else(|| fatal(Violation::RuntimeNotInitialized));

    builtins::cleanup(&mut heap);

    let stats = heap.stats();
    logging::log_runtime_shutdown(stats.live_objects, stats.total_created);
    stats
}

pub fn is_initialized() -> bool {
    RUNTIME.with(|runtime| runtime.borrow().is_some())
}

/// Run `f` against this thread's heap.
///
/// Not reentrant: `f` must not call `with_heap` again.
pub fn with_heap<R>(f: impl FnOnce(&mut Heap) -> R) -> R {
    RUNTIME.with(|runtime| {
        let mut slot = runtime.borrow_mut();
        let heap = slot
            .as_mut()
            .unwrap_or_else(|| fatal(Violation::RuntimeNotInitialized));
        f(heap)
    })
}
